#![allow(non_snake_case)]

use super::csc::{convert_from_C_CscMatrix, ConixCscMatrix};
use super::solver::*;
use crate::algebra::FloatT;
use crate::solver::{self as lib, DataUpdateError};
use core::iter::zip;
use paste::paste;
use std::ffi::{c_int, c_void};
use std::mem::forget;

#[allow(non_camel_case_types)]
enum DataUpdateTarget {
    P,
    A,
    q,
    b,
}

fn _to_c_result(result: Result<(), DataUpdateError>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

// Wrapper function to update solver P or A data (csc based full
// rewrite form)
unsafe fn _internal_DefaultSolver_update_csc<T: FloatT>(
    solver: *mut c_void,
    mat: *const ConixCscMatrix<T>,
    target: DataUpdateTarget,
) -> c_int {
    // Recover the solver object from the opaque pointer
    let solver = &mut *(solver as *mut lib::DefaultSolver<T>);

    // convert values to rust CSC types
    let mat = convert_from_C_CscMatrix(mat);

    let result = match target {
        DataUpdateTarget::P => solver.update_P(&mat),
        DataUpdateTarget::A => solver.update_A(&mat),
        _ => panic!("Only P and A can be updated with a CSC matrix"),
    };

    // Ensure Rust does not free the memory of arrays managed by C
    forget(mat);

    _to_c_result(result)
}

// Wrapper function to update solver data (array based full rewrite form)
unsafe fn _internal_DefaultSolver_update<T: FloatT>(
    solver: *mut c_void,
    values: *const T,
    nvals: usize,
    target: DataUpdateTarget,
) -> c_int {
    // Recover the solver object from the opaque pointer
    let solver = &mut *(solver as *mut lib::DefaultSolver<T>);

    // convert values to a vector
    let values = Vec::from_raw_parts(values as *mut T, nvals, nvals);

    let result = match target {
        DataUpdateTarget::P => solver.update_P(&values),
        DataUpdateTarget::A => solver.update_A(&values),
        DataUpdateTarget::q => solver.update_q(&values),
        DataUpdateTarget::b => solver.update_b(&values),
    };

    // Ensure Rust does not free the memory of arrays managed by C
    forget(values);

    _to_c_result(result)
}

// Wrapper function to update solver data (array based partial rewrite form)
unsafe fn _internal_DefaultSolver_update_partial<T: FloatT>(
    solver: *mut c_void,
    index: *const usize,
    values: *const T,
    nvals: usize,
    target: DataUpdateTarget,
) -> c_int {
    // Recover the solver object from the opaque pointer
    let solver = &mut *(solver as *mut lib::DefaultSolver<T>);

    // convert values to vectors
    let index = Vec::from_raw_parts(index as *mut usize, nvals, nvals);
    let values = Vec::from_raw_parts(values as *mut T, nvals, nvals);

    let result = match target {
        DataUpdateTarget::P => solver.update_P(&zip(&index, &values)),
        DataUpdateTarget::A => solver.update_A(&zip(&index, &values)),
        DataUpdateTarget::q => solver.update_q(&zip(&index, &values)),
        DataUpdateTarget::b => solver.update_b(&zip(&index, &values)),
    };

    // Ensure Rust does not free the memory of arrays managed by C
    forget(index);
    forget(values);

    _to_c_result(result)
}

// Wrapper function to replace solver P or A data with a matrix of a
// possibly different sparsity pattern
unsafe fn _internal_DefaultSolver_replace_csc<T: FloatT>(
    solver: *mut c_void,
    mat: *const ConixCscMatrix<T>,
    target: DataUpdateTarget,
) -> c_int {
    // Recover the solver object from the opaque pointer
    let solver = &mut *(solver as *mut lib::DefaultSolver<T>);

    // convert values to rust CSC types
    let mat = convert_from_C_CscMatrix(mat);

    let result = match target {
        DataUpdateTarget::P => solver.replace_P(&mat),
        DataUpdateTarget::A => solver.replace_A(&mat),
        _ => panic!("Only P and A can be replaced"),
    };

    // Ensure Rust does not free the memory of arrays managed by C
    forget(mat);

    _to_c_result(result)
}

macro_rules! _make_conix_DefaultSolver_update_csc {
    ($TYPE:ty,$FIELD:ident) => {
        paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _update_ $FIELD _csc>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                mat: *const ConixCscMatrix<$TYPE>,
            ) -> c_int {
                _internal_DefaultSolver_update_csc::<$TYPE>(solver, mat, DataUpdateTarget::$FIELD)
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _replace_ $FIELD>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                mat: *const ConixCscMatrix<$TYPE>,
            ) -> c_int {
                _internal_DefaultSolver_replace_csc::<$TYPE>(solver, mat, DataUpdateTarget::$FIELD)
            }
        }
    };
}

macro_rules! _make_conix_DefaultSolver_update {
    ($TYPE:ty,$FIELD:ident) => {
        paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _update_ $FIELD>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                values: *const $TYPE,
                nvals: usize,
            ) -> c_int {
                _internal_DefaultSolver_update::<$TYPE>(
                    solver, values, nvals, DataUpdateTarget::$FIELD)
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _update_ $FIELD _partial>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                index: *const usize,
                values: *const $TYPE,
                nvals: usize,
            ) -> c_int {
                _internal_DefaultSolver_update_partial::<$TYPE>(
                    solver, index, values, nvals, DataUpdateTarget::$FIELD)
            }
        }
    };
}

_make_conix_DefaultSolver_update_csc!(f64, P);
_make_conix_DefaultSolver_update_csc!(f32, P);
_make_conix_DefaultSolver_update_csc!(f64, A);
_make_conix_DefaultSolver_update_csc!(f32, A);

_make_conix_DefaultSolver_update!(f64, P);
_make_conix_DefaultSolver_update!(f32, P);
_make_conix_DefaultSolver_update!(f64, A);
_make_conix_DefaultSolver_update!(f32, A);
_make_conix_DefaultSolver_update!(f64, q);
_make_conix_DefaultSolver_update!(f32, q);
_make_conix_DefaultSolver_update!(f64, b);
_make_conix_DefaultSolver_update!(f32, b);
