#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use super::cones::{convert_from_C_cones, ConixSupportedConeT};
use super::csc::{convert_from_C_CscMatrix, ConixCscMatrix};
use super::info::DefaultInfoFFI;
use super::settings::DefaultSettingsFFI;
use super::solution::DefaultSolutionFFI;
use crate::algebra::FloatT;
use crate::io::ConfigurablePrintTarget;
use crate::solver::{self as lib};
use paste::paste;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::mem::forget;
use std::slice;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{de::DeserializeOwned, Serialize};
    }
}

/// Opaque pointer to a solver session over `f32` data
pub type ConixDefaultSolver_f32 = c_void;
/// Opaque pointer to a solver session over `f64` data
pub type ConixDefaultSolver_f64 = c_void;

// Wrapper function to create a DefaultSolver object from C using dynamic
// memory allocation
// - Matrices and vectors are constructed from raw pointers
// - Cones and settings are converted from C structs to Rust structs
//
// b and cones are allowed to be null pointers, in which case they form
// zero-length slices
unsafe fn _internal_DefaultSolver_new<T: FloatT>(
    P: *const ConixCscMatrix<T>,
    q: *const T,
    A: *const ConixCscMatrix<T>,
    b: *const T,
    n_cones: usize,
    cones: *const ConixSupportedConeT<T>,
    settings: *const DefaultSettingsFFI<T>,
) -> *mut c_void {
    debug_assert!(!P.is_null(), "Pointer P must not be null");
    debug_assert!(!q.is_null(), "Pointer q must not be null");
    debug_assert!(!A.is_null(), "Pointer A must not be null");
    debug_assert!(!settings.is_null(), "Pointer settings must not be null");
    if P.is_null() || q.is_null() || A.is_null() || settings.is_null() {
        return std::ptr::null_mut();
    }

    // Recover the matrices from C structs
    let P = convert_from_C_CscMatrix(P);
    let A = convert_from_C_CscMatrix(A);
    // Recover the arrays from C pointers and deduce their lengths
    // from the matrix dimensions
    let q = Vec::from_raw_parts(q as *mut T, P.n, P.n);
    let b = match b.is_null() {
        true => Vec::new(),
        false => Vec::from_raw_parts(b as *mut T, A.m, A.m),
    };

    let settings_struct = &*(settings as *const DefaultSettingsFFI<T>);
    let settings = lib::DefaultSettings::<T>::from(settings_struct.clone());

    // Convert the cones from C to Rust
    let cones = match cones.is_null() {
        true => Vec::new(),
        false => {
            let c_cones = slice::from_raw_parts(cones, n_cones);
            convert_from_C_cones(c_cones)
        }
    };

    let solver = lib::DefaultSolver::<T>::new(&P, &q, &A, &b, &cones, settings);

    // Ensure Rust does not free the memory of arrays managed by C.
    // Zero-length vecs created for null pointers never allocated,
    // so forgetting them is also fine.
    forget(P);
    forget(A);
    forget(q);
    forget(b);

    // Badly posed problem data gives back a null pointer rather
    // than a session handle
    match solver {
        Ok(solver) => Box::into_raw(Box::new(solver)) as *mut c_void,
        Err(_) => std::ptr::null_mut(),
    }
}

// Wrapper function to call DefaultSolver.solve() from C
fn _internal_DefaultSolver_solve<T: FloatT>(solver: *mut c_void) {
    // Recover the solver object from the opaque pointer
    let mut solver = unsafe { Box::from_raw(solver as *mut lib::DefaultSolver<T>) };

    solver.solve();

    // Leave the solver object on the heap
    let _ = Box::into_raw(solver);
}

// Function to free the memory of the solver object
unsafe fn _internal_DefaultSolver_free<T: FloatT>(solver: *mut c_void) {
    if !solver.is_null() {
        // Reconstruct the box to drop the solver object
        let boxed = Box::from_raw(solver as *mut lib::DefaultSolver<T>);
        drop(boxed);
    }
}

/// Get the solution field from a DefaultSolver object.
///
/// The solution is returned as a C struct of borrowed pointers.
fn _internal_DefaultSolver_solution<T: FloatT>(solver: *mut c_void) -> DefaultSolutionFFI<T> {
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    DefaultSolutionFFI::<T>::from(&mut solver.solution)
}

/// Get the info field from a DefaultSolver object.
fn _internal_DefaultSolver_info<T: FloatT>(solver: *mut c_void) -> DefaultInfoFFI<T> {
    let solver = unsafe { &*(solver as *mut lib::DefaultSolver<T>) };
    DefaultInfoFFI::<T>::from(&solver.info)
}

// ---------------------------------
// print stream redirection
// ---------------------------------

fn _internal_DefaultSolver_print_to_stdout<T: FloatT>(solver: *mut c_void) {
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    solver.print_to_stdout();
}

unsafe fn _internal_DefaultSolver_print_to_file<T: FloatT>(
    solver: *mut c_void,
    filename: *const c_char,
) {
    if filename.is_null() {
        return;
    }
    let filename = match CStr::from_ptr(filename).to_str() {
        Ok(filename) => filename,
        Err(_) => return,
    };
    let file = match std::fs::File::create(filename) {
        Ok(file) => file,
        Err(_) => return,
    };
    let solver = &mut *(solver as *mut lib::DefaultSolver<T>);
    solver.print_to_file(file);
}

fn _internal_DefaultSolver_print_to_buffer<T: FloatT>(solver: *mut c_void) {
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    solver.print_to_buffer();
}

// Drain the internal print buffer into a heap allocated C string.
// The string must be released with conix_free_print_buffer.
fn _internal_DefaultSolver_get_print_buffer<T: FloatT>(solver: *mut c_void) -> *mut c_char {
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    match solver.get_print_buffer() {
        Ok(out) => match CString::new(out) {
            Ok(cstr) => cstr.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release a string previously returned by one of the
/// `conix_DefaultSolver_*_get_print_buffer` entry points.
#[no_mangle]
pub unsafe extern "C" fn conix_free_print_buffer(string: *mut c_char) {
    if !string.is_null() {
        drop(CString::from_raw(string));
    }
}

// ---------------------------------
// JSON file read/write
// ---------------------------------

#[cfg(feature = "serde")]
unsafe fn _internal_DefaultSolver_read_from_file<T>(filename: *const c_char) -> *mut c_void
where
    T: FloatT + DeserializeOwned + Serialize,
{
    if filename.is_null() {
        return std::ptr::null_mut();
    }
    let filename = match CStr::from_ptr(filename).to_str() {
        Ok(filename) => filename,
        Err(_) => return std::ptr::null_mut(),
    };
    let mut file = match std::fs::File::open(filename) {
        Ok(file) => file,
        Err(_) => return std::ptr::null_mut(),
    };
    match lib::DefaultSolver::<T>::read_from_file(&mut file) {
        Ok(solver) => Box::into_raw(Box::new(solver)) as *mut c_void,
        Err(_) => std::ptr::null_mut(),
    }
}

#[cfg(feature = "serde")]
unsafe fn _internal_DefaultSolver_write_to_file<T>(
    solver: *mut c_void,
    filename: *const c_char,
) -> c_int
where
    T: FloatT + DeserializeOwned + Serialize,
{
    if filename.is_null() {
        return -1;
    }
    let filename = match CStr::from_ptr(filename).to_str() {
        Ok(filename) => filename,
        Err(_) => return -1,
    };
    let mut file = match std::fs::File::create(filename) {
        Ok(file) => file,
        Err(_) => return -1,
    };
    let solver = &*(solver as *mut lib::DefaultSolver<T>);
    match solver.write_to_file(&mut file) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

// ---------------------------------
// per-type entry points
// ---------------------------------

macro_rules! _make_conix_DefaultSolver {
    ($TYPE:ty) => {
        paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _new>](
                P: *const ConixCscMatrix<$TYPE>,
                q: *const $TYPE,
                A: *const ConixCscMatrix<$TYPE>,
                b: *const $TYPE,
                n_cones: usize,
                cones: *const ConixSupportedConeT<$TYPE>,
                settings: *const DefaultSettingsFFI<$TYPE>,
            ) -> *mut [<ConixDefaultSolver_ $TYPE>] {
                _internal_DefaultSolver_new(P, q, A, b, n_cones, cones, settings)
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _solve>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) {
                _internal_DefaultSolver_solve::<$TYPE>(solver);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _free>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) {
                _internal_DefaultSolver_free::<$TYPE>(solver);
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _solution>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) -> DefaultSolutionFFI<$TYPE> {
                _internal_DefaultSolver_solution::<$TYPE>(solver)
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _info>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) -> DefaultInfoFFI<$TYPE> {
                _internal_DefaultSolver_info::<$TYPE>(solver)
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _print_to_stdout>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) {
                _internal_DefaultSolver_print_to_stdout::<$TYPE>(solver);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _print_to_file>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                filename: *const c_char,
            ) {
                _internal_DefaultSolver_print_to_file::<$TYPE>(solver, filename);
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _print_to_buffer>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) {
                _internal_DefaultSolver_print_to_buffer::<$TYPE>(solver);
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _get_print_buffer>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) -> *mut c_char {
                _internal_DefaultSolver_get_print_buffer::<$TYPE>(solver)
            }

            #[no_mangle]
            #[cfg(feature = "serde")]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _read_from_file>](
                filename: *const c_char,
            ) -> *mut [<ConixDefaultSolver_ $TYPE>] {
                _internal_DefaultSolver_read_from_file::<$TYPE>(filename)
            }

            #[no_mangle]
            #[cfg(feature = "serde")]
            pub unsafe extern "C" fn [<conix_DefaultSolver_ $TYPE _write_to_file>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                filename: *const c_char,
            ) -> c_int {
                _internal_DefaultSolver_write_to_file::<$TYPE>(solver, filename)
            }
        }
    };
}

_make_conix_DefaultSolver!(f64);
_make_conix_DefaultSolver!(f32);
