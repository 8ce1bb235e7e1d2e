#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use super::info::DefaultInfoFFI;
use super::solver::*;
use crate::algebra::FloatT;
use crate::solver::{self as lib, CallbackFcnFFI};
use paste::paste;
use std::ffi::c_void;

/// C termination callback for solver sessions over `f32` data
pub type ConixCallbackFcn_f32 = CallbackFcnFFI<DefaultInfoFFI<f32>>;
/// C termination callback for solver sessions over `f64` data
pub type ConixCallbackFcn_f64 = CallbackFcnFFI<DefaultInfoFFI<f64>>;

// Set the termination callback
fn _internal_DefaultSolver_set_termination_callback<T: FloatT>(
    solver: *mut c_void,
    callback: CallbackFcnFFI<DefaultInfoFFI<T>>,
    user_data: *mut c_void,
) {
    // Recover the solver object from the opaque pointer
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    solver.set_termination_callback_c(callback, user_data);
}

// Turn off the termination callback
fn _internal_DefaultSolver_unset_termination_callback<T: FloatT>(solver: *mut c_void) {
    // Recover the solver object from the opaque pointer
    let solver = unsafe { &mut *(solver as *mut lib::DefaultSolver<T>) };
    solver.unset_termination_callback();
}

macro_rules! _make_conix_DefaultSolver_callbacks {
    ($TYPE:ty) => {
        paste! {
            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _set_termination_callback>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
                callback: [<ConixCallbackFcn_ $TYPE>],
                user_data: *mut c_void,
            ) {
                _internal_DefaultSolver_set_termination_callback::<$TYPE>(
                    solver, callback, user_data)
            }

            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSolver_ $TYPE _unset_termination_callback>](
                solver: *mut [<ConixDefaultSolver_ $TYPE>],
            ) {
                _internal_DefaultSolver_unset_termination_callback::<$TYPE>(solver)
            }
        }
    };
}

_make_conix_DefaultSolver_callbacks!(f64);
_make_conix_DefaultSolver_callbacks!(f32);
