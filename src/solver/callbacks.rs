use super::info::DefaultInfo;
use super::solver::DefaultSolver;
use crate::algebra::FloatT;
use crate::ffi::DefaultInfoFFI;

// ---------------------------------
// enum for managing callbacks
// ---------------------------------

/// C style termination callback.   Returns nonzero to stop the solver.
/// The second argument is the opaque user data pointer supplied at
/// registration, passed back on every poll.
pub type CallbackFcnFFI<FFI> =
    extern "C" fn(info: *const FFI, user_data: *mut std::ffi::c_void) -> std::ffi::c_int;

pub(crate) enum Callback<I, FFI> {
    None,
    Rust(Box<dyn FnMut(&I) -> bool + Send>),
    C(CallbackFcnFFI<FFI>, *mut std::ffi::c_void),
}

impl<I, FFI> Default for Callback<I, FFI> {
    fn default() -> Self {
        Callback::None
    }
}

impl<I, FFI> std::fmt::Debug for Callback<I, FFI> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callback::None => write!(f, "Callback::None"),
            Callback::Rust(_) => write!(f, "Callback::Rust"),
            Callback::C(..) => write!(f, "Callback::C"),
        }
    }
}

impl<I, FFI> Callback<I, FFI>
where
    FFI: for<'a> From<&'a I>,
{
    // Call the callback function
    fn call(&mut self, info: &I) -> bool {
        match self {
            Callback::None => false,
            Callback::Rust(f) => f(info),
            Callback::C(f, user_data) => {
                let ffi_info = FFI::from(info);
                f(&ffi_info as *const FFI, *user_data) != (0 as std::ffi::c_int)
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct SolverCallbacks<I, FFI> {
    /// callback polled once per iteration for early termination
    pub termination_callback: Callback<I, FFI>,
}

impl<I, FFI> Default for SolverCallbacks<I, FFI> {
    fn default() -> Self {
        Self {
            termination_callback: Callback::default(),
        }
    }
}

impl<I, FFI> SolverCallbacks<I, FFI>
where
    FFI: for<'a> From<&'a I>,
{
    pub(crate) fn check_termination(&mut self, info: &I) -> bool {
        self.termination_callback.call(info)
    }
}

// ---------------------------------
// user facing callback assignment
// ---------------------------------

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    /// Set a termination callback polled at every iteration.  The solver
    /// stops with status [`CallbackTerminated`](crate::solver::SolverStatus)
    /// if the callback returns `true`.
    pub fn set_termination_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&DefaultInfo<T>) -> bool + Send + 'static,
    {
        self.callbacks.termination_callback = Callback::Rust(Box::new(callback));
    }

    /// Set a C style termination callback.  The solver stops with status
    /// [`CallbackTerminated`](crate::solver::SolverStatus) if the callback
    /// returns a nonzero value.  The `user_data` pointer is passed back
    /// to the callback on every poll.
    pub fn set_termination_callback_c(
        &mut self,
        callback: CallbackFcnFFI<DefaultInfoFFI<T>>,
        user_data: *mut std::ffi::c_void,
    ) {
        self.callbacks.termination_callback = Callback::C(callback, user_data);
    }

    /// Remove any assigned termination callback.
    pub fn unset_termination_callback(&mut self) {
        self.callbacks.termination_callback = Callback::None;
    }
}
