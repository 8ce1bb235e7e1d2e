use super::info::SolverStatusFFI;
use crate::algebra::FloatT;
use crate::solver as lib;

/// FFI interface for [`DefaultSolution`](crate::solver::DefaultSolution)
///
/// The solution vectors are borrowed pointers into the solver object
/// and remain valid until the solver is freed or solved again.
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug)]
pub struct DefaultSolutionFFI<T> {
    pub x: *mut T,
    pub x_length: usize,

    pub z: *mut T,
    pub z_length: usize,

    pub s: *mut T,
    pub s_length: usize,

    pub status: SolverStatusFFI,
    pub obj_val: T,
    pub obj_val_dual: T,
    pub solve_time: f64,
    pub iterations: u32,
    pub r_prim: T,
    pub r_dual: T,
}

impl<T: FloatT> From<&mut lib::DefaultSolution<T>> for DefaultSolutionFFI<T> {
    fn from(solution: &mut lib::DefaultSolution<T>) -> Self {
        Self {
            x: solution.x.as_mut_ptr(),
            x_length: solution.x.len(),
            z: solution.z.as_mut_ptr(),
            z_length: solution.z.len(),
            s: solution.s.as_mut_ptr(),
            s_length: solution.s.len(),
            status: solution.status,
            obj_val: solution.obj_val,
            obj_val_dual: solution.obj_val_dual,
            solve_time: solution.solve_time,
            iterations: solution.iterations,
            r_prim: solution.r_prim,
            r_dual: solution.r_dual,
        }
    }
}
