#![allow(non_snake_case)]

use super::settings::DirectSolveMethodsFFI;
use crate::algebra::FloatT;
use crate::solver::{DefaultInfo, LinearSolverInfo, SolverStatus};

/// FFI interface for [`SolverStatus`](crate::solver::SolverStatus)
///
/// The status enum is `repr(u32)` and is passed across the boundary
/// directly.
#[allow(missing_docs)]
pub type SolverStatusFFI = SolverStatus;

/// FFI interface for [`LinearSolverInfo`](crate::solver::LinearSolverInfo)
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug, Clone)]
pub struct LinearSolverInfoFFI {
    pub name: DirectSolveMethodsFFI,
    pub threads: u32,
    pub direct: bool,
    pub nnzA: u32,
    pub nnzL: u32,
}

impl From<&LinearSolverInfo> for LinearSolverInfoFFI {
    fn from(linsolver: &LinearSolverInfo) -> Self {
        Self {
            name: linsolver.name.clone().into(),
            threads: linsolver.threads as u32,
            direct: linsolver.direct,
            nnzA: linsolver.nnzA as u32,
            nnzL: linsolver.nnzL as u32,
        }
    }
}

// No From<LinearSolverInfoFFI> because solver information
// flows only one way

/// FFI interface for [`DefaultInfo`](crate::solver::DefaultInfo)
#[repr(C)]
#[allow(missing_docs)]
#[derive(Debug)]
pub struct DefaultInfoFFI<T> {
    pub mu: T,
    pub sigma: T,
    pub step_length: T,
    pub iterations: u32,
    pub cost_primal: T,
    pub cost_dual: T,
    pub res_primal: T,
    pub res_dual: T,
    pub res_primal_inf: T,
    pub res_dual_inf: T,
    pub gap_abs: T,
    pub gap_rel: T,
    pub ktratio: T,

    pub solve_time: f64,
    pub status: SolverStatusFFI,
    pub linsolver: LinearSolverInfoFFI,
}

impl<T: FloatT> From<&DefaultInfo<T>> for DefaultInfoFFI<T> {
    fn from(info: &DefaultInfo<T>) -> Self {
        Self {
            mu: info.μ,
            sigma: info.sigma,
            step_length: info.step_length,
            iterations: info.iterations,
            cost_primal: info.cost_primal,
            cost_dual: info.cost_dual,
            res_primal: info.res_primal,
            res_dual: info.res_dual,
            res_primal_inf: info.res_primal_inf,
            res_dual_inf: info.res_dual_inf,
            gap_abs: info.gap_abs,
            gap_rel: info.gap_rel,
            ktratio: info.ktratio,
            solve_time: info.solve_time,
            status: info.status,
            linsolver: (&info.linsolver).into(),
        }
    }
}

#[test]
fn test_info_ffi() {
    let info = DefaultInfo::<f64> {
        ktratio: 2.0,
        ..Default::default()
    };
    let info_ffi: DefaultInfoFFI<f64> = (&info).into();

    assert_eq!(info_ffi.ktratio, info.ktratio);
    assert_eq!(info_ffi.status, SolverStatus::Unsolved);
}
