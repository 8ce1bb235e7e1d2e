//! Solver session and problem descriptor types.
//!
//! This module contains the main types for setting up and solving conic
//! optimization problems in the standard format described on the top level
//! [API page](crate): minimize `½xᵀPx + qᵀx` subject to `Ax + s = b`,
//! `s ∈ K`, with `K` a product of the [supported cones](SupportedConeT).

use crate::algebra::SparseFormatError;
use lazy_static::lazy_static;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub mod cones;

mod callbacks;
mod data_updating;
mod equilibration;
mod info;
mod info_print;
mod kkt;
mod presolver;
mod problemdata;
mod residuals;
mod settings;
mod solution;
#[allow(clippy::module_inception)]
mod solver;
mod variables;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
    }
}

// user facing API
pub use crate::solver::cones::{SupportedConeT, SupportedConeT::*};
pub use callbacks::*;
pub use data_updating::*;
pub use equilibration::DefaultEquilibrationData;
pub use info::{DefaultInfo, LinearSolverInfo};
pub use presolver::Presolver;
pub use problemdata::DefaultProblemData;
pub use residuals::DefaultResiduals;
pub use settings::*;
pub use solution::DefaultSolution;
pub use solver::*;
pub use variables::DefaultVariables;

// ---------------
// solver status
// ---------------

/// Status of the solver at termination.
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Problem is primal infeasible.  Solution returned is a certificate of primal infeasibility.
    PrimalInfeasible,
    /// Problem is dual infeasible.  Solution returned is a certificate of dual infeasibility.
    DualInfeasible,
    /// Solver terminated with a solution (reduced accuracy).
    AlmostSolved,
    /// Problem is primal infeasible.  Solution returned is a certificate of primal infeasibility (reduced accuracy).
    AlmostPrimalInfeasible,
    /// Problem is dual infeasible.  Solution returned is a certificate of dual infeasibility (reduced accuracy).
    AlmostDualInfeasible,
    /// Iteration limit reached before solution or infeasibility certificate found.
    MaxIterations,
    /// Time limit reached before solution or infeasibility certificate found.
    MaxTime,
    /// Solver terminated with a numerical error.
    NumericalError,
    /// Solver terminated due to lack of progress.
    InsufficientProgress,
    /// Solver terminated by a user supplied callback.
    CallbackTerminated,
}

impl SolverStatus {
    /// `true` if the solver terminated with an infeasibility
    /// certificate, at either full or reduced accuracy
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            SolverStatus::PrimalInfeasible
                | SolverStatus::DualInfeasible
                | SolverStatus::AlmostPrimalInfeasible
                | SolverStatus::AlmostDualInfeasible
        )
    }

    pub(crate) fn is_errored(&self) -> bool {
        matches!(
            self,
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// KKT solve directions during IP iteration
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum StepDirection {
    Affine,
    Combined,
}

// ---------------
// errors at session setup
// ---------------

/// Error type returned by [`DefaultSolver::new`](DefaultSolver::new).
#[derive(Error, Debug)]
pub enum SolverError {
    /// The quadratic cost matrix `P` is not square
    #[error("matrix P must be square")]
    PNotSquare,
    /// Dimensions of `P`, `q`, `A` and `b` are mutually inconsistent
    #[error("dimensions of problem data are incompatible")]
    IncompatibleDimension,
    /// The cone dimensions do not sum to the number of rows in `A`
    #[error("cone dimensions do not match the constraint count")]
    ConeDimensionMismatch,
    /// A data matrix is not in valid CSC format
    #[error("problem data matrix is incorrectly formatted: {0}")]
    BadMatrixFormat(#[from] SparseFormatError),
    /// Settings failed validation
    #[error("invalid settings: {0}")]
    BadSettings(#[from] SettingsError),
    /// The KKT system could not be factored at setup
    #[error("linear solver setup failed: {0}")]
    LinearSolverSetup(#[from] crate::ldl::LdlError),
}

// ---------------
// infinity bound
// ---------------

pub(crate) const _INFINITY_DEFAULT: f64 = 1e20;

// f64 in an atomic shell, so that the module level infinity
// bound can be changed without requiring unsafe statics
struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }
    fn store(&self, value: f64, ordering: Ordering) {
        self.bits.store(value.to_bits(), ordering)
    }
    fn load(&self, ordering: Ordering) -> f64 {
        f64::from_bits(self.bits.load(ordering))
    }
}

lazy_static! {
    static ref INFINITY: AtomicF64 = AtomicF64::new(_INFINITY_DEFAULT);
}

/// Revert the module level infinity bound to its default value.
pub fn default_infinity() {
    INFINITY.store(_INFINITY_DEFAULT, Ordering::Relaxed);
}
/// Set the module level infinity bound to a new value.
pub fn set_infinity(v: f64) {
    INFINITY.store(v, Ordering::Relaxed);
}
/// Get the module level infinity bound.
pub fn get_infinity() -> f64 {
    INFINITY.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinity_bound() {
        assert_eq!(get_infinity(), 1e20);
        set_infinity(1e17);
        assert_eq!(get_infinity(), 1e17);
        default_infinity();
        assert_eq!(get_infinity(), 1e20);
    }
}
