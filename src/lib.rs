//!  __conix__ is an interior point solver for convex conic optimization
//!  problems using a homogeneous self-dual embedding.  It solves problems
//!  of the form:
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T P x + q^T x\\\\\[2ex\]
//!  \text{subject to} & Ax + s = b \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with decision variables
//! $x \in \mathbb{R}^n$,
//! $s \in \mathbb{R}^m$
//! and data matrices
//! $P=P^\top \succeq 0$,
//! $q \in \mathbb{R}^n$,
//! $A \in \mathbb{R}^{m \times n}$, and
//! $b \in \mathbb{R}^m$.
//! The convex set $\mathcal{K}$ is a composition of convex cones.
//!
//! ## Features
//!
//! * __Versatile__: solves linear programs (LPs), quadratic programs
//!   (QPs) and second-order cone programs (SOCPs), as well as problems
//!   with exponential, power cone and generalized power cone constraints.
//!
//! * __Quadratic objectives__: quadratic objective terms are handled
//!   directly, without any epigraphical reformulation of the objective.
//!
//! * __Infeasibility detection__: infeasible problems are detected via
//!   the homogeneous embedding, and certificates of infeasibility are
//!   returned with the solution.
//!
//! Problem data is supplied through [`CscMatrix`](crate::algebra::CscMatrix)
//! sparse matrices and [`SupportedConeT`](crate::solver::SupportedConeT)
//! cone descriptions, and solved through a
//! [`DefaultSolver`](crate::solver::DefaultSolver) session object.  A C
//! compatible interface to the same functionality is in [`ffi`](crate::ffi).

//Rust hates greek characters
#![allow(confusable_idents)]

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod ffi;
pub mod io;
pub mod ldl;
pub mod solver;
