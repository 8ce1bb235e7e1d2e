//! C-compatible interface to the solver.
//!
//! Entry points are generated for both `f32` and `f64` problem data,
//! prefixed `conix_..._f32` / `conix_..._f64`.  Solver sessions cross
//! the boundary as opaque pointers, and problem data is borrowed from
//! caller-owned buffers wherever possible.

mod callbacks;
mod cones;
mod csc;
mod data_updating;
mod info;
mod settings;
mod solution;
#[allow(clippy::module_inception)]
mod solver;

pub use callbacks::*;
pub use cones::*;
pub use csc::*;
pub use data_updating::*;
pub use info::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
