//! Assembly and factorization of the homogeneous embedding KKT system.

mod assembly;
mod datamap;
mod directldl;
mod kktsystem;

pub(crate) use assembly::*;
pub(crate) use datamap::*;
pub(crate) use directldl::*;
pub(crate) use kktsystem::*;
