#![allow(non_snake_case)]
//! Basic linear algebra data types and operations for the solver.
//!
//! All internal matrix representations are in standard compressed sparse
//! column format, as is the API.

mod densesym3;
mod error_types;
mod floats;
mod math_traits;
mod scalarmath;
mod vecmath;

mod csc;
pub use csc::*;
pub(crate) use densesym3::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;

/// number of entries in the upper triangle of an n x n matrix
pub(crate) fn triangular_number(n: usize) -> usize {
    (n * (n + 1)) >> 1
}

/// Matrix orientation marker
#[derive(PartialEq, Eq, Copy, Clone)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}

/// Matrix shape marker for triangular matrices
#[derive(PartialEq, Eq, Copy, Clone)]
pub enum MatrixTriangle {
    /// Upper triangular matrix
    Triu,
    /// Lower triangular matrix
    Tril,
}

/// Adjoint (transpose) view of a matrix
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}

/// Symmetric view of a matrix.  The source data should be triu.
pub struct Symmetric<'a, M> {
    pub src: &'a M,
}

pub(crate) trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.ncols()
    }
    fn ncols(&self) -> usize {
        self.src.nrows()
    }
}

impl<M> ShapedMatrix for Symmetric<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.nrows()
    }
    fn ncols(&self) -> usize {
        self.src.ncols()
    }
}
