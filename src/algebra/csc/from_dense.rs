#![allow(non_snake_case)]

use crate::algebra::{CscMatrix, FloatT};

// Conversions between dense data and the CSC format.  These are
// convenience paths for API users; nothing on the solver's internal
// hot path goes through a dense representation.

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Build a CSC matrix from a dense array in row-major order.
    ///
    /// Only nonzero entries are retained.  Entries within each column
    /// appear in increasing row order and `colptr` holds cumulative
    /// counts, so the result always satisfies
    /// [`check_format`](CscMatrix::check_format).
    ///
    /// # Panics
    /// Panics if `values.len() != m * n`.
    pub fn from_dense(m: usize, n: usize, values: &[T]) -> Self {
        assert_eq!(values.len(), m * n);

        let nnz = values.iter().filter(|&&v| v != T::zero()).count();
        let mut A = CscMatrix::spalloc(m, n, nnz);

        let mut ptr = 0;
        for col in 0..n {
            A.colptr[col] = ptr;
            for row in 0..m {
                let v = values[row * n + col];
                if v != T::zero() {
                    A.rowval[ptr] = row;
                    A.nzval[ptr] = v;
                    ptr += 1;
                }
            }
        }
        A.colptr[n] = ptr;
        A
    }

    /// Materialize as a dense array in row-major order.
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.m * self.n];
        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                out[self.rowval[ptr] * self.n + col] = self.nzval[ptr];
            }
        }
        out
    }
}

impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for CscMatrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Self {
        let values: Vec<T> = rows.iter().flatten().copied().collect();
        CscMatrix::from_dense(M, N, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dense() {
        let A = CscMatrix::from(&[
            [1., 0., 5.], //
            [2., 0., 6.], //
            [0., 4., 0.], //
        ]);

        assert!(A.check_format().is_ok());
        assert_eq!(A.nnz(), 5);
        assert_eq!(A.colptr, vec![0, 2, 3, 5]);
        assert_eq!(A.rowval, vec![0, 1, 2, 0, 1]);
        assert_eq!(A.nzval, vec![1., 2., 4., 5., 6.]);
    }

    #[test]
    fn test_from_dense_empty() {
        let A: CscMatrix<f64> = CscMatrix::from_dense(2, 3, &[0.; 6]);
        assert!(A.check_format().is_ok());
        assert_eq!(A.nnz(), 0);
        assert_eq!(A.colptr, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = vec![0., 1., 3., 0., 0., 2., 0., 0., 4.];
        let A = CscMatrix::from_dense(3, 3, &dense);
        let B = CscMatrix::from_dense(3, 3, &A.to_dense());
        assert_eq!(A, B);
        assert_eq!(A.to_dense(), dense);
    }
}
