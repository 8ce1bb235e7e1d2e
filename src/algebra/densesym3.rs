#![allow(non_snake_case)]

use crate::algebra::FloatT;
use std::ops::{Index, IndexMut};

// Minimal fixed-size 3x3 symmetric matrix.  Data is held as a packed
// upper triangle in column major order, matching the layout expected
// by the KKT assembly for dense Hessian blocks.

#[derive(Debug, Clone)]
pub(crate) struct DenseMatrixSym3<T> {
    pub data: [T; 6],
}

// map (i,j) with i ≤ j to the packed triu index
fn _triu_index(i: usize, j: usize) -> usize {
    let (i, j) = if i <= j { (i, j) } else { (j, i) };
    (j * (j + 1)) / 2 + i
}

impl<T> DenseMatrixSym3<T>
where
    T: FloatT,
{
    pub fn zeros() -> Self {
        Self {
            data: [T::zero(); 6],
        }
    }

    /// self = c * B
    pub fn scaled_from(&mut self, c: T, B: &Self) {
        for (t, &s) in self.data.iter_mut().zip(B.data.iter()) {
            *t = c * s;
        }
    }

    /// symmetric matrix-vector product y = self * x
    pub fn mul(&self, y: &mut [T], x: &[T]) {
        let H = self;
        for i in 0..3 {
            y[i] = H[(i, 0)] * x[0] + H[(i, 1)] * x[1] + H[(i, 2)] * x[2];
        }
    }

    /// copy the packed triu data into a slice of length 6
    pub fn pack_triu(&self, v: &mut [T]) {
        v.copy_from_slice(&self.data);
    }
}

impl<T> Index<(usize, usize)> for DenseMatrixSym3<T> {
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[_triu_index(idx.0, idx.1)]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrixSym3<T> {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        &mut self.data[_triu_index(idx.0, idx.1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sym3_indexing_and_mul() {
        let mut H = DenseMatrixSym3::<f64>::zeros();
        H[(0, 0)] = 2.;
        H[(0, 1)] = 1.;
        H[(1, 1)] = 3.;
        H[(1, 2)] = -1.;
        H[(2, 2)] = 4.;

        // symmetric access
        assert_eq!(H[(1, 0)], 1.);
        assert_eq!(H[(2, 1)], -1.);

        let x = [1., 2., 3.];
        let mut y = [0.; 3];
        H.mul(&mut y, &x);
        assert_eq!(y, [4., 4., 10.]);
    }
}
