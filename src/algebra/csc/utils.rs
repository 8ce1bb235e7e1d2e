//---------------------------------------------------------
// low-level internal utilities for counting / filling entries
// in block partitioned sparse matrices.   Used by the KKT
// system assembly.
//---------------------------------------------------------

use crate::algebra::{CscMatrix, FloatT, MatrixShape, MatrixTriangle};
use std::iter::zip;

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    // increment self.colptr by the number of nonzeros
    // in a dense upper/lower triangle on the diagonal.
    pub(crate) fn colcount_dense_triangle(
        &mut self,
        initcol: usize,
        blockcols: usize,
        shape: MatrixTriangle,
    ) {
        let cols = self.colptr[initcol..(initcol + blockcols)].iter_mut();
        let counts = 1..(blockcols + 1);
        match shape {
            MatrixTriangle::Triu => {
                zip(cols, counts).for_each(|(x, c)| *x += c);
            }
            MatrixTriangle::Tril => {
                zip(cols, counts.rev()).for_each(|(x, c)| *x += c);
            }
        }
    }

    // increment self.colptr by the number of nonzeros
    // in a square diagonal matrix placed on the diagonal.
    pub(crate) fn colcount_diag(&mut self, initcol: usize, blockcols: usize) {
        let cols = self.colptr[initcol..(initcol + blockcols)].iter_mut();
        cols.for_each(|x| *x += 1);
    }

    // as colcount_diag, but counts only places where the input
    // matrix M has a missing diagonal entry.  M must be square and triu.
    pub(crate) fn colcount_missing_diag(&mut self, M: &CscMatrix<T>, initcol: usize) {
        assert_eq!(M.colptr.len(), M.n + 1);
        assert!(self.colptr.len() >= M.n + initcol);

        for i in 0..M.n {
            // completely empty column, or last element not on diagonal
            if M.colptr[i] == M.colptr[i + 1] || M.rowval[M.colptr[i + 1] - 1] != i {
                self.colptr[i + initcol] += 1;
            }
        }
    }

    // increment self.colptr to account for a column vector
    // that partially populates a single column.
    pub(crate) fn colcount_colvec(&mut self, n: usize, _firstrow: usize, firstcol: usize) {
        self.colptr[firstcol] += n;
    }

    // increment self.colptr by 1 across a span of columns to account
    // for a row vector.
    pub(crate) fn colcount_rowvec(&mut self, n: usize, _firstrow: usize, firstcol: usize) {
        let cols = self.colptr[firstcol..(firstcol + n)].iter_mut();
        cols.for_each(|x| *x += 1);
    }

    // increment self.colptr by the number of nonzeros in M,
    // either in transposed or untransposed orientation.
    pub(crate) fn colcount_block(&mut self, M: &CscMatrix<T>, initcol: usize, shape: MatrixShape) {
        match shape {
            MatrixShape::T => {
                for row in M.rowval.iter() {
                    self.colptr[initcol + row] += 1;
                }
            }
            MatrixShape::N => {
                for i in 0..M.n {
                    self.colptr[initcol + i] += M.colptr[i + 1] - M.colptr[i];
                }
            }
        }
    }

    // populate a partial column with zeros, using self.colptr as the
    // next fill location indicator and recording destinations in vtoKKT.
    pub(crate) fn fill_colvec(&mut self, vtoKKT: &mut [usize], initrow: usize, initcol: usize) {
        for (i, v) in vtoKKT.iter_mut().enumerate() {
            let dest = self.colptr[initcol];
            self.rowval[dest] = initrow + i;
            self.nzval[dest] = T::zero();
            *v = dest;
            self.colptr[initcol] += 1;
        }
    }

    // populate a partial row with zeros, as fill_colvec.
    pub(crate) fn fill_rowvec(&mut self, vtoKKT: &mut [usize], initrow: usize, initcol: usize) {
        for (i, v) in vtoKKT.iter_mut().enumerate() {
            let col = initcol + i;
            let dest = self.colptr[col];
            self.rowval[dest] = initrow;
            self.nzval[dest] = T::zero();
            *v = dest;
            self.colptr[col] += 1;
        }
    }

    // populate values from M, using self.colptr as the next fill
    // location indicator in each column.
    pub(crate) fn fill_block(
        &mut self,
        M: &CscMatrix<T>,
        MtoKKT: &mut [usize],
        initrow: usize,
        initcol: usize,
        shape: MatrixShape,
    ) {
        for i in 0..M.n {
            for j in M.colptr[i]..M.colptr[i + 1] {
                let (Mrow, Mval) = (M.rowval[j], M.nzval[j]);
                let (row, col) = match shape {
                    MatrixShape::T => (i + initrow, Mrow + initcol),
                    MatrixShape::N => (Mrow + initrow, i + initcol),
                };

                let dest = self.colptr[col];
                self.rowval[dest] = row;
                self.nzval[dest] = Mval;
                self.colptr[col] += 1;
                MtoKKT[j] = dest;
            }
        }
    }

    // Populate a dense upper or lower triangle with structural zeros,
    // using self.colptr as the next fill location indicator.  Data is
    // always supplied as triu, so filling tril requires a transpose.
    pub(crate) fn fill_dense_triangle(
        &mut self,
        blocktoKKT: &mut [usize],
        offset: usize,
        blockdim: usize,
        shape: MatrixTriangle,
    ) {
        let mut kidx = 0;
        match shape {
            MatrixTriangle::Triu => {
                for col in offset..(offset + blockdim) {
                    for row in offset..=col {
                        kidx = self._fill_structural_zero(blocktoKKT, kidx, row, col);
                    }
                }
            }
            MatrixTriangle::Tril => {
                for row in offset..(offset + blockdim) {
                    for col in offset..=row {
                        kidx = self._fill_structural_zero(blocktoKKT, kidx, row, col);
                    }
                }
            }
        }
    }

    fn _fill_structural_zero(
        &mut self,
        blocktoKKT: &mut [usize],
        kidx: usize,
        row: usize,
        col: usize,
    ) -> usize {
        let dest = self.colptr[col];
        self.rowval[dest] = row;
        self.nzval[dest] = T::zero();
        self.colptr[col] += 1;
        blocktoKKT[kidx] = dest;
        kidx + 1
    }

    // Populate the diagonal with structural zeros, using self.colptr
    // as the next fill location indicator.
    pub(crate) fn fill_diag(&mut self, diagtoKKT: &mut [usize], offset: usize, blockdim: usize) {
        for (i, col) in (offset..(offset + blockdim)).enumerate() {
            let dest = self.colptr[col];
            self.rowval[dest] = col;
            self.nzval[dest] = T::zero();
            self.colptr[col] += 1;
            diagtoKKT[i] = dest;
        }
    }

    // as fill_diag, but only placing zeros where the input matrix M
    // has a missing diagonal entry.  M must be square and triu.
    pub(crate) fn fill_missing_diag(&mut self, M: &CscMatrix<T>, initcol: usize) {
        for i in 0..M.n {
            if M.colptr[i] == M.colptr[i + 1] || M.rowval[M.colptr[i + 1] - 1] != i {
                let dest = self.colptr[i + initcol];
                self.rowval[dest] = i + initcol;
                self.nzval[dest] = T::zero();
                self.colptr[i + initcol] += 1;
            }
        }
    }

    // converts per-column counts to cumulative offsets
    pub(crate) fn colcount_to_colptr(&mut self) {
        let mut currentptr = 0;
        for p in &mut self.colptr {
            let count = *p;
            *p = currentptr;
            currentptr += count;
        }
    }

    // after filling, each colptr entry points one past its column;
    // shift right to restore the standard form.
    pub(crate) fn backshift_colptrs(&mut self) {
        self.colptr.rotate_right(1);
        self.colptr[0] = 0;
    }

    pub(crate) fn count_diagonal_entries(&self) -> usize {
        let mut count = 0;
        for i in 0..self.n {
            // nonempty column with last entry on the diagonal
            if self.colptr[i + 1] != self.colptr[i] && self.rowval[self.colptr[i + 1] - 1] == i {
                count += 1;
            }
        }
        count
    }
}
