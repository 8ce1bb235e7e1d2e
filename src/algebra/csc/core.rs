#![allow(non_snake_case)]

use crate::algebra::{Adjoint, FloatT, ShapedMatrix, SparseFormatError, Symmetric};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use conix::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// This field should have length `n+1`. The last entry corresponds
    /// to the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// Performs no structural validation at all, since this constructor
    /// sits on the hot path for data that has already been checked or is
    /// machine generated.   Use [`check_format`](CscMatrix::check_format)
    /// to validate externally supplied data.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// Allocate space for an m x n matrix with `nnz` elements, with
    /// all structural data zeroed.
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Structurally empty m x n matrix of zeros.
    pub fn zeros(m: usize, n: usize) -> Self {
        CscMatrix::spalloc(m, n, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// transpose view
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// symmetric view.  Data should be triu.
    pub(crate) fn sym(&self) -> Symmetric<'_, Self> {
        debug_assert!(self.is_triu());
        Symmetric { src: self }
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty() || (self.colptr.len() - 1) != self.n {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity before comparing its final
        //entry against the nonzero count, so that a non-monotone
        //colptr is reported as such
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        if self.colptr[self.n] != self.rowval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowval);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Check that `other` has the same dimensions and sparsity pattern.
    pub(crate) fn check_equal_sparsity(&self, other: &Self) -> Result<(), SparseFormatError> {
        if self.m != other.m || self.n != other.n {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr != other.colptr || self.rowval != other.rowval {
            return Err(SparseFormatError::SparsityMismatch);
        }
        Ok(())
    }

    /// Converts a flat index into the nonzero array to its (row,col)
    /// coordinate.  The flat index must be in range.
    pub(crate) fn index_to_coord(&self, idx: usize) -> (usize, usize) {
        debug_assert!(idx < self.nnz());
        let row = self.rowval[idx];
        // first column whose range ends beyond idx
        let col = self.colptr.partition_point(|&p| p <= idx) - 1;
        (row, col)
    }

    /// Allocates a new matrix containing only entries from the upper
    /// triangular part.
    pub fn to_triu(&self) -> Self {
        assert_eq!(self.m, self.n);
        let (m, n) = (self.m, self.n);
        let mut colptr = vec![0; n + 1];
        let mut nnz = 0;

        //count entries in the upper triangle, keeping a 0
        //in the first entry of colptr

        for col in 0..n {
            let first = self.colptr[col];
            let last = self.colptr[col + 1];
            let rows = &self.rowval[first..last];

            colptr[col + 1] = rows.iter().filter(|&row| *row <= col).count();
            nnz += colptr[col + 1];
        }

        //copy the upper triangle entries of each column into the new
        //value vector.  NB: assumes that entries in each column have
        //monotonically increasing row numbers
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        for col in 0..n {
            let ntriu = colptr[col + 1];

            let fdest = colptr[col];
            let ldest = fdest + ntriu;

            let fsrc = self.colptr[col];
            let lsrc = fsrc + ntriu;

            rowval[fdest..ldest].copy_from_slice(&self.rowval[fsrc..lsrc]);
            nzval[fdest..ldest].copy_from_slice(&self.nzval[fsrc..lsrc]);

            //this is now the cumsum of the counts
            colptr[col + 1] = ldest;
        }
        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// True if the matrix has no structural entries below the diagonal.
    pub(crate) fn is_triu(&self) -> bool {
        for col in 0..self.n {
            let first = self.colptr[col];
            let last = self.colptr[col + 1];
            let rows = &self.rowval[first..last];

            if rows.iter().any(|&row| row > col) {
                return false;
            }
        }
        true
    }

    /// Allocates a new matrix containing only the rows flagged in
    /// `rowidx`, which must be of length `m`.
    pub(crate) fn select_rows(&self, rowidx: &[bool]) -> Self {
        assert_eq!(rowidx.len(), self.m);

        //count the number of rows in the reduced matrix and build an
        //index from the logical rowidx to the reduced row number
        let mut rridx = vec![0; self.m];
        let mut mred = 0;
        for (r, &is_used) in rridx.iter_mut().zip(rowidx) {
            if is_used {
                *r = mred;
                mred += 1;
            }
        }

        let nzred = self.rowval.iter().filter(|&r| rowidx[*r]).count();

        let mut Ared = CscMatrix::spalloc(mred, self.n, nzred);

        let mut ptrred = 0;
        for col in 0..self.n {
            Ared.colptr[col] = ptrred;
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                let thisrow = self.rowval[ptr];
                if rowidx[thisrow] {
                    Ared.rowval[ptrred] = rridx[thisrow];
                    Ared.nzval[ptrred] = self.nzval[ptr];
                    ptrred += 1;
                }
            }
        }
        Ared.colptr[self.n] = ptrred;

        Ared
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.m && col < self.n);

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        let rows_in_this_column = &self.rowval[first..last];
        match rows_in_this_column.binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csc_get_entry() {
        // A =
        //[ ⋅   4.0    ⋅ ]
        //[1.0  5.0    ⋅ ]
        //[ ⋅   6.0  10.0]
        //[2.0  7.0    ⋅ ]
        //[3.0  8.0  11.0]

        let A = CscMatrix::new(
            5,
            3,
            vec![0, 3, 8, 10],
            vec![1, 3, 4, 0, 1, 2, 3, 4, 2, 4],
            vec![1., 2., 3., 4., 5., 6., 7., 8., 10., 11.],
        );
        assert!(A.check_format().is_ok());

        assert_eq!(A.get_entry((1, 0)).unwrap(), 1.);
        assert_eq!(A.get_entry((4, 0)).unwrap(), 3.);
        assert_eq!(A.get_entry((2, 1)).unwrap(), 6.);
        assert_eq!(A.get_entry((2, 2)).unwrap(), 10.);
        assert!(A.get_entry((0, 0)).is_none());
        assert!(A.get_entry((0, 2)).is_none());
    }

    #[test]
    fn test_csc_check_format() {
        let mut A: CscMatrix<f64> = CscMatrix::identity(3);
        assert!(A.check_format().is_ok());

        // row index out of bounds
        A.rowval[2] = 3;
        assert!(matches!(
            A.check_format(),
            Err(SparseFormatError::BadRowval)
        ));

        // bad colptr
        let B: CscMatrix<f64> = CscMatrix::new(2, 2, vec![0, 2, 1], vec![0, 1], vec![1., 1.]);
        assert!(matches!(B.check_format(), Err(SparseFormatError::BadColptr)));

        // length mismatch
        let C: CscMatrix<f64> = CscMatrix::new(2, 2, vec![0, 1, 2], vec![0], vec![1.]);
        assert!(matches!(
            C.check_format(),
            Err(SparseFormatError::IncompatibleDimension)
        ));
    }

    #[test]
    fn test_index_to_coord() {
        let A = CscMatrix::new(
            3,
            3,
            vec![0, 2, 4, 7],
            vec![0, 1, 0, 2, 0, 1, 2],
            vec![1., 2., 3., 4., 5., 6., 7.],
        );
        assert_eq!(A.index_to_coord(0), (0, 0));
        assert_eq!(A.index_to_coord(3), (2, 1));
        assert_eq!(A.index_to_coord(6), (2, 2));
    }
}
