use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned by sparse matrix assembly and checking operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Row value exceeds the matrix row dimension, or row values are
    /// not sorted within a column
    #[error("Row index exceeds the matrix dimension or is out of order")]
    BadRowval,
    /// Matrix column pointer values are defective
    #[error("Bad column pointer values")]
    BadColptr,
    /// Operation on matrices with mismatching sparsity patterns
    #[error("sparsity pattern mismatch")]
    SparsityMismatch,
}
