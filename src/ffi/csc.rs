#![allow(non_snake_case)]

use crate::algebra::{self as lib, FloatT};
use paste::paste;

/// C-compatible view of a sparse matrix in CSC format.
///
/// The layout mirrors [`CscMatrix`](crate::algebra::CscMatrix) with the
/// vector fields replaced by raw pointers.  `owns_data` records whether
/// the arrays were allocated on the Rust side (by `zeros`, `identity`
/// or `from`) or are borrowed from the caller (by `init`).  Only
/// Rust-allocated arrays are released by the `free` entry points.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ConixCscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer of length `n+1`
    pub colptr: *const usize,
    /// vector of row indices
    pub rowval: *const usize,
    /// vector of non-zero matrix elements
    pub nzval: *const T,
    /// true if the arrays are owned by the Rust side
    pub owns_data: bool,
}

/// Convert a CscMatrix from C to Rust.
///
/// The CscMatrix object returned takes ownership of the memory of the
/// arrays described by the C struct.  Callers must `std::mem::forget`
/// the vectors in the returned object to leave memory management on
/// the C side.
pub(crate) unsafe fn convert_from_C_CscMatrix<T: FloatT>(
    ptr: *const ConixCscMatrix<T>,
) -> lib::CscMatrix<T> {
    // Recover the CscMatrix from the raw pointer from C
    let matrix = match ptr.as_ref() {
        Some(mat) => mat,
        None => panic!("Null pointer passed to convert_from_C_CscMatrix"),
    };

    let m = matrix.m;
    let n = matrix.n;

    // Length of colptr is always n + 1
    let colptr = Vec::from_raw_parts(matrix.colptr as *mut usize, n + 1, n + 1);

    // Length of rowval and nzval is given by colptr[n]
    let rowval = Vec::from_raw_parts(matrix.rowval as *mut usize, colptr[n], colptr[n]);
    let nzval = Vec::from_raw_parts(matrix.nzval as *mut T, colptr[n], colptr[n]);

    lib::CscMatrix::<T> {
        m,
        n,
        colptr,
        rowval,
        nzval,
    }
}

// boxed slices guarantee capacity == length, which lets the free
// entry points reconstruct the allocations exactly
fn leak_vec<U>(v: Vec<U>) -> *const U {
    Box::into_raw(v.into_boxed_slice()) as *const U
}

unsafe fn free_slice<U>(ptr: *const U, len: usize) {
    drop(Box::from_raw(std::slice::from_raw_parts_mut(
        ptr as *mut U,
        len,
    )));
}

// Move a Rust CscMatrix into a C struct, with the array memory left
// on the heap under Rust ownership
fn convert_to_C_CscMatrix<T: FloatT>(mat: lib::CscMatrix<T>) -> ConixCscMatrix<T> {
    ConixCscMatrix {
        m: mat.m,
        n: mat.n,
        colptr: leak_vec(mat.colptr),
        rowval: leak_vec(mat.rowval),
        nzval: leak_vec(mat.nzval),
        owns_data: true,
    }
}

unsafe fn _internal_CscMatrix_init<T: FloatT>(
    matrix: *mut ConixCscMatrix<T>,
    m: usize,
    n: usize,
    colptr: *const usize,
    rowval: *const usize,
    nzval: *const T,
) {
    if matrix.is_null() {
        return;
    }
    *matrix = ConixCscMatrix {
        m,
        n,
        colptr,
        rowval,
        nzval,
        owns_data: false,
    };
}

unsafe fn _internal_CscMatrix_zeros<T: FloatT>(matrix: *mut ConixCscMatrix<T>, m: usize, n: usize) {
    if matrix.is_null() {
        return;
    }
    *matrix = convert_to_C_CscMatrix(lib::CscMatrix::<T>::zeros(m, n));
}

unsafe fn _internal_CscMatrix_identity<T: FloatT>(matrix: *mut ConixCscMatrix<T>, n: usize) {
    if matrix.is_null() {
        return;
    }
    *matrix = convert_to_C_CscMatrix(lib::CscMatrix::<T>::identity(n));
}

// build a sparse matrix from a dense row-major array, dropping
// numerical zeros
unsafe fn _internal_CscMatrix_from<T: FloatT>(
    matrix: *mut ConixCscMatrix<T>,
    m: usize,
    n: usize,
    values: *const T,
) {
    if matrix.is_null() || values.is_null() {
        return;
    }
    let dense = std::slice::from_raw_parts(values, m * n);
    *matrix = convert_to_C_CscMatrix(lib::CscMatrix::from_dense(m, n, dense));
}

unsafe fn _internal_CscMatrix_free<T: FloatT>(matrix: *mut ConixCscMatrix<T>) {
    let matrix = match matrix.as_mut() {
        Some(mat) => mat,
        None => return,
    };
    if !matrix.owns_data {
        return;
    }
    // rowval and nzval lengths come from colptr, so read the nonzero
    // count before colptr is released
    let nnz = *matrix.colptr.add(matrix.n);
    free_slice(matrix.colptr, matrix.n + 1);
    free_slice(matrix.rowval, nnz);
    free_slice(matrix.nzval, nnz);
    matrix.colptr = std::ptr::null();
    matrix.rowval = std::ptr::null();
    matrix.nzval = std::ptr::null();
    matrix.owns_data = false;
}

macro_rules! _make_conix_CscMatrix {
    ($TYPE:ty) => {
        paste! {
            #[no_mangle]
            pub unsafe extern "C" fn [<conix_CscMatrix_ $TYPE _init>](
                matrix: *mut ConixCscMatrix<$TYPE>,
                m: usize,
                n: usize,
                colptr: *const usize,
                rowval: *const usize,
                nzval: *const $TYPE,
            ) {
                _internal_CscMatrix_init::<$TYPE>(matrix, m, n, colptr, rowval, nzval);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_CscMatrix_ $TYPE _zeros>](
                matrix: *mut ConixCscMatrix<$TYPE>,
                m: usize,
                n: usize,
            ) {
                _internal_CscMatrix_zeros::<$TYPE>(matrix, m, n);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_CscMatrix_ $TYPE _identity>](
                matrix: *mut ConixCscMatrix<$TYPE>,
                n: usize,
            ) {
                _internal_CscMatrix_identity::<$TYPE>(matrix, n);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_CscMatrix_ $TYPE _from>](
                matrix: *mut ConixCscMatrix<$TYPE>,
                m: usize,
                n: usize,
                values: *const $TYPE,
            ) {
                _internal_CscMatrix_from::<$TYPE>(matrix, m, n, values);
            }

            #[no_mangle]
            pub unsafe extern "C" fn [<conix_CscMatrix_ $TYPE _free>](
                matrix: *mut ConixCscMatrix<$TYPE>,
            ) {
                _internal_CscMatrix_free::<$TYPE>(matrix);
            }
        }
    };
}

_make_conix_CscMatrix!(f64);
_make_conix_CscMatrix!(f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_csc_roundtrip() {
        let mut mat = ConixCscMatrix::<f64> {
            m: 0,
            n: 0,
            colptr: std::ptr::null(),
            rowval: std::ptr::null(),
            nzval: std::ptr::null(),
            owns_data: false,
        };

        // [1. 0.]
        // [2. 3.]
        let dense = [1., 0., 2., 3.];
        unsafe {
            _internal_CscMatrix_from(&mut mat, 2, 2, dense.as_ptr());
            assert!(mat.owns_data);

            let rust_mat = convert_from_C_CscMatrix(&mat);
            assert_eq!(rust_mat.nnz(), 3);
            assert_eq!(rust_mat.get_entry((1, 0)).unwrap(), 2.);
            assert_eq!(rust_mat.get_entry((1, 1)).unwrap(), 3.);
            assert!(rust_mat.get_entry((0, 1)).is_none());
            std::mem::forget(rust_mat);

            _internal_CscMatrix_free(&mut mat);
            assert!(mat.colptr.is_null());
        }
    }

    #[test]
    fn test_ffi_csc_init_borrows() {
        let colptr = [0usize, 1];
        let rowval = [0usize];
        let nzval = [4.0f64];

        let mut mat = ConixCscMatrix::<f64> {
            m: 0,
            n: 0,
            colptr: std::ptr::null(),
            rowval: std::ptr::null(),
            nzval: std::ptr::null(),
            owns_data: true,
        };
        unsafe {
            _internal_CscMatrix_init(
                &mut mat,
                1,
                1,
                colptr.as_ptr(),
                rowval.as_ptr(),
                nzval.as_ptr(),
            );
        }
        assert!(!mat.owns_data);

        // free must not touch caller owned data
        unsafe { _internal_CscMatrix_free(&mut mat) };
        assert_eq!(nzval[0], 4.0);
    }
}
