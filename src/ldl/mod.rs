#![allow(non_snake_case)]
//! $LDL^T$ factorization of sparse symmetric quasidefinite matrices.

use crate::algebra::*;
use core::cmp::{max, min};
use derive_builder::Builder;
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorization`] operations
#[derive(Error, Debug)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
}

/// Configuration for [`LdlFactorization`]
#[derive(Builder, Debug, Clone)]
pub(crate) struct LdlSettings<T: FloatT> {
    #[builder(default = "1.0")]
    amd_dense_scale: f64,
    #[builder(default = "None", setter(strip_option))]
    Dsigns: Option<Vec<i8>>,
    #[builder(default = "true")]
    regularize_enable: bool,
    #[builder(default = "(1e-12).as_T()")]
    regularize_eps: T,
    #[builder(default = "(1e-7).as_T()")]
    regularize_delta: T,
}

impl<T> Default for LdlSettings<T>
where
    T: FloatT,
{
    fn default() -> LdlSettings<T> {
        LdlSettingsBuilder::<T>::default().build().unwrap()
    }
}

/// Performs $LDL^T$ factorization of a symmetric quasidefinite matrix
/// supplied in upper triangular CSC form, with fill reducing ordering
/// from the `amd` crate.
#[derive(Debug)]
pub(crate) struct LdlFactorization<T = f64> {
    // fill reducing permutation
    perm: Vec<usize>,
    // lower triangular factor
    pub L: CscMatrix<T>,
    // D and its inverse for A = LDL^T
    pub D: Vec<T>,
    pub Dinv: Vec<T>,
    workspace: LdlWorkspace<T>,
}

impl<T> LdlFactorization<T>
where
    T: FloatT,
{
    pub fn new(Ain: &CscMatrix<T>, opts: Option<LdlSettings<T>>) -> Result<Self, LdlError> {
        if !Ain.is_square() {
            return Err(LdlError::IncompatibleDimension);
        }
        if !Ain.is_triu() {
            return Err(LdlError::NotUpperTriangular);
        }
        // every column must carry at least one entry
        if !Ain.colptr.windows(2).all(|c| c[0] < c[1]) {
            return Err(LdlError::EmptyColumn);
        }

        let n = Ain.nrows();
        let opts = opts.unwrap_or_default();

        let (perm, iperm) = _get_amd_ordering(Ain, opts.amd_dense_scale);

        //permute to (another) upper triangular matrix and store the
        //index mapping from the input's entries to the permutation's entries
        let (A, AtoPAPt) = _permute_symmetric(Ain, &iperm);

        // permuted diagonal sign vector, defaulting to all positive
        let mut Dsigns = vec![1_i8; n];
        if let Some(ds) = opts.Dsigns {
            _permute(&mut Dsigns, &ds, &perm);
        }

        let mut workspace = LdlWorkspace::<T>::new(
            A,
            AtoPAPt,
            Dsigns,
            opts.regularize_enable,
            opts.regularize_eps,
            opts.regularize_delta,
        );

        //total nonzeros in the factorization
        let sumLnz = workspace.Lnz.iter().sum();

        let mut L = CscMatrix::spalloc(n, n, sumLnz);
        let mut D = vec![T::zero(); n];
        let mut Dinv = vec![T::zero(); n];

        _factor(&mut L, &mut D, &mut Dinv, &mut workspace)?;

        Ok(LdlFactorization {
            perm,
            L,
            D,
            Dinv,
            workspace,
        })
    }

    #[cfg(test)]
    pub fn positive_inertia(&self) -> usize {
        self.workspace.positive_inertia
    }

    pub fn nnzL(&self) -> usize {
        self.L.nnz()
    }

    // Solves Ax = b using the LDL factors, in place (x replaces b)
    pub fn solve(&mut self, b: &mut [T]) {
        assert_eq!(b.len(), self.D.len());

        // permute b
        let tmp = &mut self.workspace.fwork;
        _permute(tmp, b, &self.perm);

        //solve in place with tmp as permuted RHS
        _lsolve(&self.L.colptr, &self.L.rowval, &self.L.nzval, tmp);
        zip(tmp.iter_mut(), &self.Dinv).for_each(|(t, d)| *t *= *d);
        _ltsolve(&self.L.colptr, &self.L.rowval, &self.L.nzval, tmp);

        // inverse permutation puts the unpermuted solution in b
        _ipermute(b, tmp, &self.perm);
    }

    // overwrite values of the (permuted) internal data
    pub fn update_values(&mut self, indices: &[usize], values: &[T]) {
        let nzval = &mut self.workspace.triuA.nzval;
        let AtoPAPt = &self.workspace.AtoPAPt;

        for (i, &idx) in indices.iter().enumerate() {
            nzval[AtoPAPt[idx]] = values[i];
        }
    }

    pub fn scale_values(&mut self, indices: &[usize], scale: T) {
        let nzval = &mut self.workspace.triuA.nzval;
        let AtoPAPt = &self.workspace.AtoPAPt;

        for &idx in indices.iter() {
            nzval[AtoPAPt[idx]] *= scale;
        }
    }

    pub fn refactor(&mut self) -> Result<(), LdlError> {
        _factor(
            &mut self.L,
            &mut self.D,
            &mut self.Dinv,
            &mut self.workspace,
        )
    }
}

#[derive(Debug)]
struct LdlWorkspace<T> {
    etree: Vec<usize>,
    Lnz: Vec<usize>,
    iwork: Vec<usize>,
    bwork: Vec<bool>,
    fwork: Vec<T>,

    // number of positive values in D
    positive_inertia: usize,

    // The (permuted) upper triangular factorization target
    triuA: CscMatrix<T>,

    // mapping from entries of the original input to the permuted
    // form used for factorization, for use when modifying entries
    // of the data matrix before refactoring
    AtoPAPt: Vec<usize>,

    //regularization signs and parameters
    Dsigns: Vec<i8>,
    regularize_enable: bool,
    regularize_eps: T,
    regularize_delta: T,
    regularize_count: usize,
}

impl<T> LdlWorkspace<T>
where
    T: FloatT,
{
    fn new(
        triuA: CscMatrix<T>,
        AtoPAPt: Vec<usize>,
        Dsigns: Vec<i8>,
        regularize_enable: bool,
        regularize_eps: T,
        regularize_delta: T,
    ) -> Self {
        let n = triuA.ncols();
        let mut etree = vec![0; n];
        let mut Lnz = vec![0; n];
        let mut iwork = vec![0; n * 3];
        let bwork = vec![false; n];
        let fwork = vec![T::zero(); n];

        _etree(n, &triuA.colptr, &triuA.rowval, &mut iwork, &mut Lnz, &mut etree);

        Self {
            etree,
            Lnz,
            iwork,
            bwork,
            fwork,
            positive_inertia: 0,
            triuA,
            AtoPAPt,
            Dsigns,
            regularize_enable,
            regularize_eps,
            regularize_delta,
            regularize_count: 0,
        }
    }
}

const LDL_UNKNOWN: usize = usize::MAX;

// Compute the elimination tree for a quasidefinite matrix
// in compressed sparse column form.
fn _etree(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) {
    work.fill(0);
    Lnz.fill(0);
    etree.fill(LDL_UNKNOWN);

    for j in 0..n {
        work[j] = j;
        for istart in Ai.iter().take(Ap[j + 1]).skip(Ap[j]) {
            let mut i = *istart;

            while work[i] != j {
                if etree[i] == LDL_UNKNOWN {
                    etree[i] = j;
                }
                Lnz[i] += 1; // nonzeros in this column
                work[i] = j;
                i = etree[i];
            }
        }
    }
}

fn _factor<T: FloatT>(
    L: &mut CscMatrix<T>,
    D: &mut [T],
    Dinv: &mut [T],
    ws: &mut LdlWorkspace<T>,
) -> Result<(), LdlError> {
    let LdlWorkspace {
        etree,
        Lnz,
        iwork,
        bwork,
        fwork,
        positive_inertia,
        triuA: A,
        Dsigns,
        regularize_enable,
        regularize_eps,
        regularize_delta,
        regularize_count,
        ..
    } = ws;

    let n = A.n;
    let (Ap, Ai, Ax) = (&A.colptr, &A.rowval, &A.nzval);
    let (regularize_enable, regularize_eps, regularize_delta) =
        (*regularize_enable, *regularize_eps, *regularize_delta);

    *regularize_count = 0;
    let mut positive_values_in_D = 0;

    // partition working memory into pieces
    let y_markers = bwork;
    let (y_idx, iwork) = iwork.split_at_mut(n);
    let (elim_buffer, next_colspace) = iwork.split_at_mut(n);
    let y_vals = fwork;

    //set L.colptr to cumsum(Lnz), starting from zero
    L.colptr[0] = 0;
    let mut acc = 0;
    for (Lp, Lnz) in zip(&mut L.colptr[1..], Lnz.iter()) {
        *Lp = acc + Lnz;
        acc = *Lp;
    }
    let (Lp, Li, Lx) = (&L.colptr, &mut L.rowval, &mut L.nzval);

    // all y_idx start 'unused'.  In each column of L the next available
    // space is the first space in the column.
    y_markers.fill(false);
    y_vals.fill(T::zero());
    D.fill(T::zero());
    next_colspace.copy_from_slice(&Lp[0..Lp.len() - 1]);

    // First element of the diagonal D
    D[0] = Ax[0];
    _regularize_pivot(
        &mut D[0],
        Dsigns[0],
        regularize_enable,
        regularize_eps,
        regularize_delta,
        regularize_count,
    );
    if D[0] == T::zero() {
        return Err(LdlError::ZeroPivot);
    }
    if D[0] > T::zero() {
        positive_values_in_D += 1;
    }
    Dinv[0] = T::recip(D[0]);

    // Start from the second row.  The upper LH corner is trivially 0
    // in L since we only compute the subdiagonal elements
    for k in 1..n {
        // For each k we compute a solution to y = L(0:(k-1),0:k-1))\b,
        // where b is the kth column of A above the diagonal.  The
        // solution y is then the kth row of L, with an implied '1' at
        // the diagonal entry.

        let mut nnz_y = 0; // number of elements in this row

        // Determine where nonzeros will go in the kth row of L,
        // without computing the actual values yet

        for i in Ap[k]..Ap[k + 1] {
            let bidx = Ai[i];

            // the diagonal entry seeds D[k] and takes no part in
            // the elimination step for the k^th row of L
            if bidx == k {
                D[k] = Ax[i];
                continue;
            }

            y_vals[bidx] = Ax[i]; // initialise y(bidx) = b(bidx)

            // walk the elimination tree to find which elements must be
            // eliminated after this element of b
            if !y_markers[bidx] {
                y_markers[bidx] = true;
                elim_buffer[0] = bidx;
                let mut nnz_e = 1; //length of unvisited elimination path

                let mut next_idx = etree[bidx];

                while next_idx != LDL_UNKNOWN && next_idx < k {
                    if y_markers[next_idx] {
                        break;
                    }
                    y_markers[next_idx] = true;
                    elim_buffer[nnz_e] = next_idx;
                    next_idx = etree[next_idx];
                    nnz_e += 1;
                }

                // put the buffered elimination list into the current
                // ordering in reverse order
                while nnz_e != 0 {
                    nnz_e -= 1;
                    y_idx[nnz_y] = elim_buffer[nnz_e];
                    nnz_y += 1;
                }
            }
        }

        // place nonzero values in the k^th row
        for i in (0..nnz_y).rev() {
            // which column are we working on?
            let cidx = y_idx[i];

            // loop along the elements in this column of L and
            // subtract to solve for y
            let tmp_idx = next_colspace[cidx];
            let y_vals_cidx = y_vals[cidx];

            for j in Lp[cidx]..tmp_idx {
                y_vals[Li[j]] -= Lx[j] * y_vals_cidx;
            }

            // we now have the cidx^th element of y = L\b, so compute
            // the corresponding element of this row of L and put it
            // into the right place
            Lx[tmp_idx] = y_vals_cidx * Dinv[cidx];
            D[k] -= y_vals_cidx * Lx[tmp_idx];

            // record which row it went into
            Li[tmp_idx] = k;
            next_colspace[cidx] += 1;

            // reset y workspace for the next row
            y_vals[cidx] = T::zero();
            y_markers[cidx] = false;
        }

        _regularize_pivot(
            &mut D[k],
            Dsigns[k],
            regularize_enable,
            regularize_eps,
            regularize_delta,
            regularize_count,
        );

        // a zero pivot means the matrix cannot be factored
        if D[k] == T::zero() {
            return Err(LdlError::ZeroPivot);
        }
        if D[k] > T::zero() {
            positive_values_in_D += 1;
        }

        Dinv[k] = T::recip(D[k]);
    }

    *positive_inertia = positive_values_in_D;
    Ok(())
}

#[inline]
fn _regularize_pivot<T: FloatT>(
    d: &mut T,
    dsign: i8,
    enable: bool,
    eps: T,
    delta: T,
    count: &mut usize,
) {
    if enable {
        let sign = T::from_i8(dsign).unwrap();
        if *d * sign < eps {
            *d = delta * sign;
            *count += 1;
        }
    }
}

// Solves (L+I)x = b, with x replacing b
fn _lsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        let (f, l) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[f..l], &Lx[f..l]) {
            x[Lij] -= Lxj * xi;
        }
    }
}

// Solves (L+I)'x = b, with x replacing b
fn _ltsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        let (f, l) = (Lp[i], Lp[i + 1]);
        for (&Lij, &Lxj) in zip(&Li[f..l], &Lx[f..l]) {
            s += Lxj * x[Lij];
        }
        x[i] -= s;
    }
}

// internal permutation and inverse permutation
// functions that require no memory allocations

fn _permute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, x).for_each(|(p, x)| *x = b[*p]);
}

fn _ipermute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, b).for_each(|(p, b)| x[*p] = *b);
}

// Given a sparse symmetric matrix `A` (only upper triangular entries),
// return the permuted sparse symmetric matrix `P` (also upper triangular)
// given the inverse permutation vector `iperm`.
fn _permute_symmetric<T: FloatT>(A: &CscMatrix<T>, iperm: &[usize]) -> (CscMatrix<T>, Vec<usize>) {
    let n = A.ncols();
    let mut P = CscMatrix::<T>::spalloc(n, n, A.nnz());

    // mapping of entries from A to PAPt
    let mut AtoPAPt = vec![0; A.nnz()];

    let Ar = &A.rowval;
    let Ac = &A.colptr;
    let Av = &A.nzval;

    // 1. count the entries that each column of P will have,
    // keeping in mind the row permutation
    let mut num_entries = vec![0; n];
    for colA in 0..n {
        let colP = iperm[colA];
        for rowA in Ar.iter().take(Ac[colA + 1]).skip(Ac[colA]) {
            let rowP = iperm[*rowA];
            if *rowA <= colA {
                // the column this entry belongs to after permutation
                let col_idx = max(rowP, colP);
                num_entries[col_idx] += 1;
            }
        }
    }

    // 2. cumulative counts give the permuted colptr
    P.colptr[0] = 0;
    let mut acc = 0;
    for (Pckp1, ne) in zip(&mut P.colptr[1..], &num_entries) {
        *Pckp1 = acc + ne;
        acc = *Pckp1;
    }
    // reuse this memory to track the next free entry in each column
    num_entries.copy_from_slice(&P.colptr[0..n]);
    let mut row_starts = num_entries;

    // 3. permute the row entries and position the corresponding nzval
    for colA in 0..n {
        let colP = iperm[colA];
        for rowA_idx in Ac[colA]..Ac[colA + 1] {
            let rowA = Ar[rowA_idx];
            if rowA <= colA {
                let rowP = iperm[rowA];
                let col_idx = max(colP, rowP);

                // next free location, resulting in unordered columns
                let rowP_idx = row_starts[col_idx];

                P.rowval[rowP_idx] = min(colP, rowP);
                P.nzval[rowP_idx] = Av[rowA_idx];
                AtoPAPt[rowA_idx] = rowP_idx;

                row_starts[col_idx] += 1;
            }
        }
    }

    (P, AtoPAPt)
}

fn _get_amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    amd_dense_scale: f64,
) -> (Vec<usize>, Vec<usize>) {
    // computes a permutation for A using AMD default parameters
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, iperm, _info) = amd::order(A.nrows(), &A.colptr, &A.rowval, &control).unwrap();
    (perm, iperm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_matrix() -> CscMatrix<f64> {
        // quasidefinite matrix in triu form
        // [ 4  1  0]
        // [ 1  5  2]
        // [ 0  2 -3]
        CscMatrix::new(
            3,
            3,
            vec![0, 1, 3, 5],
            vec![0, 0, 1, 1, 2],
            vec![4., 1., 5., 2., -3.],
        )
    }

    fn test_opts() -> LdlSettings<f64> {
        // the test matrix has signature (+,+,-), and the sign
        // targets must match it or the dynamic regularization
        // will push the negative pivot positive
        LdlSettingsBuilder::default()
            .Dsigns(vec![1, 1, -1])
            .build()
            .unwrap()
    }

    #[test]
    fn test_ldl_solve() {
        let A = test_matrix();
        let mut fact = LdlFactorization::new(&A, Some(test_opts())).unwrap();

        // b = A*[1;2;3]
        let mut b = vec![6., 17., -5.];
        fact.solve(&mut b);

        let xtrue = [1., 2., 3.];
        for (x, xt) in zip(&b, &xtrue) {
            assert!((x - xt).abs() < 1e-10);
        }
        assert_eq!(fact.positive_inertia(), 2);
    }

    #[test]
    fn test_ldl_update_and_refactor() {
        let A = test_matrix();
        let mut fact = LdlFactorization::new(&A, Some(test_opts())).unwrap();

        // change A(2,2) to -4 (flat triu index 4)
        fact.update_values(&[4], &[-4.]);
        fact.refactor().unwrap();

        // b = Anew*[1;2;3]
        let mut b = vec![6., 17., -8.];
        fact.solve(&mut b);

        let xtrue = [1., 2., 3.];
        for (x, xt) in zip(&b, &xtrue) {
            assert!((x - xt).abs() < 1e-10);
        }
    }

    #[test]
    fn test_ldl_rejects_bad_structure() {
        // not triu
        let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., 1., 1.]);
        assert!(matches!(
            LdlFactorization::new(&A, None),
            Err(LdlError::NotUpperTriangular)
        ));

        // empty column
        let B: CscMatrix<f64> = CscMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![1.]);
        assert!(matches!(
            LdlFactorization::new(&B, None),
            Err(LdlError::EmptyColumn)
        ));
    }
}
