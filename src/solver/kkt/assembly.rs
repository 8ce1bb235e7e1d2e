#![allow(non_snake_case)]

use super::datamap::*;
use crate::algebra::*;
use crate::solver::cones::*;

pub(crate) fn assemble_kkt_matrix<T: FloatT>(
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    cones: &CompositeCone<T>,
    shape: MatrixTriangle,
) -> (CscMatrix<T>, LDLDataMap) {
    let (m, n) = (A.nrows(), P.nrows());
    let mut map = LDLDataMap::new(P, A, cones);
    let p = map.SOC_D.len();

    // entries actually on the diagonal of P
    let nnz_diagP = P.count_diagonal_entries();

    // total entries in the Hs blocks
    let nnz_Hsblocks = map.Hsblocks.len();

    // entries in the dense columns u/v of the
    // sparse SOC expansion terms.  2 is for
    // counting elements in both columns
    let nnz_SOC_vecs = 2 * map.SOC_u.iter().fold(0, |acc, block| acc + block.len());

    let nnzKKT = P.nnz() +      // Number of elements in P
    n -                         // Number of elements in diagonal top left block
    nnz_diagP +                 // remove double count on the diagonal if P has entries
    A.nnz() +                   // Number of nonzeros in A
    nnz_Hsblocks +              // Number of elements in diagonal below A'
    nnz_SOC_vecs +              // Number of elements in sparse SOC off diagonal columns
    p; // Number of elements in diagonal of SOC extension

    let mut K = CscMatrix::<T>::spalloc(m + n + p, m + n + p, nnzKKT);

    _kkt_assemble_colcounts(&mut K, P, A, cones, (m, n, p), shape);
    _kkt_assemble_fill(&mut K, &mut map, P, A, cones, (m, n, p), shape);

    (K, map)
}

fn _kkt_assemble_colcounts<T: FloatT>(
    K: &mut CscMatrix<T>,
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    cones: &CompositeCone<T>,
    mnp: (usize, usize, usize),
    shape: MatrixTriangle,
) {
    let (m, n, p) = mnp;

    // use K.p to hold nnz entries in each
    // column of the KKT matrix
    K.colptr.fill(0);

    match shape {
        MatrixTriangle::Triu => {
            K.colcount_block(P, 0, MatrixShape::N);
            K.colcount_missing_diag(P, 0);
            K.colcount_block(A, n, MatrixShape::T);
        }
        MatrixTriangle::Tril => {
            K.colcount_missing_diag(P, 0);
            K.colcount_block(P, 0, MatrixShape::T);
            K.colcount_block(A, 0, MatrixShape::N);
        }
    }

    // add the Hs blocks in the lower right
    for (i, cone) in cones.iter().enumerate() {
        let firstcol = cones.rng_cones[i].start + n;
        let blockdim = cone.numel();
        if cone.Hs_is_diagonal() {
            K.colcount_diag(firstcol, blockdim);
        } else {
            K.colcount_dense_triangle(firstcol, blockdim, shape);
        }
    }

    // count dense columns for each SOC
    let mut socidx = 0; // which SOC are we working on?

    for (i, cone) in cones.iter().enumerate() {
        if cone.is_sparse_expandable() {
            // we will add the u and v columns for this cone
            let nvars = cone.numel();
            let headidx = cones.rng_cones[i].start;

            // which column does u go into?
            let col = m + n + 2 * socidx;

            match shape {
                MatrixTriangle::Triu => {
                    K.colcount_colvec(nvars, headidx + n, col); // v column
                    K.colcount_colvec(nvars, headidx + n, col + 1); // u column
                }
                MatrixTriangle::Tril => {
                    K.colcount_rowvec(nvars, col, headidx + n); // v row
                    K.colcount_rowvec(nvars, col + 1, headidx + n); // u row
                }
            }
            socidx += 1;
        }
    }

    // add diagonal block in the lower RH corner
    // to allow for the diagonal terms in SOC expansion
    K.colcount_diag(n + m, p);
}

fn _kkt_assemble_fill<T: FloatT>(
    K: &mut CscMatrix<T>,
    map: &mut LDLDataMap,
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    cones: &CompositeCone<T>,
    mnp: (usize, usize, usize),
    shape: MatrixTriangle,
) {
    let (m, n, p) = mnp;

    // cumsum total entries to convert to K.p
    K.colcount_to_colptr();

    match shape {
        MatrixTriangle::Triu => {
            K.fill_block(P, &mut map.P, 0, 0, MatrixShape::N);
            K.fill_missing_diag(P, 0); // after adding P, since triu form
                                       // fill in value for A, top right (transposed/rowwise)
            K.fill_block(A, &mut map.A, 0, n, MatrixShape::T);
        }
        MatrixTriangle::Tril => {
            K.fill_missing_diag(P, 0); // before adding P, since tril form
            K.fill_block(P, &mut map.P, 0, 0, MatrixShape::T);
            // fill in value for A, bottom left (not transposed)
            K.fill_block(A, &mut map.A, n, 0, MatrixShape::N);
        }
    }

    // add the Hs blocks in the lower right
    for (i, cone) in cones.iter().enumerate() {
        let firstcol = cones.rng_cones[i].start + n;
        let blockdim = cone.numel();
        let block = &mut map.Hsblocks[cones.rng_blocks[i].clone()];
        if cone.Hs_is_diagonal() {
            K.fill_diag(block, firstcol, blockdim);
        } else {
            K.fill_dense_triangle(block, firstcol, blockdim, shape);
        }
    }

    // fill in dense columns for each SOC
    let mut socidx = 0; //which SOC are we working on?

    for (i, cone) in cones.iter().enumerate() {
        if cone.is_sparse_expandable() {
            let headidx = cones.rng_cones[i].start;

            // which column does v go into (if triu)?
            let col = m + n + 2 * socidx;

            // fill structural zeros for u and v columns for this cone
            // note v is the first extra row/column, u is second
            match shape {
                MatrixTriangle::Triu => {
                    K.fill_colvec(&mut map.SOC_v[socidx], headidx + n, col);
                    K.fill_colvec(&mut map.SOC_u[socidx], headidx + n, col + 1);
                }
                MatrixTriangle::Tril => {
                    K.fill_rowvec(&mut map.SOC_v[socidx], col, headidx + n);
                    K.fill_rowvec(&mut map.SOC_u[socidx], col + 1, headidx + n);
                }
            }

            socidx += 1;
        }
    }

    // fill in SOC diagonal extension with diagonal of structural zeros
    K.fill_diag(&mut map.SOC_D, n + m, p);

    // backshift the colptrs to recover K.p again
    K.backshift_colptrs();

    // Now we can populate the index of the full diagonal.
    // We have filled in structural zeros on it everywhere.

    match shape {
        MatrixTriangle::Triu => {
            // matrix is triu, so diagonal is last in each column
            map.diag_full.copy_from_slice(&K.colptr[1..]);
            map.diag_full.iter_mut().for_each(|x| *x -= 1);
            // and the diagonal of just the upper left
            map.diagP.copy_from_slice(&K.colptr[1..=n]);
            map.diagP.iter_mut().for_each(|x| *x -= 1);
        }

        MatrixTriangle::Tril => {
            // matrix is tril, so diagonal is first in each column
            map.diag_full
                .copy_from_slice(&K.colptr[0..K.colptr.len() - 1]);
            // and the diagonal of just the upper left
            map.diagP.copy_from_slice(&K.colptr[0..n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::cones::SupportedConeT;

    #[test]
    fn test_kkt_assembly_upper_lower() {
        let P = CscMatrix::from(&[
            [1., 2., 4.], //
            [0., 3., 5.], //
            [0., 0., 6.], //
        ]);
        let A = CscMatrix::from(&[
            [7., 0., 8.],  //
            [0., 9., 10.], //
            [1., 2., 3.],
        ]);

        let Ku_true_diag = CscMatrix::from(&[
            [1., 2., 4., 7., 0., 1.],  //
            [0., 3., 5., 0., 9., 2.],  //
            [0., 0., 6., 8., 10., 3.], //
            [0., 0., 0., -1., 0., 0.], //
            [0., 0., 0., 0., -1., 0.], //
            [0., 0., 0., 0., 0., -1.], //
        ]);

        let Kl_true_diag = CscMatrix::from(&[
            [1., 0., 0., 0., 0., 0.],   //
            [2., 3., 0., 0., 0., 0.],   //
            [4., 5., 6., 0., 0., 0.],   //
            [7., 0., 8., -1., 0., 0.],  //
            [0., 9., 10., 0., -1., 0.], //
            [1., 2., 3., 0., 0., -1.],  //
        ]);

        let Ku_true_dense = CscMatrix::from(&[
            [1., 2., 4., 7., 0., 1.],    //
            [0., 3., 5., 0., 9., 2.],    //
            [0., 0., 6., 8., 10., 3.],   //
            [0., 0., 0., -1., -1., -1.], //
            [0., 0., 0., 0., -1., -1.],  //
            [0., 0., 0., 0., 0., -1.],   //
        ]);

        let Kl_true_dense = CscMatrix::from(&[
            [1., 0., 0., 0., 0., 0.],    //
            [2., 3., 0., 0., 0., 0.],    //
            [4., 5., 6., 0., 0., 0.],    //
            [7., 0., 8., -1., 0., 0.],   //
            [0., 9., 10., -1., -1., 0.], //
            [1., 2., 3., -1., -1., -1.], //
        ]);

        // diagonal lower right block tests
        // --------------------------------
        let cones = CompositeCone::new(&[SupportedConeT::NonnegativeConeT(3)]);

        let (mut Ku, mapu) = assemble_kkt_matrix(&P, &A, &cones, MatrixTriangle::Triu);
        for i in mapu.Hsblocks {
            Ku.nzval[i] = -1.;
        }
        assert_eq!(Ku, Ku_true_diag);

        let (mut Kl, mapl) = assemble_kkt_matrix(&P, &A, &cones, MatrixTriangle::Tril);
        for i in mapl.Hsblocks {
            Kl.nzval[i] = -1.;
        }
        assert_eq!(Kl, Kl_true_diag);

        // dense lower right block tests
        // --------------------------------
        let cones = CompositeCone::new(&[SupportedConeT::ExponentialConeT()]);

        let (mut Ku, mapu) = assemble_kkt_matrix(&P, &A, &cones, MatrixTriangle::Triu);
        for i in mapu.Hsblocks {
            Ku.nzval[i] = -1.;
        }
        assert_eq!(Ku, Ku_true_dense);

        let (mut Kl, mapl) = assemble_kkt_matrix(&P, &A, &cones, MatrixTriangle::Tril);
        for i in mapl.Hsblocks {
            Kl.nzval[i] = -1.;
        }
        assert_eq!(Kl, Kl_true_dense);
    }

    #[test]
    fn test_kkt_assembly_soc_expansion() {
        let P = CscMatrix::<f64>::zeros(3, 3);
        let A = CscMatrix::from(&[
            [1., 0., 0.], //
            [0., 1., 0.], //
            [0., 0., 1.],
        ]);

        let cones = CompositeCone::new(&[SupportedConeT::SecondOrderConeT(3)]);
        let (K, map) = assemble_kkt_matrix(&P, &A, &cones, MatrixTriangle::Triu);

        // two extra rows and columns for the rank-2 SOC expansion
        assert_eq!(K.n, 3 + 3 + 2);
        assert!(K.is_triu());
        assert_eq!(map.SOC_u.len(), 1);
        assert_eq!(map.SOC_u[0].len(), 3);
        assert_eq!(map.SOC_D.len(), 2);

        // the full diagonal is present structurally
        for (i, &idx) in map.diag_full.iter().enumerate() {
            assert_eq!(K.rowval[idx], i);
        }
    }
}
