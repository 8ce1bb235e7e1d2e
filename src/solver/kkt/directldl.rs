#![allow(non_snake_case)]

use super::{allocate_kkt_Hsblocks, assemble_kkt_matrix, LDLDataMap};
use crate::algebra::*;
use crate::ldl::{LdlError, LdlFactorization, LdlSettingsBuilder};
use crate::solver::cones::*;
use crate::solver::info::LinearSolverInfo;
use crate::solver::DefaultSettings;
use std::iter::zip;

// -------------------------------------
// KKT solver using direct LDL factorization
// -------------------------------------

pub(crate) struct DirectLdlKktSolver<T> {
    // problem dimensions
    m: usize,
    n: usize,
    p: usize,

    // Left and right hand sides for solves
    x: Vec<T>,
    b: Vec<T>,

    // internal workspace for IR scheme
    // and static offsetting of KKT
    work1: Vec<T>,
    work2: Vec<T>,

    // KKT mapping from problem data to KKT
    map: LDLDataMap,

    // the expected signs of D in KKT = LDL^T
    dsigns: Vec<i8>,

    // a vector for storing the entries of Hs blocks
    // on the KKT matrix block diagonal
    Hsblocks: Vec<T>,

    // unpermuted KKT matrix
    KKT: CscMatrix<T>,

    // the direct linear LDL solver
    ldlsolver: LdlFactorization<T>,

    // the diagonal regularizer currently applied
    diagonal_regularizer: T,
}

impl<T> DirectLdlKktSolver<T>
where
    T: FloatT,
{
    pub fn new(
        P: &CscMatrix<T>,
        A: &CscMatrix<T>,
        cones: &CompositeCone<T>,
        m: usize,
        n: usize,
        settings: &DefaultSettings<T>,
    ) -> Result<Self, LdlError> {
        // solving in sparse format.  Need this many
        // extra variables for SOCs
        let p = 2 * cones.get_type_count(SupportedConeTag::SecondOrderCone);

        // LHS/RHS/work for iterative refinement
        let x = vec![T::zero(); n + m + p];
        let b = vec![T::zero(); n + m + p];
        let work1 = vec![T::zero(); n + m + p];
        let work2 = vec![T::zero(); n + m + p];

        // the expected signs of D in LDL
        let mut dsigns = vec![1_i8; n + m + p];
        _fill_signs(&mut dsigns, m, n, p);

        // updates to the diagonal of KKT will be
        // assigned here before updating matrix entries
        let Hsblocks = allocate_kkt_Hsblocks::<T, T>(cones);

        // construct the KKT matrix.  The LDL factorization
        // requires triu data
        let (KKT, map) = assemble_kkt_matrix(P, A, cones, MatrixTriangle::Triu);

        let diagonal_regularizer = T::zero();

        let ldlopts = LdlSettingsBuilder::<T>::default()
            .Dsigns(dsigns.clone())
            .regularize_enable(settings.dynamic_regularization_enable)
            .regularize_eps(settings.dynamic_regularization_eps)
            .regularize_delta(settings.dynamic_regularization_delta)
            .build()
            .unwrap(); // all fields defaulted, so builder is infallible

        let ldlsolver = LdlFactorization::new(&KKT, Some(ldlopts))?;

        Ok(Self {
            m,
            n,
            p,
            x,
            b,
            work1,
            work2,
            map,
            dsigns,
            Hsblocks,
            KKT,
            ldlsolver,
            diagonal_regularizer,
        })
    }

    pub(crate) fn linear_solver_info(&self) -> LinearSolverInfo {
        LinearSolverInfo {
            name: "qdldl".to_string(),
            threads: 1,
            direct: true,
            nnzA: self.KKT.nnz(),
            nnzL: self.ldlsolver.nnzL(),
        }
    }

    pub(crate) fn update(&mut self, cones: &CompositeCone<T>, settings: &DefaultSettings<T>) -> bool {
        let map = &self.map;

        // Set the elements the W^tW blocks in the KKT matrix.
        cones.get_Hs(&mut self.Hsblocks);

        let (values, index) = (&mut self.Hsblocks, &map.Hsblocks);
        // change signs to get -W^TW
        values.negate();
        _update_values(&mut self.ldlsolver, &mut self.KKT, index, values);

        // update the scaled u and v columns.
        let mut cidx = 0; // which of the SOCs are we working on?

        for cone in cones.iter() {
            // `cone` here will be of our SupportedCone enum wrapper, so
            //  we can extract a SecondOrderCone `soc`
            if let SupportedCone::SecondOrderCone(soc) = cone {
                let η2 = T::powi(soc.η, 2);

                // off diagonal columns (or rows)
                let KKT = &mut self.KKT;
                let ldlsolver = &mut self.ldlsolver;

                _update_values(ldlsolver, KKT, &map.SOC_u[cidx], &soc.u);
                _update_values(ldlsolver, KKT, &map.SOC_v[cidx], &soc.v);
                _scale_values(ldlsolver, KKT, &map.SOC_u[cidx], -η2);
                _scale_values(ldlsolver, KKT, &map.SOC_v[cidx], -η2);

                //add η^2*(-1/1) to diagonal in the extended rows/cols
                _update_values(ldlsolver, KKT, &[map.SOC_D[cidx * 2]], &[-η2; 1]);
                _update_values(ldlsolver, KKT, &[map.SOC_D[cidx * 2 + 1]], &[η2; 1]);

                cidx += 1;
            }
        }

        self.regularize_and_refactor(settings)
    }

    // writes fresh values for the P block into the KKT matrix.
    // The new data must match the original sparsity pattern
    pub(crate) fn update_P(&mut self, P: &CscMatrix<T>) {
        _update_values(&mut self.ldlsolver, &mut self.KKT, &self.map.P, &P.nzval);
    }

    // writes fresh values for the A block into the KKT matrix.
    pub(crate) fn update_A(&mut self, A: &CscMatrix<T>) {
        _update_values(&mut self.ldlsolver, &mut self.KKT, &self.map.A, &A.nzval);
    }

    pub(crate) fn setrhs(&mut self, rhsx: &[T], rhsz: &[T]) {
        let (m, n, p) = (self.m, self.n, self.p);

        self.b[0..n].copy_from(rhsx);
        self.b[n..(n + m)].copy_from(rhsz);
        self.b[n + m..(n + m + p)].fill(T::zero());
    }

    pub(crate) fn solve(
        &mut self,
        lhsx: Option<&mut [T]>,
        lhsz: Option<&mut [T]>,
        settings: &DefaultSettings<T>,
    ) -> bool {
        self.x.copy_from(&self.b);
        self.ldlsolver.solve(&mut self.x);

        let is_success = {
            if settings.iterative_refinement_enable {
                self.iterative_refinement(settings)
            } else {
                self.x.is_finite()
            }
        };

        if is_success {
            self.getlhs(lhsx, lhsz);
        }

        is_success
    }

    fn getlhs(&self, lhsx: Option<&mut [T]>, lhsz: Option<&mut [T]>) {
        let x = &self.x;
        let (m, n, _p) = (self.m, self.n, self.p);

        if let Some(v) = lhsx {
            v.copy_from(&x[0..n]);
        }
        if let Some(v) = lhsz {
            v.copy_from(&x[n..(n + m)]);
        }
    }

    fn regularize_and_refactor(&mut self, settings: &DefaultSettings<T>) -> bool {
        let map = &self.map;
        let KKT = &mut self.KKT;
        let dsigns = &self.dsigns;
        let diag_kkt = &mut self.work1;
        let diag_shifted = &mut self.work2;

        if settings.static_regularization_enable {
            // hold a copy of the true KKT diagonal
            for (d, idx) in zip(&mut *diag_kkt, &map.diag_full) {
                *d = KKT.nzval[*idx];
            }

            let eps = _compute_regularizer(diag_kkt, settings);

            // compute an offset version, accounting for signs
            diag_shifted.copy_from(diag_kkt);

            zip(&mut *diag_shifted, dsigns).for_each(|(shift, &sign)| {
                if sign == 1 {
                    *shift += eps;
                } else {
                    *shift -= eps;
                }
            });

            // overwrite the diagonal of KKT and within the ldlsolver
            _update_values(&mut self.ldlsolver, KKT, &map.diag_full, diag_shifted);

            self.diagonal_regularizer = eps;
        }

        //refactor with new data
        let is_success = self.ldlsolver.refactor().is_ok();

        if settings.static_regularization_enable {
            // put our internal copy of the KKT matrix back the way
            // it was. Not necessary to fix the ldlsolver copy because
            // this is only needed for our post-factorization IR scheme
            _update_values_KKT(KKT, &map.diag_full, diag_kkt);
        }

        is_success
    }

    fn iterative_refinement(&mut self, settings: &DefaultSettings<T>) -> bool {
        let (x, b) = (&mut self.x, &self.b);
        let (e, dx) = (&mut self.work1, &mut self.work2);

        // iterative refinement params
        let reltol = settings.iterative_refinement_reltol;
        let abstol = settings.iterative_refinement_abstol;
        let maxiter = settings.iterative_refinement_max_iter;
        let stopratio = settings.iterative_refinement_stop_ratio;

        let K = &self.KKT;
        let normb = b.norm_inf();

        //compute the initial error
        let mut norme = _get_refine_error(e, b, K, x);

        for _ in 0..maxiter {
            // bail on numerical error
            if !norme.is_finite() {
                return false;
            }

            if norme <= (abstol + reltol * normb) {
                //within tolerance.  Exit
                break;
            }

            let lastnorme = norme;

            //make a refinement
            dx.copy_from(e);
            self.ldlsolver.solve(dx);

            //prospective solution is x + dx.  Use dx space to
            // hold it for a check before applying to x
            dx.axpby(T::one(), x, T::one()); //now dx is really x + dx
            norme = _get_refine_error(e, b, K, dx);

            let improved_ratio = lastnorme / norme;
            if improved_ratio < stopratio {
                //insufficient improvement.  Exit
                if improved_ratio > T::one() {
                    //swap instead of copying to x
                    std::mem::swap(x, dx);
                }
                break;
            } else {
                //swap instead of copying to x
                std::mem::swap(x, dx);
            }
        }
        //NB: "success" means only that we had a finite valued result
        true
    }
}

fn _compute_regularizer<T: FloatT>(diag_kkt: &[T], settings: &DefaultSettings<T>) -> T {
    let maxdiag = diag_kkt.norm_inf();

    settings.static_regularization_constant + settings.static_regularization_proportional * maxdiag
}

//  computes e = b - Kξ, overwriting the first argument
//  and returning its norm

fn _get_refine_error<T: FloatT>(e: &mut [T], b: &[T], K: &CscMatrix<T>, ξ: &[T]) -> T {
    // K is only triu data, so use the symmetric view
    // when computing the residual here
    e.copy_from(b);
    K.sym().symv(e, ξ, -T::one(), T::one()); //  e = b - Kξ

    e.norm_inf()
}

// update entries of the KKT matrix using the given index into its CSC
// representation.  Applied to both the unpermuted matrix here and to
// the permuted copy held by the LDL engine
fn _update_values<T: FloatT>(
    ldlsolver: &mut LdlFactorization<T>,
    KKT: &mut CscMatrix<T>,
    index: &[usize],
    values: &[T],
) {
    _update_values_KKT(KKT, index, values);
    ldlsolver.update_values(index, values);
}

fn _update_values_KKT<T: FloatT>(KKT: &mut CscMatrix<T>, index: &[usize], values: &[T]) {
    for (idx, v) in zip(index, values) {
        KKT.nzval[*idx] = *v;
    }
}

fn _scale_values<T: FloatT>(
    ldlsolver: &mut LdlFactorization<T>,
    KKT: &mut CscMatrix<T>,
    index: &[usize],
    scale: T,
) {
    for idx in index.iter() {
        KKT.nzval[*idx] *= scale;
    }
    ldlsolver.scale_values(index, scale);
}

fn _fill_signs(signs: &mut [i8], m: usize, n: usize, p: usize) {
    signs.fill(1);

    //flip expected negative signs of D in LDL
    signs[n..(n + m)].iter_mut().for_each(|x| *x = -*x);

    //the trailing block of p entries should
    //have alternating signs
    signs[(n + m)..(n + m + p)]
        .iter_mut()
        .step_by(2)
        .for_each(|x| *x = -*x);
}
