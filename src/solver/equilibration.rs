#![allow(non_snake_case)]
use super::{DefaultProblemData, DefaultSettings};
use crate::algebra::*;
use crate::solver::cones::{CompositeCone, Cone};

// ---------------
// equilibration data
// ---------------

/// Data from the Ruiz equilibration procedure
pub struct DefaultEquilibrationData<T> {
    // scaling matrices for problem data equilibration.
    // fields d,e,dinv,einv are vectors of scaling values
    // to be treated as diagonal scaling data
    /// Vector of variable scaling terms
    pub d: Vec<T>,
    /// Vector of inverse variable scaling terms
    pub dinv: Vec<T>,
    /// Vector of constraint scaling terms
    pub e: Vec<T>,
    /// Vector of inverse constraint scaling terms
    pub einv: Vec<T>,
    /// overall scaling for objective function
    pub c: T,
}

impl<T> DefaultEquilibrationData<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        let d = vec![T::one(); n];
        let dinv = vec![T::one(); n];
        let e = vec![T::one(); m];
        let einv = vec![T::one(); m];

        let c = T::one();

        Self {
            d,
            dinv,
            e,
            einv,
            c,
        }
    }
}

impl<T> DefaultProblemData<T>
where
    T: FloatT,
{
    pub(crate) fn equilibrate(&mut self, cones: &CompositeCone<T>, settings: &DefaultSettings<T>) {
        let data = self;
        let equil = &mut data.equilibration;

        // if equilibration is disabled, just return.  Note that
        // the default equilibration structure initializes with
        // identity scaling already.
        if !settings.equilibrate_enable {
            return;
        }

        // references to scaling matrices from workspace
        let (d, e) = (&mut equil.d, &mut equil.e);

        // use the inverse scalings as work vectors
        let dwork = &mut equil.dinv;
        let ework = &mut equil.einv;

        // references to problem data
        // note that P may be triu, but it shouldn't matter
        let (P, A, q, b) = (&mut data.P, &mut data.A, &mut data.q, &mut data.b);

        let scale_min = settings.equilibrate_min_scaling;
        let scale_max = settings.equilibrate_max_scaling;

        // Ruiz iteration: fixed number of passes over the KKT norms
        for _ in 0..settings.equilibrate_max_iter {
            kkt_col_norms(P, A, dwork, ework);

            dwork.scalarop(|x| limit_scaling(x, scale_min, scale_max));
            ework.scalarop(|x| limit_scaling(x, scale_min, scale_max));

            dwork.rsqrt();
            ework.rsqrt();

            // fold back any part of this step that would push the
            // accumulated scalings d,e outside their configured range,
            // so the applied data scaling and d,e stay consistent
            bound_scaling_step(dwork, d, scale_min, scale_max);
            bound_scaling_step(ework, e, scale_min, scale_max);

            // apply this round of scalings to the data and
            // accumulate them into the equilibration record
            scale_data(P, A, q, b, Some(dwork), ework);
            d.hadamard(dwork);
            e.hadamard(ework);

            // cost normalization uses the mean column norm of the
            // rescaled P, with dwork as scratch for the norms
            P.col_norms(dwork);
            let mean_col_norm_P = dwork.mean();
            let inf_norm_q = q.norm_inf();

            if mean_col_norm_P != T::zero() && inf_norm_q != T::zero() {
                let scale_cost = T::max(inf_norm_q, mean_col_norm_P);
                let scale_cost = limit_scaling(scale_cost, scale_min, scale_max);
                let ctmp = T::recip(scale_cost);

                // scale the penalty terms and overall scaling
                P.nzval.scale(ctmp);
                q.scale(ctmp);
                equil.c *= ctmp;
            }
        } //end Ruiz scaling loop

        // fix scalings in cones for which elementwise
        // scaling can't be applied
        if cones.rectify_equilibration(ework, e) {
            // only rescale again if some cones were rectified
            scale_data(P, A, q, b, None, ework);
            e.hadamard(ework);
        }

        // update the inverse scaling data
        equil.dinv.scalarop_from(T::recip, d);
        equil.einv.scalarop_from(T::recip, e);
    }
}

// ---------------
// utilities
// ---------------

fn kkt_col_norms<T: FloatT>(
    P: &CscMatrix<T>,
    A: &CscMatrix<T>,
    norm_LHS: &mut [T],
    norm_RHS: &mut [T],
) {
    P.col_norms_sym(norm_LHS); // P can be triu
    A.col_norms_no_reset(norm_LHS); // incrementally from P norms
    A.row_norms(norm_RHS); // same as column norms of A'
}

// norms very close to zero are not scaled at all, and otherwise
// scalings are clipped into [minval,maxval]
fn limit_scaling<T: FloatT>(s: T, minval: T, maxval: T) -> T {
    if s < minval {
        T::one()
    } else {
        T::min(s, maxval)
    }
}

// clamp the per-iteration step `work` so that the accumulated
// scaling `accum .* work` lands in [minval,maxval] elementwise
fn bound_scaling_step<T: FloatT>(work: &mut [T], accum: &[T], minval: T, maxval: T) {
    for (w, &a) in work.iter_mut().zip(accum) {
        let target = T::min(T::max(a * *w, minval), maxval);
        *w = target / a;
    }
}

fn scale_data<T: FloatT>(
    P: &mut CscMatrix<T>,
    A: &mut CscMatrix<T>,
    q: &mut [T],
    b: &mut [T],
    d: Option<&[T]>,
    e: &[T],
) {
    match d {
        Some(d) => {
            P.lrscale(d, d); // P[:,:] = Ds*P*Ds
            A.lrscale(e, d); // A[:,:] = Es*A*Ds
            q.hadamard(d);
        }
        None => {
            A.lscale(e); // A[:,:] = Es*A
        }
    }
    b.hadamard(e);
}
