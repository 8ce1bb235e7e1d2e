use super::*;
use crate::{algebra::*, solver::DefaultSettings};
use std::iter::zip;

// -------------------------------------
// Nonnegative Cone
// -------------------------------------

pub struct NonnegativeCone<T: FloatT = f64> {
    dim: usize,
    //internal working variables for W and λ
    w: Vec<T>,
    λ: Vec<T>,
}

impl<T> NonnegativeCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            w: vec![T::zero(); dim],
            λ: vec![T::zero(); dim],
        }
    }
}

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn degree(&self) -> usize {
        self.dim
    }

    fn numel(&self) -> usize {
        self.dim
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn is_sparse_expandable(&self) -> bool {
        false
    }

    fn rectify_equilibration(&self, δ: &mut [T], _e: &[T]) -> bool {
        δ.set(T::one());
        false
    }

    fn margins(&mut self, z: &mut [T], _pd: PrimalOrDualCone) -> (T, T) {
        if z.is_empty() {
            (T::max_value(), T::zero())
        } else {
            let α = z.minimum();
            let β = z.iter().fold(T::zero(), |β, &zi| β + T::max(zi, T::zero()));
            (α, β)
        }
    }

    fn scaled_unit_shift(&self, z: &mut [T], α: T, _pd: PrimalOrDualCone) {
        z.translate(α);
    }

    fn unit_initialization(&self, z: &mut [T], s: &mut [T]) {
        z.set(T::one());
        s.set(T::one());
    }

    fn set_identity_scaling(&mut self) {
        self.w.set(T::one());
    }

    fn update_scaling(&mut self, s: &[T], z: &[T], _μ: T) -> bool {
        let λw = zip(zip(&mut self.λ, &mut self.w), zip(s, z));
        for ((λ, w), (s, z)) in λw {
            *λ = T::sqrt((*s) * (*z));
            *w = T::sqrt((*s) / (*z));
        }
        true
    }

    fn Hs_is_diagonal(&self) -> bool {
        true
    }

    fn get_Hs(&self, Hsblock: &mut [T]) {
        Hsblock.scalarop_from(|w| w * w, &self.w);
    }

    fn mul_Hs(&mut self, y: &mut [T], x: &[T], _work: &mut [T]) {
        //NB : seemingly sensible alternatives like
        //zip and chained iterators are significantly slower
        assert_eq!(y.len(), x.len());
        assert_eq!(y.len(), self.w.len());
        for i in 0..y.len() {
            y[i] = self.w[i] * (self.w[i] * x[i]);
        }
    }

    fn affine_ds(&self, ds: &mut [T], _s: &[T]) {
        ds.scalarop_from(|λ| λ * λ, &self.λ);
    }

    fn combined_ds_shift(&mut self, shift: &mut [T], step_z: &mut [T], step_s: &mut [T], σμ: T) {
        self._combined_ds_shift_symmetric(shift, step_z, step_s, σμ);
    }

    fn Δs_from_Δz_offset(&mut self, out: &mut [T], ds: &[T], _work: &mut [T], z: &[T]) {
        for (outi, (&dsi, &zi)) in zip(out, zip(ds, z)) {
            *outi = dsi / zi;
        }
    }

    fn step_length(
        &mut self,
        dz: &[T],
        ds: &[T],
        z: &[T],
        s: &[T],
        _settings: &DefaultSettings<T>,
        αmax: T,
    ) -> (T, T) {
        let αz = _step_length_nonneg_component(z, dz, αmax);
        let αs = _step_length_nonneg_component(s, ds, αmax);

        (αz, αs)
    }

    fn compute_barrier(&mut self, z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        let mut barrier = T::zero();
        for i in 0..z.len() {
            let si = s[i] + α * ds[i];
            let zi = z[i] + α * dz[i];
            barrier -= (si * zi).logsafe();
        }
        barrier
    }
}

// ---------------------------------------------
// operations supported by symmetric cones only
// ---------------------------------------------

impl<T> SymmetricCone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn λ_inv_circ_op(&self, x: &mut [T], z: &[T]) {
        _inv_circ_op(x, &self.λ, z);
    }

    fn mul_W(&self, _is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T) {
        //symmetric, so ignore transpose
        //y .= α*(W*x) + β*y
        for (yi, (&xi, &wi)) in zip(y, zip(x, &self.w)) {
            *yi = α * (xi * wi) + β * *yi;
        }
    }

    fn mul_Winv(&self, _is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T) {
        //symmetric, so ignore transpose
        //y .= α*(W⁻¹*x) + β*y
        for (yi, (&xi, &wi)) in zip(y, zip(x, &self.w)) {
            *yi = α * (xi / wi) + β * *yi;
        }
    }
}

// ---------------------------------------------
// Jordan algebra operations for symmetric cones
// ---------------------------------------------

impl<T> JordanAlgebra<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn circ_op(&self, x: &mut [T], y: &[T], z: &[T]) {
        _circ_op(x, y, z);
    }
    fn inv_circ_op(&self, x: &mut [T], y: &[T], z: &[T]) {
        _inv_circ_op(x, y, z);
    }
}

// circ ops are elementwise products / divisions, but are pulled
// out as free functions here since the cone's λ is part of its own
// state and can't be borrowed together with &self.

fn _circ_op<T>(x: &mut [T], y: &[T], z: &[T])
where
    T: FloatT,
{
    for (xi, (&yi, &zi)) in zip(x, zip(y, z)) {
        *xi = yi * zi;
    }
}

fn _inv_circ_op<T>(x: &mut [T], y: &[T], z: &[T])
where
    T: FloatT,
{
    for (xi, (&yi, &zi)) in zip(x, zip(y, z)) {
        *xi = zi / yi;
    }
}

// maximum α ≥ 0 with x + α dx ≥ 0
fn _step_length_nonneg_component<T>(x: &[T], dx: &[T], αmax: T) -> T
where
    T: FloatT,
{
    let mut α = αmax;
    for (&xi, &dxi) in zip(x, dx) {
        if dxi < T::zero() {
            α = T::min(α, -xi / dxi);
        }
    }
    α
}
