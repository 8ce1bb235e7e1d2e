use super::*;
use crate::{algebra::*, solver::DefaultSettings};

// -------------------------------------
// Second order Cone
// -------------------------------------

pub struct SecondOrderCone<T: FloatT = f64> {
    dim: usize,
    // Nesterov-Todd scaling point
    w: Vec<T>,
    // scaled variable λ = Wz
    λ: Vec<T>,
    // W^TW is represented as η²(D + uu' - vv'), with D diagonal.
    // u,v are needed directly by the sparse KKT assembly
    pub(crate) u: Vec<T>,
    pub(crate) v: Vec<T>,
    // leading entry of D.  All other entries of D are 1
    d: T,
    pub(crate) η: T,
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            w: vec![T::zero(); dim],
            λ: vec![T::zero(); dim],
            u: vec![T::zero(); dim],
            v: vec![T::zero(); dim],
            d: T::one(),
            η: T::zero(),
        }
    }
}

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn degree(&self) -> usize {
        // e'*e = 1 regardless of the cone dimension
        1
    }

    fn numel(&self) -> usize {
        self.dim
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn is_sparse_expandable(&self) -> bool {
        // W^TW enters the KKT matrix through its rank-2 form,
        // adding two extra rows and columns per cone
        true
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        // replace the elementwise scalings by a single scalar
        // equal to their mean over this cone's block
        δ.copy_from(e).recip().scale(e.mean());
        true
    }

    fn margins(&mut self, z: &mut [T], _pd: PrimalOrDualCone) -> (T, T) {
        let α = z[0] - z[1..].norm();
        (α, T::max(T::zero(), α))
    }

    fn scaled_unit_shift(&self, z: &mut [T], α: T, _pd: PrimalOrDualCone) {
        // unit vector is e = (1,0,...,0)
        z[0] += α;
    }

    fn unit_initialization(&self, z: &mut [T], s: &mut [T]) {
        z.set(T::zero());
        s.set(T::zero());
        self.scaled_unit_shift(z, T::one(), PrimalOrDualCone::PrimalCone);
        self.scaled_unit_shift(s, T::one(), PrimalOrDualCone::PrimalCone);
    }

    fn set_identity_scaling(&mut self) {
        self.d = T::one();
        self.u.set(T::zero());
        self.v.set(T::zero());
        self.η = T::one();
        self.w.set(T::zero());
    }

    fn update_scaling(&mut self, s: &[T], z: &[T], _μ: T) -> bool {
        let res_z = _sq_cone_residual(z);
        let res_s = _sq_cone_residual(s);

        // both points must be strictly interior for the NT
        // scaling point to exist
        if res_z <= T::zero() || res_s <= T::zero() {
            return false;
        }

        let zscale = T::sqrt(res_z);
        let sscale = T::sqrt(res_s);

        let two: T = (2.0).as_T();
        let half: T = (0.5).as_T();

        let gamma = T::sqrt((T::one() + s.dot(z) / (zscale * sscale)) * half);

        // w combines the normalized s with the reflection of the
        // normalized z
        let w = &mut self.w;
        let cs = T::recip(two * sscale * gamma);
        let cz = T::recip(two * zscale * gamma);
        w.copy_from(s);
        w.scale(cs);
        w[0] += z[0] * cz;
        w[1..].axpby(-cz, &z[1..], T::one());

        // terms for the rank-2 representation
        let w0p1 = w[0] + T::one();
        let w1sq = w[1..].sumsq();
        let w0sq = w[0] * w[0];
        let α = w0p1 + w1sq / w0p1;
        let β = T::one() + two / w0p1 + w1sq / (w0p1 * w0p1);

        // leading entry of the diagonal D block
        self.d = w0sq / two + w1sq / two * (T::one() - (α * α) / (T::one() + w1sq * β));

        // scalar multiplier η² on the whole of W^TW
        self.η = T::sqrt(sscale / zscale);

        // u and v span the rank-2 part
        let u0 = T::sqrt(w0sq + w1sq - self.d);
        let u1 = α / u0;
        let v1 = T::sqrt(u1 * u1 - β);
        self.u[0] = u0;
        self.u[1..].axpby(u1, &self.w[1..], T::zero());
        self.v[0] = T::zero();
        self.v[1..].axpby(v1, &self.w[1..], T::zero());

        // λ = Wz.   Going through the free function avoids a
        // simultaneous borrow of self and self.λ
        _sq_cone_mul_W(&mut self.λ, z, T::one(), T::zero(), &self.w, self.η);

        true
    }

    fn Hs_is_diagonal(&self) -> bool {
        true
    }

    fn get_Hs(&self, Hsblock: &mut [T]) {
        // only the diagonal D block from the sparse representation
        // of W^TW.  The two extra entries at the bottom right of the
        // extended block are written by the KKT assembly
        Hsblock.set(self.η * self.η);
        Hsblock[0] *= self.d;
    }

    fn mul_Hs(&mut self, y: &mut [T], x: &[T], work: &mut [T]) {
        // y = W^T(Wx)
        self.mul_W(MatrixShape::N, work, x, T::one(), T::zero());
        self.mul_W(MatrixShape::T, y, work, T::one(), T::zero());
    }

    fn affine_ds(&self, ds: &mut [T], _s: &[T]) {
        self.circ_op(ds, &self.λ, &self.λ);
    }

    fn combined_ds_shift(&mut self, shift: &mut [T], step_z: &mut [T], step_s: &mut [T], σμ: T) {
        self._combined_ds_shift_symmetric(shift, step_z, step_s, σμ);
    }

    fn Δs_from_Δz_offset(&mut self, out: &mut [T], ds: &[T], work: &mut [T], _z: &[T]) {
        self._Δs_from_Δz_offset_symmetric(out, ds, work);
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
        let αz = _sq_cone_step_to_boundary(z, dz, αmax);
        let αs = _sq_cone_step_to_boundary(s, ds, αmax);

        (αz, αs)
    }

    fn compute_barrier(&mut self, z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        let res_s = _sq_cone_residual_shifted(s, ds, α);
        let res_z = _sq_cone_residual_shifted(z, dz, α);

        if res_s > T::zero() && res_z > T::zero() {
            -(res_s * res_z).logsafe() * (0.5).as_T()
        } else {
            // trial points on or outside the boundary get an
            // unbounded barrier
            T::infinity()
        }
    }
}

// ---------------------------------------------
// operations supported by symmetric cones only
// ---------------------------------------------

impl<T> SymmetricCone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn λ_inv_circ_op(&self, x: &mut [T], z: &[T]) {
        self.inv_circ_op(x, &self.λ, z);
    }

    fn mul_W(&self, _is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T) {
        // W = W^T for this cone, so the shape argument is moot
        _sq_cone_mul_W(y, x, α, β, &self.w, self.η);
    }

    fn mul_Winv(&self, _is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T) {
        _sq_cone_mul_Winv(y, x, α, β, &self.w, self.η);
    }
}

// ---------------------------------------------
// Jordan algebra operations for symmetric cones
// ---------------------------------------------

impl<T> JordanAlgebra<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn circ_op(&self, x: &mut [T], y: &[T], z: &[T]) {
        x[0] = y.dot(z);
        let (y0, z0) = (y[0], z[0]);
        x[1..].waxpby(y0, &z[1..], z0, &y[1..]);
    }

    fn inv_circ_op(&self, x: &mut [T], y: &[T], z: &[T]) {
        let pinv = T::recip(_sq_cone_residual(y));
        let v = y[1..].dot(&z[1..]);

        x[0] = (y[0] * z[0] - v) * pinv;

        let c1 = pinv * (v / y[0] - z[0]);
        let c2 = T::recip(y[0]);
        x[1..].waxpby(c1, &y[1..], c2, &z[1..]);
    }
}

// ---------------------------------------------
// internal operations for second order cones
// ---------------------------------------------

// z₀² - ||z₁||², positive iff z is strictly interior
fn _sq_cone_residual<T>(z: &[T]) -> T
where
    T: FloatT,
{
    z[0] * z[0] - z[1..].sumsq()
}

// residual evaluated at z + αdz without forming the shifted vector
fn _sq_cone_residual_shifted<T>(z: &[T], dz: &[T], α: T) -> T
where
    T: FloatT,
{
    let sc = z[0] + α * dz[0];
    let vpart = <[T] as VectorMath>::dot_shifted(&z[1..], &z[1..], &dz[1..], &dz[1..], α);

    sc * sc - vpart
}

// largest α ∈ [0, αmax] with x + αy still in the cone, assuming
// x itself is a member
fn _sq_cone_step_to_boundary<T>(x: &[T], y: &[T], αmax: T) -> T
where
    T: FloatT,
{
    // boundary crossings are the positive roots of the quadratic
    //    ||x₁+αy₁||² = (x₀+αy₀)²
    // written below as aα² + bα + c = 0

    let two: T = (2.).as_T();
    let four: T = (4.).as_T();

    let a = _sq_cone_residual(y);
    let b = two * (x[0] * y[0] - x[1..].dot(&y[1..]));
    let c = T::max(T::zero(), _sq_cone_residual(x)); //should be ≥0
    let d = b * b - four * a * c;

    if d < T::zero() || (a > T::zero() && b > T::zero()) {
        // complex root pair, or two negative roots: the ray never
        // crosses the boundary
        return αmax;
    }
    if a == T::zero() {
        // degenerate single root -c/b, with the direction on the
        // cone boundary.  b ≥ 0 since the cone is self dual and
        // both x and y are members, so no positive crossing
        return αmax;
    }
    if c == T::zero() {
        // x sits exactly on the boundary, one root at zero.   The
        // other root is -b/a.  Self-duality forces sign(b) to agree
        // with membership of y, so the step is free if y is in the
        // cone and blocked completely otherwise
        return if a >= T::zero() { αmax } else { T::zero() };
    }

    // two real roots.   Compute them in the cancellation-safe
    // form of §1.4, Goldberg, ACM Computing Surveys, 1991
    // https://dl.acm.org/doi/pdf/10.1145/103162.103163
    let t = if b >= T::zero() {
        -b - T::sqrt(d)
    } else {
        -b + T::sqrt(d)
    };

    let mut r1: T = (two * c) / t;
    let mut r2: T = t / (two * a);

    // smallest positive root wins, capped at αmax
    if r1 < T::zero() {
        r1 = T::infinity();
    }
    if r2 < T::zero() {
        r2 = T::infinity();
    }
    T::min(αmax, T::min(r1, r2))
}

// y = αWx + βy and y = αW⁻¹x + βy.   These are free functions
// because computing λ = Wz would otherwise need self and self.λ
// borrowed at once.   Products use the O(n) form from the ECOS
// ECC paper rather than materializing W.

#[allow(non_snake_case)]
fn _sq_cone_mul_W<T>(y: &mut [T], x: &[T], α: T, β: T, w: &[T], η: T)
where
    T: FloatT,
{
    let ζ = w[1..].dot(&x[1..]);
    let c = x[0] + ζ / (T::one() + w[0]);

    y[0] = (α * η) * (w[0] * x[0] + ζ) + β * y[0];

    y[1..].axpby(α * η * c, &w[1..], β);
    y[1..].axpby(α * η, &x[1..], T::one());
}

fn _sq_cone_mul_Winv<T>(y: &mut [T], x: &[T], α: T, β: T, w: &[T], η: T)
where
    T: FloatT,
{
    let ζ = w[1..].dot(&x[1..]);
    let c = -x[0] + ζ / (T::one() + w[0]);

    y[0] = (α / η) * (w[0] * x[0] - ζ) + β * y[0];

    y[1..].axpby(α / η * c, &w[1..], β);
    y[1..].axpby(α / η, &x[1..], T::one());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::DefaultSettings;

    #[test]
    fn test_soc_step_length_interior() {
        let mut K = SecondOrderCone::<f64>::new(3);
        let settings = DefaultSettings::default();

        let z = [2., 1., 0.];
        let s = [2., 0., 1.];

        // shrinking steps are unrestricted
        let dz = [-1., 0., 0.5];
        let ds = [-1., 0.5, 0.];
        let (αz, αs) = K.step_length(&dz, &ds, &z, &s, &settings, 10.);
        assert!(αz > 0. && αs > 0.);

        // steps directly out of the cone hit the boundary
        let dz = [-1., 0., 0.];
        let (αz, _) = K.step_length(&dz, &ds, &z, &s, &settings, 10.);
        assert!(αz <= 10.);
    }

    #[test]
    fn test_soc_scaling_point() {
        let mut K = SecondOrderCone::<f64>::new(3);
        let z = [2., 1., 0.5];
        let s = [3., -1., 1.];
        assert!(K.update_scaling(&s, &z, 1.0));

        // λ = Wz and W⁻ᵀs should agree at the scaling point
        let mut ws = vec![0.; 3];
        K.mul_Winv(MatrixShape::T, &mut ws, &s, 1., 0.);
        for i in 0..3 {
            assert!((ws[i] - K.λ[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_soc_scaling_rejects_boundary() {
        let mut K = SecondOrderCone::<f64>::new(3);
        let z = [1., 1., 0.]; // on the boundary
        let s = [2., 0., 1.];
        assert!(!K.update_scaling(&s, &z, 1.0));
    }
}
