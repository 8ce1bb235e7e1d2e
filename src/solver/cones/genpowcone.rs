use super::*;
use crate::{algebra::*, solver::DefaultSettings};

// -------------------------------------
// Generalized Power Cone
// -------------------------------------

pub struct GenPowerCone<T: FloatT = f64> {
    // powers defining the cone
    α: Vec<T>,
    // gradient of the dual barrier at z
    grad: Vec<T>,
    // holds copy of z at scaling point
    z: Vec<T>,
    // dimensions of the leading and trailing blocks,
    // with dim1 == α.len()
    pub(crate) dim1: usize,
    pub(crate) dim2: usize,
    // central path parameter at the scaling point
    μ: T,
    // rank-3 representation of the dual Hessian,
    // H(z) = D + pp' - qq' - rr' with D = [d1; d2.*ones]
    p: Vec<T>,
    q: Vec<T>,
    r: Vec<T>,
    d1: Vec<T>,
    d2: T,
    // constant for initialization in the Newton-Raphson method
    ψ: T,
}

impl<T> GenPowerCone<T>
where
    T: FloatT,
{
    pub fn new(α: Vec<T>, dim2: usize) -> Self {
        let dim1 = α.len();
        let dim = dim1 + dim2;

        // parameter checks are done at problem setup
        debug_assert!(α.iter().all(|&αi| αi > T::zero()));
        debug_assert!((α.sum() - T::one()).abs() < T::epsilon() * (dim1.max(1)).as_T());

        let ψ = T::one() / α.sumsq();

        Self {
            α,
            grad: vec![T::zero(); dim],
            z: vec![T::zero(); dim],
            dim1,
            dim2,
            μ: T::one(),
            p: vec![T::zero(); dim],
            q: vec![T::zero(); dim1],
            r: vec![T::zero(); dim2],
            d1: vec![T::zero(); dim1],
            d2: T::zero(),
            ψ,
        }
    }

    fn dim(&self) -> usize {
        self.dim1 + self.dim2
    }
}

impl<T> Cone<T> for GenPowerCone<T>
where
    T: FloatT,
{
    fn degree(&self) -> usize {
        self.dim1 + 1
    }

    fn numel(&self) -> usize {
        self.dim()
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn is_sparse_expandable(&self) -> bool {
        false
    }

    fn rectify_equilibration(&self, δ: &mut [T], e: &[T]) -> bool {
        δ.copy_from(e).recip().scale(e.mean());
        true // scalar equilibration
    }

    fn margins(&mut self, _z: &mut [T], _pd: PrimalOrDualCone) -> (T, T) {
        // We should never end up shifting into this cone, since
        // asymmetric problems always use unit_initialization
        unreachable!();
    }

    fn scaled_unit_shift(&self, _z: &mut [T], _α: T, _pd: PrimalOrDualCone) {
        // as for margins
        unreachable!();
    }

    fn unit_initialization(&self, z: &mut [T], s: &mut [T]) {
        let α = &self.α;

        for (si, &αi) in s[..self.dim1].iter_mut().zip(α.iter()) {
            *si = (T::one() + αi).sqrt();
        }
        s[self.dim1..].set(T::zero());

        z.copy_from(s);
    }

    fn set_identity_scaling(&mut self) {
        // We never use identity scaling because we
        // never want to allow symmetric initialization
        unreachable!();
    }

    fn update_scaling(&mut self, _s: &[T], z: &[T], μ: T) -> bool {
        if !self.is_dual_feasible(z) {
            return false;
        }

        // update both gradient and Hessian for
        // the dual barrier f*(z) at the point z
        self.update_dual_grad_H(z);
        self.μ = μ;

        self.z.copy_from(z);

        true
    }

    fn Hs_is_diagonal(&self) -> bool {
        false
    }

    fn get_Hs(&self, Hsblock: &mut [T]) {
        // assemble the dense triu block μ*(D + pp' - qq' - rr'),
        // in packed column major order
        let dim1 = self.dim1;
        let mut idx = 0;
        for col in 0..self.dim() {
            for row in 0..=col {
                let mut v = self.p[row] * self.p[col];
                if row == col {
                    v += if row < dim1 { self.d1[row] } else { self.d2 };
                }
                if col < dim1 {
                    v -= self.q[row] * self.q[col];
                } else if row >= dim1 {
                    v -= self.r[row - dim1] * self.r[col - dim1];
                }
                Hsblock[idx] = self.μ * v;
                idx += 1;
            }
        }
    }

    fn mul_Hs(&mut self, y: &mut [T], x: &[T], _work: &mut [T]) {
        // Hs = μ*(D + pp' - qq' - rr')
        let dim1 = self.dim1;

        let coef_p = self.p.dot(x);
        let coef_q = self.q.dot(&x[..dim1]);
        let coef_r = self.r.dot(&x[dim1..]);

        for (i, yi) in y.iter_mut().enumerate() {
            *yi = coef_p * self.p[i];
            if i < dim1 {
                *yi += self.d1[i] * x[i] - coef_q * self.q[i];
            } else {
                *yi += self.d2 * x[i] - coef_r * self.r[i - dim1];
            }
            *yi *= self.μ;
        }
    }

    fn affine_ds(&self, ds: &mut [T], s: &[T]) {
        ds.copy_from(s);
    }

    fn combined_ds_shift(&mut self, shift: &mut [T], _step_z: &mut [T], _step_s: &mut [T], σμ: T) {
        // no higher order correction, so just σμ*g(z)
        shift.scalarop_from(|g| σμ * g, &self.grad);
    }

    fn Δs_from_Δz_offset(&mut self, out: &mut [T], ds: &[T], _work: &mut [T], _z: &[T]) {
        out.copy_from(ds);
    }

    fn step_length(
        &mut self,
        dz: &[T],
        ds: &[T],
        z: &[T],
        s: &[T],
        settings: &DefaultSettings<T>,
        αmax: T,
    ) -> (T, T) {
        let step = settings.linesearch_backtrack_step;
        let αmin = settings.min_terminate_step_length;

        let mut work = vec![T::zero(); self.dim()];

        let is_primal_feasible_fcn = |s: &[T]| -> bool { self.is_primal_feasible(s) };
        let αs = backtrack_search(ds, s, αmax, αmin, step, is_primal_feasible_fcn, &mut work);

        let is_dual_feasible_fcn = |z: &[T]| -> bool { self.is_dual_feasible(z) };
        let αz = backtrack_search(dz, z, αmax, αmin, step, is_dual_feasible_fcn, &mut work);

        (αz, αs)
    }

    fn compute_barrier(&mut self, z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        let mut barrier = T::zero();
        let mut work = vec![T::zero(); self.dim()];

        work.waxpby(T::one(), z, α, dz);
        barrier += self.barrier_dual(&work);

        work.waxpby(T::one(), s, α, ds);
        barrier += self.barrier_primal(&work);

        barrier
    }
}

//-------------------------------------
// internal operations, dual scaling
//-------------------------------------

impl<T> GenPowerCone<T>
where
    T: FloatT,
{
    // Returns true if s is primal feasible
    fn is_primal_feasible(&self, s: &[T]) -> bool {
        let α = &self.α;
        let two: T = (2.).as_T();
        let dim1 = self.dim1;

        if s[..dim1].iter().all(|&x| x > T::zero()) {
            let mut res = T::zero();
            for i in 0..dim1 {
                res += two * α[i] * s[i].logsafe();
            }
            let res = T::exp(res) - s[dim1..].sumsq();

            if res > T::zero() {
                return true;
            }
        }
        false
    }

    // Returns true if z is dual feasible
    fn is_dual_feasible(&self, z: &[T]) -> bool {
        let α = &self.α;
        let two: T = (2.).as_T();
        let dim1 = self.dim1;

        if z[..dim1].iter().all(|&x| x > T::zero()) {
            let mut res = T::zero();
            for i in 0..dim1 {
                res += two * α[i] * (z[i] / α[i]).logsafe();
            }
            let res = T::exp(res) - z[dim1..].sumsq();

            if res > T::zero() {
                return true;
            }
        }
        false
    }

    fn update_dual_grad_H(&mut self, z: &[T]) {
        let α = &self.α;
        let dim1 = self.dim1;
        let two: T = (2.).as_T();

        let mut phi = T::one();
        for i in 0..dim1 {
            phi *= (z[i] / α[i]).powf(two * α[i]);
        }
        let norm2w = z[dim1..].sumsq();
        let ζ = phi - norm2w;

        // compute the gradient at z
        let grad = &mut self.grad;
        let τ = &mut self.q;
        for i in 0..dim1 {
            τ[i] = two * α[i] / z[i];
            grad[i] = -τ[i] * phi / ζ - (T::one() - α[i]) / z[i];
        }
        for i in dim1..z.len() {
            grad[i] = two * z[i] / ζ;
        }

        // compute Hessian information at z
        let p0 = (phi * (phi + norm2w) / two).sqrt();
        let p1 = -two * phi / p0;
        let q0 = (ζ * phi / two).sqrt();
        let r1 = two * (ζ / (phi + norm2w)).sqrt();

        // compute the diagonal d1,d2
        let d1 = &mut self.d1;
        for i in 0..dim1 {
            d1[i] = τ[i] * phi / (ζ * z[i]) + (T::one() - α[i]) / (z[i] * z[i]);
        }
        self.d2 = two / ζ;

        // compute p, q, r, where τ shares memory with q
        let c1 = p0 / ζ;
        let p = &mut self.p;
        for i in 0..dim1 {
            p[i] = c1 * τ[i];
        }
        let c2 = p1 / ζ;
        for i in dim1..z.len() {
            p[i] = c2 * z[i];
        }

        let c3 = q0 / ζ;
        self.q.scale(c3);

        let c4 = r1 / ζ;
        let r = &mut self.r;
        r.copy_from(&z[dim1..]);
        r.scale(c4);
    }

    fn barrier_dual(&self, z: &[T]) -> T {
        let α = &self.α;
        let dim1 = self.dim1;
        let two: T = (2.).as_T();
        let mut res = T::zero();

        for i in 0..dim1 {
            res += two * α[i] * (z[i] / α[i]).logsafe();
        }
        let res = T::exp(res) - z[dim1..].sumsq();

        let mut barrier: T = -res.logsafe();
        for i in 0..dim1 {
            barrier -= z[i].logsafe() * (T::one() - α[i]);
        }

        barrier
    }

    fn barrier_primal(&self, s: &[T]) -> T {
        // Primal barrier: f(s) = ⟨s,g(s)⟩ - f*(-g(s))
        // NB: ⟨s,g(s)⟩ = -(dim1+1) = - ν
        let α = &self.α;
        let dim1 = self.dim1;

        let (g1, norm_r) = self.minus_gradient_primal(s);

        let mut minus_g = vec![T::zero(); self.dim()];
        if norm_r > T::epsilon() {
            for i in dim1..s.len() {
                minus_g[i] = g1 * s[i] / norm_r;
            }
            for i in 0..dim1 {
                minus_g[i] = -(T::one() + α[i] + α[i] * g1 * norm_r) / s[i];
            }
        } else {
            for i in 0..dim1 {
                minus_g[i] = -(T::one() + α[i]) / s[i];
            }
        }

        // add the sign, i.e. pass -g to the dual barrier
        minus_g.negate();

        -self.barrier_dual(&minus_g) - self.degree().as_T()
    }

    // Compute the last element of the primal gradient of f(s) at s,
    // together with the norm of the trailing block
    fn minus_gradient_primal(&self, s: &[T]) -> (T, T) {
        let α = &self.α;
        let dim1 = self.dim1;
        let two: T = (2.).as_T();

        // unscaled phi
        let mut phi = T::one();
        for i in 0..dim1 {
            phi *= s[i].powf(two * α[i]);
        }

        // obtain g1 from the Newton-Raphson method
        let norm_r = s[dim1..].norm();
        let mut g1 = T::zero();

        if norm_r > T::epsilon() {
            g1 = _newton_raphson_genpowcone(norm_r, &s[..dim1], phi, α, self.ψ);
        }

        (g1, norm_r)
    }
}

// ----------------------------------------------
//  internal operations for generalized power cones

fn _newton_raphson_genpowcone<T>(norm_r: T, p: &[T], phi: T, α: &[T], ψ: T) -> T
where
    T: FloatT,
{
    let two: T = (2.).as_T();

    // init point x0: f(x0) > 0
    let x0 = -norm_r.recip()
        + (ψ * norm_r + ((phi / norm_r / norm_r + ψ * ψ - T::one()) * phi).sqrt())
            / (phi - norm_r * norm_r);

    // function for f(x) = 0
    let f0 = {
        |x: T| -> T {
            let mut fval = -(two * x / norm_r + x * x).logsafe();
            for (i, &αi) in α.iter().enumerate() {
                fval +=
                    two * αi * ((x * norm_r + (T::one() + αi) / αi).logsafe() - p[i].logsafe());
            }
            fval
        }
    };

    // first derivative
    let f1 = {
        |x: T| -> T {
            let mut fval = -(two * x + two / norm_r) / (x * x + two * x / norm_r);
            for &αi in α.iter() {
                fval += two * αi * norm_r / (norm_r * x + (T::one() + αi) / αi);
            }
            fval
        }
    };
    newton_raphson_onesided(x0, f0, f1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genpow_dims_and_degree() {
        let K = GenPowerCone::<f64>::new(vec![0.5, 0.5], 3);
        assert_eq!(K.numel(), 5);
        assert_eq!(K.degree(), 3);
    }

    #[test]
    fn test_genpow_gradient_matches_barrier() {
        let mut K = GenPowerCone::<f64>::new(vec![0.3, 0.7], 2);
        let z = [1.2, 0.9, 0.2, -0.3];
        assert!(K.update_scaling(&[0.; 4], &z, 1.0));

        let h = 1e-6;
        for i in 0..4 {
            let mut zp = z;
            let mut zm = z;
            zp[i] += h;
            zm[i] -= h;
            let fd = (K.barrier_dual(&zp) - K.barrier_dual(&zm)) / (2. * h);
            assert!((fd - K.grad[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_genpow_hessian_forms_agree() {
        // dense triu block and the structured product must match
        let mut K = GenPowerCone::<f64>::new(vec![0.4, 0.6], 2);
        let z = [1.0, 1.1, 0.3, 0.1];
        assert!(K.update_scaling(&[0.; 4], &z, 0.7));

        let n = K.numel();
        let mut block = vec![0.; crate::algebra::triangular_number(n)];
        K.get_Hs(&mut block);

        // unpack triu block into a dense symmetric matrix
        let mut H = vec![vec![0.; n]; n];
        let mut idx = 0;
        for col in 0..n {
            for row in 0..=col {
                H[row][col] = block[idx];
                H[col][row] = block[idx];
                idx += 1;
            }
        }

        let x = [0.5, -1.0, 2.0, 0.25];
        let mut y = vec![0.; n];
        let mut work = vec![0.; n];
        K.mul_Hs(&mut y, &x, &mut work);

        for i in 0..n {
            let mut yi = 0.;
            for j in 0..n {
                yi += H[i][j] * x[j];
            }
            assert!((yi - y[i]).abs() < 1e-12);
        }
    }
}
