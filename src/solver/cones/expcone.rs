use super::*;
use crate::{algebra::*, solver::DefaultSettings};

// -------------------------------------
// Exponential Cone
// -------------------------------------

pub struct ExponentialCone<T: FloatT = f64> {
    // Hessian of the dual barrier at z
    H_dual: DenseMatrixSym3<T>,

    // scaling matrix, i.e. μH(z)
    Hs: DenseMatrixSym3<T>,

    // gradient of the dual barrier at z
    grad: [T; 3],

    // holds copy of z at scaling point
    z: [T; 3],
}

impl<T> ExponentialCone<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self {
            H_dual: DenseMatrixSym3::zeros(),
            Hs: DenseMatrixSym3::zeros(),
            grad: [T::zero(); 3],
            z: [T::zero(); 3],
        }
    }
}

impl<T> Default for ExponentialCone<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cone<T> for ExponentialCone<T>
where
    T: FloatT,
{
    fn degree(&self) -> usize {
        3
    }

    fn numel(&self) -> usize {
        3
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
        s[0] = (-1.051383945322714).as_T();
        s[1] = (0.556409619469370).as_T();
        s[2] = (1.258967884768947).as_T();

        (z[0], z[1], z[2]) = (s[0], s[1], s[2]);
    }

    fn set_identity_scaling(&mut self) {
        // We never use identity scaling because we
        // never want to allow symmetric initialization
        unreachable!();
    }

    fn update_scaling(&mut self, _s: &[T], z: &[T], μ: T) -> bool {
        if !_is_dual_feasible_expcone(z) {
            return false;
        }

        // update both gradient and Hessian for
        // the dual barrier f*(z) at the point z
        self.update_dual_grad_H(z);

        // Hs = μH(z)
        self.Hs.scaled_from(μ, &self.H_dual);

        self.z.copy_from(z);

        true
    }

    fn Hs_is_diagonal(&self) -> bool {
        false
    }

    fn get_Hs(&self, Hsblock: &mut [T]) {
        self.Hs.pack_triu(Hsblock);
    }

    fn mul_Hs(&mut self, y: &mut [T], x: &[T], _work: &mut [T]) {
        self.Hs.mul(y, x);
    }

    fn affine_ds(&self, ds: &mut [T], s: &[T]) {
        ds.copy_from(s);
    }

    fn combined_ds_shift(&mut self, shift: &mut [T], _step_z: &mut [T], _step_s: &mut [T], σμ: T) {
        // no higher order correction, so just σμ*g(z)
        for i in 0..3 {
            shift[i] = self.grad[i] * σμ;
        }
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

        let mut work = [T::zero(); 3];

        let αz = backtrack_search(
            dz,
            z,
            αmax,
            αmin,
            step,
            _is_dual_feasible_expcone,
            &mut work,
        );
        let αs = backtrack_search(
            ds,
            s,
            αmax,
            αmin,
            step,
            _is_primal_feasible_expcone,
            &mut work,
        );

        (αz, αs)
    }

    fn compute_barrier(&mut self, z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        let cur_z = [z[0] + α * dz[0], z[1] + α * dz[1], z[2] + α * dz[2]];
        let cur_s = [s[0] + α * ds[0], s[1] + α * ds[1], s[2] + α * ds[2]];

        _barrier_dual(&cur_z) + _barrier_primal(&cur_s)
    }
}

// -----------------------------------------
// internal operations for exponential cones
//
// Primal exponential cone: s3 ≥ s2*e^(s1/s2), s3,s2 > 0
// Dual exponential cone: z3 ≥ -z1*e^(z2/z1 - 1), z3 > 0, z1 < 0
// We use the dual barrier function:
// f*(z) = -log(z2 - z1 - z1*log(z3/-z1)) - log(-z1) - log(z3)
// -----------------------------------------

impl<T> ExponentialCone<T>
where
    T: FloatT,
{
    fn update_dual_grad_H(&mut self, z: &[T]) {
        let H = &mut self.H_dual;

        let l = (-z[2] / z[0]).logsafe();
        let r = -z[0] * l - z[0] + z[1];

        // compute the gradient at z
        let c2 = r.recip();

        let grad = &mut self.grad;
        grad[0] = c2 * l - z[0].recip();
        grad[1] = -c2;
        grad[2] = (c2 * z[0] - T::one()) / z[2];

        // compute the Hessian at z.  Type is symmetric,
        // so only the upper triangle is assigned.
        H[(0, 0)] = (r * r - z[0] * r + l * l * z[0] * z[0]) / (r * z[0] * z[0] * r);
        H[(0, 1)] = -l / (r * r);
        H[(1, 1)] = (r * r).recip();
        H[(0, 2)] = (z[1] - z[0]) / (r * r * z[2]);
        H[(1, 2)] = -z[0] / (r * r * z[2]);
        H[(2, 2)] = (r * r - z[0] * r + z[0] * z[0]) / (r * r * z[2] * z[2]);
    }
}

fn _barrier_dual<T>(z: &[T]) -> T
where
    T: FloatT,
{
    // Dual barrier
    let l = (-z[2] / z[0]).logsafe();
    -(-z[2] * z[0]).logsafe() - (z[1] - z[0] - z[0] * l).logsafe()
}

fn _barrier_primal<T>(s: &[T]) -> T
where
    T: FloatT,
{
    // Primal barrier:
    // f(s) = ⟨s,g(s)⟩ - f*(-g(s))
    //      = -2*log(s2) - log(s3) - log((1-barω)^2/barω) - 3,
    // where barω = ω(1 - s1/s2 - log(s2) - log(s3))
    // NB: ⟨s,g(s)⟩ = -3 = - ν

    let ω = _wright_omega(T::one() - s[0] / s[1] - (s[1] / s[2]).logsafe());

    let ω = (ω - T::one()) * (ω - T::one()) / ω;

    -ω.logsafe() - (s[1].logsafe()) * ((2.).as_T()) - s[2].logsafe() - (3.).as_T()
}

// Returns true if s is primal feasible
fn _is_primal_feasible_expcone<T>(s: &[T]) -> bool
where
    T: FloatT,
{
    if s[2] > T::zero() && s[1] > T::zero() {
        let res = s[1] * (s[2] / s[1]).logsafe() - s[0];
        if res > T::zero() {
            return true;
        }
    }
    false
}

// Returns true if z is dual feasible
fn _is_dual_feasible_expcone<T>(z: &[T]) -> bool
where
    T: FloatT,
{
    if z[2] > T::zero() && z[0] < T::zero() {
        let res = z[1] - z[0] - z[0] * (-z[2] / z[0]).logsafe();
        if res > T::zero() {
            return true;
        }
    }
    false
}

// ω(z) is the Wright-Omega function
// Computes the value ω(z) defined as the solution y to
// y+log(y) = z for reals z>=1.
//
// Follows Algorithm 4, §8.4 of thesis of Santiago Serrango:
//  Algorithms for Unsymmetric Cone Optimization and an
//  Implementation for Problems with the Exponential Cone
//  https://web.stanford.edu/group/SOL/dissertations/ThesisAkleAdobe-augmented.pdf

fn _wright_omega<T>(z: T) -> T
where
    T: FloatT,
{
    debug_assert!(z >= T::zero());

    let mut p: T;
    let mut w: T;
    if z < T::one() + T::PI() {
        //Initialize with the taylor series
        let zm1 = z - T::one();
        p = zm1; //(z-1)
        w = T::one() + p * ((0.5).as_T());
        p *= zm1; //(z-1)^2
        w += p * (1. / 16.0).as_T();
        p *= zm1; //(z-1)^3
        w -= p * (1. / 192.0).as_T();
        p *= zm1; //(z-1)^4
        w -= p * (1. / 3072.0).as_T();
        p *= zm1; //(z-1)^5
        w += p * (13. / 61440.0).as_T();
    } else {
        // Initialize with:
        // w(z) = z - log(z) +
        //        log(z)/z +
        //        log(z)/z^2(log(z)/2-1) +
        //        log(z)/z^3(1/3log(z)^2-3/2log(z)+1)

        let logz = z.logsafe();
        let zinv = z.recip();
        w = z - logz;

        // add log(z)/z
        let mut q = logz * zinv; // log(z)/z
        w += q;

        // add log(z)/z^2(log(z)/2-1)
        q *= zinv; // log(z)/(z^2)
        w += q * (logz / (2.).as_T() - T::one());

        // add log(z)/z^3(1/3log(z)^2-3/2log(z)+1)
        q *= zinv; // log(z)/(z^3)
        w += q * (logz * logz / (3.).as_T() - logz * (1.5).as_T() + T::one());
    }

    // Initialize the residual
    let mut r = z - w - w.logsafe();

    // Santiago suggests two refinement iterations only
    for _ in 0..3 {
        let wp1 = w + T::one();
        let t = wp1 * (wp1 + (r * (2.).as_T()) / (3.0).as_T());
        w *= T::one() + (r / wp1) * (t - r * (0.5).as_T()) / (t - r);

        let r_4th = r * r * r * r;
        let wp1_6th = wp1 * wp1 * wp1 * wp1 * wp1 * wp1;
        r = (w * w * (2.).as_T() - w * (8.).as_T() - T::one()) / (wp1_6th * (72.0).as_T()) * r_4th;
    }

    w
}

// internal unit tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wright_omega() {
        // y = ω(z) should solve y + ln(y) = z.
        let pts = [1e-7, 1e-5, 1e-3, 1e-1, 1e1, 1e3, 1e5, 1e7, 1e9];

        for z in pts {
            let y = _wright_omega(z);
            let zsolved = y + f64::ln(y);
            let err = f64::abs(z - zsolved);
            assert!((err / z) < 1e-9);
        }
    }

    #[test]
    fn test_expcone_gradient_matches_barrier() {
        // finite difference check of the dual gradient
        let mut K = ExponentialCone::<f64>::new();
        let z = [-1.1, 0.6, 1.3];
        assert!(K.update_scaling(&[0.; 3], &z, 1.0));

        let h = 1e-6;
        for i in 0..3 {
            let mut zp = z;
            let mut zm = z;
            zp[i] += h;
            zm[i] -= h;
            let fd = (_barrier_dual(&zp) - _barrier_dual(&zm)) / (2. * h);
            assert!((fd - K.grad[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_expcone_feasibility_checks() {
        assert!(_is_primal_feasible_expcone(&[0., 1., 2.]));
        assert!(!_is_primal_feasible_expcone(&[1., 1., 1.]));
        assert!(_is_dual_feasible_expcone(&[-1., 1., 1.]));
        assert!(!_is_dual_feasible_expcone(&[1., 1., 1.]));
    }
}
