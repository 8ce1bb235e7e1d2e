use super::residuals::DefaultResiduals;
use super::{DefaultProblemData, DefaultSettings, StepDirection};
use crate::algebra::*;
use crate::solver::cones::{CompositeCone, Cone, PrimalOrDualCone};

// ---------------
// Variables type for the standard problem format
// ---------------

/// Primal-dual variables of the homogeneous embedding
pub struct DefaultVariables<T> {
    /// scaled primal variables
    pub x: Vec<T>,
    /// slack variables
    pub s: Vec<T>,
    /// scaled dual variables
    pub z: Vec<T>,
    /// homogenization scalar τ
    pub τ: T,
    /// homogenization scalar κ
    pub κ: T,
}

impl<T> DefaultVariables<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            s: vec![T::zero(); m],
            z: vec![T::zero(); m],
            τ: T::one(),
            κ: T::one(),
        }
    }

    // complementarity measure μ = (⟨s,z⟩ + τκ) / (ν + 1),
    // with ν the total cone degree
    pub(crate) fn calc_mu(&self, residuals: &DefaultResiduals<T>, cones: &CompositeCone<T>) -> T {
        let denom = (cones.degree() + 1).as_T();
        (residuals.dot_sz + self.τ * self.κ) / denom
    }

    pub(crate) fn affine_step_rhs(
        &mut self,
        residuals: &DefaultResiduals<T>,
        variables: &Self,
        cones: &CompositeCone<T>,
    ) {
        self.x.copy_from(&residuals.rx);
        self.z.copy_from(&residuals.rz);
        cones.affine_ds(&mut self.s, &variables.s);
        self.τ = residuals.rτ;
        self.κ = variables.τ * variables.κ;
    }

    // RHS for the combined (centering + corrector) direction.  `step`
    // holds the affine direction on entry and is consumed as scratch.
    // `m` scales the Mehrotra correction, and is 1 except on the very
    // first iteration where a full correction from a badly centred
    // starting point can be harmful.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn combined_step_rhs(
        &mut self,
        residuals: &DefaultResiduals<T>,
        variables: &Self,
        cones: &mut CompositeCone<T>,
        step: &mut Self,
        σ: T,
        μ: T,
        m: T,
    ) {
        let σμ = σ * μ;

        self.x.axpby(T::one() - σ, &residuals.rx, T::zero());
        self.τ = (T::one() - σ) * residuals.rτ;
        self.κ = -σμ + m * step.τ * step.κ + variables.τ * variables.κ;

        // the cone part of the RHS differs by cone class:
        //   symmetric:   ds = λ∘λ + (W⁻¹Δs)∘(WΔz) − σμe
        //   asymmetric:  ds = s + σμ g(z)
        //
        // scaling step.z by m scales the correction term itself,
        // since the corrector is bilinear in (Δz,Δs)
        if m != T::one() {
            step.z.scale(m);
        }

        // self.z serves as scratch for the shift until the
        // residual copy below
        cones.combined_ds_shift(&mut self.z, &mut step.z, &mut step.s, σμ);

        // self.s still holds affine_ds from the predictor stage
        self.s.axpby(T::one(), &self.z, T::one());

        self.z.axpby(T::one() - σ, &residuals.rz, T::zero());
    }

    pub(crate) fn calc_step_length(
        &self,
        step: &Self,
        cones: &mut CompositeCone<T>,
        settings: &DefaultSettings<T>,
        step_direction: StepDirection,
    ) -> T {
        // limits imposed by the nonnegativity of τ and κ
        let ατ = _nonneg_step_limit(self.τ, step.τ);
        let ακ = _nonneg_step_limit(self.κ, step.κ);

        let αmax = T::min(T::one(), T::min(ατ, ακ));
        let (αz, αs) = cones.step_length(&step.z, &step.s, &self.z, &self.s, settings, αmax);

        let mut α = T::min(αz, αs);

        if step_direction == StepDirection::Combined {
            α *= settings.max_step_fraction;
        }

        α
    }

    pub(crate) fn add_step(&mut self, step: &Self, α: T) {
        self.x.axpby(α, &step.x, T::one());
        self.s.axpby(α, &step.s, T::one());
        self.z.axpby(α, &step.z, T::one());
        self.τ += α * step.τ;
        self.κ += α * step.κ;
    }

    // adjusts the output of the initial point KKT solve so that
    // (s,z) sit comfortably inside their respective cones
    pub(crate) fn symmetric_initialization(&mut self, cones: &mut CompositeCone<T>) {
        _shift_to_cone_interior(&mut self.s, cones, PrimalOrDualCone::PrimalCone);
        _shift_to_cone_interior(&mut self.z, cones, PrimalOrDualCone::DualCone);

        self.τ = T::one();
        self.κ = T::one();
    }

    pub(crate) fn unit_initialization(&mut self, cones: &CompositeCone<T>) {
        cones.unit_initialization(&mut self.z, &mut self.s);

        self.x.set(T::zero());
        self.τ = T::one();
        self.κ = T::one();
    }

    pub(crate) fn copy_from(&mut self, src: &Self) {
        self.x.copy_from(&src.x);
        self.s.copy_from(&src.s);
        self.z.copy_from(&src.z);
        self.τ = src.τ;
        self.κ = src.κ;
    }

    pub(crate) fn scale_cones(&self, cones: &mut CompositeCone<T>, μ: T) -> bool {
        cones.update_scaling(&self.s, &self.z, μ)
    }

    // total barrier value at the trial point (v + α dv), used by the
    // backtracking line search for asymmetric cones
    pub(crate) fn barrier(&self, step: &Self, α: T, cones: &mut CompositeCone<T>) -> T {
        let central_coef = (cones.degree() + 1).as_T();

        let cur_τ = self.τ + α * step.τ;
        let cur_κ = self.κ + α * step.κ;

        let sz = <[T] as VectorMath>::dot_shifted(&self.z, &self.s, &step.z, &step.s, α);
        let μ = (sz + cur_τ * cur_κ) / central_coef;

        let mut barrier = central_coef * μ.logsafe() - cur_τ.logsafe() - cur_κ.logsafe();
        barrier += cones.compute_barrier(&self.z, &self.s, &step.z, &step.s, α);

        barrier
    }

    pub(crate) fn rescale(&mut self) {
        let invscale = T::recip(T::max(self.τ, self.κ));

        self.x.scale(invscale);
        self.z.scale(invscale);
        self.s.scale(invscale);
        self.τ *= invscale;
        self.κ *= invscale;
    }

    pub(crate) fn unscale(&mut self, data: &DefaultProblemData<T>, is_infeasible: bool) {
        // infeasible problems are normalized by κ to produce a
        // certificate; solved problems by τ to recover the solution
        let scaleinv = {
            if is_infeasible {
                T::recip(self.κ)
            } else {
                T::recip(self.τ)
            }
        };

        // also undo the equilibration
        let d = &data.equilibration.d;
        let (e, einv) = (&data.equilibration.e, &data.equilibration.einv);
        let cinv = T::recip(data.equilibration.c);

        self.x.hadamard(d).scale(scaleinv);
        self.z.hadamard(e).scale(scaleinv * cinv);
        self.s.hadamard(einv).scale(scaleinv);

        self.τ *= scaleinv;
        self.κ *= scaleinv;
    }
}

// largest α ≥ 0 keeping (v + α dv) nonnegative
fn _nonneg_step_limit<T: FloatT>(v: T, dv: T) -> T {
    if dv < T::zero() {
        -v / dv
    } else {
        T::max_value()
    }
}

fn _shift_to_cone_interior<T>(z: &mut [T], cones: &mut CompositeCone<T>, pd: PrimalOrDualCone)
where
    T: FloatT,
{
    let (min_margin, pos_margin) = cones.margins(z, pd);
    let target = T::max(T::one(), (pos_margin * (0.1).as_T()) / cones.degree().as_T());

    if min_margin <= T::zero() {
        // at least some component is outside its cone.
        // done in two stages since otherwise (1-α) = -α for
        // large α, which makes z exactly 0. (or worse, -0.0 )
        cones.scaled_unit_shift(z, -min_margin, pd);
        cones.scaled_unit_shift(z, target, pd);
    } else if min_margin < target {
        // margin is positive but small
        cones.scaled_unit_shift(z, target - min_margin, pd);
    } else {
        // good margin.   The shift still runs with a zero scaling
        // so that zero cone components are forced to zero
        cones.scaled_unit_shift(z, T::zero(), pd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::cones::SupportedConeT;

    #[test]
    fn test_shift_to_cone_interior() {
        let mut cones = CompositeCone::<f64>::new(&[SupportedConeT::NonnegativeConeT(3)]);

        // exterior point gets pulled inside with unit margin
        let mut s = vec![-2.0, 1.0, 0.5];
        _shift_to_cone_interior(&mut s, &mut cones, PrimalOrDualCone::PrimalCone);
        assert!(s.iter().all(|&si| si >= 1.0));

        // comfortable interior point is left alone
        let mut s = vec![3.0, 4.0, 5.0];
        _shift_to_cone_interior(&mut s, &mut cones, PrimalOrDualCone::PrimalCone);
        assert_eq!(s, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_shift_clears_zero_cone_slacks() {
        // the primal slack block of an equality constraint must come
        // out of initialization identically zero, whatever the
        // initial point solve produced there
        let mut cones = CompositeCone::<f64>::new(&[
            SupportedConeT::ZeroConeT(2),
            SupportedConeT::NonnegativeConeT(2),
        ]);

        let mut s = vec![0.7, -0.3, 2.0, 3.0];
        _shift_to_cone_interior(&mut s, &mut cones, PrimalOrDualCone::PrimalCone);

        assert_eq!(&s[0..2], &[0.0, 0.0]);
        assert!(s[2..].iter().all(|&si| si > 0.0));

        // the dual block of the zero cone is unconstrained
        let mut z = vec![0.7, -0.3, 2.0, 3.0];
        _shift_to_cone_interior(&mut z, &mut cones, PrimalOrDualCone::DualCone);
        assert_eq!(&z[0..2], &[0.7, -0.3]);
    }

    #[test]
    fn test_rescale_normalizes_homogenization() {
        let mut v = DefaultVariables::<f64>::new(2, 2);
        v.x.copy_from_slice(&[2.0, 4.0]);
        v.s.copy_from_slice(&[2.0, 2.0]);
        v.z.copy_from_slice(&[2.0, 2.0]);
        v.τ = 2.0;
        v.κ = 0.5;

        v.rescale();
        assert_eq!(v.τ, 1.0);
        assert_eq!(v.κ, 0.25);
        assert_eq!(v.x, vec![1.0, 2.0]);
    }
}
