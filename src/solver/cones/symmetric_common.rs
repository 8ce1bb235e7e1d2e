use super::{Cone, PrimalOrDualCone};
use crate::algebra::*;

// --------------------------------------
// Traits and blanket implementations for symmetric cones
// --------------------------------------

// operations supported by symmetric cones only
pub trait SymmetricCone<T: FloatT>: JordanAlgebra<T> {
    // Multiplication by the scaling point
    fn mul_W(&self, is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T);
    fn mul_Winv(&self, is_transpose: MatrixShape, y: &mut [T], x: &[T], α: T, β: T);

    // x = λ \ z
    // Included as a special case since q \ z for general q is difficult
    // to implement for general q i the SOC and unnecessary anyway
    #[allow(non_snake_case)]
    fn λ_inv_circ_op(&self, x: &mut [T], z: &[T]);
}

pub trait JordanAlgebra<T: FloatT> {
    fn circ_op(&self, x: &mut [T], y: &[T], z: &[T]);
    fn inv_circ_op(&self, x: &mut [T], y: &[T], z: &[T]);
}

// --------------------------------------
// Common operations on symmetric cones
// --------------------------------------

pub(crate) trait SymmetricConeUtils<T: FloatT> {
    fn _combined_ds_shift_symmetric(
        &mut self,
        shift: &mut [T],
        step_z: &mut [T],
        step_s: &mut [T],
        σμ: T,
    );
    #[allow(non_snake_case)]
    fn _Δs_from_Δz_offset_symmetric(&self, out: &mut [T], ds: &[T], work: &mut [T]);
}

impl<T, C> SymmetricConeUtils<T> for C
where
    T: FloatT,
    C: SymmetricCone<T> + Cone<T>,
{
    // compute shift in the combined step :
    //     λ ∘ (WΔz + W^{-⊤}Δs) = - (affine_ds + shift)
    // The affine term (computed in affine_ds!) is λ ∘ λ
    // The shift term is W⁻¹Δs ∘ WΔz - σμe
    fn _combined_ds_shift_symmetric(
        &mut self,
        shift: &mut [T],
        step_z: &mut [T],
        step_s: &mut [T],
        σμ: T,
    ) {
        // The step.z and step.s are from the affine step and not
        // needed anymore, so we modify them in place as workspace.
        // We can't have aliasing vector arguments to mul_W or
        // mul_Winv, so a temporary assignment is needed in each case.

        //Δz <- WΔz
        shift.copy_from(step_z);
        self.mul_W(MatrixShape::N, step_z, shift, T::one(), T::zero());

        //Δs <- W⁻¹Δs
        shift.copy_from(step_s);
        self.mul_Winv(MatrixShape::T, step_s, shift, T::one(), T::zero());

        //shift = W⁻¹Δs ∘ WΔz - σμe
        self.circ_op(shift, step_s, step_z);
        self.scaled_unit_shift(shift, -σμ, PrimalOrDualCone::PrimalCone);
    }

    // compute the constant part of Δs when written as a function of Δz
    // in the solution of a KKT system
    fn _Δs_from_Δz_offset_symmetric(&self, out: &mut [T], ds: &[T], work: &mut [T]) {
        //tmp = λ \ ds
        self.λ_inv_circ_op(work, ds);

        //out = Wᵀ(λ \ ds)
        self.mul_W(MatrixShape::T, out, work, T::one(), T::zero());
    }
}
