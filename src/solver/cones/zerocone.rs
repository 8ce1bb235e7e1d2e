use super::{Cone, PrimalOrDualCone};
use crate::{algebra::*, solver::DefaultSettings};
use std::marker::PhantomData;

// -------------------------------------
// Zero Cone
// -------------------------------------

pub struct ZeroCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> ZeroCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for ZeroCone<T>
where
    T: FloatT,
{
    fn degree(&self) -> usize {
        0
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

    fn margins(&mut self, _z: &mut [T], _pd: PrimalOrDualCone) -> (T, T) {
        // for either primal or dual cone the margin is
        // just large, since the cone is unbounded
        (T::max_value(), T::zero())
    }

    fn scaled_unit_shift(&self, z: &mut [T], _α: T, pd: PrimalOrDualCone) {
        // the primal cone contains only the zero vector, so shifting
        // to its interior forces every element to zero.   The dual
        // side is all of R^n and needs no adjustment
        if pd == PrimalOrDualCone::PrimalCone {
            z.set(T::zero());
        }
    }

    fn unit_initialization(&self, z: &mut [T], s: &mut [T]) {
        z.set(T::zero());
        s.set(T::zero());
    }

    fn set_identity_scaling(&mut self) {
        // do nothing.   "identity" scaling will be zero for equalities
    }

    fn update_scaling(&mut self, _s: &[T], _z: &[T], _μ: T) -> bool {
        // do nothing.   "scaling" is just zero for equalities
        true
    }

    fn Hs_is_diagonal(&self) -> bool {
        true
    }

    fn get_Hs(&self, Hsblock: &mut [T]) {
        Hsblock.set(T::zero());
    }

    fn mul_Hs(&mut self, y: &mut [T], _x: &[T], _work: &mut [T]) {
        y.set(T::zero());
    }

    fn affine_ds(&self, ds: &mut [T], _s: &[T]) {
        ds.set(T::zero());
    }

    fn combined_ds_shift(&mut self, shift: &mut [T], _step_z: &mut [T], _step_s: &mut [T], _σμ: T) {
        shift.set(T::zero());
    }

    fn Δs_from_Δz_offset(&mut self, out: &mut [T], _ds: &[T], _work: &mut [T], _z: &[T]) {
        out.set(T::zero());
    }

    fn step_length(
        &mut self,
        _dz: &[T],
        _ds: &[T],
        _z: &[T],
        _s: &[T],
        _settings: &DefaultSettings<T>,
        αmax: T,
    ) -> (T, T) {
        // equality constraints allow arbitrary step length
        (αmax, αmax)
    }

    fn compute_barrier(&mut self, _z: &[T], _s: &[T], _dz: &[T], _ds: &[T], _α: T) -> T {
        T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cone_unit_shift() {
        let K = ZeroCone::<f64>::new(3);

        // the shift must clear whatever the initial point
        // solve left in the primal slack block
        let mut s = [0.5, -1.0, 2.0];
        K.scaled_unit_shift(&mut s, 1.0, PrimalOrDualCone::PrimalCone);
        assert_eq!(s, [0.0; 3]);

        // dual side is unrestricted and passes through unchanged
        let mut z = [0.5, -1.0, 2.0];
        K.scaled_unit_shift(&mut z, 1.0, PrimalOrDualCone::DualCone);
        assert_eq!(z, [0.5, -1.0, 2.0]);
    }
}
