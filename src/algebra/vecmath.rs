use super::{FloatT, ScalarMath, VectorMath};
use itertools::izip;
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn select(&self, index: &[bool]) -> Vec<T> {
        assert_eq!(self.len(), index.len());
        zip(self, index)
            .filter_map(|(&x, &keep)| keep.then_some(x))
            .collect()
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = op(*x));
        self
    }

    fn scalarop_from(&mut self, op: impl Fn(T) -> T, v: &[T]) -> &mut Self {
        zip(&mut *self, v).for_each(|(x, &v)| *x = op(v));
        self
    }

    fn translate(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x + c)
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.scalarop(|_| c)
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn recip(&mut self) -> &mut Self {
        self.scalarop(T::recip)
    }

    fn sqrt(&mut self) -> &mut Self {
        self.scalarop(T::sqrt)
    }

    fn rsqrt(&mut self) -> &mut Self {
        self.scalarop(|x| T::sqrt(x).recip())
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn hadamard(&mut self, y: &[T]) -> &mut Self {
        zip(&mut *self, y).for_each(|(x, &y)| *x *= y);
        self
    }

    fn clip(&mut self, min_thresh: T, max_thresh: T) -> &mut Self {
        self.scalarop(|x| x.clip(min_thresh, max_thresh))
    }

    fn dot(&self, y: &[T]) -> T {
        let mut acc = T::zero();
        for (&xi, &yi) in zip(self, y) {
            acc += xi * yi;
        }
        acc
    }

    // dot product of (s + α ds) with (z + α dz), forming neither
    // shifted vector explicitly
    fn dot_shifted(z: &[T], s: &[T], dz: &[T], ds: &[T], α: T) -> T {
        assert_eq!(z.len(), s.len());
        assert_eq!(z.len(), dz.len());
        assert_eq!(s.len(), ds.len());

        let mut acc = T::zero();
        for (&s, &ds, &z, &dz) in izip!(s, ds, z, dz) {
            acc += (s + α * ds) * (z + α * dz);
        }
        acc
    }

    fn dist(&self, y: &Self) -> T {
        let mut acc = T::zero();
        for (&xi, &yi) in zip(self, y) {
            let d = xi - yi;
            acc += d * d;
        }
        T::sqrt(acc)
    }

    fn sum(&self) -> T {
        let mut acc = T::zero();
        for &x in self {
            acc += x;
        }
        acc
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm(&self) -> T {
        T::sqrt(self.sumsq())
    }

    // 2-norm of the elementwise product of self and v
    fn norm_scaled(&self, v: &[T]) -> T {
        assert_eq!(self.len(), v.len());
        let mut acc = T::zero();
        for (&xi, &vi) in zip(self, v) {
            let p = xi * vi;
            acc += p * p;
        }
        T::sqrt(acc)
    }

    // inf-norm, returning NaN if any element is NaN
    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for &x in self {
            let v = x.abs();
            if v.is_nan() {
                return T::nan();
            }
            out = T::max(out, v);
        }
        out
    }

    fn norm_inf_scaled(&self, v: &[T]) -> T {
        assert_eq!(self.len(), v.len());
        let mut out = T::zero();
        for (&xi, &vi) in zip(self, v) {
            out = T::max(out, T::abs(xi * vi));
        }
        out
    }

    fn norm_one(&self) -> T {
        let mut acc = T::zero();
        for &x in self {
            acc += x.abs();
        }
        acc
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        let mut out = T::zero();
        for (&xi, &bi) in zip(self, b) {
            out = T::max(out, T::abs(xi - bi));
        }
        out
    }

    fn minimum(&self) -> T {
        let mut out = T::infinity();
        for &x in self {
            out = T::min(out, x);
        }
        out
    }

    fn maximum(&self) -> T {
        let mut out = -T::infinity();
        for &x in self {
            out = T::max(out, x);
        }
        out
    }

    fn mean(&self) -> T {
        match self.len() {
            0 => T::zero(),
            n => self.sum() / T::from_usize(n).unwrap(),
        }
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|x| x.is_finite())
    }

    // y = a x + b y
    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());
        zip(&mut *self, x).for_each(|(y, &x)| *y = a * x + b * (*y));
        self
    }

    // w = a x + b y
    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        assert_eq!(self.len(), y.len());
        for (w, &x, &y) in izip!(&mut *self, x, y) {
            *w = a * x + b * y;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let x = vec![1., 2., 3., 4.];
        let y = vec![4., 5., 6., 7.];
        assert_eq!(x.dot(&y), 60.);
    }

    #[test]
    fn test_dot_shifted() {
        let z = vec![1., 2., 3.];
        let s = vec![4., 5., 6.];
        let dz = vec![1.0; 3];
        let ds = vec![0.5; 3];
        let α = 0.5;

        // compare against explicit expansion of the shifted product
        let dot1 = <[f64] as VectorMath>::dot_shifted(&z, &s, &dz, &ds, α);
        let dot2 = z.dot(&s) + α * z.dot(&ds) + α * s.dot(&dz) + α * α * dz.dot(&ds);
        assert_eq!(dot1, dot2);
    }

    #[test]
    fn test_norms() {
        let x = vec![-3., 4., 0.];
        assert_eq!(x.norm(), 5.);
        assert_eq!(x.norm_inf(), 4.);
        assert_eq!(x.norm_one(), 7.);
        assert_eq!(x.minimum(), -3.);
        assert_eq!(x.maximum(), 4.);
    }

    #[test]
    fn test_norm_inf_propagates_nan() {
        let x = vec![1., f64::NAN, 2.];
        assert!(x.norm_inf().is_nan());
    }

    #[test]
    fn test_axpby() {
        let mut y = vec![1., 1.];
        let x = vec![2., 3.];
        y.axpby(2., &x, -1.);
        assert_eq!(y, vec![3., 5.]);
    }

    #[test]
    fn test_select_and_scaled_norms() {
        let x = vec![1., 2., 3., 4.];
        let keep = vec![true, false, false, true];
        assert_eq!(x.select(&keep), vec![1., 4.]);

        let v = vec![2., 1., 1., 0.5];
        assert_eq!(x.norm_inf_scaled(&v), 3.);
    }
}
