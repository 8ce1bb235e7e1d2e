use crate::algebra::FloatT;
use crate::solver as lib;

/// C-compatible description of a conic constraint.
///
/// This mirrors [`SupportedConeT`](crate::solver::SupportedConeT), with
/// the generalized power cone carrying a borrowed pointer to its array
/// of powers rather than an owned vector.
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug)]
pub enum ConixSupportedConeT<T> {
    /// The zero cone (used for equality constraints).
    ///
    /// The parameter indicates the cone's dimension.
    ZeroConeT(usize),
    /// The nonnegative orthant.
    ///
    /// The parameter indicates the cone's dimension.
    NonnegativeConeT(usize),
    /// The second order cone.
    ///
    /// The parameter indicates the cone's dimension.
    SecondOrderConeT(usize),
    /// The exponential cone in R³.
    ///
    /// This cone takes no parameters.
    ExponentialConeT(),
    /// The power cone in R³.
    ///
    /// The parameter indicates the power.
    PowerConeT(T),
    /// The generalized power cone.
    ///
    /// First parameter is a pointer to the array of powers, second is
    /// its length, third is the dimension of the trailing variable
    /// block.
    GenPowerConeT(*const T, usize, usize),
}

/// Convert a slice of C cone descriptions to a Vec of Rust ones
pub(crate) fn convert_from_C_cones<T: FloatT>(
    c_cones: &[ConixSupportedConeT<T>],
) -> Vec<lib::SupportedConeT<T>> {
    c_cones.iter().map(convert_from_C_cone).collect()
}

#[allow(non_snake_case)]
fn convert_from_C_cone<T: FloatT>(cone: &ConixSupportedConeT<T>) -> lib::SupportedConeT<T> {
    match cone {
        ConixSupportedConeT::ZeroConeT(dim) => lib::SupportedConeT::ZeroConeT(*dim),
        ConixSupportedConeT::NonnegativeConeT(dim) => lib::SupportedConeT::NonnegativeConeT(*dim),
        ConixSupportedConeT::SecondOrderConeT(dim) => lib::SupportedConeT::SecondOrderConeT(*dim),
        ConixSupportedConeT::ExponentialConeT() => lib::SupportedConeT::ExponentialConeT(),
        ConixSupportedConeT::PowerConeT(pow) => lib::SupportedConeT::PowerConeT(*pow),
        ConixSupportedConeT::GenPowerConeT(ptr_alpha, dim1, dim2) => {
            let alpha = unsafe { std::slice::from_raw_parts(*ptr_alpha, *dim1) };
            lib::SupportedConeT::GenPowerConeT(alpha.to_vec(), *dim2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_cone_conversion() {
        let alpha = [0.3, 0.7];
        let c_cones = [
            ConixSupportedConeT::<f64>::ZeroConeT(2),
            ConixSupportedConeT::<f64>::SecondOrderConeT(3),
            ConixSupportedConeT::<f64>::PowerConeT(0.5),
            ConixSupportedConeT::<f64>::GenPowerConeT(alpha.as_ptr(), 2, 1),
        ];

        let cones = convert_from_C_cones(&c_cones);
        assert_eq!(cones.len(), 4);
        assert_eq!(cones[0], lib::SupportedConeT::ZeroConeT(2));
        assert_eq!(cones[1], lib::SupportedConeT::SecondOrderConeT(3));
        assert_eq!(cones[2], lib::SupportedConeT::PowerConeT(0.5));
        assert_eq!(
            cones[3],
            lib::SupportedConeT::GenPowerConeT(vec![0.3, 0.7], 1)
        );
    }
}
