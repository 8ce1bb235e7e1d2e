#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::cones::SupportedConeT;
use crate::solver::solution::DefaultSolution;
use crate::solver::variables::DefaultVariables;
use crate::solver::{get_infinity, DefaultSettings};

pub(crate) struct PresolverRowReductionIndex {
    // vector of length = original RHS.   Entries are false
    // for those rows that should be eliminated before solve
    pub keep_logical: Vec<bool>,

    // vector of length = reduced RHS, taking values
    // that map reduced b back to their original index
    pub keep_index: Vec<usize>,
}

/// Presolver data for the standard problem format
pub struct Presolver<T> {
    // possibly reduced internal copy of user cone specification
    pub(crate) cone_specs: Vec<SupportedConeT<T>>,

    // record of reduced constraints for NN cones with inf bounds
    pub(crate) reduce_map: Option<PresolverRowReductionIndex>,

    // size of original and reduced RHS, respectively
    pub(crate) mfull: usize,
    pub(crate) mreduced: usize,

    // inf bound that was taken from the module level
    // and should be applied in the presolve
    pub(crate) infbound: f64,
}

impl<T> Presolver<T>
where
    T: FloatT,
{
    pub fn new(
        _A: &CscMatrix<T>,
        b: &[T],
        cone_specs: &[SupportedConeT<T>],
        settings: &DefaultSettings<T>,
    ) -> Self {
        let infbound = get_infinity();

        // make a copy of cone_specs to protect from user interference
        // after setup
        let mut cone_specs = cone_specs.to_vec();
        let mfull = b.len();

        let (reduce_map, mreduced) = {
            if settings.presolve_enable {
                reduce_cones(&mut cone_specs, b, infbound.as_T())
            } else {
                (None, mfull)
            }
        };

        Self {
            cone_specs,
            reduce_map,
            mfull,
            mreduced,
            infbound,
        }
    }

    pub(crate) fn is_reduced(&self) -> bool {
        self.reduce_map.is_some()
    }

    pub(crate) fn count_reduced(&self) -> usize {
        self.mfull - self.mreduced
    }

    pub(crate) fn reverse_presolve(
        &self,
        solution: &mut DefaultSolution<T>,
        variables: &DefaultVariables<T>,
    ) {
        solution.x.copy_from(&variables.x);

        // only called when a reduction is active
        let map = match self.reduce_map.as_ref() {
            Some(map) => map,
            None => return,
        };

        for (&zi, (&si, &idx)) in variables
            .z
            .iter()
            .zip(variables.s.iter().zip(map.keep_index.iter()))
        {
            solution.z[idx] = zi;
            solution.s[idx] = si;
        }

        // eliminated constraints get a zero multiplier and a
        // slack at the (pseudo) infinite bound
        let infbound = self.infbound.as_T();
        for (i, &keep) in map.keep_logical.iter().enumerate() {
            if !keep {
                solution.z[i] = T::zero();
                solution.s[i] = infbound;
            }
        }
    }
}

fn reduce_cones<T: FloatT>(
    cone_specs: &mut [SupportedConeT<T>],
    b: &[T],
    infbound: T,
) -> (Option<PresolverRowReductionIndex>, usize) {
    let mut keep_logical = vec![true; b.len()];
    let mut mreduced = b.len();

    // we loop through b and remove any entries that are both infinite
    // and in a nonnegative cone

    // treat bounds within a small tolerance of the infinity sentinel
    // as infinite as well
    let infbound = infbound * (T::one() - T::epsilon() * (10.).as_T());

    let mut idx = 0; // index into the b vector

    for cone in cone_specs.iter_mut() {
        let numel_cone = cone.nvars();

        // only the nonnegative cones are reduced
        if matches!(cone, SupportedConeT::NonnegativeConeT(_)) {
            let mut num_finite = 0;
            for (i, bi) in b[idx..(idx + numel_cone)].iter().enumerate() {
                if *bi < infbound {
                    num_finite += 1;
                } else {
                    keep_logical[idx + i] = false;
                    mreduced -= 1;
                }
            }
            // shrink the cone to its finite part
            if num_finite != numel_cone {
                *cone = SupportedConeT::NonnegativeConeT(num_finite);
            }
        }
        idx += numel_cone;
    }

    let outmap = {
        if mreduced < b.len() {
            let keep_index = findall(&keep_logical);
            Some(PresolverRowReductionIndex {
                keep_logical,
                keep_index,
            })
        } else {
            None
        }
    };

    (outmap, mreduced)
}

// indices of the "true" entries in a logical vector
fn findall(keep_logical: &[bool]) -> Vec<usize> {
    keep_logical
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_cones_drops_infinite_rows() {
        let infbound = 1e20;
        let mut cone_specs = vec![
            SupportedConeT::ZeroConeT(1),
            SupportedConeT::NonnegativeConeT(3),
        ];
        let b = vec![1.0, 2.0, 2e20, 3.0];

        let (map, mreduced) = reduce_cones(&mut cone_specs, &b, infbound);

        assert_eq!(mreduced, 3);
        assert!(matches!(
            cone_specs[1],
            SupportedConeT::NonnegativeConeT(2)
        ));
        let map = map.unwrap();
        assert_eq!(map.keep_logical, vec![true, true, false, true]);
        assert_eq!(map.keep_index, vec![0, 1, 3]);
    }

    #[test]
    fn test_reduce_cones_no_reduction() {
        let infbound = 1e20;
        let mut cone_specs = vec![SupportedConeT::NonnegativeConeT(2)];
        let b = vec![1.0, 2.0];

        let (map, mreduced) = reduce_cones(&mut cone_specs, &b, infbound);
        assert_eq!(mreduced, 2);
        assert!(map.is_none());
    }
}
