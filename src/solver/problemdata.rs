#![allow(non_snake_case)]
use super::equilibration::DefaultEquilibrationData;
use super::presolver::Presolver;
use super::DefaultSettings;
use crate::algebra::*;
use crate::solver::cones::SupportedConeT;

// ---------------
// Data type for the standard problem format
// ---------------

/// Internal copy of the user problem data, with presolve
/// reduction and equilibration applied
pub struct DefaultProblemData<T> {
    // the main KKT residuals
    pub P: CscMatrix<T>,
    pub q: Vec<T>,
    pub A: CscMatrix<T>,
    pub b: Vec<T>,
    pub(crate) n: usize,
    pub(crate) m: usize,
    /// scaling terms computed during setup
    pub equilibration: DefaultEquilibrationData<T>,

    // unscaled inf norms of the linear cost and RHS terms.   Keep
    // in scope here because they are needed for infeasibility checks,
    // and dropped (then lazily recovered) when the data is updated
    pub(crate) normq: Option<T>,
    pub(crate) normb: Option<T>,

    pub(crate) presolver: Presolver<T>,
}

impl<T> DefaultProblemData<T>
where
    T: FloatT,
{
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        b: &[T],
        cone_specs: &[SupportedConeT<T>],
        settings: &DefaultSettings<T>,
    ) -> Self {
        let presolver = Presolver::new(A, b, cone_specs, settings);

        let (A_new, mut b_new) = match &presolver.reduce_map {
            Some(map) => (A.select_rows(&map.keep_logical), b.select(&map.keep_logical)),
            None => (A.clone(), b.to_vec()),
        };

        // cap the RHS at the infinity sentinel, so that any kept
        // pseudo-infinite bounds stay finite in the iterates
        let infbound = presolver.infbound.as_T();
        b_new.scalarop(|x| T::min(x, infbound));

        // P is always stored as triu, so that the symmetric view
        // and the KKT assembly can rely on it
        let P_new = P.to_triu();
        let q_new = q.to_vec();

        let n = q_new.len();
        let m = b_new.len();

        let equilibration = DefaultEquilibrationData::<T>::new(n, m);

        let normq = Some(q_new.norm_inf());
        let normb = Some(b_new.norm_inf());

        Self {
            P: P_new,
            q: q_new,
            A: A_new,
            b: b_new,
            n,
            m,
            equilibration,
            normq,
            normb,
            presolver,
        }
    }

    pub(crate) fn clear_normq(&mut self) {
        self.normq = None;
    }

    pub(crate) fn clear_normb(&mut self) {
        self.normb = None;
    }

    // norm of the original (unequilibrated) q, recovered through
    // the stored scalings if the data has been updated
    pub(crate) fn normq(&mut self) -> T {
        let q = &self.q;
        let equil = &self.equilibration;
        *self
            .normq
            .get_or_insert_with(|| q.norm_inf_scaled(&equil.dinv) * T::recip(equil.c))
    }

    pub(crate) fn normb(&mut self) -> T {
        let b = &self.b;
        let equil = &self.equilibration;
        *self
            .normb
            .get_or_insert_with(|| b.norm_inf_scaled(&equil.einv))
    }

    pub(crate) fn is_presolved(&self) -> bool {
        self.presolver.is_reduced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::DefaultSettingsBuilder;

    fn test_settings() -> DefaultSettings<f64> {
        DefaultSettingsBuilder::default().build().unwrap()
    }

    #[test]
    fn test_problem_data_presolve_reduction() {
        let P = CscMatrix::<f64>::zeros(2, 2);
        let q = vec![1.0, 1.0];
        let A = CscMatrix::<f64>::identity(2);
        let b = vec![1.0, 2e20];
        let cones = [SupportedConeT::NonnegativeConeT(2)];

        let data = DefaultProblemData::new(&P, &q, &A, &b, &cones, &test_settings());

        assert_eq!(data.m, 1);
        assert_eq!(data.A.m, 1);
        assert_eq!(data.b, vec![1.0]);
        assert!(data.is_presolved());
        assert!(matches!(
            data.presolver.cone_specs[0],
            SupportedConeT::NonnegativeConeT(1)
        ));
    }

    #[test]
    fn test_problem_data_caps_rhs_when_presolve_disabled() {
        let P = CscMatrix::<f64>::zeros(2, 2);
        let q = vec![1.0, 1.0];
        let A = CscMatrix::<f64>::identity(2);
        let b = vec![1.0, 2e20];
        let cones = [SupportedConeT::NonnegativeConeT(2)];

        let mut settings = test_settings();
        settings.presolve_enable = false;

        let data = DefaultProblemData::new(&P, &q, &A, &b, &cones, &settings);

        assert_eq!(data.m, 2);
        assert!(!data.is_presolved());
        // the pseudo-infinite bound is capped at the infinity sentinel
        assert!(data.b[1].is_finite() && data.b[1] < 2e20);
    }

    #[test]
    fn test_problem_data_stores_triu() {
        // dense symmetric 2x2
        let P = CscMatrix::new(
            2,
            2,
            vec![0, 2, 4],
            vec![0, 1, 0, 1],
            vec![4.0, 1.0, 1.0, 2.0],
        );
        let q = vec![0.0, 0.0];
        let A = CscMatrix::<f64>::identity(2);
        let b = vec![1.0, 1.0];
        let cones = [SupportedConeT::NonnegativeConeT(2)];

        let data = DefaultProblemData::new(&P, &q, &A, &b, &cones, &test_settings());
        assert!(data.P.is_triu());
        assert_eq!(data.P.nnz(), 3);
    }
}
