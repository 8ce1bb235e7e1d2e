use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
    /// A field that can not be changed once a solver has been initialized
    #[error("Field \"{0}\" can not be modified after setup")]
    ImmutableSetting(&'static str),
}

/// Solver settings.
///
/// Every field carries a default, so settings are normally assembled
/// through the generated builder with only the fields of interest
/// overridden:
///
/// ```no_run
/// use conix::solver::{DefaultSettings, DefaultSettingsBuilder};
/// let settings: DefaultSettings<f64> = DefaultSettingsBuilder::default()
///     .equilibrate_enable(true)
///     .max_iter(50)
///     .build()
///     .unwrap();
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    // -- main iteration controls

    ///iteration limit
    #[builder(default = "200")]
    pub max_iter: u32,

    ///wall clock time limit for solve, in seconds
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///print progress to the configured output target
    #[builder(default = "true")]
    pub verbose: bool,

    ///largest fraction of the distance to the cone
    ///boundary taken in a single step
    #[builder(default = "(0.99).as_T()")]
    pub max_step_fraction: T,

    // -- full accuracy stopping tolerances

    ///absolute duality gap tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_gap_abs: T,

    ///relative duality gap tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_gap_rel: T,

    ///primal and dual feasibility tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_feas: T,

    ///absolute infeasibility certificate tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_infeas_abs: T,

    ///relative infeasibility certificate tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_infeas_rel: T,

    ///κ/τ tolerance
    #[builder(default = "(1e-6).as_T()")]
    pub tol_ktratio: T,

    // -- relaxed tolerances, applied when the solver stalls before
    // -- reaching full accuracy.   NB: reduced_tol_infeas_abs is
    // -- *smaller* when relaxed, since it measures how far into the
    // -- interior of an inequality the iterate must sit; a smaller
    // -- value means less margin is required.

    ///relaxed absolute duality gap tolerance
    #[builder(default = "(5e-5).as_T()")]
    pub reduced_tol_gap_abs: T,

    ///relaxed relative duality gap tolerance
    #[builder(default = "(5e-5).as_T()")]
    pub reduced_tol_gap_rel: T,

    ///relaxed primal and dual feasibility tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub reduced_tol_feas: T,

    ///relaxed absolute infeasibility certificate tolerance
    #[builder(default = "(5e-12).as_T()")]
    pub reduced_tol_infeas_abs: T,

    ///relaxed relative infeasibility certificate tolerance
    #[builder(default = "(5e-5).as_T()")]
    pub reduced_tol_infeas_rel: T,

    ///relaxed κ/τ tolerance
    #[builder(default = "(1e-4).as_T()")]
    pub reduced_tol_ktratio: T,

    // -- data equilibration

    ///enable data equilibration pre-scaling
    #[builder(default = "true")]
    pub equilibrate_enable: bool,

    ///maximum equilibration scaling iterations
    #[builder(default = "10")]
    pub equilibrate_max_iter: u32,

    ///smallest equilibration scaling allowed
    #[builder(default = "(1e-4).as_T()")]
    pub equilibrate_min_scaling: T,

    ///largest equilibration scaling allowed
    #[builder(default = "(1e+4).as_T()")]
    pub equilibrate_max_scaling: T,

    // -- step size controls

    ///backtracking factor for the asymmetric cone line search
    #[builder(default = "(0.8).as_T()")]
    pub linesearch_backtrack_step: T,

    ///smallest step size allowed for asymmetric cones
    #[builder(default = "(1e-1).as_T()")]
    pub min_switch_step_length: T,

    ///step sizes below this value terminate the solver
    ///with an insufficient progress status
    #[builder(default = "(1e-4).as_T()")]
    pub min_terminate_step_length: T,

    ///maximum solver threads for multithreaded KKT solvers
    ///choosing 0 lets the solver choose for itself
    #[builder(default = "0")]
    pub max_threads: u32,

    // -- linear solver settings

    ///use a direct linear solver method (required true)
    #[builder(default = "true")]
    pub direct_kkt_solver: bool,

    ///direct linear solver method ("auto" or "qdldl")
    #[builder(default = r#""auto".to_string()"#)]
    pub direct_solve_method: String,

    ///enable KKT static regularization
    #[builder(default = "true")]
    pub static_regularization_enable: bool,

    ///KKT static regularization parameter
    #[builder(default = "(1e-8).as_T()")]
    pub static_regularization_constant: T,

    ///additional regularization parameter w.r.t. the maximum abs diagonal term
    #[builder(default = "T::epsilon()*T::epsilon()")]
    pub static_regularization_proportional: T,

    ///enable KKT dynamic regularization
    #[builder(default = "true")]
    pub dynamic_regularization_enable: bool,

    ///KKT dynamic regularization threshold
    #[builder(default = "(1e-13).as_T()")]
    pub dynamic_regularization_eps: T,

    ///KKT dynamic regularization shift
    #[builder(default = "(2e-7).as_T()")]
    pub dynamic_regularization_delta: T,

    ///KKT direct solve with iterative refinement
    #[builder(default = "true")]
    pub iterative_refinement_enable: bool,

    ///iterative refinement relative tolerance
    #[builder(default = "(1e-13).as_T()")]
    pub iterative_refinement_reltol: T,

    ///iterative refinement absolute tolerance
    #[builder(default = "(1e-12).as_T()")]
    pub iterative_refinement_abstol: T,

    ///iterative refinement maximum iterations
    #[builder(default = "10")]
    pub iterative_refinement_max_iter: u32,

    ///iterative refinement stalling tolerance
    #[builder(default = "(5.0).as_T()")]
    pub iterative_refinement_stop_ratio: T,

    // -- preprocessing

    ///enable presolve constraint reduction
    #[builder(default = "true")]
    pub presolve_enable: bool,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        // the builder defaults are all valid, so unwrap is safe
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

macro_rules! check_immutable_setting {
    ($self:expr, $prev:expr, $field:ident) => {
        if $self.$field != $prev.$field {
            return Err(SettingsError::ImmutableSetting(stringify!($field)));
        }
    };
}

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.  This only ensures that fields
    /// specified by strings contain valid options.  It does not sanity
    /// check numerical values
    pub fn validate(&self) -> Result<(), SettingsError> {
        // indirect solvers are not available at all
        if !self.direct_kkt_solver {
            return Err(SettingsError::BadFieldValue("direct_kkt_solver"));
        }

        //check that the choice of LDL solver (string) is valid
        validate_direct_solve_method(&self.direct_solve_method)?;

        Ok(())
    }

    /// Check that a settings object is valid as an updated collection
    /// of settings for a solver that has already been initialized.  This
    /// rejects changes to parameters that are only applicable during
    /// solver initialization.  Calls [`validate`](DefaultSettings::validate)
    /// internally to check that values are also legal.
    pub fn validate_as_update(&self, prev: &Self) -> Result<(), SettingsError> {
        self.validate()?;

        check_immutable_setting!(self, prev, equilibrate_enable);
        check_immutable_setting!(self, prev, equilibrate_max_iter);
        check_immutable_setting!(self, prev, equilibrate_min_scaling);
        check_immutable_setting!(self, prev, equilibrate_max_scaling);
        check_immutable_setting!(self, prev, max_threads);
        check_immutable_setting!(self, prev, direct_kkt_solver);
        check_immutable_setting!(self, prev, direct_solve_method);
        check_immutable_setting!(self, prev, presolve_enable);

        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    /// check that the specified direct_solve_method is valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref direct_solve_method) = self.direct_solve_method {
            validate_direct_solve_method(direct_solve_method)?;
        }
        Ok(())
    }
}

fn validate_direct_solve_method(direct_solve_method: &str) -> Result<(), SettingsError> {
    match direct_solve_method {
        "auto" | "qdldl" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("direct_solve_method")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_are_valid() {
        let settings = DefaultSettings::<f64>::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_threads, 0);
    }

    #[test]
    fn test_settings_rejects_bad_solve_method() {
        // rejected at build time
        assert!(DefaultSettingsBuilder::<f64>::default()
            .direct_solve_method("foo".to_string())
            .build()
            .is_err());

        // and by direct validation of a hand assembled object
        let settings = DefaultSettings::<f64> {
            direct_solve_method: "foo".to_string(),
            ..DefaultSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_update_guards() {
        let oldsettings = DefaultSettings::<f64>::default();

        // setup-only fields can not be changed between solves
        let newsettings = DefaultSettings::<f64> {
            presolve_enable: !oldsettings.presolve_enable,
            ..DefaultSettings::default()
        };
        assert!(newsettings.validate_as_update(&oldsettings).is_err());

        let newsettings = DefaultSettings::<f64> {
            max_threads: 4,
            ..DefaultSettings::default()
        };
        assert!(newsettings.validate_as_update(&oldsettings).is_err());

        // iteration controls are fair game
        let newsettings = DefaultSettings::<f64> {
            max_iter: oldsettings.max_iter + 1,
            ..DefaultSettings::default()
        };
        assert!(newsettings.validate_as_update(&oldsettings).is_ok());
    }
}
