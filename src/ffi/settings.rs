#![allow(clippy::upper_case_acronyms)]

use crate::algebra::FloatT;
use crate::solver::DefaultSettings;
use paste::paste;

/// FFI interface for direct linear solver methods
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug, Clone)]
pub enum DirectSolveMethodsFFI {
    AUTO = 0,
    QDLDL = 1,
}

impl From<DirectSolveMethodsFFI> for String {
    fn from(value: DirectSolveMethodsFFI) -> Self {
        match value {
            DirectSolveMethodsFFI::AUTO => String::from("auto"),
            DirectSolveMethodsFFI::QDLDL => String::from("qdldl"),
        }
    }
}

impl From<String> for DirectSolveMethodsFFI {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auto" => DirectSolveMethodsFFI::AUTO,
            "qdldl" => DirectSolveMethodsFFI::QDLDL,
            _ => DirectSolveMethodsFFI::AUTO,
        }
    }
}

/// FFI interface for [`DefaultSettings`](crate::solver::DefaultSettings)
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug, Clone)]
pub struct DefaultSettingsFFI<T: FloatT> {
    // Main algorithm settings
    pub max_iter: u32,
    pub time_limit: f64,
    pub verbose: bool,
    pub max_step_fraction: T,

    // Full accuracy settings
    pub tol_gap_abs: T,
    pub tol_gap_rel: T,
    pub tol_feas: T,
    pub tol_infeas_abs: T,
    pub tol_infeas_rel: T,
    pub tol_ktratio: T,

    // Reduced accuracy settings
    pub reduced_tol_gap_abs: T,
    pub reduced_tol_gap_rel: T,
    pub reduced_tol_feas: T,
    pub reduced_tol_infeas_abs: T,
    pub reduced_tol_infeas_rel: T,
    pub reduced_tol_ktratio: T,

    // data equilibration settings
    pub equilibrate_enable: bool,
    pub equilibrate_max_iter: u32,
    pub equilibrate_min_scaling: T,
    pub equilibrate_max_scaling: T,

    // Step size settings
    pub linesearch_backtrack_step: T,
    pub min_switch_step_length: T,
    pub min_terminate_step_length: T,
    pub max_threads: u32,

    // Linear solver settings
    pub direct_kkt_solver: bool,
    pub direct_solve_method: DirectSolveMethodsFFI,

    // static regularization parameters
    pub static_regularization_enable: bool,
    pub static_regularization_constant: T,
    pub static_regularization_proportional: T,

    // dynamic regularization parameters
    pub dynamic_regularization_enable: bool,
    pub dynamic_regularization_eps: T,
    pub dynamic_regularization_delta: T,

    // iterative refinement (for direct solves)
    pub iterative_refinement_enable: bool,
    pub iterative_refinement_reltol: T,
    pub iterative_refinement_abstol: T,
    pub iterative_refinement_max_iter: u32,
    pub iterative_refinement_stop_ratio: T,

    // preprocessing
    pub presolve_enable: bool,
}

// implement From in both directions, since we need to both send
// and receive settings over the FFI interface

macro_rules! impl_from {
    ($A:ident, $B:ident) => {
        impl<T> From<$A<T>> for $B<T>
        where
            T: FloatT,
        {
            fn from(settings: $A<T>) -> Self {
                Self {
                    max_iter: settings.max_iter,
                    time_limit: settings.time_limit,
                    verbose: settings.verbose,
                    max_step_fraction: settings.max_step_fraction,
                    tol_gap_abs: settings.tol_gap_abs,
                    tol_gap_rel: settings.tol_gap_rel,
                    tol_feas: settings.tol_feas,
                    tol_infeas_abs: settings.tol_infeas_abs,
                    tol_infeas_rel: settings.tol_infeas_rel,
                    tol_ktratio: settings.tol_ktratio,
                    reduced_tol_gap_abs: settings.reduced_tol_gap_abs,
                    reduced_tol_gap_rel: settings.reduced_tol_gap_rel,
                    reduced_tol_feas: settings.reduced_tol_feas,
                    reduced_tol_infeas_abs: settings.reduced_tol_infeas_abs,
                    reduced_tol_infeas_rel: settings.reduced_tol_infeas_rel,
                    reduced_tol_ktratio: settings.reduced_tol_ktratio,
                    equilibrate_enable: settings.equilibrate_enable,
                    equilibrate_max_iter: settings.equilibrate_max_iter,
                    equilibrate_min_scaling: settings.equilibrate_min_scaling,
                    equilibrate_max_scaling: settings.equilibrate_max_scaling,
                    linesearch_backtrack_step: settings.linesearch_backtrack_step,
                    min_switch_step_length: settings.min_switch_step_length,
                    min_terminate_step_length: settings.min_terminate_step_length,
                    max_threads: settings.max_threads,
                    direct_kkt_solver: settings.direct_kkt_solver,
                    direct_solve_method: settings.direct_solve_method.into(),
                    static_regularization_enable: settings.static_regularization_enable,
                    static_regularization_constant: settings.static_regularization_constant,
                    static_regularization_proportional: settings.static_regularization_proportional,
                    dynamic_regularization_enable: settings.dynamic_regularization_enable,
                    dynamic_regularization_eps: settings.dynamic_regularization_eps,
                    dynamic_regularization_delta: settings.dynamic_regularization_delta,
                    iterative_refinement_enable: settings.iterative_refinement_enable,
                    iterative_refinement_reltol: settings.iterative_refinement_reltol,
                    iterative_refinement_abstol: settings.iterative_refinement_abstol,
                    iterative_refinement_max_iter: settings.iterative_refinement_max_iter,
                    iterative_refinement_stop_ratio: settings.iterative_refinement_stop_ratio,
                    presolve_enable: settings.presolve_enable,
                }
            }
        }
    };
}

// implement From in both directions
// DefaultSettingsFFI -> DefaultSettings
impl_from!(DefaultSettingsFFI, DefaultSettings);
impl_from!(DefaultSettings, DefaultSettingsFFI);

macro_rules! _make_conix_DefaultSettings_default {
    ($TYPE:ty) => {
        paste! {
            #[no_mangle]
            pub extern "C" fn [<conix_DefaultSettings_ $TYPE _default>]() -> DefaultSettingsFFI<$TYPE> {
                DefaultSettings::<$TYPE>::default().into()
            }
        }
    };
}

_make_conix_DefaultSettings_default!(f64);
_make_conix_DefaultSettings_default!(f32);

#[test]
fn test_settings_ffi() {
    let settings = DefaultSettings::<f64> {
        max_iter: 123,
        ..Default::default()
    };
    let settings_ffi: DefaultSettingsFFI<f64> = settings.clone().into();
    assert_eq!(settings.max_iter, settings_ffi.max_iter);

    // round trip restores the solve method string
    let settings_back: DefaultSettings<f64> = settings_ffi.into();
    assert_eq!(settings, settings_back);
}
