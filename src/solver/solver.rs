use super::callbacks::SolverCallbacks;
use super::info::DefaultInfo;
use super::kkt::DefaultKKTSystem;
use super::residuals::DefaultResiduals;
use super::solution::DefaultSolution;
use super::variables::DefaultVariables;
use super::{DefaultProblemData, DefaultSettings, SolverError, SolverStatus, StepDirection};
use crate::algebra::*;
use crate::ffi::DefaultInfoFFI;
use crate::io::ConfigurablePrintTarget;
use crate::solver::cones::{CompositeCone, Cone, SupportedConeT};
use std::time::Instant;

// ---------------------------------
// top level solver container type
// ---------------------------------

/// Solver for problems in standard conic form:
///
/// minimize        ½xᵀPx + qᵀx
/// subject to      Ax + s = b
///                 s ∈ K
///
/// with `K` a composition of the [supported cones](SupportedConeT).

pub struct DefaultSolver<T = f64>
where
    T: FloatT,
{
    pub data: DefaultProblemData<T>,
    pub variables: DefaultVariables<T>,
    pub residuals: DefaultResiduals<T>,
    pub(crate) kktsystem: DefaultKKTSystem<T>,
    pub cones: CompositeCone<T>,
    pub step_lhs: DefaultVariables<T>,
    pub step_rhs: DefaultVariables<T>,
    pub prev_vars: DefaultVariables<T>,
    pub info: DefaultInfo<T>,
    pub solution: DefaultSolution<T>,
    pub settings: DefaultSettings<T>,
    pub(crate) callbacks: SolverCallbacks<DefaultInfo<T>, DefaultInfoFFI<T>>,

    // set when a pattern-changing matrix replacement requires the
    // KKT system to be reassembled before the next solve
    pub(crate) kkt_is_stale: bool,
}

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    /// Create a solver session for the problem defined by
    /// `(P,q,A,b)` and the cone specification `cone_specs`.
    ///
    /// Problem data is copied and equilibrated internally, so the
    /// caller's data is not modified and need not be kept alive.
    pub fn new(
        P: &CscMatrix<T>,
        q: &[T],
        A: &CscMatrix<T>,
        b: &[T],
        cone_specs: &[SupportedConeT<T>],
        settings: DefaultSettings<T>,
    ) -> Result<Self, SolverError> {
        settings.validate()?;
        _check_dimensions(P, q, A, b, cone_specs)?;
        P.check_format()?;
        A.check_format()?;

        let mut data = DefaultProblemData::new(P, q, A, b, cone_specs, &settings);

        // the presolver may have reduced the cone specification,
        // so build the cones from its (possibly) modified copy
        let cones = CompositeCone::new(&data.presolver.cone_specs);

        let variables = DefaultVariables::new(data.n, data.m);
        let residuals = DefaultResiduals::new(data.n, data.m);

        // equilibrate problem data immediately on setup.
        // this prevents multiple equilibrations if solve
        // is called more than once.
        data.equilibrate(&cones, &settings);

        let kktsystem = DefaultKKTSystem::new(&data, &cones, &settings)?;

        let mut info = DefaultInfo::new();
        info.linsolver = kktsystem.linear_solver_info();

        // work variables for assembling step direction LHS/RHS
        let step_rhs = DefaultVariables::new(data.n, data.m);
        let step_lhs = DefaultVariables::new(data.n, data.m);
        let prev_vars = DefaultVariables::new(data.n, data.m);

        // user facing results go here.  Dimensioned to the
        // original (unreduced) constraint count
        let solution = DefaultSolution::new(data.n, data.presolver.mfull);

        Ok(Self {
            data,
            variables,
            residuals,
            kktsystem,
            cones,
            step_lhs,
            step_rhs,
            prev_vars,
            info,
            solution,
            settings,
            callbacks: SolverCallbacks::default(),
            kkt_is_stale: false,
        })
    }

    /// Reference to the most recent solution.  Valid until the
    /// next call to [`solve`](DefaultSolver::solve).
    pub fn solution(&self) -> &DefaultSolution<T> {
        &self.solution
    }

    /// Reference to the most recent solver progress information.
    pub fn info(&self) -> &DefaultInfo<T> {
        &self.info
    }

    /// Run the solver.   Results are stored in the [`solution`](DefaultSolver::solution)
    /// and [`info`](DefaultSolver::info) fields.
    pub fn solve(&mut self) {
        // various initializations
        let mut iter: u32 = 0;
        let mut σ = T::one();
        let mut α = T::zero();
        let mut μ;

        let start_time = Instant::now();

        // solver release info, solver config,
        // problem dimensions, cone types etc
        self.info.print_banner(&self.settings).ok();
        self.info
            .print_configuration(&self.settings, &self.data, &self.cones)
            .ok();
        self.info.print_status_header(&self.settings).ok();

        self.info.reset();

        // reassemble the KKT system if a matrix replacement
        // changed the sparsity pattern
        if self.kkt_is_stale && !self.rebuild_kkt() {
            self.info.status = SolverStatus::NumericalError;
            self.solution.status = SolverStatus::NumericalError;
            self.info.print_footer(&self.settings).ok();
            return;
        }

        // initialize variables to some reasonable starting point
        self.default_start();

        // ----------
        // main loop
        // ----------

        loop {
            // update the residuals
            // --------------
            self.residuals.update(&self.variables, &self.data);

            // calculate duality gap (scaled)
            // --------------
            μ = self.variables.calc_mu(&self.residuals, &self.cones);

            // record scalar values from most recent iteration.
            // This captures μ at iteration zero.
            self.info.save_scalars(μ, α, σ, iter);

            // convergence check and printing
            // --------------
            self.info
                .update(&mut self.data, &self.variables, &self.residuals, &start_time);

            self.info.print_status(&self.settings).ok();

            let mut isdone = self
                .info
                .check_termination(&self.residuals, &self.settings, iter);

            // poll any user termination callback
            if !isdone && self.callbacks.check_termination(&self.info) {
                self.info.status = SolverStatus::CallbackTerminated;
                isdone = true;
            }

            if isdone {
                if self.info.status == SolverStatus::InsufficientProgress {
                    // recover the previous iterate, since a lack of progress
                    // often involves actual degradation of the results
                    self.info
                        .reset_to_prev_iterate(&mut self.variables, &self.prev_vars);
                }
                break;
            }

            // update the scalings
            // --------------
            if !self.variables.scale_cones(&mut self.cones, μ) {
                self.info.status = SolverStatus::NumericalError;
                break;
            }

            // increment counter here because we only count
            // iterations that produce a KKT update
            iter += 1;

            // Update the KKT system and the constant parts of its solution.
            // Keep track of the success of each step that calls KKT
            // --------------
            let mut is_kkt_solve_success =
                self.kktsystem.update(&self.data, &self.cones, &self.settings);

            // calculate the affine step
            // --------------
            self.step_rhs
                .affine_step_rhs(&self.residuals, &self.variables, &self.cones);

            is_kkt_solve_success = is_kkt_solve_success
                && self.kktsystem.solve(
                    &mut self.step_lhs,
                    &self.step_rhs,
                    &self.data,
                    &self.variables,
                    &mut self.cones,
                    StepDirection::Affine,
                    &self.settings,
                );

            // combined step only on affine step success
            if is_kkt_solve_success {
                // calculate step length and centering parameter
                // --------------
                α = self.get_step_length(StepDirection::Affine);
                σ = _centering_parameter(α);

                // make a reduced Mehrotra correction in the first iteration
                // to accommodate badly centred starting points
                let m = if iter > 1 { T::one() } else { α };

                // calculate the combined step and length
                // --------------
                self.step_rhs.combined_step_rhs(
                    &self.residuals,
                    &self.variables,
                    &mut self.cones,
                    &mut self.step_lhs,
                    σ,
                    μ,
                    m,
                );

                is_kkt_solve_success = self.kktsystem.solve(
                    &mut self.step_lhs,
                    &self.step_rhs,
                    &self.data,
                    &self.variables,
                    &mut self.cones,
                    StepDirection::Combined,
                    &self.settings,
                );
            }

            if !is_kkt_solve_success {
                self.info.status = SolverStatus::NumericalError;
                α = T::zero();
                break;
            }

            // compute final step length and update the current iterate
            // --------------
            α = self.get_step_length(StepDirection::Combined);

            if α <= T::max(T::zero(), self.settings.min_terminate_step_length) {
                self.info.status = SolverStatus::InsufficientProgress;
                α = T::zero();
                break;
            }

            // Copy previous iterate in case the next one is a dud
            self.info
                .save_prev_iterate(&self.variables, &mut self.prev_vars);

            self.variables.add_step(&self.step_lhs, α);

            // keep the homogenization variables at a sensible magnitude
            self.variables.rescale();
        } //end loop
          // ----------
          // ----------

        // Check we if actually took a final step.  If not, we need
        // to recapture the scalars and print one last line
        if α == T::zero() {
            self.info.save_scalars(μ, α, σ, iter);
            self.info.print_status(&self.settings).ok();
        }

        // check for "almost" convergence and then store
        // the final solution, timing etc
        self.info.finalize(&self.residuals, &self.settings, &start_time);
        self.solution
            .post_process(&self.data, &mut self.variables, &self.info);
        self.solution.finalize(&self.info);

        self.info.print_footer(&self.settings).ok();
    }

    fn rebuild_kkt(&mut self) -> bool {
        match DefaultKKTSystem::new(&self.data, &self.cones, &self.settings) {
            Ok(kktsystem) => {
                self.kktsystem = kktsystem;
                self.info.linsolver = self.kktsystem.linear_solver_info();
                self.kkt_is_stale = false;
                true
            }
            Err(_) => false,
        }
    }

    fn default_start(&mut self) {
        if self.cones.is_symmetric() {
            // set all scalings to identity (or zero for the zero cone)
            self.cones.set_identity_scaling();
            // Refactor
            let _ = self.kktsystem.update(&self.data, &self.cones, &self.settings);
            // solve for primal/dual initial points via KKT
            let _ = self
                .kktsystem
                .solve_initial_point(&mut self.variables, &self.data, &self.settings);
            // fix up (z,s) so that they are in the cone
            self.variables.symmetric_initialization(&mut self.cones);
        } else {
            // Assigns unit (z,s) and zeros the primal variables
            self.variables.unit_initialization(&self.cones);
        }
    }

    fn get_step_length(&mut self, step_direction: StepDirection) -> T {
        // step length to stay within the cones
        let mut α = self.variables.calc_step_length(
            &self.step_lhs,
            &mut self.cones,
            &self.settings,
            step_direction,
        );

        // additional barrier function limits for asymmetric cones
        if !self.cones.is_symmetric() && step_direction == StepDirection::Combined {
            α = self.backtrack_step_to_barrier(α);
        }
        α
    }

    fn backtrack_step_to_barrier(&mut self, αinit: T) -> T {
        let step = self.settings.linesearch_backtrack_step;
        let mut α = αinit;

        for _ in 0..50 {
            let barrier = self.variables.barrier(&self.step_lhs, α, &mut self.cones);
            if barrier < T::one() {
                return α;
            }
            α = step * α;
        }
        α
    }
}

fn _centering_parameter<T: FloatT>(α: T) -> T {
    T::powi(T::one() - α, 3)
}

fn _check_dimensions<T: FloatT>(
    P: &CscMatrix<T>,
    q: &[T],
    A: &CscMatrix<T>,
    b: &[T],
    cone_specs: &[SupportedConeT<T>],
) -> Result<(), SolverError> {
    if P.nrows() != P.ncols() {
        return Err(SolverError::PNotSquare);
    }
    if P.ncols() != q.len() || A.ncols() != P.ncols() || A.nrows() != b.len() {
        return Err(SolverError::IncompatibleDimension);
    }

    let conedim: usize = cone_specs.iter().map(|cone| cone.nvars()).sum();
    if conedim != b.len() {
        return Err(SolverError::ConeDimensionMismatch);
    }
    Ok(())
}

impl<T> ConfigurablePrintTarget for DefaultSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}
