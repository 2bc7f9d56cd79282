//! Gauss–Newton / Levenberg–Marquardt optimizer for least-squares costs.

use nalgebra::{linalg::Cholesky, DMatrix, DVector};

use super::trait_::ObjectiveFunction;
use super::{IterationRecord, StopCondition};
use crate::error::{RegistrationError, Result};
use crate::progress::{IterationObserver, IterationReport};

/// Floor applied to the LM damping after accepted steps.
const DAMPING_FLOOR: f64 = 1e-10;
/// Ceiling applied to the LM damping after rejected steps.
const DAMPING_CEILING: f64 = 1e6;
/// Armijo sufficient-decrease constant.
const ARMIJO_C: f64 = 1e-4;

/// Result of one optimizer run.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Why the run ended.
    pub stop_condition: StopCondition,
    /// Number of iterations executed.
    pub iterations: usize,
    /// Cost at the parameters left on the objective.
    pub final_value: f64,
    /// Best cost seen during the run.
    pub best_value: f64,
    /// Parameters at the best cost.
    pub best_parameters: DVector<f64>,
    /// Per-iteration trace.
    pub trace: Vec<IterationRecord>,
}

/// Minimizes `φ(q) = ½‖f(q)‖²` via damped Gauss–Newton steps, falling back
/// to scaled steepest descent when the objective provides no residuals.
///
/// Each iteration solves the scaled normal equations, optionally performs
/// Armijo backtracking, and accepts the trial point only on strict cost
/// decrease. Rejected steps relax the step factor and raise the LM damping;
/// the best iterate is restored at the end when configured.
pub struct GaussNewtonOptimizer {
    learning_rate: f64,
    minimum_step_length: f64,
    number_of_iterations: usize,
    relaxation_factor: f64,
    gradient_magnitude_tolerance: f64,
    return_best_parameters: bool,
    scales: Option<DVector<f64>>,
    max_parameter_update: Option<DVector<f64>>,
    damping_factor: f64,
    use_levenberg_marquardt: bool,
    use_line_search: bool,
    line_search_max_iterations: usize,
    line_search_shrink_factor: f64,
    use_gauss_newton: bool,
    observer: Option<IterationObserver>,
    observer_interval: usize,
}

impl Default for GaussNewtonOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussNewtonOptimizer {
    /// Create an optimizer with default parameters.
    pub fn new() -> Self {
        Self {
            learning_rate: 1.0,
            minimum_step_length: 1e-6,
            number_of_iterations: 100,
            relaxation_factor: 0.5,
            gradient_magnitude_tolerance: 1e-6,
            return_best_parameters: true,
            scales: None,
            max_parameter_update: None,
            damping_factor: 1e-3,
            use_levenberg_marquardt: true,
            use_line_search: true,
            line_search_max_iterations: 10,
            line_search_shrink_factor: 0.5,
            use_gauss_newton: true,
            observer: None,
            observer_interval: 10,
        }
    }

    pub fn set_learning_rate(&mut self, rate: f64) {
        self.learning_rate = rate;
    }

    pub fn set_minimum_step_length(&mut self, length: f64) {
        self.minimum_step_length = length;
    }

    pub fn set_number_of_iterations(&mut self, iterations: usize) {
        self.number_of_iterations = iterations;
    }

    pub fn set_relaxation_factor(&mut self, factor: f64) {
        self.relaxation_factor = factor;
    }

    pub fn set_gradient_magnitude_tolerance(&mut self, tolerance: f64) {
        self.gradient_magnitude_tolerance = tolerance;
    }

    pub fn set_return_best_parameters(&mut self, enabled: bool) {
        self.return_best_parameters = enabled;
    }

    /// Per-parameter scale factors; steps are measured in scaled space.
    pub fn set_scales(&mut self, scales: DVector<f64>) {
        self.scales = Some(scales);
    }

    /// Per-parameter absolute clamp on the step vector.
    pub fn set_max_parameter_update(&mut self, clamp: DVector<f64>) {
        self.max_parameter_update = Some(clamp);
    }

    pub fn set_damping_factor(&mut self, damping: f64) {
        self.damping_factor = damping;
    }

    pub fn set_use_levenberg_marquardt(&mut self, enabled: bool) {
        self.use_levenberg_marquardt = enabled;
    }

    pub fn set_use_line_search(&mut self, enabled: bool) {
        self.use_line_search = enabled;
    }

    pub fn set_line_search_max_iterations(&mut self, iterations: usize) {
        self.line_search_max_iterations = iterations;
    }

    pub fn set_line_search_shrink_factor(&mut self, factor: f64) {
        self.line_search_shrink_factor = factor;
    }

    /// When disabled, the optimizer ignores the least-squares capability and
    /// runs in steepest-descent mode.
    pub fn set_use_gauss_newton(&mut self, enabled: bool) {
        self.use_gauss_newton = enabled;
    }

    /// Install an iteration observer.
    pub fn set_observer(&mut self, observer: IterationObserver) {
        self.observer = Some(observer);
    }

    pub fn set_observer_interval(&mut self, interval: usize) {
        self.observer_interval = interval.max(1);
    }

    fn notify(&mut self, iteration: usize, cost: f64, step_factor: f64) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&IterationReport {
                iteration,
                cost,
                step_factor,
            });
        }
    }

    /// Run the optimizer against an objective.
    pub fn optimize(&mut self, problem: &mut dyn ObjectiveFunction) -> Result<OptimizationOutcome> {
        let n = problem.parameter_count();
        let scales = match &self.scales {
            Some(scales) if scales.len() == n => scales.clone(),
            Some(scales) => {
                return Err(RegistrationError::configuration(format!(
                    "{} scales provided for {n} parameters",
                    scales.len()
                )))
            }
            None => DVector::repeat(n, 1.0),
        };
        let clamp = match &self.max_parameter_update {
            Some(clamp) if clamp.len() == n => clamp.clone(),
            Some(clamp) => {
                return Err(RegistrationError::configuration(format!(
                    "{} update clamps provided for {n} parameters",
                    clamp.len()
                )))
            }
            None => DVector::repeat(n, f64::INFINITY),
        };

        let least_squares = self.use_gauss_newton && problem.supports_least_squares();
        if !least_squares && !problem.supports_gradient() {
            return Err(RegistrationError::configuration(
                "objective provides neither residuals nor a gradient",
            ));
        }

        let mut state = RunState {
            params: problem.parameters()?,
            current_value: problem.value()?,
            previous_value: f64::MAX,
            best_value: f64::MAX,
            best_params: DVector::zeros(n),
            step_factor: self.learning_rate,
            damping: self.damping_factor,
            stop: None,
        };
        state.previous_value = state.current_value;
        state.best_value = state.current_value;
        state.best_params = state.params.clone();

        tracing::debug!(
            parameters = n,
            initial_cost = state.current_value,
            least_squares,
            "starting optimization"
        );

        let mut trace = Vec::new();
        let mut iteration = 0;
        while iteration < self.number_of_iterations {
            if iteration % self.observer_interval == 0 {
                self.notify(iteration, state.current_value, state.step_factor);
            }
            trace.push(IterationRecord {
                iteration,
                cost: state.current_value,
                step_factor: state.step_factor,
            });

            if least_squares {
                self.advance_least_squares(problem, &mut state, &scales, &clamp)?;
            } else {
                self.advance_gradient_descent(problem, &mut state, &scales)?;
            }
            iteration += 1;
            if state.stop.is_some() {
                break;
            }
        }

        let stop_condition = state.stop.unwrap_or(StopCondition::MaxIterations);
        if self.return_best_parameters {
            problem.set_parameters(&state.best_params)?;
            state.current_value = state.best_value;
        }
        self.notify(iteration, state.current_value, state.step_factor);

        tracing::debug!(
            iterations = iteration,
            final_cost = state.current_value,
            stop = %stop_condition,
            "optimization finished"
        );

        Ok(OptimizationOutcome {
            stop_condition,
            iterations: iteration,
            final_value: state.current_value,
            best_value: state.best_value,
            best_parameters: state.best_params,
            trace,
        })
    }

    fn advance_least_squares(
        &mut self,
        problem: &mut dyn ObjectiveFunction,
        state: &mut RunState,
        scales: &DVector<f64>,
        clamp: &DVector<f64>,
    ) -> Result<()> {
        let n = scales.len();
        let current_params = state.params.clone();
        state.previous_value = state.current_value;

        let (residuals, jacobian) = problem.residuals_and_jacobian()?;
        if residuals.is_empty() {
            tracing::warn!("empty residual vector");
            state.stop = Some(StopCondition::SingularMatrix);
            return Ok(());
        }
        if jacobian.nrows() != residuals.len() || jacobian.ncols() != n {
            tracing::warn!(
                rows = jacobian.nrows(),
                cols = jacobian.ncols(),
                residuals = residuals.len(),
                "jacobian shape does not match residuals"
            );
            state.stop = Some(StopCondition::SingularMatrix);
            return Ok(());
        }
        if !residuals.iter().all(|v| v.is_finite()) || !jacobian.iter().all(|v| v.is_finite()) {
            tracing::warn!("non-finite residuals or jacobian");
            state.stop = Some(StopCondition::SingularMatrix);
            return Ok(());
        }

        // Column scaling puts every parameter on a comparable footing.
        let mut j_scaled = jacobian.clone();
        for p in 0..n {
            let mut column = j_scaled.column_mut(p);
            column /= scales[p];
        }
        let a = j_scaled.transpose() * &j_scaled;
        let b = j_scaled.transpose() * &residuals;

        // The update is applied subtractively below, so the solve yields the
        // negative of the damped Gauss-Newton descent step.
        let u = match self.solve_normal_equations(&a, &b, state.damping) {
            Some(u) => u,
            None => {
                state.stop = Some(StopCondition::SingularMatrix);
                return Ok(());
            }
        };

        let mut update = DVector::zeros(n);
        for p in 0..n {
            update[p] = u[p] / scales[p];
        }
        for p in 0..n {
            if update[p].abs() > clamp[p] {
                update[p] = clamp[p].copysign(update[p]);
            }
        }

        let scaled_magnitude: f64 = (0..n)
            .map(|p| (update[p] / scales[p]).powi(2))
            .sum::<f64>()
            .sqrt();
        if scaled_magnitude < self.minimum_step_length {
            state.stop = Some(StopCondition::StepTooSmall);
            return Ok(());
        }

        let alpha = if self.use_line_search {
            let gradient = if problem.supports_gradient() {
                problem.gradient()?
            } else {
                jacobian.transpose() * &residuals
            };
            self.line_search(
                problem,
                &current_params,
                &update,
                state.current_value,
                &gradient,
            )?
        } else {
            1.0
        };

        let new_params = &current_params - &update * alpha;
        problem.set_parameters(&new_params)?;
        let new_value = problem.value()?;

        let accepted = new_value < state.current_value;
        if accepted {
            state.params = new_params;
            state.current_value = new_value;
            state.step_factor = alpha;
            if new_value < state.best_value {
                state.best_value = new_value;
                state.best_params = state.params.clone();
            }
            if self.use_levenberg_marquardt {
                state.damping = (state.damping * 0.5).max(DAMPING_FLOOR);
            }
        } else {
            problem.set_parameters(&current_params)?;
            state.current_value = state.previous_value;
            state.step_factor *= self.relaxation_factor;
            if self.use_levenberg_marquardt {
                state.damping = (state.damping * 2.0).min(DAMPING_CEILING);
            }
            if state.step_factor < self.minimum_step_length {
                state.stop = Some(StopCondition::StepTooSmall);
            }
        }

        if accepted {
            let relative_improvement = (state.previous_value - state.current_value).abs()
                / (state.previous_value.abs() + 1e-10);
            if relative_improvement < self.gradient_magnitude_tolerance {
                state.stop = Some(StopCondition::Converged);
            }
        }
        Ok(())
    }

    /// Solve `(A + λ·diag_damping) u = b` with a Cholesky factorization,
    /// retrying once with stronger uniform damping when the matrix is not
    /// positive definite.
    fn solve_normal_equations(
        &self,
        jtj: &DMatrix<f64>,
        b: &DVector<f64>,
        damping: f64,
    ) -> Option<DVector<f64>> {
        let n = jtj.nrows();
        let mut a = jtj.clone();
        if self.use_levenberg_marquardt {
            for i in 0..n {
                a[(i, i)] += damping * (jtj[(i, i)] + 1e-6);
            }
        }

        let solution = match Cholesky::new(a) {
            Some(cholesky) => cholesky.solve(b),
            None => {
                tracing::warn!("normal equations not positive definite, raising damping");
                let strong = (damping * 10.0).max(1e-3);
                let mut retry = jtj.clone();
                for i in 0..n {
                    retry[(i, i)] += strong;
                }
                Cholesky::new(retry)?.solve(b)
            }
        };
        if solution.iter().all(|v| v.is_finite()) {
            Some(solution)
        } else {
            None
        }
    }

    /// Armijo backtracking along `−update`. Returns the accepted step
    /// factor, or 0.1 when the direction is not a descent direction. The
    /// objective's parameters are restored before returning.
    fn line_search(
        &mut self,
        problem: &mut dyn ObjectiveFunction,
        current_params: &DVector<f64>,
        update: &DVector<f64>,
        initial_value: f64,
        gradient: &DVector<f64>,
    ) -> Result<f64> {
        let directional = -gradient.dot(update);
        if directional >= 0.0 {
            return Ok(0.1);
        }

        let mut alpha = 1.0;
        for _ in 0..self.line_search_max_iterations {
            let trial = current_params - update * alpha;
            problem.set_parameters(&trial)?;
            let value = problem.value()?;
            if value <= initial_value + ARMIJO_C * alpha * directional {
                problem.set_parameters(current_params)?;
                return Ok(alpha);
            }
            alpha *= self.line_search_shrink_factor;
        }
        problem.set_parameters(current_params)?;
        Ok(alpha)
    }

    fn advance_gradient_descent(
        &mut self,
        problem: &mut dyn ObjectiveFunction,
        state: &mut RunState,
        scales: &DVector<f64>,
    ) -> Result<()> {
        let n = scales.len();
        let current_params = state.params.clone();
        state.previous_value = state.current_value;

        let gradient = problem.gradient()?;
        if !gradient.iter().all(|v| v.is_finite()) {
            tracing::warn!("non-finite gradient");
            state.stop = Some(StopCondition::SingularMatrix);
            return Ok(());
        }

        let magnitude: f64 = (0..n)
            .map(|p| (gradient[p] / scales[p]).powi(2))
            .sum::<f64>()
            .sqrt();
        if magnitude < self.gradient_magnitude_tolerance {
            state.stop = Some(StopCondition::GradientTooSmall);
            return Ok(());
        }

        let mut direction = DVector::zeros(n);
        for p in 0..n {
            direction[p] = gradient[p] / (scales[p] * scales[p] * magnitude);
        }

        let new_params = &current_params - &direction * state.step_factor;
        problem.set_parameters(&new_params)?;
        let new_value = problem.value()?;

        if new_value < state.current_value {
            state.params = new_params;
            state.current_value = new_value;
            if new_value < state.best_value {
                state.best_value = new_value;
                state.best_params = state.params.clone();
            }
        } else {
            problem.set_parameters(&current_params)?;
            state.current_value = state.previous_value;
            state.step_factor *= self.relaxation_factor;
            if state.step_factor < self.minimum_step_length {
                state.stop = Some(StopCondition::StepTooSmall);
            }
        }
        Ok(())
    }
}

struct RunState {
    params: DVector<f64>,
    current_value: f64,
    previous_value: f64,
    best_value: f64,
    best_params: DVector<f64>,
    step_factor: f64,
    damping: f64,
    stop: Option<StopCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear least-squares problem: f(q) = q − target.
    struct LinearProblem {
        params: DVector<f64>,
        target: DVector<f64>,
    }

    impl ObjectiveFunction for LinearProblem {
        fn parameter_count(&self) -> usize {
            self.params.len()
        }

        fn parameters(&self) -> Result<DVector<f64>> {
            Ok(self.params.clone())
        }

        fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
            self.params = parameters.clone();
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            Ok((&self.params - &self.target).norm_squared())
        }

        fn supports_least_squares(&self) -> bool {
            true
        }

        fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
            let residuals = &self.params - &self.target;
            let jacobian = DMatrix::identity(self.params.len(), self.params.len());
            Ok((residuals, jacobian))
        }
    }

    #[test]
    fn test_linear_problem_converges() {
        let mut problem = LinearProblem {
            params: DVector::from_vec(vec![5.0, -3.0, 2.0]),
            target: DVector::from_vec(vec![1.0, 1.0, 1.0]),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        optimizer.set_number_of_iterations(50);
        let outcome = optimizer.optimize(&mut problem).unwrap();

        assert!(outcome.best_value < 1e-8, "best {}", outcome.best_value);
        for p in 0..3 {
            assert!(
                (problem.params[p] - 1.0).abs() < 1e-4,
                "param {p} = {}",
                problem.params[p]
            );
        }
        assert!(matches!(
            outcome.stop_condition,
            StopCondition::Converged | StopCondition::StepTooSmall | StopCondition::MaxIterations
        ));
        // The tracked cost never increases: accepted steps strictly
        // decrease it and rejected steps keep the previous value.
        for window in outcome.trace.windows(2) {
            assert!(window[1].cost <= window[0].cost);
        }
    }

    #[test]
    fn test_zero_iterations_preserve_parameters() {
        let initial = DVector::from_vec(vec![3.0, 4.0]);
        let mut problem = LinearProblem {
            params: initial.clone(),
            target: DVector::zeros(2),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        optimizer.set_number_of_iterations(0);
        let outcome = optimizer.optimize(&mut problem).unwrap();

        assert_eq!(outcome.stop_condition, StopCondition::MaxIterations);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(problem.params, initial);
        assert_eq!(outcome.final_value, 25.0);
    }

    /// Residuals promise progress but the cost refuses every trial point.
    struct WorseningProblem {
        params: DVector<f64>,
        origin: DVector<f64>,
    }

    impl ObjectiveFunction for WorseningProblem {
        fn parameter_count(&self) -> usize {
            self.params.len()
        }

        fn parameters(&self) -> Result<DVector<f64>> {
            Ok(self.params.clone())
        }

        fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
            self.params = parameters.clone();
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            if self.params == self.origin {
                Ok(5.0)
            } else {
                Ok(6.0)
            }
        }

        fn supports_least_squares(&self) -> bool {
            true
        }

        fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
            let n = self.params.len();
            Ok((DVector::repeat(n, 1.0), DMatrix::identity(n, n)))
        }
    }

    #[test]
    fn test_rejected_steps_restore_parameters_exactly() {
        let origin = DVector::from_vec(vec![0.25, -1.5]);
        let mut problem = WorseningProblem {
            params: origin.clone(),
            origin: origin.clone(),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        optimizer.set_number_of_iterations(100);
        let outcome = optimizer.optimize(&mut problem).unwrap();

        assert_eq!(outcome.stop_condition, StopCondition::StepTooSmall);
        // Every step was rejected: the parameters are bit-for-bit unchanged.
        assert_eq!(problem.params, origin);
        assert_eq!(outcome.best_value, 5.0);
    }

    #[test]
    fn test_observer_cadence() {
        let origin = DVector::from_vec(vec![0.0, 0.0]);
        let mut problem = WorseningProblem {
            params: origin.clone(),
            origin,
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        optimizer.set_number_of_iterations(100);
        optimizer.set_observer_interval(10);
        let (observer, history) = crate::progress::history_observer();
        optimizer.set_observer(observer);
        let outcome = optimizer.optimize(&mut problem).unwrap();

        let history = history.lock().unwrap();
        assert!(!history.is_empty());
        assert_eq!(history[0].iteration, 0);
        // The final call reports the exit iteration.
        assert_eq!(history.last().unwrap().iteration, outcome.iterations);
    }

    struct NanProblem {
        params: DVector<f64>,
    }

    impl ObjectiveFunction for NanProblem {
        fn parameter_count(&self) -> usize {
            2
        }

        fn parameters(&self) -> Result<DVector<f64>> {
            Ok(self.params.clone())
        }

        fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
            self.params = parameters.clone();
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            Ok(1.0)
        }

        fn supports_least_squares(&self) -> bool {
            true
        }

        fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
            Ok((DVector::repeat(2, f64::NAN), DMatrix::identity(2, 2)))
        }
    }

    #[test]
    fn test_non_finite_residuals_stop_with_singular_matrix() {
        let mut problem = NanProblem {
            params: DVector::zeros(2),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        let outcome = optimizer.optimize(&mut problem).unwrap();
        assert_eq!(outcome.stop_condition, StopCondition::SingularMatrix);
    }

    struct EmptyProblem {
        params: DVector<f64>,
    }

    impl ObjectiveFunction for EmptyProblem {
        fn parameter_count(&self) -> usize {
            2
        }

        fn parameters(&self) -> Result<DVector<f64>> {
            Ok(self.params.clone())
        }

        fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
            self.params = parameters.clone();
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            Ok(0.0)
        }

        fn supports_least_squares(&self) -> bool {
            true
        }

        fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
            Ok((DVector::zeros(0), DMatrix::zeros(0, 2)))
        }
    }

    #[test]
    fn test_empty_residuals_stop_with_singular_matrix() {
        let mut problem = EmptyProblem {
            params: DVector::zeros(2),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        let outcome = optimizer.optimize(&mut problem).unwrap();
        assert_eq!(outcome.stop_condition, StopCondition::SingularMatrix);
    }

    /// Smooth bowl exposing only a gradient.
    struct BowlProblem {
        params: DVector<f64>,
    }

    impl ObjectiveFunction for BowlProblem {
        fn parameter_count(&self) -> usize {
            self.params.len()
        }

        fn parameters(&self) -> Result<DVector<f64>> {
            Ok(self.params.clone())
        }

        fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
            self.params = parameters.clone();
            Ok(())
        }

        fn value(&mut self) -> Result<f64> {
            Ok(self.params.norm_squared())
        }

        fn supports_gradient(&self) -> bool {
            true
        }

        fn gradient(&mut self) -> Result<DVector<f64>> {
            Ok(&self.params * 2.0)
        }
    }

    #[test]
    fn test_gradient_descent_fallback_makes_progress() {
        let mut problem = BowlProblem {
            params: DVector::from_vec(vec![1.0, -1.0]),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        optimizer.set_learning_rate(0.5);
        optimizer.set_number_of_iterations(200);
        let outcome = optimizer.optimize(&mut problem).unwrap();

        assert!(outcome.best_value < 0.5, "best {}", outcome.best_value);
        assert!(matches!(
            outcome.stop_condition,
            StopCondition::StepTooSmall
                | StopCondition::GradientTooSmall
                | StopCondition::MaxIterations
        ));
    }

    #[test]
    fn test_objective_without_capabilities_is_rejected() {
        struct Bare {
            params: DVector<f64>,
        }
        impl ObjectiveFunction for Bare {
            fn parameter_count(&self) -> usize {
                1
            }
            fn parameters(&self) -> Result<DVector<f64>> {
                Ok(self.params.clone())
            }
            fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
                self.params = parameters.clone();
                Ok(())
            }
            fn value(&mut self) -> Result<f64> {
                Ok(0.0)
            }
        }
        let mut problem = Bare {
            params: DVector::zeros(1),
        };
        let mut optimizer = GaussNewtonOptimizer::new();
        assert!(optimizer.optimize(&mut problem).is_err());
    }
}
