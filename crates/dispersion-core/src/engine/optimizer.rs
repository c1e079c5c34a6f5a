use super::config::{OptimizationConfig, STEP_DECAY};
use super::error::EngineError;
use super::parallel::WorkerPool;
use super::tasks;
use crate::core::models::point::{Point, PointSet, euclidean_norm};
use crate::core::models::solution::{Solution, Termination};
use tracing::{debug, instrument, trace};

/// What happened during one descent iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// Zero-based index of the iteration.
    pub iteration: usize,
    /// Gradient norm the iteration normalized by.
    pub gradient_norm: f64,
    /// Step length used for the trial move.
    pub step: f64,
    /// Energy of the trial configuration.
    pub candidate_objective: f64,
    /// Whether the trial configuration was kept.
    pub accepted: bool,
    /// Best accepted energy after the iteration.
    pub objective: f64,
    /// Step length the next iteration will use.
    pub next_step: f64,
}

enum PoolHandle<'a> {
    Owned(WorkerPool),
    Shared(&'a WorkerPool),
}

impl PoolHandle<'_> {
    fn get(&self) -> &WorkerPool {
        match self {
            PoolHandle::Owned(pool) => pool,
            PoolHandle::Shared(pool) => pool,
        }
    }
}

/// Normalized-gradient descent with backtracking step control over one movable
/// configuration.
///
/// Each iteration moves every point against its normalized gradient by the current
/// step. A move that raises the energy is undone and the step shrinks by
/// [`STEP_DECAY`]; any other move is kept at the same step. The run ends when the
/// gradient norm or the step falls to the tolerance, or the iteration budget runs
/// out.
pub struct LineSearchOptimizer<'a> {
    given: &'a [Point],
    points: PointSet,
    gradient: Vec<Point>,
    objective: f64,
    step: f64,
    iteration: usize,
    tolerance: f64,
    max_iterations: usize,
    pool: PoolHandle<'a>,
}

impl<'a> LineSearchOptimizer<'a> {
    /// Prepares a run, evaluating the initial energy and gradient.
    ///
    /// # Errors
    ///
    /// Fails before any evaluation if the configuration is invalid, if
    /// `inner_parallelism` is zero, or if the worker pool cannot be built.
    pub fn new(
        given: &'a [Point],
        initial: PointSet,
        config: &OptimizationConfig,
        inner_parallelism: usize,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let pool = WorkerPool::new(inner_parallelism, "inner")?;
        Ok(Self::prepare(given, initial, config, PoolHandle::Owned(pool)))
    }

    /// Prepares a run that evaluates on an existing pool.
    ///
    /// Lets many sequential runs share one set of worker threads.
    ///
    /// # Errors
    ///
    /// Fails before any evaluation if the configuration is invalid.
    pub fn with_pool(
        given: &'a [Point],
        initial: PointSet,
        config: &OptimizationConfig,
        pool: &'a WorkerPool,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::prepare(given, initial, config, PoolHandle::Shared(pool)))
    }

    fn prepare(
        given: &'a [Point],
        initial: PointSet,
        config: &OptimizationConfig,
        pool: PoolHandle<'a>,
    ) -> Self {
        let objective = tasks::total_energy::run(given, &initial, pool.get());
        let gradient = tasks::gradient::run(given, &initial, pool.get());

        Self {
            given,
            points: initial,
            gradient,
            objective,
            step: config.initial_step,
            iteration: 0,
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            pool,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn gradient(&self) -> &[Point] {
        &self.gradient
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn step_size(&self) -> f64 {
        self.step
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The reason the run would stop now, or `None` if another iteration is due.
    ///
    /// Guards are checked in the order gradient norm, iteration budget, step floor.
    /// Comparisons are written so that a NaN norm or step stops the run.
    pub fn termination(&self) -> Option<Termination> {
        let norm = euclidean_norm(&self.gradient);
        if !(norm > self.tolerance) {
            Some(Termination::Converged)
        } else if self.iteration >= self.max_iterations {
            Some(Termination::MaxIterations)
        } else if !(self.step > self.tolerance) {
            Some(Termination::StepUnderflow)
        } else {
            None
        }
    }

    /// Performs one descent iteration, or returns `None` if the run has terminated.
    pub fn step(&mut self) -> Option<IterationRecord> {
        if self.termination().is_some() {
            return None;
        }

        let norm = euclidean_norm(&self.gradient);
        let step = self.step;
        let delta: Vec<Point> = self.gradient.iter().map(|&g| (g / norm) * step).collect();

        let trial: PointSet = self
            .points
            .iter()
            .zip(&delta)
            .map(|(&p, &d)| p - d)
            .collect();
        let candidate_objective = tasks::total_energy::run(self.given, &trial, self.pool.get());

        let accepted = !(self.objective < candidate_objective);
        if accepted {
            self.points = trial;
            self.objective = candidate_objective;
        } else {
            self.points = trial.iter().zip(&delta).map(|(&p, &d)| p + d).collect();
            self.step *= STEP_DECAY;
        }

        self.gradient = tasks::gradient::run(self.given, &self.points, self.pool.get());

        let record = IterationRecord {
            iteration: self.iteration,
            gradient_norm: norm,
            step,
            candidate_objective,
            accepted,
            objective: self.objective,
            next_step: self.step,
        };
        self.iteration += 1;

        trace!(
            iteration = record.iteration,
            objective = record.objective,
            candidate = record.candidate_objective,
            step = record.step,
            accepted = record.accepted,
            "Descent iteration."
        );
        Some(record)
    }

    /// Runs to termination.
    pub fn run(self) -> Solution {
        self.run_with_observer(|_| {})
    }

    /// Runs to termination, handing every iteration record to `observer`.
    #[instrument(skip_all, name = "line_search", fields(points = self.points.len()))]
    pub fn run_with_observer(mut self, mut observer: impl FnMut(&IterationRecord)) -> Solution {
        let initial_objective = self.objective;
        while let Some(record) = self.step() {
            observer(&record);
        }

        // `step` only returns `None` once a guard has tripped.
        let termination = self.termination().unwrap_or(Termination::Converged);
        debug!(
            initial_objective,
            final_objective = self.objective,
            iterations = self.iteration,
            %termination,
            "Line search finished."
        );

        Solution::new(self.points, self.objective, self.iteration, termination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::energy;

    fn sample_given() -> Vec<Point> {
        vec![
            Point::new(5.42641287, -9.58496101),
            Point::new(2.6729647, 4.97607765),
            Point::new(-0.02985975, -5.50406709),
            Point::new(-6.0387427, 5.21061424),
            Point::new(-6.61778327, -8.23320372),
        ]
    }

    fn sample_movable() -> Vec<Point> {
        vec![
            Point::new(3.70719637, 9.06786692),
            Point::new(-9.92103467, 0.24384527),
            Point::new(6.25241923, 2.25052134),
            Point::new(4.43510635, -4.16247864),
        ]
    }

    fn collect_records(inner: usize, config: &OptimizationConfig) -> (Vec<IterationRecord>, Solution) {
        let given = sample_given();
        let optimizer =
            LineSearchOptimizer::new(&given, sample_movable(), config, inner).unwrap();
        let mut records = Vec::new();
        let solution = optimizer.run_with_observer(|r| records.push(*r));
        (records, solution)
    }

    #[test]
    fn initial_state_matches_direct_evaluation() {
        let given = sample_given();
        let movable = sample_movable();
        let optimizer = LineSearchOptimizer::new(
            &given,
            movable.clone(),
            &OptimizationConfig::default(),
            1,
        )
        .unwrap();

        assert_eq!(optimizer.objective(), energy::total_energy(&given, &movable));
        assert_eq!(optimizer.gradient().len(), movable.len());
        assert_eq!(optimizer.step_size(), 0.2);
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn accepted_objectives_never_increase() {
        let (records, solution) = collect_records(1, &OptimizationConfig::default());
        assert!(!records.is_empty());

        let mut previous = f64::INFINITY;
        for r in &records {
            assert!(r.objective <= previous, "iteration {}", r.iteration);
            previous = r.objective;
        }
        assert_eq!(solution.value, previous);
    }

    #[test]
    fn step_shrinks_exactly_on_rejection_and_holds_on_acceptance() {
        let (records, _) = collect_records(2, &OptimizationConfig::default());

        for r in &records {
            if r.accepted {
                assert_eq!(r.next_step, r.step);
                assert_eq!(r.objective, r.candidate_objective);
            } else {
                assert_eq!(r.next_step, r.step * 0.9);
                assert!(r.candidate_objective > r.objective);
            }
        }
        for pair in records.windows(2) {
            assert_eq!(pair[1].step, pair[0].next_step);
        }
    }

    #[test]
    fn rejected_step_restores_configuration() {
        let given = vec![Point::ORIGIN];
        // A huge step overshoots the basin, so the first move is rejected.
        let config = OptimizationConfig {
            initial_step: 50.0,
            ..OptimizationConfig::default()
        };
        let start = vec![Point::new(1.0, 1.0)];
        let mut optimizer = LineSearchOptimizer::new(&given, start.clone(), &config, 1).unwrap();
        let before = optimizer.objective();

        let record = optimizer.step().unwrap();

        assert!(!record.accepted);
        assert_eq!(optimizer.objective(), before);
        assert!((optimizer.points()[0].x - start[0].x).abs() < 1e-12);
        assert!((optimizer.points()[0].y - start[0].y).abs() < 1e-12);
        assert_eq!(optimizer.step_size(), 45.0);
    }

    #[test]
    fn run_terminates_within_the_iteration_budget() {
        let config = OptimizationConfig {
            tolerance: 1e-12,
            initial_step: 0.2,
            max_iterations: 25,
        };
        let (records, solution) = collect_records(1, &config);
        assert!(records.len() <= 25);
        assert_eq!(solution.iterations, records.len());
        if solution.iterations == 25 {
            assert_eq!(solution.termination, Termination::MaxIterations);
        }
    }

    #[test]
    fn step_underflow_stops_the_run() {
        let config = OptimizationConfig {
            tolerance: 1e-3,
            initial_step: 1e-3,
            max_iterations: 500,
        };
        let (records, solution) = collect_records(1, &config);
        assert!(records.is_empty());
        assert_eq!(solution.termination, Termination::StepUnderflow);
        assert_eq!(solution.points, sample_movable());
    }

    #[test]
    fn descent_lowers_energy_from_reference_start() {
        let given = sample_given();
        let start = sample_movable();
        let initial = energy::total_energy(&given, &start);
        let solution =
            LineSearchOptimizer::new(&given, start, &OptimizationConfig::default(), 1)
                .unwrap()
                .run();
        assert!(solution.value < initial);
        assert!(solution.is_finite());
        assert_eq!(solution.points.len(), 4);
    }

    #[test]
    fn trajectory_is_independent_of_worker_count() {
        let config = OptimizationConfig::default();
        let (_, sequential) = collect_records(1, &config);
        for inner in [2, 8] {
            let (_, parallel) = collect_records(inner, &config);
            assert_eq!(parallel.iterations, sequential.iterations);
            assert!((parallel.value - sequential.value).abs() <= 1e-9 * sequential.value.abs());
        }
    }

    #[test]
    fn empty_movable_set_converges_immediately() {
        let given = sample_given();
        let solution =
            LineSearchOptimizer::new(&given, Vec::new(), &OptimizationConfig::default(), 1)
                .unwrap()
                .run();
        assert_eq!(solution.termination, Termination::Converged);
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.value, 0.0);
    }

    #[test]
    fn nan_start_reports_converged_with_non_finite_value() {
        let given = vec![Point::ORIGIN];
        let solution = LineSearchOptimizer::new(
            &given,
            vec![Point::new(f64::NAN, 1.0)],
            &OptimizationConfig::default(),
            1,
        )
        .unwrap()
        .run();
        assert_eq!(solution.termination, Termination::Converged);
        assert_eq!(solution.iterations, 0);
        assert!(!solution.is_finite());
    }

    #[test]
    fn shared_pool_reproduces_owned_pool_runs() {
        let given = sample_given();
        let config = OptimizationConfig::default();
        let owned = LineSearchOptimizer::new(&given, sample_movable(), &config, 3)
            .unwrap()
            .run();

        let pool = WorkerPool::new(3, "shared").unwrap();
        for _ in 0..2 {
            let shared = LineSearchOptimizer::with_pool(&given, sample_movable(), &config, &pool)
                .unwrap()
                .run();
            assert_eq!(shared.value, owned.value);
            assert_eq!(shared.iterations, owned.iterations);
            assert_eq!(shared.points, owned.points);
        }
    }

    #[test]
    fn invalid_configuration_fails_before_evaluation() {
        let given = vec![Point::ORIGIN];
        let config = OptimizationConfig {
            max_iterations: 0,
            ..OptimizationConfig::default()
        };
        let result = LineSearchOptimizer::new(&given, vec![Point::new(1.0, 1.0)], &config, 1);
        assert!(matches!(result, Err(EngineError::Config { .. })));
    }

    #[test]
    fn zero_inner_parallelism_is_rejected() {
        let given = vec![Point::ORIGIN];
        let result = LineSearchOptimizer::new(
            &given,
            vec![Point::new(1.0, 1.0)],
            &OptimizationConfig::default(),
            0,
        );
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }
}
