use super::optimize::optimize_on;
use crate::core::models::point::{Point, PointSet};
use crate::core::models::solution::Solution;
use crate::engine::config::{OptimizationConfig, SearchConfig};
use crate::engine::error::EngineError;
use crate::engine::parallel::WorkerPool;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::utils::sampling;
use tracing::{info, instrument, warn};

/// Runs one descent per candidate and returns the lowest-energy solution.
///
/// Up to `outer_parallelism` runs execute concurrently and each run uses
/// `inner_parallelism` workers for its own evaluations. Returns `Ok(None)` when
/// `candidates` is empty.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if either level of parallelism is zero.
pub fn run_multi_start(
    given: &[Point],
    candidates: &[PointSet],
    outer_parallelism: usize,
    inner_parallelism: usize,
) -> Result<Option<Solution>, EngineError> {
    run_multi_start_with(
        given,
        candidates,
        outer_parallelism,
        inner_parallelism,
        &OptimizationConfig::default(),
        &ProgressReporter::new(),
    )
}

/// Runs one descent per candidate with explicit step control and progress reporting.
///
/// The reporter receives a `PhaseStart`, a `TaskStart` sized to the number of
/// candidates, one `TaskIncrement` per finished run (possibly from worker threads),
/// then `TaskFinish` and `PhaseFinish`.
///
/// # Errors
///
/// Fails before any run starts if `config` is invalid, if either level of
/// parallelism is zero, or if a worker pool cannot be built.
#[instrument(skip_all, name = "multi_start_workflow", fields(candidates = candidates.len(), outer = outer_parallelism, inner = inner_parallelism))]
pub fn run_multi_start_with(
    given: &[Point],
    candidates: &[PointSet],
    outer_parallelism: usize,
    inner_parallelism: usize,
    config: &OptimizationConfig,
    reporter: &ProgressReporter,
) -> Result<Option<Solution>, EngineError> {
    config.validate()?;
    if inner_parallelism == 0 {
        return Err(EngineError::InvalidInput(
            "inner parallelism must be at least 1".to_string(),
        ));
    }
    let pool = WorkerPool::new(outer_parallelism, "outer")?;
    // One inner pool per outer worker, reused by every run that worker executes.
    let inner_pools = (0..pool.threads())
        .map(|_| WorkerPool::new(inner_parallelism, "inner"))
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::PhaseStart {
        name: "Multi-Start Search",
    });
    reporter.report(Progress::TaskStart {
        total_steps: candidates.len() as u64,
    });

    let outcomes = pool.map(candidates, |candidate| {
        let inner = &inner_pools[pool.worker_index()];
        let outcome = optimize_on(given, candidate, config, inner);
        reporter.report(Progress::TaskIncrement);
        outcome
    });
    let solutions: Vec<Solution> = outcomes.into_iter().collect::<Result<_, _>>()?;

    reporter.report(Progress::TaskFinish);

    for (index, solution) in solutions.iter().enumerate() {
        if !solution.is_finite() {
            warn!(
                candidate = index,
                value = solution.value,
                "Run diverged to a non-finite configuration."
            );
        }
    }

    let best = select_best(solutions);
    match &best {
        Some(solution) => {
            info!(
                value = solution.value,
                iterations = solution.iterations,
                termination = %solution.termination,
                "Multi-start search complete."
            );
            reporter.report(Progress::StatusUpdate {
                text: format!("Best energy: {:.6}", solution.value),
            });
        }
        None => info!("No candidates supplied; nothing to optimize."),
    }

    reporter.report(Progress::PhaseFinish);
    Ok(best)
}

/// Picks the solution with the lowest value.
///
/// Ties go to the earliest solution. NaN values rank after every number.
pub fn select_best(solutions: impl IntoIterator<Item = Solution>) -> Option<Solution> {
    solutions.into_iter().min()
}

/// Samples the candidates described by `config` and runs a multi-start search over
/// them.
///
/// Candidate generation runs on the outer pool. The result depends only on
/// `config` (including its seed), never on the thread counts.
///
/// # Errors
///
/// Fails before any work if `config` is invalid.
#[instrument(skip_all, name = "search_workflow", fields(restarts = config.sampling.restarts, seed = config.sampling.seed))]
pub fn run_search(
    given: &[Point],
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<Option<Solution>, EngineError> {
    config.validate()?;

    reporter.report(Progress::Message(format!(
        "Sampling {} candidate(s) of {} point(s).",
        config.sampling.restarts, config.sampling.movable_points
    )));
    let candidates = {
        let pool = WorkerPool::new(config.outer_threads, "sampler")?;
        sampling::generate_candidates(&config.sampling, &pool)?
    };

    run_multi_start_with(
        given,
        &candidates,
        config.outer_threads,
        config.inner_threads,
        &config.optimization,
        reporter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::solution::Termination;
    use crate::engine::config::SearchConfigBuilder;
    use crate::workflows::optimize::optimize_with;
    use std::sync::Mutex;

    fn solution(value: f64) -> Solution {
        Solution::new(vec![Point::new(value, value)], value, 1, Termination::Converged)
    }

    #[test]
    fn select_best_picks_the_minimum() {
        let best = select_best(vec![solution(5.2), solution(3.1), solution(4.7)]).unwrap();
        assert_eq!(best.value, 3.1);
    }

    #[test]
    fn select_best_breaks_ties_by_earliest_index() {
        let mut first = solution(1.0);
        first.iterations = 10;
        let mut second = solution(1.0);
        second.iterations = 20;
        let best = select_best(vec![solution(2.0), first, second]).unwrap();
        assert_eq!(best.iterations, 10);
    }

    #[test]
    fn select_best_ranks_nan_last() {
        let best = select_best(vec![solution(f64::NAN), solution(7.0)]).unwrap();
        assert_eq!(best.value, 7.0);

        let only_nan = select_best(vec![solution(f64::NAN)]).unwrap();
        assert!(only_nan.value.is_nan());
    }

    #[test]
    fn select_best_of_nothing_is_none() {
        assert!(select_best(Vec::new()).is_none());
    }

    #[test]
    fn empty_candidates_return_none_and_still_report_phases() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| {
            events.lock().unwrap().push(e);
        }));

        let result = run_multi_start_with(
            &[Point::ORIGIN],
            &[],
            2,
            1,
            &OptimizationConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert!(result.is_none());
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart {
                    name: "Multi-Start Search"
                },
                Progress::TaskStart { total_steps: 0 },
                Progress::TaskFinish,
                Progress::PhaseFinish,
            ]
        );
    }

    #[test]
    fn one_increment_is_reported_per_candidate() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| {
            events.lock().unwrap().push(e);
        }));
        let candidates = vec![
            vec![Point::new(1.0, 1.0)],
            vec![Point::new(-1.0, 2.0)],
            vec![Point::new(3.0, -2.0)],
        ];

        run_multi_start_with(
            &[Point::ORIGIN],
            &candidates,
            3,
            1,
            &OptimizationConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let increments = events
            .iter()
            .filter(|e| **e == Progress::TaskIncrement)
            .count();
        assert_eq!(increments, 3);
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn result_matches_best_individual_run() {
        let given = vec![Point::ORIGIN, Point::new(2.0, 2.0)];
        let candidates = vec![
            vec![Point::new(4.0, 4.0), Point::new(-4.0, 1.0)],
            vec![Point::new(0.5, -0.5), Point::new(1.5, 2.5)],
            vec![Point::new(-6.0, -6.0), Point::new(6.0, -6.0)],
        ];

        let individual: Vec<f64> = candidates
            .iter()
            .map(|c| optimize_with(&given, c, 1, &OptimizationConfig::default()).unwrap().value)
            .collect();
        let expected = individual.iter().cloned().fold(f64::INFINITY, f64::min);

        let best = run_multi_start(&given, &candidates, 2, 2).unwrap().unwrap();
        assert!((best.value - expected).abs() <= 1e-9 * expected.abs());
    }

    #[test]
    fn reused_inner_pools_give_the_sequential_result() {
        let given = vec![Point::new(1.0, -1.0), Point::new(-2.0, 3.0)];
        let candidates: Vec<PointSet> = (0..12)
            .map(|k| {
                let t = k as f64;
                vec![
                    Point::new(6.0 * (0.9 * t).sin(), 6.0 * (0.4 * t).cos()),
                    Point::new(-5.0 + 0.8 * t, 4.0 - 0.6 * t),
                ]
            })
            .collect();

        let sequential = run_multi_start(&given, &candidates, 1, 1).unwrap().unwrap();
        let nested = run_multi_start(&given, &candidates, 3, 2).unwrap().unwrap();

        assert_eq!(nested.value, sequential.value);
        assert_eq!(nested.iterations, sequential.iterations);
        assert_eq!(nested.points, sequential.points);
    }

    #[test]
    fn zero_outer_or_inner_parallelism_is_rejected() {
        let candidates = vec![vec![Point::new(1.0, 1.0)]];
        assert!(matches!(
            run_multi_start(&[Point::ORIGIN], &candidates, 0, 1),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            run_multi_start(&[Point::ORIGIN], &candidates, 1, 0),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn seeded_search_is_reproducible_across_thread_counts() {
        let given = vec![Point::new(1.0, -1.0), Point::new(-2.0, 3.0)];
        let build = |outer, inner| {
            SearchConfigBuilder::new()
                .restarts(6)
                .movable_points(3)
                .max_iterations(60)
                .seed(2024)
                .outer_threads(outer)
                .inner_threads(inner)
                .build()
                .unwrap()
        };

        let reference = run_search(&given, &build(1, 1), &ProgressReporter::new())
            .unwrap()
            .unwrap();
        let parallel = run_search(&given, &build(3, 2), &ProgressReporter::new())
            .unwrap()
            .unwrap();

        assert_eq!(parallel.iterations, reference.iterations);
        assert!((parallel.value - reference.value).abs() <= 1e-9 * reference.value.abs());
        assert_eq!(parallel.points.len(), 3);
    }
}
