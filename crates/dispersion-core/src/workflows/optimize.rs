use crate::core::models::point::Point;
use crate::core::models::solution::Solution;
use crate::engine::config::OptimizationConfig;
use crate::engine::error::EngineError;
use crate::engine::optimizer::LineSearchOptimizer;
use crate::engine::parallel::WorkerPool;
use tracing::{debug, instrument};

/// Runs one descent of `initial` among `given` with the default step control.
///
/// Energy and gradient evaluations fan out over `inner_parallelism` workers.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `inner_parallelism` is zero.
pub fn optimize(
    given: &[Point],
    initial: &[Point],
    inner_parallelism: usize,
) -> Result<Solution, EngineError> {
    optimize_with(given, initial, inner_parallelism, &OptimizationConfig::default())
}

/// Runs one descent with explicit step control.
///
/// # Errors
///
/// Fails before any evaluation if `config` is invalid or `inner_parallelism` is zero.
#[instrument(skip_all, name = "optimize_workflow", fields(given = given.len(), movable = initial.len()))]
pub fn optimize_with(
    given: &[Point],
    initial: &[Point],
    inner_parallelism: usize,
    config: &OptimizationConfig,
) -> Result<Solution, EngineError> {
    let optimizer = LineSearchOptimizer::new(given, initial.to_vec(), config, inner_parallelism)?;
    Ok(finish(optimizer))
}

/// Runs one descent whose evaluations use an existing `pool`.
///
/// # Errors
///
/// Fails before any evaluation if `config` is invalid.
pub fn optimize_on(
    given: &[Point],
    initial: &[Point],
    config: &OptimizationConfig,
    pool: &WorkerPool,
) -> Result<Solution, EngineError> {
    let optimizer = LineSearchOptimizer::with_pool(given, initial.to_vec(), config, pool)?;
    Ok(finish(optimizer))
}

fn finish(optimizer: LineSearchOptimizer<'_>) -> Solution {
    let solution = optimizer.run();
    debug!(
        value = solution.value,
        iterations = solution.iterations,
        termination = %solution.termination,
        "Run complete."
    );
    solution
}
