use crate::core::field::energy::point_energy;
use crate::core::models::point::Point;
use crate::engine::parallel::WorkerPool;
use tracing::instrument;

/// Total energy of `movable` among `given`, with one task per movable point.
#[instrument(level = "trace", skip_all, name = "total_energy_task", fields(points = movable.len()))]
pub fn run(given: &[Point], movable: &[Point], pool: &WorkerPool) -> f64 {
    pool.sum_indexed(movable.len(), |i| point_energy(given, movable, i))
}
