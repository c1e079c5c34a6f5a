use crate::core::field::energy::point_gradient;
use crate::core::models::point::Point;
use crate::engine::parallel::WorkerPool;
use tracing::instrument;

/// Gradient vector of `movable` among `given`; entry `i` belongs to `movable[i]`.
#[instrument(level = "trace", skip_all, name = "gradient_task", fields(points = movable.len()))]
pub fn run(given: &[Point], movable: &[Point], pool: &WorkerPool) -> Vec<Point> {
    pool.map_indexed(movable.len(), |i| point_gradient(given, movable, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::energy;

    #[test]
    fn single_pair_matches_reference_value() {
        let pool = WorkerPool::new(1, "test").unwrap();
        let g = run(&[Point::ORIGIN], &[Point::new(1.0, 1.0)], &pool);
        assert_eq!(g.len(), 1);
        assert!((g[0].x + 0.217227).abs() < 1e-5);
        assert!((g[0].y + 0.217227).abs() < 1e-5);
    }

    #[test]
    fn gradient_has_one_entry_per_movable_point_for_any_worker_count() {
        let given: Vec<_> = (0..5).map(|i| Point::new(i as f64, -(i as f64))).collect();
        let movable: Vec<_> = (0..7)
            .map(|i| Point::new(0.3 * i as f64, 1.0 + 0.2 * i as f64))
            .collect();
        let reference = energy::gradient(&given, &movable);

        for threads in [1, 2, 8] {
            let pool = WorkerPool::new(threads, "test").unwrap();
            let g = run(&given, &movable, &pool);
            assert_eq!(g.len(), movable.len());
            for (a, b) in g.iter().zip(&reference) {
                assert!((a.x - b.x).abs() <= 1e-9 * b.x.abs().max(1.0));
                assert!((a.y - b.y).abs() <= 1e-9 * b.y.abs().max(1.0));
            }
        }
    }
}
