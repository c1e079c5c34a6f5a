use super::potentials;
use crate::core::models::point::Point;

/// The neighbours of movable point `index`: every given point, followed by every
/// movable point except the one at `index`, in order.
#[inline]
pub fn neighbors<'a>(
    given: &'a [Point],
    movable: &'a [Point],
    index: usize,
) -> impl Iterator<Item = Point> + 'a {
    given.iter().copied().chain(
        movable
            .iter()
            .enumerate()
            .filter(move |&(j, _)| j != index)
            .map(|(_, &q)| q),
    )
}

/// Generic per-point accumulation: `own(p) + Σ_{q ∈ neighbours} pairwise(q, p)`.
#[inline]
fn accumulate<P, O>(
    given: &[Point],
    movable: &[Point],
    index: usize,
    pairwise: P,
    own: O,
) -> f64
where
    P: Fn(Point, Point) -> f64,
    O: Fn(Point) -> f64,
{
    let p = movable[index];
    let interaction: f64 = neighbors(given, movable, index)
        .map(|q| pairwise(q, p))
        .sum();
    own(p) + interaction
}

/// The energy term contributed by movable point `index`.
///
/// Summing this over every index gives the total energy, in which each movable
/// pair is counted once from each side.
pub fn point_energy(given: &[Point], movable: &[Point], index: usize) -> f64 {
    accumulate(given, movable, index, potentials::pair, potentials::unary)
}

/// The descent direction component for movable point `index`.
///
/// Only the derivative of the point's own term is taken; the point's appearance
/// inside the other movable points' terms is not differentiated.
pub fn point_gradient(given: &[Point], movable: &[Point], index: usize) -> Point {
    Point::new(
        accumulate(given, movable, index, potentials::pair_dx, potentials::unary_dx),
        accumulate(given, movable, index, potentials::pair_dy, potentials::unary_dy),
    )
}

/// Sequential total energy, summed in index order.
pub fn total_energy(given: &[Point], movable: &[Point]) -> f64 {
    (0..movable.len())
        .map(|i| point_energy(given, movable, i))
        .sum()
}

/// Sequential gradient vector, one entry per movable point.
pub fn gradient(given: &[Point], movable: &[Point]) -> Vec<Point> {
    (0..movable.len())
        .map(|i| point_gradient(given, movable, i))
        .collect()
}
