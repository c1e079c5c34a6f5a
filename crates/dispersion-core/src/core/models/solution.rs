use super::point::{Point, PointSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Why a single optimization run stopped.
///
/// None of these is a failure; they are the three ways the descent loop can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The gradient norm fell to the tolerance or below. A NaN norm also lands
    /// here, since it never compares greater than the tolerance.
    Converged,
    /// The iteration budget was exhausted.
    MaxIterations,
    /// The step size shrank to the tolerance or below.
    StepUnderflow,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Converged => "gradient norm converged",
            Termination::MaxIterations => "iteration limit reached",
            Termination::StepUnderflow => "step size underflow",
        };
        f.write_str(text)
    }
}

/// The outcome of one optimization run: the final movable configuration and its
/// energy.
///
/// Solutions are ordered by `value`, ascending, so the smallest solution is the
/// best one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub points: PointSet,
    pub value: f64,
    pub iterations: usize,
    pub termination: Termination,
}

impl Solution {
    pub fn new(
        points: PointSet,
        value: f64,
        iterations: usize,
        termination: Termination,
    ) -> Self {
        Self {
            points,
            value,
            iterations,
            termination,
        }
    }

    /// Whether both the energy and every coordinate are finite.
    ///
    /// A diverging run terminates normally with non-finite values; callers are
    /// expected to check this.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.points.iter().all(Point::is_finite)
    }
}

impl Solution {
    /// The key solutions are ordered by: `value`, with NaN after every number and
    /// `-0.0` folded onto `0.0`.
    pub fn rank(&self) -> f64 {
        if self.value.is_nan() {
            f64::INFINITY
        } else {
            self.value + 0.0
        }
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Solution {}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().total_cmp(&other.rank())
    }
}
