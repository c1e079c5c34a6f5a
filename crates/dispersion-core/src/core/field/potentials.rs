use crate::core::models::point::Point;

const PAIR_DECAY: f64 = 0.3;
const PAIR_GRADIENT_SCALE: f64 = 2.0 * PAIR_DECAY;
const UNARY_OFFSET: f64 = 0.4;
const UNARY_TRIG_WEIGHT: f64 = 200.0;
const UNARY_SCALE: f64 = 1000.0;

/// Gaussian pair potential `V(p, q) = exp(-0.3 * |p - q|^2)`.
#[inline]
pub fn pair(p: Point, q: Point) -> f64 {
    (-PAIR_DECAY * ((p.x - q.x).powi(2) + (p.y - q.y).powi(2))).exp()
}

/// Unary potential `U(p) = 0.4 + (x^4 + y^4 + 200 (sin x + cos y)) / 1000`.
#[inline]
pub fn unary(p: Point) -> f64 {
    UNARY_OFFSET
        + (p.x.powi(4) + p.y.powi(4) + UNARY_TRIG_WEIGHT * (p.x.sin() + p.y.cos())) / UNARY_SCALE
}

/// `0.6 * V(p, q) * (p.x - q.x)`: the derivative of `V` with respect to `q.x`,
/// with `p` held fixed.
#[inline]
pub fn pair_dx(p: Point, q: Point) -> f64 {
    PAIR_GRADIENT_SCALE * pair(p, q) * (p.x - q.x)
}

/// `0.6 * V(p, q) * (p.y - q.y)`, the y counterpart of [`pair_dx`].
#[inline]
pub fn pair_dy(p: Point, q: Point) -> f64 {
    PAIR_GRADIENT_SCALE * pair(p, q) * (p.y - q.y)
}

/// `(4 x^3 + 200 cos x) / 1000`.
#[inline]
pub fn unary_dx(p: Point) -> f64 {
    (4.0 * p.x.powi(3) + UNARY_TRIG_WEIGHT * p.x.cos()) / UNARY_SCALE
}

/// `(4 y^3 + 200 cos y) / 1000`.
///
/// This is the y term the optimizer descends along; it mirrors [`unary_dx`]
/// rather than differentiating the `cos y` of [`unary`].
#[inline]
pub fn unary_dy(p: Point) -> f64 {
    (4.0 * p.y.powi(3) + UNARY_TRIG_WEIGHT * p.y.cos()) / UNARY_SCALE
}
