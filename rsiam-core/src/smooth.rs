//! Smooth approximations of `min`/`max`.
//!
//! Solvers based on interior point methods need expressions that are differentiable and
//! defined everywhere they may be evaluated. Hard clamps such as `max(x, 0)` are replaced by
//! smooth transforms built from `tanh`, trading a small bias near the boundary for robustness.
//!
//! [`soft_min`] never reaches zero, so quantities raised to fractional or negative powers stay
//! finite when the unclamped value turns negative.
//!
//! All functions are generic over [`Real`] and work on both numbers and symbolic expressions.

use crate::expr::Real;
use crate::timeseries::FloatValue;

/// Smooth step from 0 to 1 around $x = 0$
///
/// $$ s(x) = \frac{1}{2} + \frac{1}{2}\tanh\left(\frac{x}{scale}\right) $$
pub fn soft_switch<T: Real>(x: T, scale: FloatValue) -> T {
    (x / scale).tanh() * 0.5 + 0.5
}

/// Floor of [`soft_min`] far below zero, as a fraction of `scale`
///
/// Any value above $e^{-1}/2$ keeps the transform strictly positive.
pub const SOFT_MIN_FLOOR: FloatValue = 0.25;

/// Smooth ramp, approximately $\max(x, 0)$
///
/// $$ x \cdot s(x) $$
///
/// The ramp dips slightly below zero for $x \approx -0.64 \cdot scale$, so it is only suitable
/// where the sign of the result does not matter.
pub fn soft_ramp<T: Real>(x: T, scale: FloatValue) -> T {
    x.clone() * soft_switch(x, scale)
}

/// Smooth, strictly positive lower bound
///
/// $$ x \cdot s(x) + (1 - s(x)) \cdot f \cdot scale $$
///
/// where $f$ is [`SOFT_MIN_FLOOR`]. The transform approaches `x` for $x \gg scale$ and
/// $f \cdot scale$ for $x \ll -scale$. Fractional and negative powers of the result are always
/// finite.
pub fn soft_min<T: Real>(x: T, scale: FloatValue) -> T {
    let switch = soft_switch(x.clone(), scale);
    x * switch.clone() + (T::from(1.0) - switch) * (SOFT_MIN_FLOOR * scale)
}

/// Smooth upper bound at `max_value`, approximately $\min(x, max\\_value)$
///
/// $$ x - ramp(x - max\\_value) $$
pub fn soft_max<T: Real>(x: T, max_value: FloatValue, scale: FloatValue) -> T {
    x.clone() - soft_ramp(x - max_value, scale)
}
