//! Economic relations shared by the production components.
//!
//! The functions are generic over [`Real`] so that the same formula builds model equations and
//! computes plain numbers in tests and diagnostics.

use rsiam_core::expr::Real;
use rsiam_core::timeseries::FloatValue;

/// Cobb-Douglas production
///
/// $$ Y = TFP \cdot L^{1 - \alpha} \cdot K^{\alpha} $$
pub fn calc_gdp<T: Real>(tfp: T, population: T, capital: T, alpha: FloatValue) -> T {
    tfp * population.powf(T::from(1.0 - alpha)) * capital.powf(T::from(alpha))
}

/// Rate of change of the capital stock
///
/// Depreciation is applied as a per-year rate compounded over the time step:
///
/// $$ \frac{dK}{dt} = \frac{(1 - dk)^{dt} - 1}{dt} K + I $$
pub fn calc_dkdt<T: Real>(capital: T, dk: FloatValue, investments: T, dt: FloatValue) -> T {
    capital * (((1.0 - dk).powf(dt) - 1.0) / dt) + investments
}
