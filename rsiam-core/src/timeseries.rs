//! Time axis and exogenous trajectories.
//!
//! Model variables are indexed by a discrete time step `t`, which maps onto calendar years
//! through a [`TimeAxis`]. Exogenous data (TFP, population, baseline GDP) is provided per
//! calendar year and region as a [`RegionalTrajectory`] and is evaluated at `year(t)`.

use crate::errors::{RSIAMError, RSIAMResult};
use ndarray::{Array, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub type FloatValue = f64;
pub type Time = f64;

/// Uniformly spaced time steps starting at `start`.
///
/// Time step `t` corresponds to the calendar year $year(t) = start + t \cdot dt$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    start: Time,
    dt: Time,
    n_steps: usize,
}

impl TimeAxis {
    pub fn new(start: Time, dt: Time, n_steps: usize) -> Self {
        Self { start, dt, n_steps }
    }

    /// Create a time axis covering `[start, end]` with a step of `dt`.
    ///
    /// The number of steps is $\lceil (end - start) / dt \rceil + 1$ so that the final step
    /// reaches or passes `end`.
    pub fn from_bounds(start: Time, end: Time, dt: Time) -> RSIAMResult<Self> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(RSIAMError::InvalidParameter {
                parameter: "dt".to_string(),
                reason: format!("time step must be positive, got {}", dt),
            });
        }
        if end < start {
            return Err(RSIAMError::InvalidParameter {
                parameter: "end".to_string(),
                reason: format!("end year {} is before start year {}", end, start),
            });
        }
        let n_steps = ((end - start) / dt).ceil() as usize + 1;
        Ok(Self::new(start, dt, n_steps))
    }

    /// Calendar year of time step `t`
    pub fn year(&self, t: usize) -> Time {
        self.start + (t as Time) * self.dt
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn dt(&self) -> Time {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.n_steps
    }

    pub fn is_empty(&self) -> bool {
        self.n_steps == 0
    }

    /// Time step indices `0..len`
    pub fn indices(&self) -> Range<usize> {
        0..self.n_steps
    }

    pub fn years(&self) -> Array1<Time> {
        Array::from_iter(self.indices().map(|t| self.year(t)))
    }
}

/// Year-indexed regional data, linearly interpolated between the provided years.
///
/// Values are stored with one row per year and one column per model region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalTrajectory {
    years: Array1<Time>,
    values: Array2<FloatValue>,
}

impl RegionalTrajectory {
    /// Create a new trajectory.
    ///
    /// `years` must be strictly increasing and `values` must have one row per year.
    pub fn new(years: Array1<Time>, values: Array2<FloatValue>) -> RSIAMResult<Self> {
        if values.nrows() != years.len() {
            return Err(RSIAMError::ShapeMismatch {
                name: "trajectory".to_string(),
                expected: (years.len(), values.ncols()),
                got: values.dim(),
            });
        }
        if years.is_empty() {
            return Err(RSIAMError::Error(
                "A trajectory requires at least one year".to_string(),
            ));
        }
        if years.iter().zip(years.iter().skip(1)).any(|(a, b)| b <= a) {
            return Err(RSIAMError::Error(
                "Trajectory years must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { years, values })
    }

    /// A trajectory holding the same value for every region in every year
    pub fn constant(years: Array1<Time>, n_regions: usize, value: FloatValue) -> RSIAMResult<Self> {
        let values = Array2::from_elem((years.len(), n_regions), value);
        Self::new(years, values)
    }

    pub fn years(&self) -> ArrayView1<Time> {
        self.years.view()
    }

    pub fn n_regions(&self) -> usize {
        self.values.ncols()
    }

    /// Value for a region at a given year.
    ///
    /// Years between two data points are linearly interpolated.
    /// Years outside the provided range are an error rather than being extrapolated.
    pub fn at(&self, year: Time, region: usize) -> RSIAMResult<FloatValue> {
        if region >= self.n_regions() {
            return Err(RSIAMError::Error(format!(
                "Region index {} out of bounds for trajectory with {} regions",
                region,
                self.n_regions()
            )));
        }

        let n = self.years.len();
        let first = self.years[0];
        let last = self.years[n - 1];
        if year < first || year > last || year.is_nan() {
            return Err(RSIAMError::ExtrapolationNotAllowed(
                year,
                "linear".to_string(),
                format!("[{}, {}]", first, last),
            ));
        }

        // First index with a year >= target
        let upper = self.years.iter().position(|&y| y >= year).unwrap_or(n - 1);
        if self.years[upper] == year || upper == 0 {
            return Ok(self.values[[upper, region]]);
        }

        let lower = upper - 1;
        let (y0, y1) = (self.years[lower], self.years[upper]);
        let (v0, v1) = (self.values[[lower, region]], self.values[[upper, region]]);
        Ok(v0 + (v1 - v0) * (year - y0) / (y1 - y0))
    }
}
