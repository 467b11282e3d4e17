//! Configuration sections shared by every model.
//!
//! Component crates embed these sections in their own configuration files.

use crate::errors::RSIAMResult;
use crate::timeseries::{FloatValue, Time, TimeAxis};
use serde::{Deserialize, Serialize};

/// `[time]` section
///
/// ```toml
/// [time]
/// start = 2020
/// end = 2100
/// dt = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    pub start: Time,
    pub end: Time,
    pub dt: Time,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start: 2020.0,
            end: 2100.0,
            dt: 5.0,
        }
    }
}

impl TimeConfig {
    pub fn time_axis(&self) -> RSIAMResult<TimeAxis> {
        TimeAxis::from_bounds(self.start, self.end, self.dt)
    }
}

/// `[temperature]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureConfig {
    /// Temperature at the start of the model run, used as the damage reference `T0`
    ///
    /// unit: delta_degC
    pub initial: FloatValue,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self { initial: 1.1 }
    }
}
