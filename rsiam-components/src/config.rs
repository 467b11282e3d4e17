//! Model configuration files
//!
//! A configuration file describes the time axis, the economic parameters and the regional
//! calibration of a model combining the [`CobbDouglas`] and [`Coacch`] components:
//!
//! ```toml
//! [time]
//! start = 2020
//! end = 2100
//! dt = 5
//!
//! [temperature]
//! initial = 1.1
//!
//! [economics]
//! alpha = 0.3
//! sr = 0.21
//!
//! [economics.damages]
//! quantile = 0.5
//! coacch_slr_withadapt = true
//!
//! [regions.EU]
//! init_capital_factor = 2.8
//!
//! [coacch.EU]
//! NoSLR_form = "Quadratic"
//! NoSLR_b1 = 0.1
//! NoSLR_b2 = 0.2
//! "NoSLR_a (q=0.5)" = 1.0
//! SLR-Ad_form = "Linear"
//! SLR-Ad_b1 = 0.3
//! "SLR-Ad_a (q=0.5)" = 1.0
//! ```
//!
//! Exogenous trajectories (TFP, population, baseline GDP) and the variables provided by the
//! climate and mitigation modules are added to the resulting [`ModelBuilder`] by the caller.

use crate::components::damages::{CoacchTable, DEFAULT_QUANTILE};
use crate::components::{Coacch, CobbDouglas, CobbDouglasParameters};
use indexmap::IndexMap;
use log::info;
use rsiam_core::config::{TemperatureConfig, TimeConfig};
use rsiam_core::errors::{RSIAMError, RSIAMResult};
use rsiam_core::model::ModelBuilder;
use rsiam_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IamConfig {
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub temperature: TemperatureConfig,
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Model regions, in order
    pub regions: IndexMap<String, RegionConfig>,
    #[serde(default)]
    pub coacch: CoacchTable,
}

/// `[economics]` section. Defaults match [`CobbDouglasParameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    pub alpha: FloatValue,
    pub dk: FloatValue,
    pub sr: FloatValue,
    pub elasmu: FloatValue,
    pub disutility_dmg_factor: FloatValue,
    pub damages: DamagesConfig,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        let parameters = CobbDouglasParameters::default();
        Self {
            alpha: parameters.alpha,
            dk: parameters.dk,
            sr: parameters.sr,
            elasmu: parameters.elasmu,
            disutility_dmg_factor: parameters.disutility_dmg_factor,
            damages: DamagesConfig::default(),
        }
    }
}

/// `[economics.damages]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamagesConfig {
    pub ignore_damages: bool,
    /// Quantile of the damage distribution selecting the COACCH scaling factors
    pub quantile: FloatValue,
    /// Use the sea-level rise damage variant that includes adaptation
    pub coacch_slr_withadapt: bool,
}

impl Default for DamagesConfig {
    fn default() -> Self {
        Self {
            ignore_damages: false,
            quantile: DEFAULT_QUANTILE,
            coacch_slr_withadapt: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    /// Initial capital stock as a multiple of baseline GDP
    pub init_capital_factor: FloatValue,
}

impl IamConfig {
    pub fn from_toml(content: &str) -> RSIAMResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> RSIAMResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RSIAMError::ConfigError(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn cobb_douglas_parameters(&self) -> CobbDouglasParameters {
        let economics = &self.economics;
        CobbDouglasParameters {
            alpha: economics.alpha,
            dk: economics.dk,
            sr: economics.sr,
            elasmu: economics.elasmu,
            disutility_dmg_factor: economics.disutility_dmg_factor,
            ignore_damages: economics.damages.ignore_damages,
            init_capitalstock_factor: self
                .regions
                .iter()
                .map(|(name, region)| (name.clone(), region.init_capital_factor))
                .collect(),
        }
    }

    /// A builder with the time axis, regions, `T0` and both components configured
    ///
    /// The damage component is left out when damages are ignored and no calibration table is
    /// provided.
    pub fn into_builder(&self) -> RSIAMResult<ModelBuilder> {
        let mut builder = ModelBuilder::new();
        builder
            .with_time_axis(self.time.time_axis()?)
            .with_regions(self.regions.keys().cloned().collect())
            .with_t0(self.temperature.initial)
            .with_component(Arc::new(CobbDouglas::from_parameters(
                self.cobb_douglas_parameters(),
            )?));

        let damages = &self.economics.damages;
        let skip_damages = damages.ignore_damages && self.coacch.regions().next().is_none();
        if !skip_damages {
            let parameters = self
                .coacch
                .select(damages.quantile, damages.coacch_slr_withadapt)?;
            builder.with_component(Arc::new(Coacch::from_parameters(parameters)?));
        }

        info!(
            "Configured model for {} regions (damages: {})",
            self.regions.len(),
            if skip_damages { "none" } else { "COACCH" }
        );
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::damages::DamageForm;
    use ndarray::Array2;
    use rsiam_core::standard_variables::{VAR_ABATEMENT_COSTS, VAR_TEMPERATURE, VAR_TOTAL_SLR};

    const CONFIG: &str = r#"
        [time]
        start = 2020
        end = 2030
        dt = 5

        [temperature]
        initial = 1.2

        [economics]
        sr = 0.25

        [economics.damages]
        quantile = 0.95
        coacch_slr_withadapt = false

        [regions.EU]
        init_capital_factor = 2.8

        [regions.USA]
        init_capital_factor = 2.6

        [coacch.EU]
        NoSLR_form = "Linear"
        NoSLR_b1 = 0.1
        "NoSLR_a (q=0.95)" = 1.4
        SLR-NoAd_form = "Linear"
        SLR-NoAd_b1 = 0.3
        "SLR-NoAd_a (q=0.95)" = 1.0

        [coacch.USA]
        NoSLR_form = "Quadratic"
        NoSLR_b1 = 0.1
        NoSLR_b2 = 0.05
        "NoSLR_a (q=0.95)" = 1.2
        SLR-NoAd_form = "Linear"
        SLR-NoAd_b1 = 0.2
        "SLR-NoAd_a (q=0.95)" = 1.0
    "#;

    #[test]
    fn parse() {
        let config = IamConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.time.time_axis().unwrap().len(), 3);
        assert_eq!(config.temperature.initial, 1.2);
        assert_eq!(config.economics.sr, 0.25);
        assert_eq!(config.economics.alpha, 0.3);
        assert!(!config.economics.damages.ignore_damages);
        assert_eq!(
            config.regions.keys().collect::<Vec<_>>(),
            vec!["EU", "USA"]
        );

        let parameters = config.cobb_douglas_parameters();
        assert_eq!(parameters.init_capitalstock_factor["USA"], 2.6);

        let coacch = config.coacch.select(0.95, false).unwrap();
        assert_eq!(coacch.noslr["USA"].form, DamageForm::Quadratic);
        assert_eq!(coacch.noslr["EU"].a, 1.4);
    }

    #[test]
    fn defaults() {
        let config = IamConfig::from_toml("[regions.EU]\ninit_capital_factor = 3.0").unwrap();
        assert_eq!(config.time, TimeConfig::default());
        assert_eq!(config.economics, EconomicsConfig::default());
        assert_eq!(config.economics.damages.quantile, 0.5);
        assert!(config.economics.damages.coacch_slr_withadapt);
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            IamConfig::from_toml("[regions.EU]\ninit_capital_factor = \"high\""),
            Err(RSIAMError::ConfigError(_))
        ));
        assert!(matches!(
            IamConfig::from_toml(
                "[economics]\nsavings = 0.2\n[regions.EU]\ninit_capital_factor = 3.0"
            ),
            Err(RSIAMError::ConfigError(_))
        ));
    }

    #[test]
    fn builder_requires_calibration() {
        let short_run =
            "[time]\nstart = 2020\nend = 2030\ndt = 5\n[regions.EU]\ninit_capital_factor = 3.0\n";

        // Damages are enabled but the calibration table has no row for the region
        let config = IamConfig::from_toml(short_run).unwrap();
        let mut builder = config.into_builder().unwrap();
        builder
            .with_fixed_variable(VAR_TEMPERATURE, Array2::from_elem((3, 1), 1.5))
            .with_fixed_variable(VAR_TOTAL_SLR, Array2::zeros((3, 1)))
            .with_fixed_variable(VAR_ABATEMENT_COSTS, Array2::zeros((3, 1)));
        assert!(matches!(
            builder.build(),
            Err(RSIAMError::MissingRegionalParameter { .. })
        ));

        let config = IamConfig::from_toml(&format!(
            "[economics.damages]\nignore_damages = true\n{}",
            short_run
        ))
        .unwrap();
        assert!(config.into_builder().is_ok());
    }
}
