//! COACCH calibration table
//!
//! The calibration dataset has one row per region. Each damage channel is described by a set
//! of columns sharing a prefix:
//!
//! - `<prefix>_form`: functional form tag
//! - `<prefix>_b1`, `<prefix>_b2`, `<prefix>_b3`: shape coefficients
//! - `<prefix>_a (q=<quantile>)`: scaling factor for a quantile of the damage distribution
//!
//! Temperature driven damages use the prefix `NoSLR`. Sea-level rise damages come in two
//! variants, `SLR-Ad` (with adaptation, including its costs) and `SLR-NoAd`.

use super::coacch::CoacchParameters;
use super::functional_form::DamageFunctionParameters;
use indexmap::IndexMap;
use rsiam_core::errors::{RSIAMError, RSIAMResult};
use rsiam_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUANTILE: FloatValue = 0.5;

const PREFIX_NOSLR: &str = "NoSLR";
const PREFIX_SLR_ADAPTATION: &str = "SLR-Ad";
const PREFIX_SLR_NO_ADAPTATION: &str = "SLR-NoAd";

/// A single cell of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Number(FloatValue),
    Text(String),
}

/// Calibration rows keyed by region, then by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoacchTable {
    rows: IndexMap<String, IndexMap<String, TableValue>>,
}

impl CoacchTable {
    pub fn new(rows: IndexMap<String, IndexMap<String, TableValue>>) -> Self {
        Self { rows }
    }

    pub fn regions(&self) -> impl Iterator<Item = &String> {
        self.rows.keys()
    }

    /// Pick the damage coefficients of every region
    ///
    /// `slr_with_adaptation` selects the sea-level rise variant and `quantile` the scaling
    /// factor column of both channels.
    pub fn select(
        &self,
        quantile: FloatValue,
        slr_with_adaptation: bool,
    ) -> RSIAMResult<CoacchParameters> {
        let slr_prefix = if slr_with_adaptation {
            PREFIX_SLR_ADAPTATION
        } else {
            PREFIX_SLR_NO_ADAPTATION
        };

        let mut parameters = CoacchParameters::default();
        for (region, row) in &self.rows {
            let row = Row { region, row };
            parameters
                .noslr
                .insert(region.clone(), row.channel(PREFIX_NOSLR, quantile)?);
            parameters
                .slr
                .insert(region.clone(), row.channel(slr_prefix, quantile)?);
        }
        Ok(parameters)
    }
}

struct Row<'a> {
    region: &'a str,
    row: &'a IndexMap<String, TableValue>,
}

impl Row<'_> {
    fn channel(&self, prefix: &str, quantile: FloatValue) -> RSIAMResult<DamageFunctionParameters> {
        Ok(DamageFunctionParameters {
            form: self.text(&format!("{}_form", prefix))?.parse()?,
            b1: self.number(&format!("{}_b1", prefix))?,
            b2: self.optional_number(&format!("{}_b2", prefix))?,
            b3: self.optional_number(&format!("{}_b3", prefix))?,
            a: self.number(&format!("{}_a (q={:?})", prefix, quantile))?,
        })
    }

    fn get(&self, column: &str) -> RSIAMResult<&TableValue> {
        self.row
            .get(column)
            .ok_or_else(|| RSIAMError::MissingRegionalParameter {
                parameter: column.to_string(),
                region: self.region.to_string(),
            })
    }

    fn text(&self, column: &str) -> RSIAMResult<&str> {
        match self.get(column)? {
            TableValue::Text(value) => Ok(value),
            TableValue::Number(value) => Err(self.invalid(column, &value.to_string())),
        }
    }

    fn number(&self, column: &str) -> RSIAMResult<FloatValue> {
        match self.get(column)? {
            TableValue::Number(value) => Ok(*value),
            TableValue::Text(value) => value
                .trim()
                .parse()
                .map_err(|_| self.invalid(column, value)),
        }
    }

    /// Coefficients that only some forms use may be left out
    fn optional_number(&self, column: &str) -> RSIAMResult<FloatValue> {
        if self.row.contains_key(column) {
            self.number(column)
        } else {
            Ok(0.0)
        }
    }

    fn invalid(&self, column: &str, value: &str) -> RSIAMError {
        RSIAMError::ConfigError(format!(
            "unexpected value '{}' in column '{}' for region '{}'",
            value, column, self.region
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::damages::DamageForm;

    fn table() -> CoacchTable {
        toml::from_str(
            r#"
            [EU]
            NoSLR_form = "Quadratic"
            NoSLR_b1 = 0.1
            NoSLR_b2 = 0.2
            "NoSLR_a (q=0.5)" = 1.0
            "NoSLR_a (q=0.95)" = 2.5
            SLR-Ad_form = "Linear"
            SLR-Ad_b1 = 0.3
            "SLR-Ad_a (q=0.5)" = 1.1
            "SLR-Ad_a (q=0.95)" = 1.9
            SLR-NoAd_form = "Logistic"
            SLR-NoAd_b1 = 4.0
            SLR-NoAd_b2 = 50.0
            SLR-NoAd_b3 = "0.7"
            "SLR-NoAd_a (q=0.5)" = 1.3
            "#,
        )
        .unwrap()
    }

    #[test]
    fn select_with_adaptation() {
        let parameters = table().select(DEFAULT_QUANTILE, true).unwrap();

        let noslr = &parameters.noslr["EU"];
        assert_eq!(noslr.form, DamageForm::Quadratic);
        assert_eq!(noslr.b2, 0.2);
        assert_eq!(noslr.b3, 0.0);
        assert_eq!(noslr.a, 1.0);

        let slr = &parameters.slr["EU"];
        assert_eq!(slr.form, DamageForm::Linear);
        assert_eq!(slr.a, 1.1);
    }

    #[test]
    fn select_without_adaptation() {
        let parameters = table().select(DEFAULT_QUANTILE, false).unwrap();
        let slr = &parameters.slr["EU"];
        assert_eq!(slr.form, DamageForm::Logistic);
        assert_eq!(slr.b3, 0.7);
        assert_eq!(slr.a, 1.3);
    }

    #[test]
    fn select_quantile() {
        let parameters = table().select(0.95, true).unwrap();
        assert_eq!(parameters.noslr["EU"].a, 2.5);
        assert_eq!(parameters.slr["EU"].a, 1.9);

        // The variant without adaptation has no column for this quantile
        match table().select(0.95, false) {
            Err(RSIAMError::MissingRegionalParameter { parameter, region }) => {
                assert_eq!(parameter, "SLR-NoAd_a (q=0.95)");
                assert_eq!(region, "EU");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn unknown_form() {
        let mut table = table();
        table.rows["EU"].insert(
            "NoSLR_form".to_string(),
            TableValue::Text("Exponential".to_string()),
        );
        assert!(matches!(
            table.select(DEFAULT_QUANTILE, true),
            Err(RSIAMError::UnknownDamageForm(_))
        ));
    }
}
