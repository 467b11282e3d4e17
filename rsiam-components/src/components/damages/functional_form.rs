use rsiam_core::errors::RSIAMError;
use rsiam_core::expr::Real;
use rsiam_core::smooth::soft_max;
use rsiam_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the exponent of the logistic form, avoiding overflow of `exp`
const LOGISTIC_MAX_EXPONENT: FloatValue = 10.0;
const LOGISTIC_SOFT_MAX_SCALE: FloatValue = 0.1;

/// Shape of a COACCH damage function
///
/// Calibration tables label the forms with free text (e.g. `"Quadratic"` or
/// `"Logistic (fitted)"`). A tag selects the first form whose name it contains, checked in the
/// order `Linear`, `Quadratic`, `Logistic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DamageForm {
    Linear,
    Quadratic,
    Logistic,
}

impl FromStr for DamageForm {
    type Err = RSIAMError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        [
            DamageForm::Linear,
            DamageForm::Quadratic,
            DamageForm::Logistic,
        ]
        .into_iter()
        .find(|form| tag.contains(form.name()))
        .ok_or_else(|| RSIAMError::UnknownDamageForm(tag.to_string()))
    }
}

impl TryFrom<String> for DamageForm {
    type Error = RSIAMError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<DamageForm> for String {
    fn from(form: DamageForm) -> Self {
        form.name().to_string()
    }
}

impl fmt::Display for DamageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl DamageForm {
    pub fn name(&self) -> &'static str {
        match self {
            DamageForm::Linear => "Linear",
            DamageForm::Quadratic => "Quadratic",
            DamageForm::Logistic => "Logistic",
        }
    }
}

/// Coefficients of one damage channel for one region
///
/// `b2` and `b3` are only used by some forms. `a` scales the function to the selected
/// quantile of the damage distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageFunctionParameters {
    pub form: DamageForm,
    pub b1: FloatValue,
    #[serde(default)]
    pub b2: FloatValue,
    #[serde(default)]
    pub b3: FloatValue,
    pub a: FloatValue,
}

impl DamageFunctionParameters {
    /// Damages in percent of GDP divided by 100, i.e. as a fraction of GDP
    ///
    /// - Linear: $a \cdot b_1 x / 100$
    /// - Quadratic: $a (b_1 x + b_2 x^2) / 100$
    /// - Logistic: $a \cdot logistic(x) / 100$, see [`logistic`]
    pub fn evaluate<T: Real>(&self, x: T) -> T {
        let damage = match self.form {
            DamageForm::Linear => x * self.b1,
            DamageForm::Quadratic => x.clone() * self.b1 + x.clone() * x * self.b2,
            DamageForm::Logistic => logistic(x, self.b1, self.b2, self.b3),
        };
        damage * self.a / 100.0
    }
}

/// Logistic damage curve, shifted to pass through zero
///
/// $$ \frac{b_1}{1 + b_2 e^{soft\\_max(-b_3 x, 10)}} - \frac{b_1}{1 + b_2} $$
pub fn logistic<T: Real>(x: T, b1: FloatValue, b2: FloatValue, b3: FloatValue) -> T {
    let exponent = soft_max(x * -b3, LOGISTIC_MAX_EXPONENT, LOGISTIC_SOFT_MAX_SCALE);
    T::from(b1) / (exponent.exp() * b2 + 1.0) - b1 / (1.0 + b2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parameters(form: DamageForm) -> DamageFunctionParameters {
        DamageFunctionParameters {
            form,
            b1: 0.5,
            b2: 2.0,
            b3: 0.8,
            a: 1.2,
        }
    }

    #[test]
    fn parse_tags() {
        assert_eq!("Linear".parse::<DamageForm>().unwrap(), DamageForm::Linear);
        assert_eq!(
            "Quadratic (no SLR)".parse::<DamageForm>().unwrap(),
            DamageForm::Quadratic
        );
        assert_eq!(
            "Logistic".parse::<DamageForm>().unwrap(),
            DamageForm::Logistic
        );
        assert!(matches!(
            "Exponential".parse::<DamageForm>(),
            Err(RSIAMError::UnknownDamageForm(_))
        ));
        // Matching is case sensitive
        assert!("quadratic".parse::<DamageForm>().is_err());
    }

    #[test]
    fn deserialise_tag() {
        let parameters: DamageFunctionParameters =
            serde_json::from_str(r#"{"form": "Linear", "b1": 0.3, "a": 1.0}"#).unwrap();
        assert_eq!(parameters.form, DamageForm::Linear);
        assert_eq!(parameters.b2, 0.0);

        let result: Result<DamageFunctionParameters, _> =
            serde_json::from_str(r#"{"form": "Cubic", "b1": 0.3, "a": 1.0}"#);
        assert!(result.unwrap_err().to_string().contains("Cubic"));
    }

    #[test]
    fn zero_at_origin() {
        for form in [DamageForm::Linear, DamageForm::Quadratic, DamageForm::Logistic] {
            assert_relative_eq!(parameters(form).evaluate(0.0), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn quadratic_unit_case() {
        let parameters = DamageFunctionParameters {
            form: DamageForm::Quadratic,
            b1: 0.0,
            b2: 1.0,
            b3: 0.0,
            a: 1.0,
        };
        assert_eq!(parameters.evaluate(10.0), 1.0);
    }

    #[test]
    fn linear() {
        assert_relative_eq!(parameters(DamageForm::Linear).evaluate(2.0), 1.2 * 0.5 * 2.0 / 100.0);
    }

    #[test]
    fn logistic_saturates() {
        // For large x the exponential vanishes and damages approach a * (b1 - b1 / (1 + b2)) / 100
        let parameters = parameters(DamageForm::Logistic);
        let limit = 1.2 * (0.5 - 0.5 / 3.0) / 100.0;
        assert_relative_eq!(parameters.evaluate(100.0), limit, max_relative = 1e-9);
        assert!(parameters.evaluate(1.0) < limit);
    }

    #[test]
    fn logistic_is_bounded_for_negative_input() {
        // The exponent is capped near 10 so large negative inputs stay finite
        let value = parameters(DamageForm::Logistic).evaluate(-1000.0);
        assert!(value.is_finite());
        let capped = 1.2 * (0.5 / (1.0 + 2.0 * 10.0_f64.exp()) - 0.5 / 3.0) / 100.0;
        assert_relative_eq!(value, capped, max_relative = 1e-6);
    }
}
