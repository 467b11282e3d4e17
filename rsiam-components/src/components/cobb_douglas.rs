//! Economic production block
//!
//! Regional output follows a Cobb-Douglas production function of capital and labour.
//! Net output is split between investments, which accumulate into the capital stock, and
//! consumption, which generates utility.
//!
//! Damages and abatement costs are read from other components (or fixed trajectories), so
//! this block only links them to output and welfare.

use crate::economics::{calc_dkdt, calc_gdp};
use indexmap::IndexMap;
use log::debug;
use rsiam_core::component::{Component, RequirementDefinition};
use rsiam_core::constraint::{GeneralConstraint, RegionalConstraint, RegionalInitConstraint};
use rsiam_core::context::ModelContext;
use rsiam_core::errors::{RSIAMError, RSIAMResult};
use rsiam_core::expr::Real;
use rsiam_core::smooth::soft_min;
use rsiam_core::standard_variables::{
    VAR_ABATEMENT_COSTS, VAR_CAPITAL_STOCK, VAR_CONSUMPTION, VAR_DAMAGE_COSTS, VAR_GDP_GROSS,
    VAR_GDP_LESS_MIT, VAR_GDP_NET, VAR_INVESTMENTS, VAR_UTILITY, VAR_UTILITY_LESS_MIT,
    VAR_UTILITY_ORIGINAL,
};
use rsiam_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Smoothing scale keeping the capital stock positive inside the production function
const CAPITAL_SOFT_MIN_SCALE: FloatValue = 10.0;
/// Smoothing scale keeping per-capita consumption positive inside the utility function
const CONSUMPTION_SOFT_MIN_SCALE: FloatValue = 1.0;

/// Parameters for the Cobb-Douglas production block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CobbDouglasParameters {
    /// Output elasticity of capital
    ///
    /// Default: 0.3
    pub alpha: FloatValue,
    /// Annual depreciation rate of capital
    ///
    /// Default: 0.05
    pub dk: FloatValue,
    /// Savings rate, the share of net output that is invested
    ///
    /// Default: 0.21
    pub sr: FloatValue,
    /// Elasticity of marginal utility of consumption. Must not equal 1.
    ///
    /// Default: 1.001
    pub elasmu: FloatValue,
    /// Share of the welfare loss from damages that enters `utility`, in `[0, 1]`
    ///
    /// Default: 1.0
    pub disutility_dmg_factor: FloatValue,
    /// Exclude damages from net output
    ///
    /// Default: false
    pub ignore_damages: bool,
    /// Initial capital stock as a multiple of baseline GDP, per region
    pub init_capitalstock_factor: IndexMap<String, FloatValue>,
}

impl Default for CobbDouglasParameters {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            dk: 0.05,
            sr: 0.21,
            elasmu: 1.001,
            disutility_dmg_factor: 1.0,
            ignore_damages: false,
            init_capitalstock_factor: IndexMap::new(),
        }
    }
}

impl CobbDouglasParameters {
    pub fn validate(&self) -> RSIAMResult<()> {
        check_unit_interval("sr", self.sr)?;
        check_unit_interval("disutility_dmg_factor", self.disutility_dmg_factor)?;
        if !self.elasmu.is_finite() || self.elasmu == 1.0 {
            return Err(RSIAMError::InvalidParameter {
                parameter: "elasmu".to_string(),
                reason: format!(
                    "must be finite and differ from 1 (logarithmic utility), got {}",
                    self.elasmu
                ),
            });
        }
        Ok(())
    }

    /// Initial capital factors ordered like the model regions
    fn capital_factors(&self, regions: &[String]) -> RSIAMResult<Vec<FloatValue>> {
        regions
            .iter()
            .map(|region| {
                self.init_capitalstock_factor
                    .get(region)
                    .copied()
                    .ok_or_else(|| RSIAMError::MissingRegionalParameter {
                        parameter: "init_capitalstock_factor".to_string(),
                        region: region.clone(),
                    })
            })
            .collect()
    }
}

fn check_unit_interval(parameter: &str, value: FloatValue) -> RSIAMResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RSIAMError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: format!("must lie in [0, 1], got {}", value),
        });
    }
    Ok(())
}

/// Cobb-Douglas output with the capital stock smoothly floored
///
/// Output stays finite and positive when the solver visits zero or negative capital.
pub fn calc_gross_gdp<T: Real>(tfp: T, population: T, capital: T, alpha: FloatValue) -> T {
    calc_gdp(tfp, population, soft_min(capital, CAPITAL_SOFT_MIN_SCALE), alpha)
}

/// Isoelastic utility of per-capita consumption
///
/// $$ U = \frac{\tilde{c}^{1 - \eta} - 1}{1 - \eta} - 1, \quad \tilde{c} = soft\\_min(C / L) $$
///
/// where $\eta$ is `elasmu`.
pub fn calc_utility<T: Real>(consumption: T, population: FloatValue, elasmu: FloatValue) -> T {
    (soft_min(consumption / population, CONSUMPTION_SOFT_MIN_SCALE).powf(T::from(1.0 - elasmu))
        - 1.0)
        / (1.0 - elasmu)
        - 1.0
}

/// Cobb-Douglas production, capital accumulation and utility
///
/// For every time step $t$ and region $r$:
///
/// $$ Y^{gross}_{t,r} = TFP \cdot L^{1-\alpha} \cdot soft\\_min(K_{t,r})^{\alpha} $$
/// $$ Y^{net}_{t,r} = Y^{gross}_{t,r} (1 - D_{t,r}) - A_{t,r} $$
/// $$ I_{t,r} = sr \cdot Y^{net}_{t,r}, \quad C_{t,r} = (1 - sr) \cdot Y^{net}_{t,r} $$
/// $$ K_{t,r} = K_{t-1,r} + dt \cdot \frac{dK}{dt}(K_{t,r}, I_{t,r}) $$
///
/// Where:
/// - $D$ is `damage_costs` as a share of gross output (zero if damages are ignored)
/// - $A$ is `abatement_costs`
///
/// The capital recurrence evaluates the depreciation at the current capital stock, so the
/// equation is implicit in $K_{t,r}$.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CobbDouglas {
    parameters: CobbDouglasParameters,
}

impl CobbDouglas {
    pub fn from_parameters(parameters: CobbDouglasParameters) -> RSIAMResult<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &CobbDouglasParameters {
        &self.parameters
    }
}

#[typetag::serde]
impl Component for CobbDouglas {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::input(&VAR_ABATEMENT_COSTS)];
        if !self.parameters.ignore_damages {
            definitions.push(RequirementDefinition::input(&VAR_DAMAGE_COSTS));
        }
        definitions.extend(
            [
                VAR_CAPITAL_STOCK,
                VAR_GDP_GROSS,
                VAR_GDP_NET,
                VAR_GDP_LESS_MIT,
                VAR_INVESTMENTS,
                VAR_CONSUMPTION,
                VAR_UTILITY,
                VAR_UTILITY_LESS_MIT,
                VAR_UTILITY_ORIGINAL,
            ]
            .iter()
            .map(RequirementDefinition::output),
        );
        definitions
    }

    fn get_constraints(&self, m: &mut ModelContext) -> RSIAMResult<Vec<GeneralConstraint>> {
        let factors = self.parameters.capital_factors(m.regions())?;

        m.declare_with_initial(VAR_CAPITAL_STOCK, |m, index| {
            let (t, r) = index.position();
            Ok(factors[r] * m.baseline_gdp(m.year(t), r)?)
        })?;
        m.declare_with_initial(VAR_GDP_GROSS, |m, index| {
            let (_, r) = index.position();
            m.baseline_gdp(m.year(0), r)
        })?;
        for variable in [
            VAR_GDP_NET,
            VAR_INVESTMENTS,
            VAR_CONSUMPTION,
            VAR_UTILITY,
            VAR_GDP_LESS_MIT,
            VAR_UTILITY_LESS_MIT,
            VAR_UTILITY_ORIGINAL,
        ] {
            m.declare(variable)?;
        }

        let CobbDouglasParameters {
            alpha,
            dk,
            sr,
            elasmu,
            disutility_dmg_factor,
            ignore_damages,
            ..
        } = self.parameters;
        let dt = m.dt();

        debug!(
            "Generating Cobb-Douglas equations for {} regions (ignore_damages: {})",
            m.n_regions(),
            ignore_damages
        );

        Ok(vec![
            RegionalConstraint::new("GDP_gross", move |m, t, r| {
                let year = m.year(t);
                Ok(VAR_GDP_GROSS.at(t, r).equals(calc_gross_gdp(
                    m.tfp(year, r)?.into(),
                    m.population(year, r)?.into(),
                    VAR_CAPITAL_STOCK.at(t, r),
                    alpha,
                )))
            })
            .into(),
            RegionalConstraint::new("GDP_net", move |_m, t, r| {
                let gross = VAR_GDP_GROSS.at(t, r);
                let after_damages = if ignore_damages {
                    gross
                } else {
                    gross * (1.0 - VAR_DAMAGE_COSTS.at(t, r))
                };
                Ok(VAR_GDP_NET
                    .at(t, r)
                    .equals(after_damages - VAR_ABATEMENT_COSTS.at(t, r)))
            })
            .into(),
            RegionalConstraint::new("GDP_less_mit", |_m, t, r| {
                Ok(VAR_GDP_LESS_MIT
                    .at(t, r)
                    .equals(VAR_GDP_GROSS.at(t, r) - VAR_ABATEMENT_COSTS.at(t, r)))
            })
            .into(),
            RegionalConstraint::new("investments", move |_m, t, r| {
                Ok(VAR_INVESTMENTS.at(t, r).equals(sr * VAR_GDP_NET.at(t, r)))
            })
            .into(),
            RegionalConstraint::new("consumption", move |_m, t, r| {
                Ok(VAR_CONSUMPTION
                    .at(t, r)
                    .equals((1.0 - sr) * VAR_GDP_NET.at(t, r)))
            })
            .into(),
            RegionalConstraint::new("utility_less_mitigation_costs", move |m, t, r| {
                let population = m.population(m.year(t), r)?;
                Ok(VAR_UTILITY_LESS_MIT.at(t, r).equals(calc_utility(
                    (1.0 - sr) * VAR_GDP_LESS_MIT.at(t, r),
                    population,
                    elasmu,
                )))
            })
            .into(),
            RegionalConstraint::new("utility_original", move |m, t, r| {
                let population = m.population(m.year(t), r)?;
                Ok(VAR_UTILITY_ORIGINAL.at(t, r).equals(calc_utility(
                    VAR_CONSUMPTION.at(t, r),
                    population,
                    elasmu,
                )))
            })
            .into(),
            RegionalConstraint::new("utility", move |_m, t, r| {
                let less_mit = VAR_UTILITY_LESS_MIT.at(t, r);
                Ok(VAR_UTILITY.at(t, r).equals(
                    less_mit.clone()
                        - disutility_dmg_factor * (less_mit - VAR_UTILITY_ORIGINAL.at(t, r)),
                ))
            })
            .into(),
            RegionalConstraint::with_skip("capital_stock", move |_m, t, r| {
                if t == 0 {
                    return Ok(None);
                }
                let capital = VAR_CAPITAL_STOCK.at(t, r);
                Ok(Some(capital.clone().equals(
                    VAR_CAPITAL_STOCK.at(t - 1, r)
                        + dt * calc_dkdt(capital, dk, VAR_INVESTMENTS.at(t, r), dt),
                )))
            })
            .into(),
            RegionalInitConstraint::new("capital_stock_init", move |m, r| {
                let gdp = m.baseline_gdp(m.year(0), r)?;
                Ok(VAR_CAPITAL_STOCK.at(0, r).equals(factors[r] * gdp))
            })
            .into(),
        ])
    }
}
