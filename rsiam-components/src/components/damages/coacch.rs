//! COACCH damage functions
//!
//! Regional damages are the sum of two channels, each with its own calibrated functional form:
//! temperature driven damages and sea-level rise damages (including adaptation costs when the
//! adaptation variant of the calibration is selected).

use super::functional_form::DamageFunctionParameters;
use indexmap::IndexMap;
use log::debug;
use rsiam_core::component::{Component, RequirementDefinition};
use rsiam_core::constraint::{GeneralConstraint, RegionalConstraint};
use rsiam_core::context::ModelContext;
use rsiam_core::errors::{RSIAMError, RSIAMResult};
use rsiam_core::standard_variables::{
    VAR_DAMAGE_COSTS, VAR_RESID_DAMAGES, VAR_SLR_DAMAGES, VAR_TEMPERATURE, VAR_TOTAL_SLR,
};
use serde::{Deserialize, Serialize};

/// Per-region coefficients of both damage channels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoacchParameters {
    /// Temperature driven damages
    pub noslr: IndexMap<String, DamageFunctionParameters>,
    /// Sea-level rise damages
    pub slr: IndexMap<String, DamageFunctionParameters>,
}

impl CoacchParameters {
    fn channel(
        channel: &IndexMap<String, DamageFunctionParameters>,
        name: &str,
        regions: &[String],
    ) -> RSIAMResult<Vec<DamageFunctionParameters>> {
        regions
            .iter()
            .map(|region| {
                channel
                    .get(region)
                    .cloned()
                    .ok_or_else(|| RSIAMError::MissingRegionalParameter {
                        parameter: name.to_string(),
                        region: region.clone(),
                    })
            })
            .collect()
    }
}

/// COACCH damages as a fraction of gross GDP
///
/// $$ D^{resid}_{t,r} = f^{noslr}_r(T_t) - f^{noslr}_r(T_0) $$
/// $$ D^{SLR}_{t,r} = f^{slr}_r(SLR_t) $$
/// $$ D_{t,r} = D^{resid}_{t,r} + D^{SLR}_{t,r} $$
///
/// Where $T_t$ is the global temperature above pre-industrial, $T_0$ the temperature at the
/// start of the model run and $SLR_t$ the total sea-level rise. The forms $f$ are described by
/// [`DamageFunctionParameters`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coacch {
    parameters: CoacchParameters,
}

impl Coacch {
    /// Both damage channels must be calibrated for the same regions
    pub fn from_parameters(parameters: CoacchParameters) -> RSIAMResult<Self> {
        let unmatched = |channel: &IndexMap<String, DamageFunctionParameters>,
                         other: &IndexMap<String, DamageFunctionParameters>,
                         name: &str| {
            match other.keys().find(|region| !channel.contains_key(*region)) {
                Some(region) => Err(RSIAMError::MissingRegionalParameter {
                    parameter: name.to_string(),
                    region: region.clone(),
                }),
                None => Ok(()),
            }
        };
        unmatched(&parameters.noslr, &parameters.slr, "noslr")?;
        unmatched(&parameters.slr, &parameters.noslr, "slr")?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &CoacchParameters {
        &self.parameters
    }
}

#[typetag::serde]
impl Component for Coacch {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::input(&VAR_TEMPERATURE),
            RequirementDefinition::input(&VAR_TOTAL_SLR),
            RequirementDefinition::output(&VAR_RESID_DAMAGES),
            RequirementDefinition::output(&VAR_SLR_DAMAGES),
            RequirementDefinition::output(&VAR_DAMAGE_COSTS),
        ]
    }

    fn get_constraints(&self, m: &mut ModelContext) -> RSIAMResult<Vec<GeneralConstraint>> {
        let noslr = CoacchParameters::channel(&self.parameters.noslr, "noslr", m.regions())?;
        let slr = CoacchParameters::channel(&self.parameters.slr, "slr", m.regions())?;

        m.declare(VAR_DAMAGE_COSTS)?;
        m.declare(VAR_RESID_DAMAGES)?;
        m.declare(VAR_SLR_DAMAGES)?;

        debug!(
            "Generating COACCH damage equations for {} regions (T0 = {})",
            m.n_regions(),
            m.t0()
        );

        Ok(vec![
            // COACCH damage functions are calibrated against 1980-2005 temperatures rather than
            // pre-industrial. Anchoring at T0 only removes the damages already present at the
            // start of the run.
            RegionalConstraint::new("resid_damages", move |m, t, r| {
                let form = &noslr[r];
                Ok(VAR_RESID_DAMAGES
                    .at(t, r)
                    .equals(form.evaluate(VAR_TEMPERATURE.at_time(t)) - form.evaluate(m.t0())))
            })
            .into(),
            RegionalConstraint::new("SLR_damages", move |_m, t, r| {
                Ok(VAR_SLR_DAMAGES
                    .at(t, r)
                    .equals(slr[r].evaluate(VAR_TOTAL_SLR.at_time(t))))
            })
            .into(),
            RegionalConstraint::new("damage_costs", |_m, t, r| {
                Ok(VAR_DAMAGE_COSTS
                    .at(t, r)
                    .equals(VAR_RESID_DAMAGES.at(t, r) + VAR_SLR_DAMAGES.at(t, r)))
            })
            .into(),
        ])
    }
}
