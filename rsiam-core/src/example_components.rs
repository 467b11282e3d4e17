use crate::component::{Component, RequirementDefinition};
use crate::constraint::{GeneralConstraint, RegionalConstraint};
use crate::context::ModelContext;
use crate::errors::RSIAMResult;
use crate::standard_variables::{VAR_DAMAGE_COSTS, VAR_GDP_NET, VAR_TEMPERATURE};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

// ============================================================================
// TestDamages - damages proportional to temperature
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TestDamagesParameters {
    pub damage_per_degree: FloatValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TestDamages {
    pub parameters: TestDamagesParameters,
}

impl TestDamages {
    pub fn from_parameters(parameters: TestDamagesParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for TestDamages {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::input(&VAR_TEMPERATURE),
            RequirementDefinition::output(&VAR_DAMAGE_COSTS),
        ]
    }

    fn get_constraints(&self, m: &mut ModelContext) -> RSIAMResult<Vec<GeneralConstraint>> {
        m.declare(VAR_DAMAGE_COSTS)?;

        let factor = self.parameters.damage_per_degree;
        Ok(vec![RegionalConstraint::new("damage_costs", move |_m, t, r| {
            Ok(VAR_DAMAGE_COSTS
                .at(t, r)
                .equals(VAR_TEMPERATURE.at_time(t) * factor))
        })
        .into()])
    }
}

// ============================================================================
// TestOutput - baseline GDP reduced by damages
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TestOutput {}

#[typetag::serde]
impl Component for TestOutput {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::input(&VAR_DAMAGE_COSTS),
            RequirementDefinition::output(&VAR_GDP_NET),
        ]
    }

    fn get_constraints(&self, m: &mut ModelContext) -> RSIAMResult<Vec<GeneralConstraint>> {
        m.declare(VAR_GDP_NET)?;

        Ok(vec![RegionalConstraint::new("GDP_net", |m, t, r| {
            let gdp = m.baseline_gdp(m.year(t), r)?;
            Ok(VAR_GDP_NET
                .at(t, r)
                .equals((1.0 - VAR_DAMAGE_COSTS.at(t, r)) * gdp))
        })
        .into()])
    }
}
