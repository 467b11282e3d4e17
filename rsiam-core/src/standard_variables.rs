//! Standard variable definitions for rsiam.
//!
//! These are the variables exchanged between components and with the subsystems outside of
//! this crate (climate, mitigation). They are declared once here with the
//! [`define_variable!`](crate::define_variable) macro so that every component agrees on
//! names, units and domains.
//!
//! # Available Variables
//!
//! ## Economics
//! - `VAR_CAPITAL_STOCK`, `VAR_GDP_GROSS`, `VAR_GDP_NET`, `VAR_GDP_LESS_MIT`
//! - `VAR_INVESTMENTS`, `VAR_CONSUMPTION`
//! - `VAR_UTILITY`, `VAR_UTILITY_LESS_MIT`, `VAR_UTILITY_ORIGINAL`
//!
//! ## Damages
//! - `VAR_DAMAGE_COSTS`, `VAR_RESID_DAMAGES`, `VAR_SLR_DAMAGES`
//!
//! ## Provided by other subsystems
//! - `VAR_TEMPERATURE`, `VAR_TOTAL_SLR` (climate)
//! - `VAR_ABATEMENT_COSTS` (mitigation)

use crate::define_variable;
use crate::variable::{Domain, VariableDefinition};

// ============================================================================
// Economics
// ============================================================================

define_variable!(
    VAR_CAPITAL_STOCK,
    name = "capital_stock",
    unit = "trillion USD",
    domain = Domain::TimeRegion,
    description = "Capital stock",
);

define_variable!(
    VAR_GDP_GROSS,
    name = "GDP_gross",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Output before damages and abatement costs",
);

define_variable!(
    VAR_GDP_NET,
    name = "GDP_net",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Output after damages and abatement costs",
);

define_variable!(
    VAR_GDP_LESS_MIT,
    name = "GDP_less_mit",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Output after abatement costs only",
);

define_variable!(
    VAR_INVESTMENTS,
    name = "investments",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Share of net output that is invested",
);

define_variable!(
    VAR_CONSUMPTION,
    name = "consumption",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Share of net output that is consumed",
);

define_variable!(
    VAR_UTILITY,
    name = "utility",
    unit = "1",
    domain = Domain::TimeRegion,
    description = "Per-period social utility with a tunable share of damage disutility",
);

define_variable!(
    VAR_UTILITY_LESS_MIT,
    name = "utility_less_mit",
    unit = "1",
    domain = Domain::TimeRegion,
    description = "Utility when only abatement costs are deducted",
);

define_variable!(
    VAR_UTILITY_ORIGINAL,
    name = "utility_original",
    unit = "1",
    domain = Domain::TimeRegion,
    description = "Utility of consumption after damages and abatement costs",
);

// ============================================================================
// Damages
// ============================================================================

define_variable!(
    VAR_DAMAGE_COSTS,
    name = "damage_costs",
    unit = "fraction of GDP",
    domain = Domain::TimeRegion,
    description = "Total damage costs as a share of gross GDP",
);

define_variable!(
    VAR_RESID_DAMAGES,
    name = "resid_damages",
    unit = "fraction of GDP",
    domain = Domain::TimeRegion,
    description = "Temperature driven (non sea-level rise) damages",
);

define_variable!(
    VAR_SLR_DAMAGES,
    name = "SLR_damages",
    unit = "fraction of GDP",
    domain = Domain::TimeRegion,
    description = "Sea-level rise damages",
);

// ============================================================================
// Provided by other subsystems
// ============================================================================

define_variable!(
    VAR_TEMPERATURE,
    name = "temperature",
    unit = "delta_degC",
    domain = Domain::Time,
    description = "Global mean temperature above pre-industrial",
);

define_variable!(
    VAR_TOTAL_SLR,
    name = "total_SLR",
    unit = "m",
    domain = Domain::Time,
    description = "Total sea-level rise",
);

define_variable!(
    VAR_ABATEMENT_COSTS,
    name = "abatement_costs",
    unit = "trillion USD / yr",
    domain = Domain::TimeRegion,
    description = "Costs of emission reductions",
);

/// All standard variables
pub const STANDARD_VARIABLES: &[VariableDefinition] = &[
    VAR_CAPITAL_STOCK,
    VAR_GDP_GROSS,
    VAR_GDP_NET,
    VAR_GDP_LESS_MIT,
    VAR_INVESTMENTS,
    VAR_CONSUMPTION,
    VAR_UTILITY,
    VAR_UTILITY_LESS_MIT,
    VAR_UTILITY_ORIGINAL,
    VAR_DAMAGE_COSTS,
    VAR_RESID_DAMAGES,
    VAR_SLR_DAMAGES,
    VAR_TEMPERATURE,
    VAR_TOTAL_SLR,
    VAR_ABATEMENT_COSTS,
];

/// Look up a standard variable by name
pub fn find_standard_variable(name: &str) -> Option<&'static VariableDefinition> {
    STANDARD_VARIABLES.iter().find(|v| v.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = STANDARD_VARIABLES.iter().map(|v| v.name).collect();
        assert_eq!(names.len(), STANDARD_VARIABLES.len());
    }

    #[test]
    fn lookup() {
        let var = find_standard_variable("temperature").unwrap();
        assert_eq!(var.domain, Domain::Time);
        assert!(find_standard_variable("Surface Temperature").is_none());
    }
}
