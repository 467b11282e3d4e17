use crate::constraint::GeneralConstraint;
use crate::context::ModelContext;
use crate::errors::RSIAMResult;
use crate::variable::{Domain, VariableDefinition};
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[pyclass(eq, eq_int)]
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RequirementType {
    /// Read by the component's equations
    Input,
    /// Declared and constrained by the component
    Output,
}

#[pyclass]
#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
pub struct RequirementDefinition {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub unit: String,
    #[pyo3(get, set)]
    pub requirement_type: RequirementType,
    pub domain: Domain,
}

impl RequirementDefinition {
    pub fn new(name: &str, unit: &str, requirement_type: RequirementType, domain: Domain) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            requirement_type,
            domain,
        }
    }

    pub fn input(variable: &VariableDefinition) -> Self {
        Self::new(
            variable.name,
            variable.unit,
            RequirementType::Input,
            variable.domain,
        )
    }

    pub fn output(variable: &VariableDefinition) -> Self {
        Self::new(
            variable.name,
            variable.unit,
            RequirementType::Output,
            variable.domain,
        )
    }
}

#[pymethods]
impl RequirementDefinition {
    #[getter]
    fn domain(&self) -> String {
        self.domain.to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "RequirementDefinition(name={:?}, unit={:?}, requirement_type={:?}, domain={})",
            self.name, self.unit, self.requirement_type, self.domain
        )
    }
}

/// A block of model equations
///
/// A component declares the variables it produces on the shared [`ModelContext`] and returns
/// the constraints that determine them. It never computes values itself.
///
/// Components are serialisable via `typetag` so that a model can be stored together with its
/// parameterisation.
#[typetag::serde]
pub trait Component: Debug + Send + Sync {
    /// Variables read and produced by the component
    fn definitions(&self) -> Vec<RequirementDefinition>;

    fn inputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Input)
            .collect()
    }

    fn input_names(&self) -> Vec<String> {
        self.inputs().into_iter().map(|d| d.name).collect()
    }

    fn outputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Output)
            .collect()
    }

    fn output_names(&self) -> Vec<String> {
        self.outputs().into_iter().map(|d| d.name).collect()
    }

    /// Declare the component's outputs on the context and return its constraints
    ///
    /// Components are called in dependency order, so every variable produced by an upstream
    /// component is already declared when this runs.
    fn get_constraints(&self, m: &mut ModelContext) -> RSIAMResult<Vec<GeneralConstraint>>;
}
