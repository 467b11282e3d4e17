use crate::context::ModelContext;
use crate::errors::{RSIAMError, RSIAMResult};
use crate::expr::VariableLookup;
use crate::timeseries::FloatValue;
use crate::variable::VarRef;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values of every declared variable, stored as `(time, region)` arrays.
///
/// Dimensions that a variable's domain does not cover have length 1,
/// see [`Domain::shape`](crate::variable::Domain::shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableValues {
    values: HashMap<String, Array2<FloatValue>>,
}

impl VariableValues {
    /// Starting values for the variables declared in a context.
    ///
    /// Fixed variables take their provided values, declared initial values are used where
    /// present and everything else starts at zero.
    pub fn from_context(m: &ModelContext) -> Self {
        let values = m
            .declarations()
            .map(|declaration| {
                let shape = declaration
                    .definition
                    .domain
                    .shape(m.n_time(), m.n_regions());
                let values = declaration
                    .fixed
                    .clone()
                    .or_else(|| declaration.initial.clone())
                    .unwrap_or_else(|| Array2::zeros(shape));
                (declaration.name().to_string(), values)
            })
            .collect();
        Self { values }
    }

    /// All values of a variable
    pub fn get(&self, name: &str) -> Option<&Array2<FloatValue>> {
        self.values.get(name)
    }

    pub fn value(&self, var: &VarRef) -> RSIAMResult<FloatValue> {
        let (t, r) = var.index.position();
        self.values
            .get(&var.name)
            .ok_or_else(|| RSIAMError::UnknownVariable(var.name.clone()))?
            .get([t, r])
            .copied()
            .ok_or_else(|| self.invalid_index(var))
    }

    pub fn set(&mut self, var: &VarRef, value: FloatValue) -> RSIAMResult<()> {
        let (t, r) = var.index.position();
        let invalid = self.invalid_index(var);
        let element = self
            .values
            .get_mut(&var.name)
            .ok_or_else(|| RSIAMError::UnknownVariable(var.name.clone()))?
            .get_mut([t, r])
            .ok_or(invalid)?;
        *element = value;
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn into_inner(self) -> HashMap<String, Array2<FloatValue>> {
        self.values
    }

    fn invalid_index(&self, var: &VarRef) -> RSIAMError {
        let shape = self
            .values
            .get(&var.name)
            .map(|v| format!("{:?}", v.dim()))
            .unwrap_or_default();
        RSIAMError::InvalidIndex {
            variable: var.name.clone(),
            index: var.index.to_string(),
            domain: shape,
        }
    }
}

impl VariableLookup for VariableValues {
    fn lookup(&self, var: &VarRef) -> RSIAMResult<FloatValue> {
        self.value(var)
    }
}
