//! The shared model context.
//!
//! All equations of an integrated assessment model reference a common space of indices,
//! parameters and variables. [`ModelContext`] holds this space: the time axis, the regions,
//! exogenous data trajectories and the declarations of every variable.
//!
//! Components receive the context by mutable reference when generating their constraints so
//! that they can declare the variables they produce. The constraint rules themselves only
//! receive a shared reference.

use crate::errors::{RSIAMError, RSIAMResult};
use crate::timeseries::{FloatValue, RegionalTrajectory, Time, TimeAxis};
use crate::variable::{Index, VariableDefinition};
use log::debug;
use ndarray::Array2;
use std::collections::HashMap;
use std::ops::Range;

/// Name of the total factor productivity trajectory
pub const EXOGENOUS_TFP: &str = "TFP";
/// Name of the population trajectory
pub const EXOGENOUS_POPULATION: &str = "population";
/// Name of the baseline GDP trajectory
pub const EXOGENOUS_GDP: &str = "GDP";

/// A variable declared in the context
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub definition: VariableDefinition,
    /// Starting values in `(time, region)` storage
    pub initial: Option<Array2<FloatValue>>,
    /// Values of a variable that is provided from outside the model and not solved for
    pub fixed: Option<Array2<FloatValue>>,
}

impl VariableDeclaration {
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }
}

/// Shared state that every component generates its equations against
#[derive(Debug, Clone)]
pub struct ModelContext {
    time_axis: TimeAxis,
    regions: Vec<String>,
    exogenous: HashMap<String, RegionalTrajectory>,
    variables: Vec<VariableDeclaration>,
    t0: FloatValue,
}

impl ModelContext {
    pub fn new(time_axis: TimeAxis, regions: Vec<String>) -> Self {
        Self {
            time_axis,
            regions,
            exogenous: HashMap::new(),
            variables: Vec::new(),
            t0: 0.0,
        }
    }

    /// Time step indices
    pub fn t(&self) -> Range<usize> {
        self.time_axis.indices()
    }

    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    pub fn n_time(&self) -> usize {
        self.time_axis.len()
    }

    /// Calendar year of time step `t`
    pub fn year(&self, t: usize) -> Time {
        self.time_axis.year(t)
    }

    /// Length of a time step in years
    pub fn dt(&self) -> Time {
        self.time_axis.dt()
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn region_index(&self, name: &str) -> RSIAMResult<usize> {
        self.regions
            .iter()
            .position(|r| r == name)
            .ok_or_else(|| RSIAMError::UnknownRegion(name.to_string()))
    }

    /// Reference temperature used to anchor temperature driven damages
    pub fn t0(&self) -> FloatValue {
        self.t0
    }

    pub fn set_t0(&mut self, t0: FloatValue) {
        self.t0 = t0;
    }

    // ========================================================================
    // Exogenous data
    // ========================================================================

    pub fn set_exogenous(&mut self, name: &str, trajectory: RegionalTrajectory) -> RSIAMResult<()> {
        if trajectory.n_regions() != self.n_regions() {
            return Err(RSIAMError::ShapeMismatch {
                name: name.to_string(),
                expected: (trajectory.years().len(), self.n_regions()),
                got: (trajectory.years().len(), trajectory.n_regions()),
            });
        }
        self.exogenous.insert(name.to_string(), trajectory);
        Ok(())
    }

    pub fn has_exogenous(&self, name: &str) -> bool {
        self.exogenous.contains_key(name)
    }

    /// Value of an exogenous trajectory for region `r` at a calendar year
    pub fn exogenous(&self, name: &str, year: Time, r: usize) -> RSIAMResult<FloatValue> {
        self.exogenous
            .get(name)
            .ok_or_else(|| RSIAMError::MissingExogenousData(name.to_string()))?
            .at(year, r)
    }

    /// Total factor productivity
    pub fn tfp(&self, year: Time, r: usize) -> RSIAMResult<FloatValue> {
        self.exogenous(EXOGENOUS_TFP, year, r)
    }

    /// Population
    pub fn population(&self, year: Time, r: usize) -> RSIAMResult<FloatValue> {
        self.exogenous(EXOGENOUS_POPULATION, year, r)
    }

    /// Baseline GDP
    pub fn baseline_gdp(&self, year: Time, r: usize) -> RSIAMResult<FloatValue> {
        self.exogenous(EXOGENOUS_GDP, year, r)
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// Declare a variable without initial values
    pub fn declare(&mut self, definition: VariableDefinition) -> RSIAMResult<()> {
        self.insert(VariableDeclaration {
            definition,
            initial: None,
            fixed: None,
        })
    }

    /// Declare a variable with starting values computed for every index of its domain
    pub fn declare_with_initial<F>(
        &mut self,
        definition: VariableDefinition,
        initialize: F,
    ) -> RSIAMResult<()>
    where
        F: Fn(&ModelContext, Index) -> RSIAMResult<FloatValue>,
    {
        let shape = definition.domain.shape(self.n_time(), self.n_regions());
        let mut values = Array2::zeros(shape);
        for index in definition.domain.indices(self.n_time(), self.n_regions()) {
            let (i, j) = index.position();
            values[[i, j]] = initialize(self, index)?;
        }
        self.insert(VariableDeclaration {
            definition,
            initial: Some(values),
            fixed: None,
        })
    }

    /// Declare a variable whose values are provided from outside the model
    pub fn fix(
        &mut self,
        definition: VariableDefinition,
        values: Array2<FloatValue>,
    ) -> RSIAMResult<()> {
        let expected = definition.domain.shape(self.n_time(), self.n_regions());
        if values.dim() != expected {
            return Err(RSIAMError::ShapeMismatch {
                name: definition.name.to_string(),
                expected,
                got: values.dim(),
            });
        }
        self.insert(VariableDeclaration {
            definition,
            initial: None,
            fixed: Some(values),
        })
    }

    fn insert(&mut self, declaration: VariableDeclaration) -> RSIAMResult<()> {
        if self.declaration(declaration.name()).is_some() {
            return Err(RSIAMError::DuplicateVariable(
                declaration.name().to_string(),
            ));
        }
        debug!(
            "Declared variable {} over {} (fixed: {})",
            declaration.name(),
            declaration.definition.domain,
            declaration.is_fixed()
        );
        self.variables.push(declaration);
        Ok(())
    }

    pub fn declaration(&self, name: &str) -> Option<&VariableDeclaration> {
        self.variables.iter().find(|v| v.name() == name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.variables.iter()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declaration(name).is_some()
    }
}
