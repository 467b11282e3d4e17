//! Constraint descriptors.
//!
//! Components do not compute values. They return rules that generate an [`Equation`] for each
//! index of the model, tagged with the kind of indexing the rule uses:
//!
//! - [`RegionalConstraint`]: one equation per time step and region
//! - [`RegionalInitConstraint`]: one equation per region, applied at the first time step
//! - [`GlobalConstraint`]: one equation per time step
//! - [`GlobalInitConstraint`]: a single equation, applied at the first time step
//!
//! A rule may skip an index (for example a recurrence that has no predecessor at `t = 0`).
//! Expanding the rules over a [`ModelContext`] produces a [`ConstraintSet`] of named,
//! concrete equations. Names are used for reporting only.

use crate::context::ModelContext;
use crate::errors::{RSIAMError, RSIAMResult};
use crate::expr::{Equation, VariableLookup};
use crate::timeseries::FloatValue;
use crate::variable::Index;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An equation, or `None` when the index is skipped
type RuleResult = RSIAMResult<Option<Equation>>;
type RegionalRule = Box<dyn Fn(&ModelContext, usize, usize) -> RuleResult + Send + Sync>;
type RegionalInitRule = Box<dyn Fn(&ModelContext, usize) -> RuleResult + Send + Sync>;
type GlobalRule = Box<dyn Fn(&ModelContext, usize) -> RuleResult + Send + Sync>;
type GlobalInitRule = Box<dyn Fn(&ModelContext) -> RuleResult + Send + Sync>;

/// Equations over every time step `t` and region `r`
pub struct RegionalConstraint {
    name: String,
    rule: RegionalRule,
}

impl RegionalConstraint {
    pub fn new<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext, usize, usize) -> RSIAMResult<Equation> + Send + Sync + 'static,
    {
        Self::with_skip(name, move |m, t, r| rule(m, t, r).map(Some))
    }

    /// A constraint whose rule returns `None` for indices that should be skipped
    pub fn with_skip<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext, usize, usize) -> RSIAMResult<Option<Equation>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Box::new(rule),
        }
    }
}

/// Equations over every region, applied at the first time step
pub struct RegionalInitConstraint {
    name: String,
    rule: RegionalInitRule,
}

impl RegionalInitConstraint {
    pub fn new<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext, usize) -> RSIAMResult<Equation> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Box::new(move |m, r| rule(m, r).map(Some)),
        }
    }
}

/// Equations over every time step
pub struct GlobalConstraint {
    name: String,
    rule: GlobalRule,
}

impl GlobalConstraint {
    pub fn new<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext, usize) -> RSIAMResult<Equation> + Send + Sync + 'static,
    {
        Self::with_skip(name, move |m, t| rule(m, t).map(Some))
    }

    pub fn with_skip<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext, usize) -> RSIAMResult<Option<Equation>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Box::new(rule),
        }
    }
}

/// A single equation applied at the first time step
pub struct GlobalInitConstraint {
    name: String,
    rule: GlobalInitRule,
}

impl GlobalInitConstraint {
    pub fn new<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ModelContext) -> RSIAMResult<Equation> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Box::new(move |m| rule(m).map(Some)),
        }
    }
}

/// How a constraint is indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    Regional,
    RegionalInit,
    Global,
    GlobalInit,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Regional => write!(f, "RegionalConstraint"),
            ConstraintKind::RegionalInit => write!(f, "RegionalInitConstraint"),
            ConstraintKind::Global => write!(f, "GlobalConstraint"),
            ConstraintKind::GlobalInit => write!(f, "GlobalInitConstraint"),
        }
    }
}

/// Any of the constraint descriptors returned by a component
pub enum GeneralConstraint {
    Regional(RegionalConstraint),
    RegionalInit(RegionalInitConstraint),
    Global(GlobalConstraint),
    GlobalInit(GlobalInitConstraint),
}

impl GeneralConstraint {
    pub fn name(&self) -> &str {
        match self {
            GeneralConstraint::Regional(c) => &c.name,
            GeneralConstraint::RegionalInit(c) => &c.name,
            GeneralConstraint::Global(c) => &c.name,
            GeneralConstraint::GlobalInit(c) => &c.name,
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            GeneralConstraint::Regional(_) => ConstraintKind::Regional,
            GeneralConstraint::RegionalInit(_) => ConstraintKind::RegionalInit,
            GeneralConstraint::Global(_) => ConstraintKind::Global,
            GeneralConstraint::GlobalInit(_) => ConstraintKind::GlobalInit,
        }
    }

    /// Generate the concrete equations for every index of the context
    pub fn expand(&self, m: &ModelContext) -> RSIAMResult<Vec<ConcreteConstraint>> {
        let kind = self.kind();
        let name = self.name();
        let concrete = |index: Index, equation: Option<Equation>| {
            equation.map(|equation| ConcreteConstraint {
                name: name.to_string(),
                kind,
                index,
                equation,
            })
        };

        let mut expanded = Vec::new();
        match self {
            GeneralConstraint::Regional(c) => {
                for t in m.t() {
                    for r in 0..m.n_regions() {
                        expanded.extend(concrete(Index::TimeRegion(t, r), (c.rule)(m, t, r)?));
                    }
                }
            }
            GeneralConstraint::RegionalInit(c) => {
                for r in 0..m.n_regions() {
                    expanded.extend(concrete(Index::Region(r), (c.rule)(m, r)?));
                }
            }
            GeneralConstraint::Global(c) => {
                for t in m.t() {
                    expanded.extend(concrete(Index::Time(t), (c.rule)(m, t)?));
                }
            }
            GeneralConstraint::GlobalInit(c) => {
                expanded.extend(concrete(Index::Scalar, (c.rule)(m)?));
            }
        }
        Ok(expanded)
    }
}

impl fmt::Debug for GeneralConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.name())
    }
}

impl From<RegionalConstraint> for GeneralConstraint {
    fn from(c: RegionalConstraint) -> Self {
        GeneralConstraint::Regional(c)
    }
}

impl From<RegionalInitConstraint> for GeneralConstraint {
    fn from(c: RegionalInitConstraint) -> Self {
        GeneralConstraint::RegionalInit(c)
    }
}

impl From<GlobalConstraint> for GeneralConstraint {
    fn from(c: GlobalConstraint) -> Self {
        GeneralConstraint::Global(c)
    }
}

impl From<GlobalInitConstraint> for GeneralConstraint {
    fn from(c: GlobalInitConstraint) -> Self {
        GeneralConstraint::GlobalInit(c)
    }
}

/// A single equation generated by a constraint rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub index: Index,
    pub equation: Equation,
}

impl ConcreteConstraint {
    /// Name and index, e.g. `GDP_net[3,1]`
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.index)
    }

    /// Time step the equation belongs to
    ///
    /// Initialisation constraints belong to the first time step.
    pub fn time(&self) -> usize {
        match self.kind {
            ConstraintKind::RegionalInit | ConstraintKind::GlobalInit => 0,
            ConstraintKind::Regional | ConstraintKind::Global => self.index.time().unwrap_or(0),
        }
    }
}

impl fmt::Display for ConcreteConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.equation)
    }
}

/// The expanded equations of a model, in registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSet {
    constraints: Vec<ConcreteConstraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a list of constraint descriptors over the context
    pub fn from_general(m: &ModelContext, general: &[GeneralConstraint]) -> RSIAMResult<Self> {
        let mut set = Self::new();
        for constraint in general {
            set.constraints.extend(constraint.expand(m)?);
        }
        Ok(set)
    }

    pub fn extend(&mut self, other: ConstraintSet) {
        self.constraints.extend(other.constraints);
    }

    /// Check that every referenced variable is declared and indexed within its domain
    pub fn validate(&self, m: &ModelContext) -> RSIAMResult<()> {
        for constraint in &self.constraints {
            for var in constraint.equation.variables() {
                let declaration = m
                    .declaration(&var.name)
                    .ok_or_else(|| RSIAMError::UnknownVariable(var.name.clone()))?;
                let domain = declaration.definition.domain;
                let (t, r) = var.index.position();
                let in_bounds = t < m.n_time().max(1) && r < m.n_regions().max(1);
                if var.index.domain() != domain || !in_bounds {
                    return Err(RSIAMError::InvalidIndex {
                        variable: var.name.clone(),
                        index: var.index.to_string(),
                        domain: domain.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConcreteConstraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Labels of all equations, e.g. `capital_stock[1,0]`
    pub fn labels(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.label()).collect()
    }

    /// Equations generated by the named constraint
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConcreteConstraint> {
        self.constraints.iter().filter(move |c| c.name == name)
    }

    /// Residual `lhs - rhs` of every equation
    pub fn residuals(
        &self,
        values: &impl VariableLookup,
    ) -> RSIAMResult<Vec<(String, FloatValue)>> {
        self.constraints
            .iter()
            .map(|c| Ok((c.label(), c.equation.residual(values)?)))
            .collect()
    }

    /// Largest absolute residual over all equations
    ///
    /// Non-finite residuals are reported and yield infinity.
    pub fn max_abs_residual(&self, values: &impl VariableLookup) -> RSIAMResult<FloatValue> {
        let mut largest: FloatValue = 0.0;
        for (label, residual) in self.residuals(values)? {
            if !residual.is_finite() {
                warn!("Residual of {} is not finite ({})", label, residual);
                return Ok(FloatValue::INFINITY);
            }
            largest = largest.max(residual.abs());
        }
        Ok(largest)
    }
}

impl IntoIterator for ConstraintSet {
    type Item = ConcreteConstraint;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.into_iter()
    }
}
