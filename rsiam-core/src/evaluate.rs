//! Fixed-point evaluation of explicit constraint systems.
//!
//! This is not a general optimiser. It evaluates systems where every equation has the form
//! `variable == expression`, which is the case for the equations of the economics and damage
//! components when the climate and mitigation trajectories are fixed.
//!
//! Equations are grouped by time step. Each step is solved with Gauss-Seidel sweeps: every
//! equation assigns its right hand side to its left hand side variable, in registration order,
//! until the largest relative change in a sweep falls below the tolerance. Because the capital
//! recurrence is implicit in the current capital stock, a single sweep is not enough in general.

use crate::constraint::{ConcreteConstraint, ConstraintSet};
use crate::context::ModelContext;
use crate::errors::{RSIAMError, RSIAMResult};
use crate::expr::Expr;
use crate::timeseries::FloatValue;
use crate::values::VariableValues;
use crate::variable::VarRef;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings for [`FixedPointEvaluator::evaluate`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedPointEvaluator {
    /// Maximum number of sweeps per time step
    ///
    /// Default: 1000
    pub max_iterations: usize,
    /// Convergence threshold on $|x_{new} - x_{old}| / (1 + |x_{old}|)$
    ///
    /// Default: 1e-12
    pub tolerance: FloatValue,
}

impl Default for FixedPointEvaluator {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
        }
    }
}

struct Assignment<'a> {
    target: &'a VarRef,
    expression: &'a Expr,
    constraint: &'a ConcreteConstraint,
}

impl FixedPointEvaluator {
    pub fn new(max_iterations: usize, tolerance: FloatValue) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Evaluate every variable of the constraint set.
    ///
    /// Returns an error if an equation is not explicit, assigns to a fixed variable or to a
    /// variable already assigned by another equation, produces a non-finite value or if a
    /// time step does not converge.
    pub fn evaluate(
        &self,
        m: &ModelContext,
        constraints: &ConstraintSet,
    ) -> RSIAMResult<VariableValues> {
        constraints.validate(m)?;

        let mut steps: Vec<Vec<Assignment>> = (0..m.n_time()).map(|_| Vec::new()).collect();
        let mut assigned: HashMap<&VarRef, &ConcreteConstraint> = HashMap::new();

        for constraint in constraints.iter() {
            let target = constraint
                .equation
                .explicit_variable()
                .ok_or_else(|| RSIAMError::NotExplicit(constraint.label()))?;

            if m.declaration(&target.name).is_some_and(|d| d.is_fixed()) {
                return Err(RSIAMError::AssignsFixedVariable {
                    constraint: constraint.label(),
                    variable: target.to_string(),
                });
            }
            if let Some(previous) = assigned.insert(target, constraint) {
                return Err(RSIAMError::Error(format!(
                    "{} is assigned by both {} and {}",
                    target,
                    previous.label(),
                    constraint.label()
                )));
            }

            steps[constraint.time()].push(Assignment {
                target,
                expression: &constraint.equation.rhs,
                constraint,
            });
        }

        let mut values = VariableValues::from_context(m);
        for (t, assignments) in steps.iter().enumerate() {
            if assignments.is_empty() {
                continue;
            }
            let sweeps = self.solve_step(t, assignments, &mut values)?;
            debug!(
                "Time step {} ({}) converged after {} sweeps",
                t,
                m.year(t),
                sweeps
            );
        }

        info!(
            "Evaluated {} equations over {} time steps",
            constraints.len(),
            m.n_time()
        );
        Ok(values)
    }

    fn solve_step(
        &self,
        t: usize,
        assignments: &[Assignment],
        values: &mut VariableValues,
    ) -> RSIAMResult<usize> {
        let mut max_change = FloatValue::INFINITY;
        for sweep in 1..=self.max_iterations {
            max_change = 0.0;
            for assignment in assignments {
                let new = assignment.expression.evaluate(values)?;
                if !new.is_finite() {
                    return Err(RSIAMError::NonFiniteValue {
                        constraint: assignment.constraint.label(),
                    });
                }
                let old = values.value(assignment.target)?;
                max_change = max_change.max((new - old).abs() / (1.0 + old.abs()));
                values.set(assignment.target, new)?;
            }
            if max_change <= self.tolerance {
                return Ok(sweep);
            }
        }
        Err(RSIAMError::NotConverged {
            t,
            iterations: self.max_iterations,
            max_change,
        })
    }
}
