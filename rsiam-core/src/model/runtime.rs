use crate::constraint::ConstraintSet;
use crate::context::ModelContext;
use crate::errors::RSIAMResult;
use crate::evaluate::FixedPointEvaluator;
use crate::values::VariableValues;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;

use super::types::{component_name, CGraph};

/// A coupled set of components and the equations they generate.
///
/// Components exchange variables rather than values. For example the damage component
/// produces `damage_costs`, which the production component reads to compute net output.
/// If the model has no component which produces a variable that another component reads,
/// the variable must be fixed from outside the model (e.g. the temperature trajectory).
///
/// The equations are generated once, when the model is built, against a single shared
/// [`ModelContext`].
pub struct Model {
    /// A directed graph with components as nodes and the edges defining the variable
    /// dependencies between them.
    components: CGraph,
    /// Order in which the components generated their equations
    order: Vec<NodeIndex>,
    context: ModelContext,
    constraints: ConstraintSet,
}

impl Model {
    pub(crate) fn new(
        components: CGraph,
        order: Vec<NodeIndex>,
        context: ModelContext,
        constraints: ConstraintSet,
    ) -> Self {
        Self {
            components,
            order,
            context,
            constraints,
        }
    }

    /// The shared context, including every declared variable
    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// All generated equations
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Names of the components in generation order
    pub fn component_names(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|&node| component_name(&self.components[node]))
            .collect()
    }

    /// Distinct constraint names in generation order
    pub fn constraint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for constraint in self.constraints.iter() {
            if !names.contains(&constraint.name) {
                names.push(constraint.name.clone());
            }
        }
        names
    }

    /// Evaluate the model for its fixed variables
    pub fn evaluate(&self, evaluator: &FixedPointEvaluator) -> RSIAMResult<VariableValues> {
        evaluator.evaluate(&self.context, &self.constraints)
    }

    /// Returns a directed graph of the component dependencies in Graphviz DOT format.
    ///
    /// Useful for debugging.
    pub fn as_dot(&self) -> Dot<'_, &CGraph> {
        Dot::with_attr_getters(
            &self.components,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, er| format!("label = {:?}", er.weight().name),
            &|_, (_, component)| format!("label = {:?}", component_name(component)),
        )
    }
}
