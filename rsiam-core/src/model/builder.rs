//! Model builder for constructing models from components.

use crate::constraint::ConstraintSet;
use crate::context::ModelContext;
use crate::errors::{RSIAMError, RSIAMResult};
use crate::timeseries::{FloatValue, RegionalTrajectory, TimeAxis};
use crate::variable::VariableDefinition;
use log::{debug, info};
use ndarray::Array2;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::HashMap;

use super::runtime::Model;
use super::types::{component_name, CGraph, C};

/// Build a new model from a set of components.
///
/// The builder generates a graph that defines the inter-component dependencies
/// and determines which variables must be supplied from outside the model.
/// Components generate their equations in the topological order of this graph.
pub struct ModelBuilder {
    components: Vec<C>,
    time_axis: TimeAxis,
    regions: Vec<String>,
    exogenous: Vec<(String, RegionalTrajectory)>,
    fixed: Vec<(VariableDefinition, Array2<FloatValue>)>,
    t0: FloatValue,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Create a new model builder with default settings.
    ///
    /// The default time axis covers 2020 to 2100 in 5 year steps. No regions are defined.
    pub fn new() -> Self {
        Self {
            components: vec![],
            time_axis: TimeAxis::new(2020.0, 5.0, 17),
            regions: vec![],
            exogenous: vec![],
            fixed: vec![],
            t0: 0.0,
        }
    }

    /// Specify the time axis that will be used by the model.
    pub fn with_time_axis(&mut self, time_axis: TimeAxis) -> &mut Self {
        self.time_axis = time_axis;
        self
    }

    pub fn with_regions(&mut self, regions: Vec<String>) -> &mut Self {
        self.regions = regions;
        self
    }

    /// Supply a year-indexed regional data trajectory (TFP, population, baseline GDP).
    ///
    /// Supplying a trajectory under an existing name replaces it.
    pub fn with_exogenous(&mut self, name: &str, trajectory: RegionalTrajectory) -> &mut Self {
        self.exogenous.retain(|(existing, _)| existing != name);
        self.exogenous.push((name.to_string(), trajectory));
        self
    }

    /// Supply the values of a variable that no component produces.
    ///
    /// `values` uses the `(time, region)` storage of the variable's domain.
    pub fn with_fixed_variable(
        &mut self,
        definition: VariableDefinition,
        values: Array2<FloatValue>,
    ) -> &mut Self {
        self.fixed.push((definition, values));
        self
    }

    /// Reference temperature against which temperature driven damages are anchored
    pub fn with_t0(&mut self, t0: FloatValue) -> &mut Self {
        self.t0 = t0;
        self
    }

    /// Register a component with the builder.
    pub fn with_component(&mut self, component: C) -> &mut Self {
        self.components.push(component);
        self
    }

    fn context(&self) -> RSIAMResult<ModelContext> {
        if self.regions.is_empty() {
            return Err(RSIAMError::Error(
                "A model requires at least one region".to_string(),
            ));
        }
        let mut m = ModelContext::new(self.time_axis.clone(), self.regions.clone());
        m.set_t0(self.t0);
        for (name, trajectory) in &self.exogenous {
            m.set_exogenous(name, trajectory.clone())?;
        }
        for (definition, values) in &self.fixed {
            m.fix(*definition, values.clone())?;
        }
        Ok(m)
    }

    /// Builds the component graph, generates the equations of every component and creates a
    /// concrete model.
    ///
    /// Returns an error if the component definitions are inconsistent, if a required variable
    /// is not available or if the generated equations reference undeclared variables.
    pub fn build(&self) -> RSIAMResult<Model> {
        let mut m = self.context()?;

        let mut graph: CGraph = Graph::new();
        let nodes: Vec<NodeIndex> = self
            .components
            .iter()
            .map(|component| graph.add_node(component.clone()))
            .collect();

        let mut producers: HashMap<String, NodeIndex> = HashMap::new();
        for (component, &node) in self.components.iter().zip(&nodes) {
            for output in component.outputs() {
                if m.is_declared(&output.name) {
                    return Err(RSIAMError::DuplicateProducer {
                        variable: output.name,
                        first: "fixed variables".to_string(),
                        second: component_name(component),
                    });
                }
                if let Some(&existing) = producers.get(&output.name) {
                    return Err(RSIAMError::DuplicateProducer {
                        variable: output.name,
                        first: component_name(&graph[existing]),
                        second: component_name(component),
                    });
                }
                producers.insert(output.name, node);
            }
        }

        for (component, &node) in self.components.iter().zip(&nodes) {
            for input in component.inputs() {
                match producers.get(&input.name) {
                    Some(&producer) => {
                        // Reading your own output is a recurrence, not a dependency
                        if producer != node {
                            graph.add_edge(producer, node, input);
                        }
                    }
                    None if m.is_declared(&input.name) => {}
                    None => {
                        return Err(RSIAMError::MissingExogenousVariable {
                            variable: input.name,
                            component: component_name(component),
                        })
                    }
                }
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            RSIAMError::CyclicDependency(component_name(&graph[cycle.node_id()]))
        })?;

        let mut general = Vec::new();
        for &node in &order {
            let component = &graph[node];
            let constraints = component.get_constraints(&mut m)?;
            for output in component.output_names() {
                if !m.is_declared(&output) {
                    return Err(RSIAMError::Error(format!(
                        "{} does not declare its output '{}'",
                        component_name(component),
                        output
                    )));
                }
            }
            debug!(
                "{} generated {} constraint rules",
                component_name(component),
                constraints.len()
            );
            general.extend(constraints);
        }

        let constraints = ConstraintSet::from_general(&m, &general)?;
        constraints.validate(&m)?;
        info!(
            "Built model with {} components, {} regions and {} equations",
            order.len(),
            m.n_regions(),
            constraints.len()
        );

        Ok(Model::new(graph, order, m, constraints))
    }
}
