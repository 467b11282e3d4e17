use crate::component::{Component, RequirementDefinition};
use petgraph::Graph;
use std::sync::Arc;

/// Type alias for a component wrapped in an Arc for shared ownership.
pub type C = Arc<dyn Component>;

/// Component dependency graph. Edges point from the producer of a variable to its readers.
pub type CGraph = Graph<C, RequirementDefinition>;

/// Short name of a component taken from its `Debug` representation
pub(crate) fn component_name(component: &C) -> String {
    let debug = format!("{:?}", component);
    debug
        .split(['{', ' ', '('])
        .next()
        .unwrap_or("UnknownComponent")
        .to_string()
}
