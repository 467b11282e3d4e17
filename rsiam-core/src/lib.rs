pub mod component;
pub mod config;
pub mod constraint;
pub mod context;
pub mod evaluate;
#[cfg(test)]
mod example_components;
pub mod expr;
pub mod model;
pub mod python;
pub mod smooth;
pub mod standard_variables;
pub mod timeseries;
pub mod values;
pub mod variable;

pub mod errors;
