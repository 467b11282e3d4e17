//! A model is a set of components whose equations are generated against a shared context.
//!
//! The builder determines the order in which components generate their equations from the
//! variables each component reads and produces. Variables that are read but not produced by
//! any component must be supplied as fixed variables (for example the temperature trajectory
//! of a climate module or the abatement costs of a mitigation module).
//! If a required variable isn't provided, then the build step will fail.

mod builder;
mod runtime;
mod types;

pub use builder::ModelBuilder;
pub use runtime::Model;
pub use types::{CGraph, C};
