//! Python extension module bundling the core framework and the components.
//!
//! The Rust API lives in the `rsiam-core` and `rsiam-components` crates.

mod python;
