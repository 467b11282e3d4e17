pub mod components;
pub mod config;
pub mod economics;
pub mod python;
