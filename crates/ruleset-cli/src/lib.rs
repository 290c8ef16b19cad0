//! CLI library components for the ruleset generator.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
