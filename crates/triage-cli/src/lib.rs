//! CLI library components for patient triage.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
