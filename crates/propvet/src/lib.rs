//! Research proposal intake, similarity vetting, and approval workflows.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
