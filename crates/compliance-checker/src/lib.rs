//! Compliance self-assessment engine.
//!
//! Users declare the business activities they perform, answer the questions the catalog marks as
//! relevant to those activities, and receive a weighted per-module and overall compliance result.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
