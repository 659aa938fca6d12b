//! Warranty claim triage and retailer insight aggregation.

pub mod config;
pub mod error;
pub mod inference;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
