pub mod config;
pub mod eligibility;
pub mod error;
pub mod loader;
pub mod telemetry;
