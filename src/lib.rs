//! aurora-cost library
//!
//! Compares the monthly cost of an Aurora cluster under the Standard and
//! I/O-Optimized billing modes from live catalog prices and CloudWatch usage.

pub mod aws;
pub mod config;
pub mod cost;
pub mod error;
pub mod exit_codes;
pub mod model;
pub mod output;
pub mod pricing;
pub mod provider;
pub mod telemetry;
pub mod validation;
pub mod workflow;

// Re-export commonly used types
pub use cost::{BillingMode, CostAggregator, CostComparison, CostSummary, CostTotal};
pub use error::{CostError, Result};
pub use model::{Cluster, ComparisonRequest, Instance};
