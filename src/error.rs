//! Error types for aurora-cost
//!
//! This module defines the error handling strategy for aurora-cost. There are two
//! error types: `CostError` (main error enum) and `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CostError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The conversion
//! happens at the CLI boundary, where `exit_codes` maps each variant to a
//! process exit code.
//!
//! ## No Partial Results
//!
//! Every variant aborts the current comparison. There is no retry and no
//! degraded output: a run either yields a fully populated `CostComparison`
//! or one of the errors below.
//!
//! ## When to Use Which Error
//!
//! - `Authorization`: the cross-account role could not be assumed
//! - `Inventory` / `Aws`: RDS, Pricing or CloudWatch API calls failed
//! - `NoPriceMatch` / `AmbiguousPrice`: the catalog did not resolve a filter
//!   to exactly one price
//! - `InvalidPriceDocument`: a catalog document could not be interpreted
//! - `MissingTelemetry`: a mandatory metric returned no data points
//! - `InvalidTelemetry`: a metric returned a negative or non-finite value
//! - `UnitMismatch`: a catalog unit does not fit the quantity it prices
//! - `NegativeContribution`: a cost line would decrease a running total
//! - `Validation`: request input failed validation

use thiserror::Error;

/// Main error type for aurora-cost
#[derive(Error, Debug)]
pub enum CostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authorization failed for role {role_arn}: {message}")]
    Authorization {
        role_arn: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Inventory lookup failed: {0}")]
    Inventory(String),

    #[error("AWS SDK error: {0}")]
    Aws(String),

    #[error("No catalog price matches filter: {filter}")]
    NoPriceMatch { filter: String },

    #[error("Ambiguous catalog price for filter {filter}: {matches} candidates")]
    AmbiguousPrice { filter: String, matches: usize },

    #[error("Invalid price document: {0}")]
    InvalidPriceDocument(String),

    #[error("No telemetry data points for {metric} on cluster {cluster}")]
    MissingTelemetry { metric: String, cluster: String },

    #[error("Invalid telemetry value {value} for {metric}")]
    InvalidTelemetry { metric: String, value: f64 },

    #[error("Unit mismatch: expected {expected}, catalog unit is {found}")]
    UnitMismatch { expected: String, found: String },

    #[error("Cost line {label} has invalid amount {amount}")]
    NegativeContribution { label: String, amount: f64 },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostError>;

impl CostError {
    /// True for errors caused by catalog or telemetry content rather than
    /// by the request, the config, or a failing API call.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            CostError::NoPriceMatch { .. }
                | CostError::AmbiguousPrice { .. }
                | CostError::InvalidPriceDocument(_)
                | CostError::MissingTelemetry { .. }
                | CostError::InvalidTelemetry { .. }
                | CostError::UnitMismatch { .. }
                | CostError::NegativeContribution { .. }
        )
    }
}
