//! Exit code standardization for aurora-cost
//!
//! Provides consistent exit codes for different error types so scripts can
//! tell a bad request from an AWS failure or from unusable catalog data.
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid request input)
//! - `2` = System error (AWS API failure, role assumption, I/O)
//! - `3` = Configuration error (invalid or unparseable config)
//! - `4` = Data error (ambiguous or missing prices, missing telemetry, unit mismatch)

use crate::error::CostError;

/// Standard exit codes for aurora-cost
pub mod codes {
    /// Success
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (AWS API failure, network error)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 3;
    /// Catalog or telemetry data could not produce a comparison
    pub const DATA_ERROR: i32 = 4;
}

/// Map a CostError to an appropriate exit code
pub fn exit_code_for_error(error: &CostError) -> i32 {
    use CostError::*;
    match error {
        Config(_) => codes::CONFIG_ERROR,

        Validation { .. } => codes::USER_ERROR,

        Authorization { .. } => codes::SYSTEM_ERROR,
        Inventory(_) => codes::SYSTEM_ERROR,
        Aws(_) => codes::SYSTEM_ERROR,
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,

        NoPriceMatch { .. }
        | AmbiguousPrice { .. }
        | InvalidPriceDocument(_)
        | MissingTelemetry { .. }
        | InvalidTelemetry { .. }
        | UnitMismatch { .. }
        | NegativeContribution { .. } => codes::DATA_ERROR,
    }
}

/// Exit code for an error surfaced through `anyhow` at the CLI boundary
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CostError>())
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}
