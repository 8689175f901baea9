//! Input validation utilities
//!
//! Provides validation functions for request inputs so malformed account
//! IDs, regions or cluster identifiers fail before any AWS call is made.

use crate::error::{CostError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d$").expect("valid region regex")
    })
}

fn cluster_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("valid cluster regex"))
}

/// Validate AWS account ID format
///
/// Account IDs are exactly 12 decimal digits.
pub fn validate_account_id(account_id: &str) -> Result<()> {
    if account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(CostError::Validation {
            field: "account_id".to_string(),
            reason: format!("Account ID must be exactly 12 digits, got: {}", account_id),
        });
    }
    Ok(())
}

/// Validate AWS region code (e.g. `us-east-1`, `us-gov-west-1`)
pub fn validate_region(region: &str) -> Result<()> {
    if !region_pattern().is_match(region) {
        return Err(CostError::Validation {
            field: "region".to_string(),
            reason: format!("Not a valid AWS region code: {}", region),
        });
    }
    Ok(())
}

/// Validate DB cluster identifier
///
/// Cluster identifiers start with a letter, contain only letters, digits and
/// hyphens, are at most 63 characters, and never end with or contain two
/// consecutive hyphens.
pub fn validate_cluster_id(cluster: &str) -> Result<()> {
    if cluster.is_empty() || cluster.len() > 63 {
        return Err(CostError::Validation {
            field: "cluster".to_string(),
            reason: format!(
                "Cluster identifier must be 1-63 characters, got: {} (len: {})",
                cluster,
                cluster.len()
            ),
        });
    }

    if !cluster_pattern().is_match(cluster) || cluster.ends_with('-') || cluster.contains("--") {
        return Err(CostError::Validation {
            field: "cluster".to_string(),
            reason: format!(
                "Cluster identifier must start with a letter and contain only letters, digits and single hyphens, got: {}",
                cluster
            ),
        });
    }

    Ok(())
}
