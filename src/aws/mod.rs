//! AWS-backed collaborators
//!
//! ## Module Organization
//!
//! - `sts`: role assumption in the target account (`Authenticator`)
//! - `inventory`: RDS instance listing for a cluster (`InventoryClient`)
//! - `price_list`: Price List `GetProducts` lookups (`PriceResolver`)
//! - `cloudwatch`: `AWS/RDS` metric statistics (`TelemetryResolver`)
//!
//! RDS and CloudWatch clients are built from the assumed-role credentials
//! for the requested region. The Price List client uses the caller's own
//! credentials in the configured pricing region.

mod cloudwatch;
mod inventory;
mod price_list;
mod sts;

pub use cloudwatch::CloudWatchTelemetry;
pub use inventory::RdsInventory;
pub use price_list::PriceListResolver;
pub use sts::{assumed_role_config, role_arn, StsAuthenticator};

use crate::config::Config;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Default credential chain, caller's own identity
pub async fn caller_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// Caller's own identity in the Price List endpoint region
pub async fn pricing_config(config: &Config) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.pricing_region.clone()))
        .load()
        .await
}
