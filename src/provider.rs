//! Collaborator trait definitions
//!
//! The cost aggregator never talks to AWS directly. Everything it needs from
//! the outside world goes through the narrow traits below, so the aggregation
//! logic can run against fixture data in tests and against STS, RDS, the
//! Price List API and CloudWatch in production (see `crate::aws`).

use crate::error::Result;
use crate::model::Instance;
use crate::pricing::{PriceFilter, PricedSku};
use crate::telemetry::{MetricQuery, UsageWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// Short-lived credentials for the target account
#[derive(Clone)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Exchanges an account ID for credentials scoped to that account
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn assume_role(&self, account_id: &str) -> Result<TemporaryCredentials>;
}

/// Lists the instances of a cluster
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// May return an empty list for an unknown or empty cluster
    async fn list_instances(&self, cluster: &str) -> Result<Vec<Instance>>;
}

/// Resolves a catalog filter to every SKU that matches it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceResolver: Send + Sync {
    async fn lookup(&self, filter: &PriceFilter) -> Result<Vec<PricedSku>>;
}

/// Answers time-series statistic queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryResolver: Send + Sync {
    async fn query(&self, query: &MetricQuery) -> Result<UsageWindow>;
}
