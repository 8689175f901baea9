//! End-to-end comparison workflow
//!
//! Orchestrates one invocation: validate the request, assume the role in the
//! target account, list the cluster's instances, then hand prices and
//! telemetry to the `CostAggregator`. Every step is awaited in order.

use crate::aws::{self, CloudWatchTelemetry, PriceListResolver, RdsInventory, StsAuthenticator};
use crate::config::Config;
use crate::cost::{CostAggregator, CostComparison};
use crate::error::Result;
use crate::model::ComparisonRequest;
use crate::provider::{Authenticator, InventoryClient, PriceResolver, TelemetryResolver};
use chrono::{DateTime, Utc};
use tracing::info;

/// Compare billing modes for `request` against the given collaborators
pub async fn compare_cluster(
    request: &ComparisonRequest,
    config: &Config,
    inventory: &dyn InventoryClient,
    prices: &dyn PriceResolver,
    telemetry: &dyn TelemetryResolver,
    now: DateTime<Utc>,
) -> Result<CostComparison> {
    request.validate()?;
    let cluster = request.cluster();

    let instances = inventory.list_instances(&cluster.identifier).await?;
    info!(
        cluster = %cluster.identifier,
        region = %cluster.region,
        instances = instances.len(),
        "Pricing cluster"
    );

    CostAggregator::new(prices, telemetry, config)
        .compare(&cluster, &instances, now)
        .await
}

/// Run a comparison against live AWS services
pub async fn run_comparison(request: &ComparisonRequest, config: &Config) -> Result<CostComparison> {
    request.validate()?;

    let caller = aws::caller_config().await;
    let authenticator = StsAuthenticator::new(&caller, &config.aws);
    let credentials = authenticator.assume_role(&request.account_id).await?;

    let account = aws::assumed_role_config(&credentials, &request.region).await;
    let inventory = RdsInventory::new(&account);
    let telemetry = CloudWatchTelemetry::new(&account);
    let prices = PriceListResolver::new(&aws::pricing_config(config).await);

    compare_cluster(request, config, &inventory, &prices, &telemetry, Utc::now()).await
}
