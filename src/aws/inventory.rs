//! Cluster inventory via RDS DescribeDBInstances

use crate::error::{CostError, Result};
use crate::model::Instance;
use crate::provider::InventoryClient;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::{DbInstance, Filter};
use aws_sdk_rds::Client as RdsClient;
use tracing::debug;

pub struct RdsInventory {
    client: RdsClient,
}

impl RdsInventory {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: RdsClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl InventoryClient for RdsInventory {
    async fn list_instances(&self, cluster: &str) -> Result<Vec<Instance>> {
        let filter = cluster_filter(cluster);

        let mut instances = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_db_instances()
                .filters(filter.clone())
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    CostError::Inventory(format!(
                        "Failed to describe DB instances for cluster {}: {}",
                        cluster,
                        DisplayErrorContext(&e)
                    ))
                })?;

            for db_instance in response.db_instances() {
                instances.push(db_instance_to_instance(db_instance, cluster)?);
            }

            match response.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        debug!(cluster = %cluster, count = instances.len(), "Listed cluster instances");
        Ok(instances)
    }
}

pub(crate) fn cluster_filter(cluster: &str) -> Filter {
    Filter::builder()
        .name("db-cluster-id")
        .values(cluster)
        .build()
}

/// Convert an RDS instance description, which must carry an instance class
pub(crate) fn db_instance_to_instance(db_instance: &DbInstance, cluster: &str) -> Result<Instance> {
    let identifier = db_instance.db_instance_identifier().unwrap_or("unknown");
    let instance_class = db_instance.db_instance_class().ok_or_else(|| {
        CostError::Inventory(format!("DB instance {} has no instance class", identifier))
    })?;

    Ok(Instance::new(
        identifier,
        instance_class,
        db_instance.db_cluster_identifier().unwrap_or(cluster),
    ))
}
