//! Request and inventory types
//!
//! Shared types describing what is being compared: the cluster under
//! analysis and the compute instances that belong to it.

use crate::error::Result;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Invocation input: one cluster in one account and region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub account_id: String,
    pub region: String,
    pub cluster: String,
}

impl ComparisonRequest {
    pub fn new(
        account_id: impl Into<String>,
        region: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            cluster: cluster.into(),
        }
    }

    /// Read a request from a JSON file shaped like
    /// `{"account_id": "...", "region": "...", "cluster": "..."}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_account_id(&self.account_id)?;
        validation::validate_region(&self.region)?;
        validation::validate_cluster_id(&self.cluster)?;
        Ok(())
    }

    pub fn cluster(&self) -> Cluster {
        Cluster {
            identifier: self.cluster.clone(),
            region: self.region.clone(),
            account_id: self.account_id.clone(),
        }
    }
}

/// The database cluster under analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub identifier: String,
    pub region: String,
    pub account_id: String,
}

/// One compute node of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub identifier: String,
    /// e.g. `db.r6g.large`
    pub instance_class: String,
    pub cluster_identifier: String,
}

impl Instance {
    pub fn new(
        identifier: impl Into<String>,
        instance_class: impl Into<String>,
        cluster_identifier: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            instance_class: instance_class.into(),
            cluster_identifier: cluster_identifier.into(),
        }
    }
}
