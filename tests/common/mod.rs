//! Fixture collaborators for cost comparison tests
//!
//! In-memory stand-ins for the inventory, price catalog and telemetry so
//! comparisons can be driven entirely from test data.

#![allow(dead_code)]

use async_trait::async_trait;
use aurora_cost::error::Result;
use aurora_cost::model::{ComparisonRequest, Instance};
use aurora_cost::pricing::{PriceFilter, PriceUnit, PricedSku};
use aurora_cost::provider::{InventoryClient, PriceResolver, TelemetryResolver};
use aurora_cost::telemetry::{DataPoint, MetricQuery, UsageWindow};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
pub const CLUSTER: &str = "orders";

pub fn request() -> ComparisonRequest {
    ComparisonRequest::new("123456789012", "us-east-1", CLUSTER)
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn instance(id: &str, class: &str) -> Instance {
    Instance::new(id, class, CLUSTER)
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub struct FixtureInventory(pub Vec<Instance>);

#[async_trait]
impl InventoryClient for FixtureInventory {
    async fn list_instances(&self, _cluster: &str) -> Result<Vec<Instance>> {
        Ok(self.0.clone())
    }
}

/// Catalog keyed by what a filter asks for; unknown filters match nothing
#[derive(Default)]
pub struct FixturePrices {
    skus: HashMap<String, Vec<PricedSku>>,
    pub lookups: Mutex<Vec<PriceFilter>>,
}

fn filter_key(filter: &PriceFilter) -> String {
    if let Some(storage) = filter.value_of("storage") {
        format!(
            "instance:{}:{}",
            filter.value_of("instanceType").unwrap_or_default(),
            storage
        )
    } else if let Some(volume_type) = filter.value_of("volumeType") {
        format!("volume:{}", volume_type)
    } else {
        "io".to_string()
    }
}

impl FixturePrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skus(mut self, key: &str, skus: Vec<PricedSku>) -> Self {
        self.skus.insert(key.to_string(), skus);
        self
    }

    pub fn instance(self, class: &str, standard_hourly: f64, io_optimized_hourly: f64) -> Self {
        self.with_skus(
            &format!("instance:{}:EBS Only", class),
            vec![PricedSku::single("STD", PriceUnit::PerHour, standard_hourly)],
        )
        .with_skus(
            &format!("instance:{}:Aurora IO Optimization Mode", class),
            vec![PricedSku::single("IOO", PriceUnit::PerHour, io_optimized_hourly)],
        )
    }

    pub fn storage(self, general_purpose: f64, io_optimized: f64) -> Self {
        self.with_skus(
            "volume:General Purpose-Aurora",
            vec![PricedSku::single("GP", PriceUnit::PerGbMonth, general_purpose)],
        )
        .with_skus(
            "volume:IO Optimized-Aurora",
            vec![PricedSku::single("IOV", PriceUnit::PerGbMonth, io_optimized)],
        )
    }

    pub fn io_requests(self, per_request: f64) -> Self {
        self.with_skus(
            "io",
            vec![PricedSku::single("IOREQ", PriceUnit::PerIo, per_request)],
        )
    }

    /// Storage at $0.10 / $0.225 per GB-month and I/O at $0.20 per million
    pub fn with_default_storage_and_io(self) -> Self {
        self.storage(0.10, 0.225).io_requests(0.0000002)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl PriceResolver for FixturePrices {
    async fn lookup(&self, filter: &PriceFilter) -> Result<Vec<PricedSku>> {
        self.lookups.lock().unwrap().push(filter.clone());
        Ok(self.skus.get(&filter_key(filter)).cloned().unwrap_or_default())
    }
}

/// Series keyed by metric name, one point per period from the window start
#[derive(Default)]
pub struct FixtureTelemetry {
    series: HashMap<String, Vec<f64>>,
}

impl FixtureTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(mut self, metric: &str, values: &[f64]) -> Self {
        self.series.insert(metric.to_string(), values.to_vec());
        self
    }

    pub fn volume_bytes(self, values: &[f64]) -> Self {
        self.series("VolumeBytesUsed", values)
    }

    pub fn read_ios(self, values: &[f64]) -> Self {
        self.series("VolumeReadIOPs", values)
    }

    pub fn write_ios(self, values: &[f64]) -> Self {
        self.series("VolumeWriteIOPs", values)
    }
}

#[async_trait]
impl TelemetryResolver for FixtureTelemetry {
    async fn query(&self, query: &MetricQuery) -> Result<UsageWindow> {
        let points = self
            .series
            .get(&query.metric_name)
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| DataPoint {
                        timestamp: query.start
                            + Duration::seconds(i64::from(query.period_secs) * (i as i64 + 1)),
                        value: *value,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(UsageWindow::new(query, points))
    }
}
