//! Cost aggregation for the Standard and I/O-Optimized billing modes
//!
//! A comparison is built in three passes over the same two running totals:
//!
//! 1. compute: every instance priced once per mode, times `hours_per_month`
//! 2. storage: the latest daily-maximum volume size priced per GB-month for
//!    each mode's volume type
//! 3. I/O: the 30-day read and write request sums priced per request, added
//!    to Standard only
//!
//! All prices come from a `PriceResolver` and all usage from a
//! `TelemetryResolver`, so the aggregator itself holds no AWS state.
//! Any failure aborts the comparison; there is no partial result.

use crate::config::Config;
use crate::error::{CostError, Result};
use crate::model::{Cluster, Instance};
use crate::pricing::{self, PriceFilter, Quantity, QuantityKind, UnitPrice};
use crate::provider::{PriceResolver, TelemetryResolver};
use crate::telemetry::{MetricQuery, Statistic};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    Standard,
    IoOptimized,
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingMode::Standard => write!(f, "Aurora Standard"),
            BillingMode::IoOptimized => write!(f, "Aurora I/O-Optimized"),
        }
    }
}

/// One priced contribution to a total
#[derive(Debug, Clone, PartialEq)]
pub struct CostLine {
    pub label: String,
    pub quantity: Quantity,
    pub unit_price: UnitPrice,
    pub amount: f64,
}

/// Running USD/month total for one billing mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTotal {
    usd: f64,
    lines: Vec<CostLine>,
}

impl CostTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price `quantity` and add it. Totals never decrease.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        quantity: Quantity,
        unit_price: &UnitPrice,
    ) -> Result<f64> {
        let label = label.into();
        let amount = unit_price.cost_of(quantity)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(CostError::NegativeContribution { label, amount });
        }
        self.usd += amount;
        self.lines.push(CostLine {
            label,
            quantity,
            unit_price: unit_price.clone(),
            amount,
        });
        Ok(amount)
    }

    pub fn usd(&self) -> f64 {
        self.usd
    }

    pub fn lines(&self) -> &[CostLine] {
        &self.lines
    }
}

/// Cheaper mode and how much it saves per month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub mode: BillingMode,
    pub monthly_savings: f64,
}

/// Invocation output shape: `{"standard": .., "io": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostSummary {
    pub standard: f64,
    pub io: f64,
}

/// Final result of one run
#[derive(Debug, Clone, PartialEq)]
pub struct CostComparison {
    cluster: Cluster,
    standard: CostTotal,
    io_optimized: CostTotal,
    instance_count: usize,
    storage_gb: f64,
    io_operations: f64,
}

impl CostComparison {
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn standard(&self) -> &CostTotal {
        &self.standard
    }

    pub fn io_optimized(&self) -> &CostTotal {
        &self.io_optimized
    }

    pub fn total(&self, mode: BillingMode) -> &CostTotal {
        match mode {
            BillingMode::Standard => &self.standard,
            BillingMode::IoOptimized => &self.io_optimized,
        }
    }

    /// Zero means the cluster had no instances and only storage and I/O were priced
    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn storage_gb(&self) -> f64 {
        self.storage_gb
    }

    pub fn io_operations(&self) -> f64 {
        self.io_operations
    }

    pub fn summary(&self) -> CostSummary {
        CostSummary {
            standard: self.standard.usd(),
            io: self.io_optimized.usd(),
        }
    }

    /// Standard wins ties since switching modes has no benefit then
    pub fn recommendation(&self) -> Recommendation {
        let standard = self.standard.usd();
        let io = self.io_optimized.usd();
        if io < standard {
            Recommendation {
                mode: BillingMode::IoOptimized,
                monthly_savings: standard - io,
            }
        } else {
            Recommendation {
                mode: BillingMode::Standard,
                monthly_savings: io - standard,
            }
        }
    }
}

/// Combines catalog prices and usage telemetry into a `CostComparison`
pub struct CostAggregator<'a, P: ?Sized, T: ?Sized> {
    prices: &'a P,
    telemetry: &'a T,
    config: &'a Config,
}

impl<'a, P, T> CostAggregator<'a, P, T>
where
    P: PriceResolver + ?Sized,
    T: TelemetryResolver + ?Sized,
{
    pub fn new(prices: &'a P, telemetry: &'a T, config: &'a Config) -> Self {
        Self {
            prices,
            telemetry,
            config,
        }
    }

    /// Price `instances` of `cluster` under both billing modes, with the
    /// telemetry windows ending at `now`.
    pub async fn compare(
        &self,
        cluster: &Cluster,
        instances: &[Instance],
        now: DateTime<Utc>,
    ) -> Result<CostComparison> {
        self.config.validate()?;

        let mut standard = CostTotal::new();
        let mut io_optimized = CostTotal::new();

        if instances.is_empty() {
            warn!(cluster = %cluster.identifier, "Cluster has no instances, pricing storage and I/O only");
        }
        self.add_compute(cluster, instances, &mut standard, &mut io_optimized)
            .await?;

        let storage_gb = self.storage_gb(cluster, now).await?;
        self.add_storage(cluster, storage_gb, &mut standard, &mut io_optimized)
            .await?;

        let io_operations = self.io_operations(cluster, now).await?;
        self.add_io(cluster, io_operations, &mut standard).await?;

        info!(
            cluster = %cluster.identifier,
            standard = standard.usd(),
            io_optimized = io_optimized.usd(),
            "Cost comparison complete"
        );

        Ok(CostComparison {
            cluster: cluster.clone(),
            standard,
            io_optimized,
            instance_count: instances.len(),
            storage_gb,
            io_operations,
        })
    }

    async fn unit_price(&self, filter: PriceFilter, kind: QuantityKind) -> Result<UnitPrice> {
        let skus = self.prices.lookup(&filter).await?;
        let sku = pricing::single_sku(&filter, skus)?;
        let price = pricing::extract_unit_price(&sku, kind, self.config.billing.price_selection)?;
        debug!(filter = %filter, sku = %sku.sku, usd = price.usd, unit = %price.unit, "Resolved unit price");
        Ok(price)
    }

    async fn add_compute(
        &self,
        cluster: &Cluster,
        instances: &[Instance],
        standard: &mut CostTotal,
        io_optimized: &mut CostTotal,
    ) -> Result<()> {
        let catalog = &self.config.catalog;
        let hours = Quantity::Hours(self.config.billing.hours_per_month);

        for instance in instances {
            if instance.cluster_identifier != cluster.identifier {
                return Err(CostError::Validation {
                    field: "instances".to_string(),
                    reason: format!(
                        "Instance {} belongs to cluster {}, not {}",
                        instance.identifier, instance.cluster_identifier, cluster.identifier
                    ),
                });
            }

            let label = format!("{} ({})", instance.identifier, instance.instance_class);

            let price = self
                .unit_price(
                    PriceFilter::instance(
                        catalog,
                        &cluster.region,
                        &instance.instance_class,
                        &catalog.standard_instance_storage,
                    ),
                    QuantityKind::Hours,
                )
                .await?;
            standard.add(label.clone(), hours, &price)?;

            let price = self
                .unit_price(
                    PriceFilter::instance(
                        catalog,
                        &cluster.region,
                        &instance.instance_class,
                        &catalog.io_optimized_instance_storage,
                    ),
                    QuantityKind::Hours,
                )
                .await?;
            io_optimized.add(label, hours, &price)?;
        }

        Ok(())
    }

    /// Latest hourly maximum of the cluster volume size, in GB
    async fn storage_gb(&self, cluster: &Cluster, now: DateTime<Utc>) -> Result<f64> {
        let telemetry = &self.config.telemetry;
        let query = MetricQuery::trailing(
            &telemetry.namespace,
            &telemetry.volume_bytes_metric,
            &telemetry.dimension_name,
            &cluster.identifier,
            now,
            Duration::hours(telemetry.storage_window_hours),
            telemetry.storage_period_secs,
            Statistic::Maximum,
        );
        let window = self.telemetry.query(&query).await?;

        let latest = window.latest().ok_or_else(|| CostError::MissingTelemetry {
            metric: query.metric_name.clone(),
            cluster: cluster.identifier.clone(),
        })?;
        if !latest.value.is_finite() || latest.value < 0.0 {
            return Err(CostError::InvalidTelemetry {
                metric: query.metric_name.clone(),
                value: latest.value,
            });
        }

        let gb = latest.value / self.config.billing.bytes_per_gb;
        debug!(cluster = %cluster.identifier, bytes = latest.value, gb, "Volume size");
        Ok(gb)
    }

    async fn add_storage(
        &self,
        cluster: &Cluster,
        storage_gb: f64,
        standard: &mut CostTotal,
        io_optimized: &mut CostTotal,
    ) -> Result<()> {
        let catalog = &self.config.catalog;
        let quantity = Quantity::GbMonths(storage_gb);

        let price = self
            .unit_price(
                PriceFilter::volume(catalog, &cluster.region, &catalog.io_optimized_volume_type),
                QuantityKind::GbMonths,
            )
            .await?;
        io_optimized.add("Storage (I/O-Optimized)", quantity, &price)?;

        let price = self
            .unit_price(
                PriceFilter::volume(catalog, &cluster.region, &catalog.standard_volume_type),
                QuantityKind::GbMonths,
            )
            .await?;
        standard.add("Storage (General Purpose)", quantity, &price)?;

        Ok(())
    }

    /// Read plus write requests over the I/O window; missing data counts as zero
    async fn io_operations(&self, cluster: &Cluster, now: DateTime<Utc>) -> Result<f64> {
        let telemetry = &self.config.telemetry;
        let mut total = 0.0;

        for metric in [&telemetry.read_io_metric, &telemetry.write_io_metric] {
            let query = MetricQuery::trailing(
                &telemetry.namespace,
                metric,
                &telemetry.dimension_name,
                &cluster.identifier,
                now,
                Duration::days(telemetry.io_window_days),
                telemetry.io_period_secs,
                Statistic::Sum,
            );
            let window = self.telemetry.query(&query).await?;
            if window.is_empty() {
                debug!(metric = %metric, cluster = %cluster.identifier, "No I/O data points");
            }
            let sum = window.sum();
            if !sum.is_finite() || sum < 0.0 {
                return Err(CostError::InvalidTelemetry {
                    metric: metric.clone(),
                    value: sum,
                });
            }
            total += sum;
        }

        Ok(total)
    }

    async fn add_io(
        &self,
        cluster: &Cluster,
        io_operations: f64,
        standard: &mut CostTotal,
    ) -> Result<()> {
        let price = self
            .unit_price(
                PriceFilter::io_operations(&self.config.catalog, &cluster.region),
                QuantityKind::IoOperations,
            )
            .await?;
        standard.add("I/O requests", Quantity::IoOperations(io_operations), &price)?;
        Ok(())
    }
}
