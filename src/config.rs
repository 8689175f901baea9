use crate::error::{ConfigError, CostError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Average hours in a month (8760 / 12).
pub const DEFAULT_HOURS_PER_MONTH: f64 = 730.0;
/// CloudWatch reports `VolumeBytesUsed` in bytes; catalog storage is priced per GiB.
pub const DEFAULT_BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
/// CloudWatch keeps hourly and daily statistics for 455 days.
pub const MAX_WINDOW_DAYS: i64 = 455;
/// Upper bound on data points a single `GetMetricStatistics` call returns.
pub const MAX_DATA_POINTS: i64 = 1440;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub aws: AwsConfig,
    pub catalog: CatalogConfig,
    pub billing: BillingConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Role assumed in the target account (`arn:aws:iam::<account>:role/<role_name>`)
    pub role_name: String,
    pub session_name: String,
    /// The Price List API is only served from a few regions
    pub pricing_region: String,
}

/// Attribute values used to build Price List filters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub service_code: String,
    /// 21 = Aurora PostgreSQL, 2 = Aurora MySQL
    pub engine_code: String,
    pub standard_instance_storage: String,
    pub io_optimized_instance_storage: String,
    pub standard_volume_type: String,
    pub io_optimized_volume_type: String,
    pub io_operation_group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub hours_per_month: f64,
    pub bytes_per_gb: f64,
    pub price_selection: PriceSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub namespace: String,
    pub dimension_name: String,
    pub volume_bytes_metric: String,
    pub read_io_metric: String,
    pub write_io_metric: String,
    pub storage_window_hours: i64,
    pub storage_period_secs: i32,
    pub io_window_days: i64,
    pub io_period_secs: i32,
}

/// How a single unit price is chosen when a SKU carries several priced dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSelection {
    /// Fail unless exactly one dimension is present
    #[default]
    Reject,
    /// Take the cheapest dimension whose unit fits the quantity
    Lowest,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            role_name: "readonly".to_string(),
            session_name: "aurora-cost".to_string(),
            pricing_region: "us-east-1".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            service_code: "AmazonRDS".to_string(),
            engine_code: "21".to_string(),
            standard_instance_storage: "EBS Only".to_string(),
            io_optimized_instance_storage: "Aurora IO Optimization Mode".to_string(),
            standard_volume_type: "General Purpose-Aurora".to_string(),
            io_optimized_volume_type: "IO Optimized-Aurora".to_string(),
            io_operation_group: "Aurora I/O Operation".to_string(),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
            bytes_per_gb: DEFAULT_BYTES_PER_GB,
            price_selection: PriceSelection::Reject,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            namespace: "AWS/RDS".to_string(),
            dimension_name: "DBClusterIdentifier".to_string(),
            volume_bytes_metric: "VolumeBytesUsed".to_string(),
            read_io_metric: "VolumeReadIOPs".to_string(),
            write_io_metric: "VolumeWriteIOPs".to_string(),
            storage_window_hours: 24,
            storage_period_secs: 3600,
            io_window_days: 30,
            io_period_secs: 86400,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .aurora-cost.toml in current dir, then ~/.config/aurora-cost/config.toml
            let local = PathBuf::from(".aurora-cost.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("aurora-cost").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".aurora-cost.toml"))
            }
        };

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            toml::from_str::<Config>(&content)
                .map_err(|e| CostError::Config(ConfigError::ParseError(e.to_string())))
                .with_context(|| {
                    let mut err = format!("Failed to parse config: {}", config_path.display());
                    err.push_str("\n  Common issues:");
                    err.push_str("\n    - Invalid TOML syntax");
                    err.push_str("\n    - Incorrect value types");
                    err.push_str("\n  Tip: Run 'aurora-cost init' to create a new config file");
                    err
                })?
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'aurora-cost init' to create a config file.");
            }
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Reject values that would make the cost arithmetic meaningless
    pub fn validate(&self) -> crate::error::Result<()> {
        let positive = [
            ("billing.hours_per_month", self.billing.hours_per_month),
            ("billing.bytes_per_gb", self.billing.bytes_per_gb),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {}", value)));
            }
        }

        let windows = [
            ("telemetry.storage_window_hours", self.telemetry.storage_window_hours),
            ("telemetry.io_window_days", self.telemetry.io_window_days),
            ("telemetry.storage_period_secs", i64::from(self.telemetry.storage_period_secs)),
            ("telemetry.io_period_secs", i64::from(self.telemetry.io_period_secs)),
        ];
        for (field, value) in windows {
            if value <= 0 {
                return Err(invalid(field, format!("must be greater than zero, got {}", value)));
            }
        }

        let telemetry = &self.telemetry;
        if telemetry.storage_window_hours > MAX_WINDOW_DAYS * 24 {
            return Err(invalid(
                "telemetry.storage_window_hours",
                format!("must be at most {} hours, got {}", MAX_WINDOW_DAYS * 24, telemetry.storage_window_hours),
            ));
        }
        if telemetry.io_window_days > MAX_WINDOW_DAYS {
            return Err(invalid(
                "telemetry.io_window_days",
                format!("must be at most {} days, got {}", MAX_WINDOW_DAYS, telemetry.io_window_days),
            ));
        }

        let series = [
            (
                "telemetry.storage_period_secs",
                telemetry.storage_window_hours * 3600,
                i64::from(telemetry.storage_period_secs),
            ),
            (
                "telemetry.io_period_secs",
                telemetry.io_window_days * 86400,
                i64::from(telemetry.io_period_secs),
            ),
        ];
        for (field, window_secs, period) in series {
            if period % 60 != 0 {
                return Err(invalid(field, format!("must be a multiple of 60, got {}", period)));
            }
            let points = (window_secs + period - 1) / period;
            if points > MAX_DATA_POINTS {
                return Err(invalid(
                    field,
                    format!(
                        "window needs {} data points at period {}, CloudWatch returns at most {}",
                        points, period, MAX_DATA_POINTS
                    ),
                ));
            }
        }

        let required = [
            ("aws.role_name", &self.aws.role_name),
            ("aws.session_name", &self.aws.session_name),
            ("aws.pricing_region", &self.aws.pricing_region),
            ("catalog.service_code", &self.catalog.service_code),
            ("catalog.engine_code", &self.catalog.engine_code),
            ("telemetry.namespace", &self.telemetry.namespace),
            ("telemetry.dimension_name", &self.telemetry.dimension_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CostError::Config(ConfigError::MissingField(field.to_string())));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> CostError {
    CostError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        reason,
    })
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
