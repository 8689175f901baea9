//! Usage telemetry queries and results

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

/// Aggregation applied to each sampling period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Maximum,
    Sum,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Maximum => write!(f, "Maximum"),
            Statistic::Sum => write!(f, "Sum"),
        }
    }
}

/// One metric over one window for one cluster
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: i32,
    pub statistic: Statistic,
}

impl MetricQuery {
    /// Query the window `[end - window, end]`
    #[allow(clippy::too_many_arguments)]
    pub fn trailing(
        namespace: &str,
        metric_name: &str,
        dimension_name: &str,
        dimension_value: &str,
        end: DateTime<Utc>,
        window: Duration,
        period_secs: i32,
        statistic: Statistic,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimension_name: dimension_name.to_string(),
            dimension_value: dimension_value.to_string(),
            start: end - window,
            end,
            period_secs,
            statistic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Result of a telemetry query, data points ordered by timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct UsageWindow {
    pub metric_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: i32,
    pub statistic: Statistic,
    points: Vec<DataPoint>,
}

impl UsageWindow {
    /// Build a window for `query`; points are sorted by timestamp since
    /// CloudWatch returns them unordered.
    pub fn new(query: &MetricQuery, mut points: Vec<DataPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            metric_name: query.metric_name.clone(),
            start: query.start,
            end: query.end,
            period_secs: query.period_secs,
            statistic: query.statistic,
            points,
        }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent data point
    pub fn latest(&self) -> Option<&DataPoint> {
        self.points.last()
    }

    pub fn sum(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}
