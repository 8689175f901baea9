//! Usage telemetry via CloudWatch `GetMetricStatistics`

use crate::error::{CostError, Result};
use crate::provider::TelemetryResolver;
use crate::telemetry::{DataPoint, MetricQuery, Statistic, UsageWindow};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic as AwsStatistic};
use aws_sdk_cloudwatch::Client;
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct CloudWatchTelemetry {
    client: Client,
}

impl CloudWatchTelemetry {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl TelemetryResolver for CloudWatchTelemetry {
    async fn query(&self, query: &MetricQuery) -> Result<UsageWindow> {
        let response = self
            .client
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .dimensions(
                Dimension::builder()
                    .name(&query.dimension_name)
                    .value(&query.dimension_value)
                    .build(),
            )
            .start_time(AwsDateTime::from_secs(query.start.timestamp()))
            .end_time(AwsDateTime::from_secs(query.end.timestamp()))
            .period(query.period_secs)
            .statistics(sdk_statistic(query.statistic))
            .send()
            .await
            .map_err(|e| {
                CostError::Aws(format!(
                    "Failed to get {} statistics for {}: {}",
                    query.metric_name,
                    query.dimension_value,
                    DisplayErrorContext(&e)
                ))
            })?;

        let points: Vec<DataPoint> = response
            .datapoints()
            .iter()
            .filter_map(|dp| to_data_point(dp, query.statistic))
            .collect();

        debug!(metric = %query.metric_name, points = points.len(), "Got metric statistics");
        Ok(UsageWindow::new(query, points))
    }
}

fn sdk_statistic(statistic: Statistic) -> AwsStatistic {
    match statistic {
        Statistic::Maximum => AwsStatistic::Maximum,
        Statistic::Sum => AwsStatistic::Sum,
    }
}

/// Data points without a timestamp or without the requested statistic are skipped
pub(crate) fn to_data_point(datapoint: &Datapoint, statistic: Statistic) -> Option<DataPoint> {
    let timestamp = datapoint.timestamp()?;
    let value = match statistic {
        Statistic::Maximum => datapoint.maximum()?,
        Statistic::Sum => datapoint.sum()?,
    };
    Some(DataPoint {
        timestamp: DateTime::<Utc>::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())?,
        value,
    })
}
