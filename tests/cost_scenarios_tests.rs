//! Cost comparison scenarios against fixture collaborators
//!
//! Drives `compare_cluster` end to end with in-memory inventory, catalog and
//! telemetry, covering the documented scenarios and failure modes.

mod common;

use aurora_cost::config::{Config, PriceSelection};
use aurora_cost::cost::BillingMode;
use aurora_cost::error::CostError;
use aurora_cost::output;
use aurora_cost::pricing::{PriceUnit, PricedSku, PricedDimension, PricingTerm};
use aurora_cost::workflow::compare_cluster;
use common::*;

#[tokio::test]
async fn test_single_instance_compute_only() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .instance("db.r6g.large", 0.10, 0.10)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[0.0]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    let summary = comparison.summary();
    assert!(approx_eq(summary.standard, 73.0), "standard = {}", summary.standard);
    assert!(approx_eq(summary.io, 73.0), "io = {}", summary.io);
    assert_eq!(comparison.instance_count(), 1);
    assert_eq!(comparison.io_operations(), 0.0);
}

#[tokio::test]
async fn test_single_instance_with_storage() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .instance("db.r6g.large", 0.10, 0.12)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[100.0 * GIB]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    let summary = comparison.summary();
    assert!(approx_eq(summary.standard, 83.0), "standard = {}", summary.standard);
    assert!(approx_eq(summary.io, 110.1), "io = {}", summary.io);
    assert!(approx_eq(comparison.storage_gb(), 100.0));

    let recommendation = comparison.recommendation();
    assert_eq!(recommendation.mode, BillingMode::Standard);
    assert!(approx_eq(recommendation.monthly_savings, 27.1));
}

#[tokio::test]
async fn test_zero_instances_still_prices_storage() {
    let inventory = FixtureInventory(vec![]);
    let prices = FixturePrices::new().with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[50.0 * GIB]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    assert_eq!(comparison.instance_count(), 0);
    let summary = comparison.summary();
    assert!(approx_eq(summary.standard, 5.0), "standard = {}", summary.standard);
    assert!(approx_eq(summary.io, 11.25), "io = {}", summary.io);
    // storage + I/O lookups only
    assert_eq!(prices.lookup_count(), 3);
}

#[tokio::test]
async fn test_heterogeneous_instances_are_additive() {
    let inventory = FixtureInventory(vec![
        instance("orders-writer", "db.r6g.2xlarge"),
        instance("orders-reader-1", "db.r6g.large"),
        instance("orders-reader-2", "db.r6g.large"),
    ]);
    let prices = FixturePrices::new()
        .instance("db.r6g.2xlarge", 1.038, 1.349)
        .instance("db.r6g.large", 0.26, 0.338)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[0.0]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    let expected_standard = 730.0 * 1.038 + 2.0 * 730.0 * 0.26;
    let expected_io = 730.0 * 1.349 + 2.0 * 730.0 * 0.338;
    assert!(approx_eq(comparison.standard().usd(), expected_standard));
    assert!(approx_eq(comparison.io_optimized().usd(), expected_io));
    // one line per instance plus storage and I/O
    assert_eq!(comparison.standard().lines().len(), 5);
    // one line per instance plus storage
    assert_eq!(comparison.io_optimized().lines().len(), 4);
}

#[tokio::test]
async fn test_io_requests_sum_read_and_write_series() {
    let inventory = FixtureInventory(vec![]);
    let prices = FixturePrices::new().with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new()
        .volume_bytes(&[0.0])
        .read_ios(&[1_000_000.0, 2_000_000.0, 3_000_000.0])
        .write_ios(&[4_000_000.0]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    assert_eq!(comparison.io_operations(), 10_000_000.0);
    // 10M requests at $0.20 per million
    assert!(approx_eq(comparison.standard().usd(), 2.0));
    assert_eq!(comparison.io_optimized().usd(), 0.0);
    assert_eq!(comparison.recommendation().mode, BillingMode::IoOptimized);
}

#[tokio::test]
async fn test_ambiguous_sku_produces_no_comparison() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .with_skus(
            "instance:db.r6g.large:EBS Only",
            vec![
                PricedSku::single("A", PriceUnit::PerHour, 0.26),
                PricedSku::single("B", PriceUnit::PerHour, 0.29),
            ],
        )
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[0.0]);

    let err = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    match err {
        CostError::AmbiguousPrice { filter, matches } => {
            assert_eq!(matches, 2);
            assert!(filter.contains("instanceType=db.r6g.large"));
            assert!(filter.contains("storage=EBS Only"));
        }
        other => panic!("expected AmbiguousPrice, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_price_is_explicit_error() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.x2g.large")]);
    let prices = FixturePrices::new().with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[0.0]);

    let err = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CostError::NoPriceMatch { .. }));
}

#[tokio::test]
async fn test_missing_volume_telemetry_is_error() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .instance("db.r6g.large", 0.10, 0.12)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new();

    let err = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CostError::MissingTelemetry { .. }));
}

#[tokio::test]
async fn test_latest_volume_point_is_used() {
    let inventory = FixtureInventory(vec![]);
    let prices = FixturePrices::new().with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[200.0 * GIB, 150.0 * GIB, 40.0 * GIB]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    assert!(approx_eq(comparison.storage_gb(), 40.0));
}

#[tokio::test]
async fn test_price_selection_policy_is_configurable() {
    let tiered = PricedSku {
        sku: "TIERED".to_string(),
        terms: vec![PricingTerm {
            offer_term_code: "JRTCKXETXF".to_string(),
            effective_date: None,
            dimensions: vec![
                PricedDimension {
                    rate_code: "TIERED.1".to_string(),
                    description: "standard".to_string(),
                    unit: PriceUnit::PerGbMonth,
                    usd: 0.10,
                },
                PricedDimension {
                    rate_code: "TIERED.2".to_string(),
                    description: "discounted".to_string(),
                    unit: PriceUnit::PerGbMonth,
                    usd: 0.08,
                },
            ],
        }],
    };

    let prices = FixturePrices::new()
        .storage(0.10, 0.225)
        .with_skus("volume:General Purpose-Aurora", vec![tiered])
        .io_requests(0.0000002);
    let telemetry = FixtureTelemetry::new().volume_bytes(&[100.0 * GIB]);
    let inventory = FixtureInventory(vec![]);

    let mut config = Config::default();
    let err = compare_cluster(&request(), &config, &inventory, &prices, &telemetry, now())
        .await
        .unwrap_err();
    assert!(matches!(err, CostError::AmbiguousPrice { matches: 2, .. }));

    config.billing.price_selection = PriceSelection::Lowest;
    let comparison = compare_cluster(&request(), &config, &inventory, &prices, &telemetry, now())
        .await
        .unwrap();
    assert!(approx_eq(comparison.standard().usd(), 8.0));
}

#[tokio::test]
async fn test_unit_mismatch_is_rejected() {
    let inventory = FixtureInventory(vec![]);
    let prices = FixturePrices::new()
        .with_skus(
            "volume:General Purpose-Aurora",
            vec![PricedSku::single("GP", PriceUnit::PerHour, 0.10)],
        )
        .with_skus(
            "volume:IO Optimized-Aurora",
            vec![PricedSku::single("IOV", PriceUnit::PerGbMonth, 0.225)],
        )
        .io_requests(0.0000002);
    let telemetry = FixtureTelemetry::new().volume_bytes(&[10.0 * GIB]);

    let err = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CostError::UnitMismatch { .. }));
}

#[tokio::test]
async fn test_custom_hours_per_month() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .instance("db.r6g.large", 0.10, 0.10)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[0.0]);

    let mut config = Config::default();
    config.billing.hours_per_month = 720.0;
    let comparison = compare_cluster(&request(), &config, &inventory, &prices, &telemetry, now())
        .await
        .unwrap();

    assert!(approx_eq(comparison.standard().usd(), 72.0));
}

#[tokio::test]
async fn test_invalid_request_makes_no_lookups() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new();
    let telemetry = FixtureTelemetry::new();

    let mut request = request();
    request.account_id = "not-an-account".to_string();

    let err = compare_cluster(
        &request,
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CostError::Validation { .. }));
    assert_eq!(prices.lookup_count(), 0);
}

#[tokio::test]
async fn test_rendered_output() {
    let inventory = FixtureInventory(vec![instance("orders-1", "db.r6g.large")]);
    let prices = FixturePrices::new()
        .instance("db.r6g.large", 0.10, 0.12)
        .with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[100.0 * GIB]);

    let comparison = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&output::render_json(&comparison).unwrap()).unwrap();
    assert!(approx_eq(json["standard"].as_f64().unwrap(), 83.0));
    assert!(approx_eq(json["io"].as_f64().unwrap(), 110.1));
    assert_eq!(json["cluster"], "orders");
    assert_eq!(json["recommendation"]["mode"], "standard");

    let text = output::render_text(&comparison);
    assert!(text.contains("orders-1 (db.r6g.large)"));
    assert!(text.contains("83.00"));
    assert!(text.contains("110.10"));
    assert!(text.contains("Aurora Standard is cheaper"));
}

#[tokio::test]
async fn test_negative_volume_size_exits_as_data_error() {
    let inventory = FixtureInventory(vec![]);
    let prices = FixturePrices::new().with_default_storage_and_io();
    let telemetry = FixtureTelemetry::new().volume_bytes(&[-5.0]);

    let err = compare_cluster(
        &request(),
        &Config::default(),
        &inventory,
        &prices,
        &telemetry,
        now(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CostError::InvalidTelemetry { .. }));
    assert_eq!(
        aurora_cost::exit_codes::exit_code_for_error(&err),
        aurora_cost::exit_codes::codes::DATA_ERROR
    );
    assert_eq!(prices.lookup_count(), 0);
}
