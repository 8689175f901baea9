//! Rendering of a cost comparison as text or JSON

use crate::cost::{BillingMode, CostComparison, CostSummary, Recommendation};
use crate::error::Result;
use crate::pricing::Quantity;
use comfy_table::{Cell, Table};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    cluster: &'a str,
    region: &'a str,
    #[serde(flatten)]
    summary: CostSummary,
    instance_count: usize,
    storage_gb: f64,
    io_operations: f64,
    recommendation: Recommendation,
}

/// `{"standard": .., "io": .., ...}`
pub fn render_json(comparison: &CostComparison) -> Result<String> {
    let report = JsonReport {
        cluster: &comparison.cluster().identifier,
        region: &comparison.cluster().region,
        summary: comparison.summary(),
        instance_count: comparison.instance_count(),
        storage_gb: comparison.storage_gb(),
        io_operations: comparison.io_operations(),
        recommendation: comparison.recommendation(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn format_quantity(quantity: &Quantity) -> String {
    match quantity {
        Quantity::Hours(h) => format!("{:.0} h", h),
        Quantity::GbMonths(gb) => format!("{:.2} GB-Mo", gb),
        Quantity::IoOperations(n) => format!("{:.0} IOs", n),
    }
}

pub fn render_text(comparison: &CostComparison) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Mode", "Item", "Quantity", "Unit price (USD)", "Monthly (USD)"]);

    for mode in [BillingMode::Standard, BillingMode::IoOptimized] {
        let total = comparison.total(mode);
        for line in total.lines() {
            table.add_row(vec![
                Cell::new(mode.to_string()),
                Cell::new(&line.label),
                Cell::new(format_quantity(&line.quantity)),
                Cell::new(format!("{} / {}", line.unit_price.usd, line.unit_price.unit)),
                Cell::new(format!("{:.2}", line.amount)),
            ]);
        }
        table.add_row(vec![
            Cell::new(mode.to_string()),
            Cell::new("Total"),
            Cell::new(""),
            Cell::new(""),
            Cell::new(format!("{:.2}", total.usd())),
        ]);
    }

    let cluster = comparison.cluster();
    let mut out = String::new();
    out.push_str(&format!(
        "Cluster: {} ({}, account {})\n",
        cluster.identifier, cluster.region, cluster.account_id
    ));
    if comparison.instance_count() == 0 {
        out.push_str(&format!(
            "{} cluster has no instances, compute cost is zero\n",
            style("NOTE:").yellow().bold()
        ));
    }
    out.push_str(&format!("{}\n", table));

    let recommendation = comparison.recommendation();
    if recommendation.monthly_savings == 0.0 {
        out.push_str("Both billing modes cost the same.\n");
    } else {
        out.push_str(&format!(
            "{} {} is cheaper by ${:.2}/month\n",
            style("RECOMMENDATION:").green().bold(),
            recommendation.mode,
            recommendation.monthly_savings
        ));
    }
    out
}
