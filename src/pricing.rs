//! Catalog price model and unit price extraction
//!
//! The Price List API answers a `GetProducts` call with one JSON document per
//! matching SKU. Each document nests on-demand terms, and each term nests
//! priced dimensions carrying a unit and a USD price. This module turns those
//! documents into `PricedSku` values and reduces a SKU to one `UnitPrice`.
//!
//! Terms and dimensions are keyed maps in the catalog; they are held here in
//! key-sorted order so every selection is deterministic.
//!
//! ## Selection
//!
//! - exactly one SKU must match a filter (`single_sku`)
//! - within a SKU, `PriceSelection::Reject` requires exactly one priced
//!   dimension, `PriceSelection::Lowest` takes the cheapest dimension whose
//!   unit fits the quantity being priced
//! - the unit is checked against the quantity before multiplying

use crate::config::{CatalogConfig, PriceSelection};
use crate::error::{CostError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// `TERM_MATCH` filter for a Price List lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFilter {
    pub service_code: String,
    pub terms: Vec<(String, String)>,
}

impl PriceFilter {
    pub fn new(service_code: impl Into<String>) -> Self {
        Self {
            service_code: service_code.into(),
            terms: Vec::new(),
        }
    }

    pub fn term(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Compute price for one instance class under a given storage mode
    pub fn instance(
        catalog: &CatalogConfig,
        region: &str,
        instance_class: &str,
        storage: &str,
    ) -> Self {
        Self::new(&catalog.service_code)
            .term("regionCode", region)
            .term("instanceType", instance_class)
            .term("enginecode", &catalog.engine_code)
            .term("storage", storage)
    }

    /// Per GB-month storage price for a cluster volume type
    pub fn volume(catalog: &CatalogConfig, region: &str, volume_type: &str) -> Self {
        Self::new(&catalog.service_code)
            .term("regionCode", region)
            .term("volumeType", volume_type)
            .term("enginecode", &catalog.engine_code)
    }

    /// Per-request I/O price
    pub fn io_operations(catalog: &CatalogConfig, region: &str) -> Self {
        Self::new(&catalog.service_code)
            .term("regionCode", region)
            .term("group", &catalog.io_operation_group)
            .term("enginecode", &catalog.engine_code)
    }
}

impl fmt::Display for PriceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .terms
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        write!(f, "{}[{}]", self.service_code, terms.join(", "))
    }
}

/// Billing unit of a priced dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceUnit {
    PerHour,
    PerGbMonth,
    PerIo,
    PerMillionIo,
    Other(String),
}

impl PriceUnit {
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_lowercase().as_str() {
            "hrs" | "hr" | "hour" | "hours" => PriceUnit::PerHour,
            "gb-mo" | "gb-month" | "gb-months" => PriceUnit::PerGbMonth,
            "ios" | "io" | "i/o" | "i/os" => PriceUnit::PerIo,
            "1m ios" | "million ios" | "million i/os" | "million i/o requests" => {
                PriceUnit::PerMillionIo
            }
            _ => PriceUnit::Other(unit.to_string()),
        }
    }

    pub fn fits(&self, kind: QuantityKind) -> bool {
        matches!(
            (self, kind),
            (PriceUnit::PerHour, QuantityKind::Hours)
                | (PriceUnit::PerGbMonth, QuantityKind::GbMonths)
                | (PriceUnit::PerIo, QuantityKind::IoOperations)
                | (PriceUnit::PerMillionIo, QuantityKind::IoOperations)
        )
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceUnit::PerHour => write!(f, "Hrs"),
            PriceUnit::PerGbMonth => write!(f, "GB-Mo"),
            PriceUnit::PerIo => write!(f, "IOs"),
            PriceUnit::PerMillionIo => write!(f, "1M IOs"),
            PriceUnit::Other(unit) => write!(f, "{}", unit),
        }
    }
}

/// What a unit price is multiplied against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    Hours,
    GbMonths,
    IoOperations,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityKind::Hours => write!(f, "hours"),
            QuantityKind::GbMonths => write!(f, "GB-months"),
            QuantityKind::IoOperations => write!(f, "I/O operations"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Hours(f64),
    GbMonths(f64),
    IoOperations(f64),
}

impl Quantity {
    pub fn kind(&self) -> QuantityKind {
        match self {
            Quantity::Hours(_) => QuantityKind::Hours,
            Quantity::GbMonths(_) => QuantityKind::GbMonths,
            Quantity::IoOperations(_) => QuantityKind::IoOperations,
        }
    }

    pub fn amount(&self) -> f64 {
        match *self {
            Quantity::Hours(v) | Quantity::GbMonths(v) | Quantity::IoOperations(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedDimension {
    pub rate_code: String,
    pub description: String,
    pub unit: PriceUnit,
    pub usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingTerm {
    pub offer_term_code: String,
    pub effective_date: Option<String>,
    pub dimensions: Vec<PricedDimension>,
}

/// One catalog item with its on-demand terms
#[derive(Debug, Clone, PartialEq)]
pub struct PricedSku {
    pub sku: String,
    pub terms: Vec<PricingTerm>,
}

impl PricedSku {
    /// Shorthand for the common one-term, one-dimension shape
    pub fn single(sku: impl Into<String>, unit: PriceUnit, usd: f64) -> Self {
        let sku = sku.into();
        Self {
            terms: vec![PricingTerm {
                offer_term_code: "JRTCKXETXF".to_string(),
                effective_date: None,
                dimensions: vec![PricedDimension {
                    rate_code: format!("{}.JRTCKXETXF.6YS6EN2CT7", sku),
                    description: String::new(),
                    unit,
                    usd,
                }],
            }],
            sku,
        }
    }

    /// Every dimension across all terms, in catalog key order
    pub fn dimensions(&self) -> impl Iterator<Item = &PricedDimension> {
        self.terms.iter().flat_map(|term| term.dimensions.iter())
    }
}

/// Price of one unit, validated against a quantity before use
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPrice {
    pub usd: f64,
    pub unit: PriceUnit,
}

impl UnitPrice {
    /// USD cost of `quantity` at this price
    pub fn cost_of(&self, quantity: Quantity) -> Result<f64> {
        if !self.unit.fits(quantity.kind()) {
            return Err(CostError::UnitMismatch {
                expected: quantity.kind().to_string(),
                found: self.unit.to_string(),
            });
        }
        let amount = quantity.amount();
        Ok(match self.unit {
            PriceUnit::PerMillionIo => self.usd * amount / 1_000_000.0,
            _ => self.usd * amount,
        })
    }
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    product: Option<RawProduct>,
    terms: RawTerms,
}

#[derive(Deserialize)]
struct RawProduct {
    sku: Option<String>,
}

#[derive(Deserialize)]
struct RawTerms {
    #[serde(rename = "OnDemand", default)]
    on_demand: BTreeMap<String, RawTerm>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTerm {
    offer_term_code: Option<String>,
    effective_date: Option<String>,
    #[serde(default)]
    price_dimensions: BTreeMap<String, RawDimension>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDimension {
    unit: String,
    #[serde(default)]
    description: String,
    price_per_unit: BTreeMap<String, String>,
}

/// Parse one Price List JSON document into a `PricedSku`
pub fn parse_price_document(document: &str) -> Result<PricedSku> {
    let raw: RawDocument = serde_json::from_str(document)
        .map_err(|e| CostError::InvalidPriceDocument(format!("not a price list entry: {}", e)))?;

    let sku = raw
        .product
        .and_then(|p| p.sku)
        .unwrap_or_else(|| "unknown".to_string());

    let mut terms = Vec::with_capacity(raw.terms.on_demand.len());
    for (term_key, term) in raw.terms.on_demand {
        let mut dimensions = Vec::with_capacity(term.price_dimensions.len());
        for (rate_code, dimension) in term.price_dimensions {
            let usd = parse_usd(&rate_code, &dimension.price_per_unit)?;
            dimensions.push(PricedDimension {
                rate_code,
                description: dimension.description,
                unit: PriceUnit::parse(&dimension.unit),
                usd,
            });
        }
        terms.push(PricingTerm {
            offer_term_code: term.offer_term_code.unwrap_or(term_key),
            effective_date: term.effective_date,
            dimensions,
        });
    }

    Ok(PricedSku { sku, terms })
}

fn parse_usd(rate_code: &str, price_per_unit: &BTreeMap<String, String>) -> Result<f64> {
    let raw = price_per_unit.get("USD").ok_or_else(|| {
        CostError::InvalidPriceDocument(format!("dimension {} has no USD price", rate_code))
    })?;
    let usd: f64 = raw.trim().parse().map_err(|_| {
        CostError::InvalidPriceDocument(format!("dimension {} has unparseable price {:?}", rate_code, raw))
    })?;
    if !usd.is_finite() || usd < 0.0 {
        return Err(CostError::InvalidPriceDocument(format!(
            "dimension {} has invalid price {}",
            rate_code, usd
        )));
    }
    Ok(usd)
}

/// Require exactly one SKU for a filter
pub fn single_sku(filter: &PriceFilter, mut skus: Vec<PricedSku>) -> Result<PricedSku> {
    match skus.len() {
        0 => Err(CostError::NoPriceMatch {
            filter: filter.to_string(),
        }),
        1 => Ok(skus.remove(0)),
        n => Err(CostError::AmbiguousPrice {
            filter: filter.to_string(),
            matches: n,
        }),
    }
}

/// Reduce a SKU to the unit price used for `kind`
pub fn extract_unit_price(
    sku: &PricedSku,
    kind: QuantityKind,
    selection: PriceSelection,
) -> Result<UnitPrice> {
    let chosen = match selection {
        PriceSelection::Reject => {
            let candidates: Vec<&PricedDimension> = sku.dimensions().collect();
            match candidates.as_slice() {
                [] => {
                    return Err(CostError::InvalidPriceDocument(format!(
                        "SKU {} has no on-demand price dimensions",
                        sku.sku
                    )))
                }
                [only] => *only,
                many => {
                    return Err(CostError::AmbiguousPrice {
                        filter: format!("SKU {}", sku.sku),
                        matches: many.len(),
                    })
                }
            }
        }
        PriceSelection::Lowest if sku.dimensions().next().is_none() => {
            return Err(CostError::InvalidPriceDocument(format!(
                "SKU {} has no on-demand price dimensions",
                sku.sku
            )))
        }
        PriceSelection::Lowest => sku
            .dimensions()
            .filter(|d| d.unit.fits(kind))
            .min_by(|a, b| a.usd.total_cmp(&b.usd))
            .ok_or_else(|| CostError::UnitMismatch {
                expected: kind.to_string(),
                found: sku
                    .dimensions()
                    .map(|d| d.unit.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?,
    };

    if !chosen.unit.fits(kind) {
        return Err(CostError::UnitMismatch {
            expected: kind.to_string(),
            found: chosen.unit.to_string(),
        });
    }

    Ok(UnitPrice {
        usd: chosen.usd,
        unit: chosen.unit.clone(),
    })
}
