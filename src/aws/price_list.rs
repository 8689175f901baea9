//! Catalog prices via the Price List `GetProducts` API

use crate::error::{CostError, Result};
use crate::pricing::{parse_price_document, PriceFilter, PricedSku};
use crate::provider::PriceResolver;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_pricing::error::DisplayErrorContext;
use aws_sdk_pricing::types::{Filter, FilterType};
use aws_sdk_pricing::Client as PricingClient;
use tracing::debug;

/// Price List client; the API is account independent and only served from a
/// few regions, so it is built from the caller's own credentials.
pub struct PriceListResolver {
    client: PricingClient,
}

impl PriceListResolver {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: PricingClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl PriceResolver for PriceListResolver {
    async fn lookup(&self, filter: &PriceFilter) -> Result<Vec<PricedSku>> {
        let filters = term_match_filters(filter)?;

        let mut skus = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .get_products()
                .service_code(&filter.service_code)
                .set_filters(Some(filters.clone()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    CostError::Aws(format!(
                        "Failed to get products for {}: {}",
                        filter,
                        DisplayErrorContext(&e)
                    ))
                })?;

            for document in response.price_list() {
                skus.push(parse_price_document(document)?);
            }

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(filter = %filter, matches = skus.len(), "Price list lookup");
        Ok(skus)
    }
}

pub(crate) fn term_match_filters(filter: &PriceFilter) -> Result<Vec<Filter>> {
    filter
        .terms
        .iter()
        .map(|(field, value)| {
            Filter::builder()
                .r#type(FilterType::TermMatch)
                .field(field)
                .value(value)
                .build()
                .map_err(|e| CostError::Aws(format!("Invalid price filter {}: {}", field, e)))
        })
        .collect()
}
