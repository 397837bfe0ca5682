//! CLOB API client for order book snapshots.

use crate::error::Result;
use crate::http::{RestClient, RetryPolicy};
use edge_scan_data::{OrderBook, PriceLevel};
use nonzero_ext::nonzero;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;
use std::str::FromStr;

/// CLOB API base URL.
pub const CLOB_API_URL: &str = "https://clob.polymarket.com";

/// Polymarket CLOB REST client.
pub struct ClobClient {
    rest: RestClient,
}

impl Default for ClobClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ClobClient {
    /// Creates a new client, rate limited to 60 requests per minute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(60u32))
    }

    /// Creates a new client with a custom rate limit.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            rest: RestClient::new(CLOB_API_URL, requests_per_minute),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest.set_base_url(url);
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.rest.set_retry(retry);
        self
    }

    /// Fetches the order book for an outcome token.
    ///
    /// Levels that fail to parse are dropped; an empty book is a valid
    /// result (the price signal is simply unavailable).
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBook> {
        tracing::debug!(token_id, "Fetching order book");
        let path = format!("/book?token_id={}", urlencoding::encode(token_id));
        let data = self.rest.get_value(&path).await?;

        let mut book = OrderBook::new(token_id);
        book.bids = parse_levels(data.get("bids"));
        book.asks = parse_levels(data.get("asks"));

        Ok(book)
    }
}

/// Parses `[{"price": "0.72", "size": "100"}, ...]` into price levels.
///
/// The CLOB returns decimal strings; numeric values are tolerated for
/// older payloads. Unparseable levels are skipped.
fn parse_levels(data: Option<&JsonValue>) -> Vec<PriceLevel> {
    let Some(levels) = data.and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    levels
        .iter()
        .filter_map(|level| {
            let price = parse_decimal(level.get("price")?)?;
            let size = parse_decimal(level.get("size")?)?;
            Some(PriceLevel { price, size })
        })
        .collect()
}

fn parse_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::String(s) => Decimal::from_str(s).ok(),
        JsonValue::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}
