//! Gamma API client for market identity resolution.
//!
//! Resolves a market slug, condition ID, or full Polymarket URL to the
//! market metadata the scanner needs (condition ID, title, resolution time,
//! outcome token IDs).

use crate::error::{PolymarketError, Result};
use crate::fields;
use crate::http::{RestClient, RetryPolicy};
use chrono::{TimeZone, Utc};
use edge_scan_data::MarketInfo;
use nonzero_ext::nonzero;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;

/// Gamma API base URL.
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Gamma API client.
pub struct GammaClient {
    rest: RestClient,
}

impl Default for GammaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaClient {
    /// Creates a new client, rate limited to 30 requests per minute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(30u32))
    }

    /// Creates a new client with a custom rate limit.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            rest: RestClient::new(GAMMA_API_URL, requests_per_minute),
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.rest.set_base_url(url);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.rest.set_retry(retry);
        self
    }

    /// Fetches market metadata by slug.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response lacks a
    /// condition ID.
    pub async fn get_market_by_slug(&self, slug: &str) -> Result<MarketInfo> {
        tracing::debug!(slug, "Fetching market by slug");
        let path = format!("/markets/slug/{}", urlencoding::encode(slug));
        let data = self.rest.get_value(&path).await?;

        parse_market(&data, Some(slug), None)
    }

    /// Fetches market metadata by condition ID.
    ///
    /// # Errors
    /// Returns an error if the request fails or no market matches.
    pub async fn get_market_by_condition_id(&self, condition_id: &str) -> Result<MarketInfo> {
        tracing::debug!(condition_id, "Fetching market by condition ID");
        let path = format!("/markets?condition_id={}", urlencoding::encode(condition_id));
        let data = self.rest.get_value(&path).await?;

        // The API may return a list or a single object.
        let data = match data {
            JsonValue::Array(items) => items.into_iter().next().ok_or_else(|| {
                PolymarketError::MarketNotFound(condition_id.to_string())
            })?,
            other => other,
        };

        parse_market(&data, None, Some(condition_id))
    }

    /// Resolves a market from a URL, slug, or condition ID.
    ///
    /// Tries URL slug extraction first, then the input as a slug, then as a
    /// condition ID.
    ///
    /// # Errors
    /// Returns `MarketNotFound` if no resolution path succeeds.
    pub async fn resolve_market(&self, market_input: &str) -> Result<MarketInfo> {
        if market_input.contains("polymarket.com") || market_input.starts_with("http") {
            if let Ok(slug) = extract_slug_from_url(market_input) {
                tracing::debug!(slug = %slug, "Extracted slug from URL");
                match self.get_market_by_slug(&slug).await {
                    Ok(market) => return Ok(market),
                    Err(e) => tracing::debug!(error = %e, "URL slug resolution failed"),
                }
            }
        }

        // Slugs typically carry hyphens; try that interpretation first.
        if market_input.contains('-') {
            match self.get_market_by_slug(market_input).await {
                Ok(market) => return Ok(market),
                Err(e) => tracing::debug!(error = %e, "Slug resolution failed"),
            }
        }

        match self.get_market_by_condition_id(market_input).await {
            Ok(market) => Ok(market),
            Err(e) => {
                tracing::debug!(error = %e, "Condition ID resolution failed");
                Err(PolymarketError::MarketNotFound(market_input.to_string()))
            }
        }
    }
}

/// Extracts a market slug from a Polymarket URL
/// (`https://polymarket.com/event/my-market?tid=123` → `my-market`).
///
/// # Errors
/// Returns `MarketNotFound` if the URL carries no event or market path.
pub fn extract_slug_from_url(url: &str) -> Result<String> {
    let pattern = Regex::new(r"(?:event|market)/([a-zA-Z0-9\-]+)")
        .map_err(|e| PolymarketError::malformed(format!("bad slug pattern: {e}")))?;

    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| PolymarketError::MarketNotFound(url.to_string()))
}

/// Normalizes a Gamma market response into a `MarketInfo`.
fn parse_market(
    data: &JsonValue,
    slug: Option<&str>,
    condition_id: Option<&str>,
) -> Result<MarketInfo> {
    let condition_id = condition_id
        .map(str::to_string)
        .or_else(|| fields::first_string(data, &["condition_id", "conditionId", "id"]))
        .ok_or_else(|| PolymarketError::malformed("no condition_id in market response"))?;

    let title = fields::first_str(data, &["question", "title", "description"])
        .unwrap_or_default()
        .to_string();

    let end_time = fields::first_value(data, &["endDate", "end_date", "endTime"])
        .and_then(fields::parse_timestamp)
        .unwrap_or_else(|| {
            tracing::warn!(condition_id = %condition_id, "No end time in market response, using far-future default");
            Utc.with_ymd_and_hms(2099, 12, 31, 0, 0, 0)
                .single()
                .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC)
        });

    let (mut yes_token_id, mut no_token_id) = parse_token_ids(data);

    // Older response shapes carry flat token ID fields.
    yes_token_id = yes_token_id
        .or_else(|| fields::first_string(data, &["yesTokenId", "yes_token_id"]));
    no_token_id = no_token_id
        .or_else(|| fields::first_string(data, &["noTokenId", "no_token_id"]));

    let slug = slug
        .map(str::to_string)
        .or_else(|| fields::first_string(data, &["slug"]));

    Ok(MarketInfo {
        condition_id,
        title,
        end_time,
        yes_token_id,
        no_token_id,
        slug,
    })
}

/// Pulls (yes, no) token IDs from the `tokens` object array or the
/// `clobTokenIds` string array. Convention: index 0 is NO, index 1 is YES.
fn parse_token_ids(data: &JsonValue) -> (Option<String>, Option<String>) {
    if let Some(tokens) = data.get("tokens").and_then(JsonValue::as_array) {
        if tokens.len() >= 2 {
            let yes = fields::first_string(&tokens[1], &["token_id", "tokenId"]);
            let no = fields::first_string(&tokens[0], &["token_id", "tokenId"]);
            return (yes, no);
        }
    }

    if let Some(tokens) = data.get("clobTokenIds").and_then(JsonValue::as_array) {
        if tokens.len() >= 2 {
            let yes = tokens[1].as_str().map(String::from);
            let no = tokens[0].as_str().map(String::from);
            return (yes, no);
        }
    }

    (None, None)
}
