//! Data API client for holders, trades, and closed positions.
//!
//! Records that fail to parse are logged and skipped rather than failing
//! the whole fetch; one malformed holder must not abort a scan.

use crate::error::{PolymarketError, Result};
use crate::fields;
use crate::http::{RestClient, RetryPolicy};
use chrono::Utc;
use edge_scan_data::{ClosedPosition, Holder, Trade};
use nonzero_ext::nonzero;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;

/// Data API base URL.
pub const DATA_API_URL: &str = "https://data-api.polymarket.com";

/// Polymarket Data API client.
pub struct DataApiClient {
    rest: RestClient,
}

impl Default for DataApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DataApiClient {
    /// Creates a new client, rate limited to 60 requests per minute.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(60u32))
    }

    /// Creates a new client with a custom rate limit.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            rest: RestClient::new(DATA_API_URL, requests_per_minute),
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

    /// Fetches current holders for a market.
    ///
    /// The endpoint groups holders under their outcome token; both groups
    /// are flattened into one list.
    ///
    /// # Errors
    /// Returns an error if the request itself fails; unparseable holder
    /// records are skipped with a warning.
    pub async fn get_holders(&self, condition_id: &str, limit: usize) -> Result<Vec<Holder>> {
        tracing::debug!(condition_id, limit, "Fetching holders");
        let path = format!(
            "/holders?market={}&limit={limit}",
            urlencoding::encode(condition_id)
        );
        let data = self.rest.get_value(&path).await?;

        let mut holders = Vec::new();
        for token_group in unwrap_envelope(data) {
            let Some(group_holders) = token_group.get("holders").and_then(JsonValue::as_array)
            else {
                continue;
            };
            for item in group_holders {
                match parse_holder(item) {
                    Ok(holder) => holders.push(holder),
                    Err(e) => tracing::warn!(error = %e, "Failed to parse holder, skipping"),
                }
            }
        }

        tracing::info!(count = holders.len(), "Fetched holders");
        Ok(holders)
    }

    /// Fetches trades for a market and/or user.
    ///
    /// # Errors
    /// Returns an error if the request fails; unparseable trades are
    /// skipped with a warning.
    pub async fn get_trades(
        &self,
        condition_id: Option<&str>,
        user_address: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Trade>> {
        let mut params = vec![format!("limit={limit}")];
        if let Some(market) = condition_id {
            params.push(format!("market={}", urlencoding::encode(market)));
        }
        if let Some(user) = user_address {
            params.push(format!("user={}", urlencoding::encode(user)));
        }
        let path = format!("/trades?{}", params.join("&"));

        let data = self.rest.get_value(&path).await?;

        let mut trades = Vec::new();
        for item in unwrap_envelope(data) {
            match parse_trade(&item) {
                Ok(trade) => trades.push(trade),
                Err(e) => tracing::warn!(error = %e, "Failed to parse trade, skipping"),
            }
        }

        Ok(trades)
    }

    /// Fetches closed positions for a user, optionally filtered by title.
    ///
    /// # Errors
    /// Returns an error if the request fails; unparseable positions are
    /// skipped with a warning.
    pub async fn get_closed_positions(
        &self,
        user_address: &str,
        title_filter: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ClosedPosition>> {
        let mut params = vec![
            format!("user={}", urlencoding::encode(user_address)),
            format!("limit={limit}"),
        ];
        if let Some(title) = title_filter {
            params.push(format!("title={}", urlencoding::encode(title)));
        }
        let path = format!("/closed-positions?{}", params.join("&"));

        let data = self.rest.get_value(&path).await?;

        let mut positions = Vec::new();
        for item in unwrap_envelope(data) {
            match parse_closed_position(&item) {
                Ok(position) => positions.push(position),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse closed position, skipping");
                }
            }
        }

        Ok(positions)
    }
}

/// Unwraps the optional `{"data": [...]}` envelope some deployments return.
fn unwrap_envelope(data: JsonValue) -> Vec<JsonValue> {
    let inner = match data {
        JsonValue::Object(mut map) => match map.remove("data") {
            Some(inner) => inner,
            None => JsonValue::Object(map),
        },
        other => other,
    };

    match inner {
        JsonValue::Array(items) => items,
        other => {
            tracing::warn!(
                response_type = %value_type(&other),
                "Unexpected response shape, expected an array"
            );
            Vec::new()
        }
    }
}

fn value_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Parses a holder record.
fn parse_holder(data: &JsonValue) -> Result<Holder> {
    let address = fields::first_str(data, &["proxyWallet", "user", "address", "userAddress"])
        .ok_or_else(|| PolymarketError::malformed("no address in holder record"))?
        .to_string();

    let username =
        fields::first_str(data, &["name", "username", "pseudonym"]).map(String::from);

    // Explicit null handling so outcomeIndex = 0 survives the fallback walk.
    let outcome_index =
        fields::first_u32(data, &["outcomeIndex", "outcome_index", "outcome"]).unwrap_or(1);

    let amount_usd = fields::first_f64(
        data,
        &["amountUSD", "amount_usd", "valueUSD", "value_usd", "amount"],
    )
    .unwrap_or(0.0);

    Ok(Holder {
        address,
        username,
        outcome_index,
        amount_usd,
    })
}

/// Parses a trade record.
fn parse_trade(data: &JsonValue) -> Result<Trade> {
    let ts = fields::first_value(data, &["timestamp", "ts", "time"])
        .and_then(fields::parse_timestamp)
        .unwrap_or_else(Utc::now);

    let side = fields::first_str(data, &["side", "type"])
        .unwrap_or("buy")
        .to_string();

    let price = fields::first_f64(data, &["price", "fillPrice"]).unwrap_or(0.0);
    let amount = fields::first_f64(data, &["amount", "size", "quantity"]).unwrap_or(0.0);
    let amount_usd =
        fields::first_f64(data, &["amountUSD", "amount_usd"]).unwrap_or(amount * price);

    let market = fields::first_string(data, &["market", "condition_id"]);

    Ok(Trade {
        ts,
        side,
        price,
        amount,
        amount_usd,
        market,
    })
}

/// Parses a closed position record.
fn parse_closed_position(data: &JsonValue) -> Result<ClosedPosition> {
    let title = fields::first_str(data, &["title", "marketTitle", "question"])
        .unwrap_or_default()
        .to_string();

    let event_id = fields::first_string(data, &["eventId", "event_id"]);

    let pnl_usd = fields::first_f64(data, &["pnlUSD", "pnl_usd", "pnl"]).unwrap_or(0.0);

    let was_winner = fields::any_true(data, &["wasWinner", "was_winner", "won"]);

    let resolved_at = fields::first_value(data, &["resolvedAt", "resolved_at", "closedAt"])
        .and_then(fields::parse_timestamp)
        .unwrap_or_else(Utc::now);

    let amount_risked = fields::first_f64(data, &["amountRisked", "amount_risked", "investment"]);

    Ok(ClosedPosition {
        title,
        event_id,
        pnl_usd,
        was_winner,
        resolved_at,
        amount_risked,
    })
}
