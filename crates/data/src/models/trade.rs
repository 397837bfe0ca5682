//! Individual trade records from the Data API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade by a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Trade timestamp (UTC).
    pub ts: DateTime<Utc>,
    /// Trade side as reported (buy/sell or YES/NO).
    pub side: String,
    /// Trade price.
    pub price: f64,
    /// Trade amount in shares.
    pub amount: f64,
    /// Trade amount in USD.
    pub amount_usd: f64,
    /// Market identifier, when known.
    pub market: Option<String>,
}
