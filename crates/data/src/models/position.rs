//! Closed/resolved position records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved position in a wallet's trading history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedPosition {
    /// Market title.
    pub title: String,
    /// Event ID, when available.
    pub event_id: Option<String>,
    /// Realized PnL in USD.
    pub pnl_usd: f64,
    /// Whether the position was on the winning side.
    pub was_winner: bool,
    /// Resolution timestamp (UTC).
    pub resolved_at: DateTime<Utc>,
    /// Amount risked in USD, when the API reports it.
    pub amount_risked: Option<f64>,
}

impl ClosedPosition {
    /// USD stake attributed to this position.
    ///
    /// The Data API omits (or zeroes) `amount_risked` for some position
    /// shapes; the realized PnL magnitude stands in for the stake there.
    #[must_use]
    pub fn risked_stake(&self) -> f64 {
        match self.amount_risked {
            Some(risked) if risked != 0.0 => risked.abs(),
            _ => self.pnl_usd.abs(),
        }
    }
}
