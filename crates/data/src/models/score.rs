//! Scoring output records: feature vectors, wallet scores, market signals.

use crate::models::holder::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioral edge features for a wallet, each in `[0, 1]` by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Stake-weighted win rate on earnings markets, shrunk toward the prior.
    pub win_rate: f64,
    /// Normalized median PnL per USD risked.
    pub pnl_per_usd: f64,
    /// Activity concentration near resolution events.
    pub timing_edge: f64,
    /// How unusual the current stake is vs the wallet's own history.
    pub conviction_z: f64,
    /// Directional alignment within ticker/sector.
    pub consistency: f64,
}

impl FeatureVector {
    /// The neutral no-information vector.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            win_rate: 0.5,
            pnl_per_usd: 0.5,
            timing_edge: 0.5,
            conviction_z: 0.5,
            consistency: 0.5,
        }
    }
}

/// Complete scoring for a single wallet. One instance per wallet per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletScore {
    /// Wallet address.
    pub address: String,
    /// Username, if available.
    pub username: Option<String>,
    /// Current position size in USD.
    pub current_stake_usd: f64,
    /// Current side of the position.
    pub current_side: Side,
    /// Computed features.
    pub features: FeatureVector,
    /// Overall edge likelihood score, bounded by the configured floor/ceiling.
    pub insider_likelihood_score: f64,
    /// Stake-weighted contribution to the market signal, signed by side.
    pub signed_contribution: f64,
    /// Number of prior earnings positions behind the features.
    pub sample_size: usize,
    /// True when the sample is below the configured minimum.
    pub low_sample_flag: bool,
}

/// Advisory direction label for the aggregated signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Up,
    Down,
    Flat,
}

impl SignalDirection {
    /// Classifies a final score into an advisory label.
    ///
    /// The `±0.25` thresholds are fixed; the placeholder features were
    /// calibrated against them.
    #[must_use]
    pub fn from_final_score(final_score: f64) -> Self {
        if final_score >= 0.25 {
            Self::Up
        } else if final_score <= -0.25 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Flat => "FLAT",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated market-level signal. Exactly one instance per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSignal {
    /// Stake- and cap-weighted aggregate of wallet scores, in `[-1, 1]`.
    pub holder_signal: f64,
    /// Directional score derived from the order-book mid price, when one
    /// was supplied.
    pub dir_score: Option<f64>,
    /// Combined final score in `[-1, 1]`.
    pub final_score: f64,
    /// Advisory direction.
    pub direction: SignalDirection,
    /// Number of wallets included.
    pub top_wallets_count: usize,
    /// Total stake analyzed in USD.
    pub total_stake_usd: f64,
}

impl MarketSignal {
    /// The zero/neutral signal emitted for an empty wallet set.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            holder_signal: 0.0,
            dir_score: None,
            final_score: 0.0,
            direction: SignalDirection::Flat,
            top_wallets_count: 0,
            total_stake_usd: 0.0,
        }
    }
}
