//! Scanner configuration.
//!
//! A `ScanConfig` is built once per run (from defaults, a config file, or
//! both) and threaded read-only through every stage. No component mutates it
//! after construction; downstream code may serialize it for audit purposes.

use crate::error::{EdgeScanError, Result};
use serde::{Deserialize, Serialize};

/// Complete configuration for a scan run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub history: HistoryConfig,
    pub weights: Weights,
    pub filters: FiltersConfig,
    pub caps: CapsConfig,
    pub scoring: ScoringConfig,
    pub market_signal: MarketSignalConfig,
}

/// Historical data lookback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Case-insensitive pattern that marks a closed position as earnings-like.
    pub earnings_title_regex: String,
    /// Lookback horizon in quarters.
    pub lookback_quarters: u32,
    /// Minimum earnings-position sample for a fully trusted score.
    pub min_sample: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            earnings_title_regex: r"(?i)(earnings|EPS|quarterly)".to_string(),
            lookback_quarters: 16,
            min_sample: 5,
        }
    }
}

/// Feature weights for scoring.
///
/// Raw weights are free-form; `normalize` produces the unit-sum weights the
/// scorer actually applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub win_rate: f64,
    pub pnl_per_usd: f64,
    pub timing_edge: f64,
    pub conviction_z: f64,
    pub consistency: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            win_rate: 0.35,
            pnl_per_usd: 0.25,
            timing_edge: 0.20,
            conviction_z: 0.15,
            consistency: 0.05,
        }
    }
}

impl Weights {
    /// Returns normalized weights summing to 1.0.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the raw weights sum to exactly zero,
    /// since no meaningful score can be produced from them.
    pub fn normalize(&self) -> Result<Self> {
        let total = self.win_rate
            + self.pnl_per_usd
            + self.timing_edge
            + self.conviction_z
            + self.consistency;

        if total == 0.0 {
            return Err(EdgeScanError::invalid_configuration(
                "all feature weights are zero",
            ));
        }

        Ok(Self {
            win_rate: self.win_rate / total,
            pnl_per_usd: self.pnl_per_usd / total,
            timing_edge: self.timing_edge / total,
            conviction_z: self.conviction_z / total,
            consistency: self.consistency / total,
        })
    }
}

/// Filters for excluding low-activity wallets from the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Wallets below this total historical activity (USD) are skipped unless
    /// they hold a current stake.
    pub ignore_low_activity_usd: f64,
    /// Minimum total trade count for full consideration.
    pub ignore_total_trades_lt: u32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            ignore_low_activity_usd: 250.0,
            ignore_total_trades_lt: 10,
        }
    }
}

/// Caps and limits applied during feature engineering and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsConfig {
    /// Winsorization percentile for per-position PnL ratios.
    pub feature_clip_pct: f64,
    /// Maximum share of the aggregate signal any single wallet may carry.
    pub max_influence_single_wallet: f64,
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            feature_clip_pct: 0.95,
            max_influence_single_wallet: 0.33,
        }
    }
}

/// Scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Prior win rate that small samples are shrunk toward.
    pub shrinkage_prior: f64,
    /// Lower bound of the insider likelihood score.
    pub score_floor: f64,
    /// Upper bound of the insider likelihood score.
    pub score_ceiling: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            shrinkage_prior: 0.50,
            score_floor: 0.00,
            score_ceiling: 1.00,
        }
    }
}

/// Market signal aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSignalConfig {
    /// Whether to blend an order-book price direction into the final score.
    pub use_dir_from_price: bool,
    /// Blend weight on the price direction score.
    pub dir_weight: f64,
    /// Blend weight on the holder signal.
    pub holder_weight: f64,
}

impl Default for MarketSignalConfig {
    fn default() -> Self {
        Self {
            use_dir_from_price: true,
            dir_weight: 0.30,
            holder_weight: 0.70,
        }
    }
}
