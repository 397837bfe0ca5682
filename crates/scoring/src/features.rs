//! Feature engineering for wallet scoring.
//!
//! Converts one wallet's raw history (closed positions and trades) into a
//! fixed five-dimensional feature vector plus a sample-size count. Every
//! sub-computation is total: missing or degenerate history degrades to the
//! neutral midpoint `0.5` (win rate degrades to the configured prior), so a
//! sparse wallet still yields a well-defined low-confidence score.

use edge_scan_core::stats::{clip, normalize_to_unit, shrink_to_prior, weighted_mean, winsorize};
use edge_scan_core::{EdgeScanError, Result, ScanConfig};
use edge_scan_data::{ClosedPosition, FeatureVector, Trade};
use regex::{Regex, RegexBuilder};

/// Computes feature vectors for wallets against a fixed configuration.
///
/// The earnings-title pattern is compiled once at construction; everything
/// after that is a pure function of the wallet's history.
#[derive(Debug)]
pub struct FeatureEngine {
    earnings_title: Regex,
    min_sample: usize,
    shrinkage_prior: f64,
    feature_clip_pct: f64,
}

impl FeatureEngine {
    /// Builds a feature engine from the scan configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the earnings title pattern is not a
    /// valid regex.
    pub fn new(cfg: &ScanConfig) -> Result<Self> {
        let earnings_title = RegexBuilder::new(&cfg.history.earnings_title_regex)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                EdgeScanError::invalid_configuration(format!(
                    "bad earnings title pattern {:?}: {e}",
                    cfg.history.earnings_title_regex
                ))
            })?;

        Ok(Self {
            earnings_title,
            min_sample: cfg.history.min_sample,
            shrinkage_prior: cfg.scoring.shrinkage_prior,
            feature_clip_pct: cfg.caps.feature_clip_pct,
        })
    }

    /// Computes the feature vector and earnings sample size for a wallet.
    ///
    /// `current_stake_usd` is the wallet's live position in the target
    /// market; `closed_positions` and `trades` are its full history.
    #[must_use]
    pub fn compute(
        &self,
        current_stake_usd: f64,
        closed_positions: &[ClosedPosition],
        trades: &[Trade],
    ) -> (FeatureVector, usize) {
        let earnings_positions: Vec<&ClosedPosition> = closed_positions
            .iter()
            .filter(|p| self.earnings_title.is_match(&p.title))
            .collect();

        let sample_size = earnings_positions.len();

        let features = FeatureVector {
            win_rate: self.win_rate(&earnings_positions),
            pnl_per_usd: self.pnl_per_usd(&earnings_positions),
            timing_edge: Self::timing_edge(trades),
            conviction_z: self.conviction_z(current_stake_usd, &earnings_positions),
            consistency: Self::consistency(&earnings_positions),
        };

        (features, sample_size)
    }

    /// Stake-weighted win rate, shrunk toward the configured prior.
    ///
    /// No positions or zero total stake carry no information, so the prior
    /// is returned directly without shrinkage.
    fn win_rate(&self, positions: &[&ClosedPosition]) -> f64 {
        if positions.is_empty() {
            return self.shrinkage_prior;
        }

        let stakes: Vec<f64> = positions.iter().map(|p| p.risked_stake()).collect();
        if stakes.iter().sum::<f64>() == 0.0 {
            return self.shrinkage_prior;
        }

        let win_values: Vec<f64> = positions
            .iter()
            .map(|p| if p.was_winner { 1.0 } else { 0.0 })
            .collect();

        // Total stake is non-zero here, so the weighted mean is defined.
        let observed = weighted_mean(&win_values, &stakes).unwrap_or(self.shrinkage_prior);

        let shrunk = shrink_to_prior(
            observed,
            self.shrinkage_prior,
            positions.len(),
            self.min_sample,
        );

        clip(shrunk, 0.0, 1.0)
    }

    /// Winsorized median PnL per USD risked, mapped from `[-0.5, 1.5]`
    /// into the unit interval.
    fn pnl_per_usd(&self, positions: &[&ClosedPosition]) -> f64 {
        let ratios: Vec<f64> = positions
            .iter()
            .filter_map(|p| {
                let risked = p.risked_stake();
                (risked > 0.0).then(|| p.pnl_usd / risked)
            })
            .collect();

        if ratios.is_empty() {
            return 0.5;
        }

        let mut winsorized = winsorize(&ratios, self.feature_clip_pct);
        winsorized.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = winsorized[winsorized.len() / 2];

        clip(normalize_to_unit(median, -0.5, 1.5), 0.0, 1.0)
    }

    /// Concentration of trade activity in the 1-24h window before
    /// resolution. Neutral until the timing analysis lands.
    ///
    /// TODO: bucket `trades` by time-to-resolution and score the share of
    /// volume inside the critical window.
    fn timing_edge(_trades: &[Trade]) -> f64 {
        0.5
    }

    /// Z-score of the current stake against the wallet's own historical
    /// stake distribution, mapped from `[-3, 3]` into the unit interval.
    fn conviction_z(&self, current_stake: f64, positions: &[&ClosedPosition]) -> f64 {
        let stakes: Vec<f64> = positions
            .iter()
            .map(|p| p.risked_stake())
            .filter(|s| *s > 0.0)
            .collect();

        if stakes.is_empty() {
            return 0.5;
        }

        let n = stakes.len() as f64;
        let mean = stakes.iter().sum::<f64>() / n;
        let variance = stakes.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
        let std = variance.sqrt();

        if std < f64::EPSILON {
            return 0.5;
        }

        let z = (current_stake - mean) / std;

        clip(normalize_to_unit(z, -3.0, 3.0), 0.0, 1.0)
    }

    /// Directional alignment across positions sharing a ticker/sector.
    /// Neutral until ticker grouping is implemented.
    fn consistency(_positions: &[&ClosedPosition]) -> f64 {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn engine() -> FeatureEngine {
        FeatureEngine::new(&ScanConfig::default()).unwrap()
    }

    fn position(title: &str, risked: f64, pnl: f64, won: bool) -> ClosedPosition {
        ClosedPosition {
            title: title.to_string(),
            event_id: None,
            pnl_usd: pnl,
            was_winner: won,
            resolved_at: Utc.with_ymd_and_hms(2025, 7, 25, 20, 0, 0).unwrap(),
            amount_risked: Some(risked),
        }
    }

    fn earnings_position(risked: f64, pnl: f64, won: bool) -> ClosedPosition {
        position("ACME quarterly earnings beat", risked, pnl, won)
    }

    fn trade(price: f64) -> Trade {
        Trade {
            ts: Utc.with_ymd_and_hms(2025, 7, 25, 12, 0, 0).unwrap(),
            side: "buy".to_string(),
            price,
            amount: 10.0,
            amount_usd: price * 10.0,
            market: None,
        }
    }

    // ============================================
    // Title Filter Tests
    // ============================================

    #[test]
    fn sample_size_counts_earnings_positions_only() {
        let positions = vec![
            earnings_position(100.0, 50.0, true),
            position("Will BTC close above 100k?", 100.0, 50.0, true),
            position("ACME Q3 EPS above $1.90?", 100.0, -100.0, false),
        ];

        let (_, sample_size) = engine().compute(500.0, &positions, &[]);
        assert_eq!(sample_size, 2);
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let positions = vec![position("ACME QUARTERLY EARNINGS", 100.0, 10.0, true)];
        let (_, sample_size) = engine().compute(0.0, &positions, &[]);
        assert_eq!(sample_size, 1);
    }

    #[test]
    fn bad_pattern_is_invalid_configuration() {
        let mut cfg = ScanConfig::default();
        cfg.history.earnings_title_regex = "(unclosed".to_string();
        let err = FeatureEngine::new(&cfg).unwrap_err();
        assert!(matches!(err, EdgeScanError::InvalidConfiguration(_)));
    }

    // ============================================
    // Win Rate Tests
    // ============================================

    #[test]
    fn win_rate_is_stake_weighted_and_shrunk() {
        // Stakes [1000, 2000, 3000], wins [true, false, true]:
        // observed = (1000 + 3000) / 6000 = 0.667, shrunk with n_obs=3,
        // n_prior=5 toward 0.5 => 0.667*3/8 + 0.5*5/8 = 0.5625.
        let positions = vec![
            earnings_position(1000.0, 800.0, true),
            earnings_position(2000.0, -2000.0, false),
            earnings_position(3000.0, 2500.0, true),
        ];

        let (features, sample_size) = engine().compute(10_000.0, &positions, &[]);

        assert_eq!(sample_size, 3);
        assert!(
            (features.win_rate - 0.5625).abs() < 1e-9,
            "win_rate was {}",
            features.win_rate
        );
    }

    #[test]
    fn win_rate_no_history_returns_prior() {
        let (features, sample_size) = engine().compute(1000.0, &[], &[]);
        assert_eq!(sample_size, 0);
        assert!((features.win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_zero_stakes_returns_prior() {
        // Zero risked and zero PnL contribute no stake information.
        let positions = vec![
            earnings_position(0.0, 0.0, true),
            earnings_position(0.0, 0.0, true),
        ];
        let (features, _) = engine().compute(1000.0, &positions, &[]);
        assert!((features.win_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_uses_custom_prior() {
        let mut cfg = ScanConfig::default();
        cfg.scoring.shrinkage_prior = 0.3;
        let engine = FeatureEngine::new(&cfg).unwrap();
        let (features, _) = engine.compute(1000.0, &[], &[]);
        assert!((features.win_rate - 0.3).abs() < f64::EPSILON);
    }

    // ============================================
    // PnL per USD Tests
    // ============================================

    #[test]
    fn pnl_per_usd_neutral_without_ratios() {
        let (features, _) = engine().compute(1000.0, &[], &[]);
        assert!((features.pnl_per_usd - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn pnl_per_usd_median_maps_to_unit_interval() {
        // Ratios [1.0, -0.5, 0.5]: median 0.5 maps to (0.5+0.5)/2 = 0.5.
        let positions = vec![
            earnings_position(100.0, 100.0, true),
            earnings_position(100.0, -50.0, false),
            earnings_position(100.0, 50.0, true),
        ];
        let (features, _) = engine().compute(100.0, &positions, &[]);
        assert!(
            (features.pnl_per_usd - 0.5).abs() < 1e-9,
            "pnl_per_usd was {}",
            features.pnl_per_usd
        );
    }

    #[test]
    fn pnl_per_usd_full_payout_clips_to_one() {
        // Ratio 1.5 everywhere maps to exactly 1.0 after normalization.
        let positions = vec![
            earnings_position(100.0, 150.0, true),
            earnings_position(200.0, 300.0, true),
            earnings_position(400.0, 600.0, true),
        ];
        let (features, _) = engine().compute(100.0, &positions, &[]);
        assert!((features.pnl_per_usd - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pnl_per_usd_heavy_losses_floor_at_zero() {
        // Losing more than half the stake maps below zero and clips to 0.
        let positions = vec![
            earnings_position(100.0, -90.0, false),
            earnings_position(100.0, -95.0, false),
            earnings_position(100.0, -80.0, false),
        ];
        let (features, _) = engine().compute(100.0, &positions, &[]);
        assert!((features.pnl_per_usd - 0.0).abs() < 1e-9);
    }

    // ============================================
    // Placeholder Feature Tests
    // ============================================

    #[test]
    fn timing_edge_is_neutral_placeholder() {
        let trades = vec![trade(0.6), trade(0.7)];
        let (features, _) = engine().compute(1000.0, &[], &trades);
        assert!((features.timing_edge - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn consistency_is_neutral_placeholder() {
        let positions = vec![
            earnings_position(100.0, 50.0, true),
            earnings_position(100.0, -50.0, false),
        ];
        let (features, _) = engine().compute(1000.0, &positions, &[]);
        assert!((features.consistency - 0.5).abs() < f64::EPSILON);
    }

    // ============================================
    // Conviction Z Tests
    // ============================================

    #[test]
    fn conviction_z_unusual_stake_saturates() {
        // History around $2k; a $10k stake is far beyond +3 sigma.
        let positions = vec![
            earnings_position(1000.0, 0.0, true),
            earnings_position(2000.0, 0.0, false),
            earnings_position(3000.0, 0.0, true),
        ];
        let (features, _) = engine().compute(10_000.0, &positions, &[]);
        assert!(
            (features.conviction_z - 1.0).abs() < 1e-9,
            "conviction_z was {}",
            features.conviction_z
        );
    }

    #[test]
    fn conviction_z_typical_stake_is_neutral() {
        let positions = vec![
            earnings_position(1000.0, 0.0, true),
            earnings_position(2000.0, 0.0, false),
            earnings_position(3000.0, 0.0, true),
        ];
        // Staking exactly the historical mean gives z = 0 => 0.5.
        let (features, _) = engine().compute(2000.0, &positions, &[]);
        assert!((features.conviction_z - 0.5).abs() < 1e-9);
    }

    #[test]
    fn conviction_z_identical_stakes_is_neutral() {
        // Zero variance history carries no conviction information.
        let positions = vec![
            earnings_position(500.0, 0.0, true),
            earnings_position(500.0, 0.0, false),
        ];
        let (features, _) = engine().compute(50_000.0, &positions, &[]);
        assert!((features.conviction_z - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn conviction_z_no_history_is_neutral() {
        let (features, _) = engine().compute(50_000.0, &[], &[]);
        assert!((features.conviction_z - 0.5).abs() < f64::EPSILON);
    }

    // ============================================
    // Bounds Tests
    // ============================================

    #[test]
    fn all_features_stay_in_unit_interval() {
        let positions = vec![
            earnings_position(10.0, 1_000_000.0, true),
            earnings_position(1_000_000.0, -1_000_000.0, false),
            earnings_position(0.5, 0.25, true),
        ];
        let (features, _) = engine().compute(1e9, &positions, &[]);

        for (name, value) in [
            ("win_rate", features.win_rate),
            ("pnl_per_usd", features.pnl_per_usd),
            ("timing_edge", features.timing_edge),
            ("conviction_z", features.conviction_z),
            ("consistency", features.consistency),
        ] {
            assert!((0.0..=1.0).contains(&value), "{name} was {value}");
        }
    }
}
