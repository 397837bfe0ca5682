//! Wallet scoring: weighted feature combination and signed contributions.

use edge_scan_core::stats::clip;
use edge_scan_core::{Result, ScanConfig, Weights};
use edge_scan_data::{FeatureVector, Side, WalletScore};

/// Per-wallet input to the batch scorer.
#[derive(Debug, Clone)]
pub struct WalletInput {
    pub address: String,
    pub username: Option<String>,
    pub stake_usd: f64,
    pub side: Side,
    pub features: FeatureVector,
    pub sample_size: usize,
}

/// Weighted sum of the feature components under already-normalized weights,
/// clipped into the configured score bounds.
fn weighted_score(features: &FeatureVector, weights: &Weights, cfg: &ScanConfig) -> f64 {
    let score = weights.win_rate * features.win_rate
        + weights.pnl_per_usd * features.pnl_per_usd
        + weights.timing_edge * features.timing_edge
        + weights.conviction_z * features.conviction_z
        + weights.consistency * features.consistency;

    clip(score, cfg.scoring.score_floor, cfg.scoring.score_ceiling)
}

/// Computes the insider likelihood score for a single feature vector.
///
/// A pure function of its inputs: the same features and configuration
/// always produce the identical score.
///
/// # Errors
/// Returns `InvalidConfiguration` when the configured weights sum to zero.
pub fn insider_likelihood_score(features: &FeatureVector, cfg: &ScanConfig) -> Result<f64> {
    let weights = cfg.weights.normalize()?;
    Ok(weighted_score(features, &weights, cfg))
}

/// Scores a batch of wallets, preserving input order.
///
/// Weight normalization runs once up front, so a zero-weight configuration
/// fails before any wallet is processed. There is no cross-wallet
/// interaction at this stage.
///
/// # Errors
/// Returns `InvalidConfiguration` when the configured weights sum to zero.
pub fn score_wallets(inputs: &[WalletInput], cfg: &ScanConfig) -> Result<Vec<WalletScore>> {
    let weights = cfg.weights.normalize()?;
    let min_sample = cfg.history.min_sample;

    let scores = inputs
        .iter()
        .map(|input| {
            let score = weighted_score(&input.features, &weights, cfg);

            WalletScore {
                address: input.address.clone(),
                username: input.username.clone(),
                current_stake_usd: input.stake_usd,
                current_side: input.side,
                features: input.features,
                insider_likelihood_score: score,
                signed_contribution: score * input.stake_usd * input.side.sign(),
                sample_size: input.sample_size,
                low_sample_flag: input.sample_size < min_sample,
            }
        })
        .collect();

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_scan_core::EdgeScanError;

    fn input(address: &str, stake: f64, side: Side, sample_size: usize) -> WalletInput {
        WalletInput {
            address: address.to_string(),
            username: None,
            stake_usd: stake,
            side,
            features: FeatureVector::neutral(),
            sample_size,
        }
    }

    // ============================================
    // Score Computation Tests
    // ============================================

    #[test]
    fn neutral_features_score_at_midpoint() {
        let cfg = ScanConfig::default();
        let score = insider_likelihood_score(&FeatureVector::neutral(), &cfg).unwrap();
        // Every component is 0.5 and the weights sum to 1 after
        // normalization, so the score is exactly the midpoint.
        assert!((score - 0.5).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn score_is_idempotent() {
        let cfg = ScanConfig::default();
        let features = FeatureVector {
            win_rate: 0.8,
            pnl_per_usd: 0.6,
            timing_edge: 0.5,
            conviction_z: 0.9,
            consistency: 0.5,
        };
        let first = insider_likelihood_score(&features, &cfg).unwrap();
        let second = insider_likelihood_score(&features, &cfg).unwrap();
        assert!((first - second).abs() < f64::EPSILON);
    }

    #[test]
    fn score_respects_configured_bounds() {
        let mut cfg = ScanConfig::default();
        cfg.scoring.score_floor = 0.2;
        cfg.scoring.score_ceiling = 0.8;

        let low = FeatureVector {
            win_rate: 0.0,
            pnl_per_usd: 0.0,
            timing_edge: 0.0,
            conviction_z: 0.0,
            consistency: 0.0,
        };
        let high = FeatureVector {
            win_rate: 1.0,
            pnl_per_usd: 1.0,
            timing_edge: 1.0,
            conviction_z: 1.0,
            consistency: 1.0,
        };

        assert!((insider_likelihood_score(&low, &cfg).unwrap() - 0.2).abs() < 1e-12);
        assert!((insider_likelihood_score(&high, &cfg).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn score_stays_in_default_bounds_for_any_features() {
        let cfg = ScanConfig::default();
        for win_rate in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for conviction in [0.0, 0.5, 1.0] {
                let features = FeatureVector {
                    win_rate,
                    pnl_per_usd: 1.0 - win_rate,
                    timing_edge: 0.5,
                    conviction_z: conviction,
                    consistency: 0.5,
                };
                let score = insider_likelihood_score(&features, &cfg).unwrap();
                assert!((0.0..=1.0).contains(&score), "score was {score}");
            }
        }
    }

    #[test]
    fn zero_weights_fail_before_scoring() {
        let mut cfg = ScanConfig::default();
        cfg.weights = Weights {
            win_rate: 0.0,
            pnl_per_usd: 0.0,
            timing_edge: 0.0,
            conviction_z: 0.0,
            consistency: 0.0,
        };

        let err = score_wallets(&[input("0x1", 100.0, Side::Yes, 5)], &cfg).unwrap_err();
        assert!(matches!(err, EdgeScanError::InvalidConfiguration(_)));
    }

    // ============================================
    // Batch Scoring Tests
    // ============================================

    #[test]
    fn batch_preserves_input_order() {
        let cfg = ScanConfig::default();
        let inputs = vec![
            input("0xc", 10.0, Side::Yes, 10),
            input("0xa", 30.0, Side::No, 10),
            input("0xb", 20.0, Side::Yes, 10),
        ];

        let scores = score_wallets(&inputs, &cfg).unwrap();

        let addresses: Vec<&str> = scores.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xc", "0xa", "0xb"]);
    }

    #[test]
    fn signed_contribution_uses_side_sign() {
        let cfg = ScanConfig::default();
        let scores = score_wallets(
            &[
                input("0xyes", 10_000.0, Side::Yes, 10),
                input("0xno", 10_000.0, Side::No, 10),
            ],
            &cfg,
        )
        .unwrap();

        // Neutral features score 0.5, so contributions are ±5000.
        assert!((scores[0].signed_contribution - 5000.0).abs() < 1e-6);
        assert!((scores[1].signed_contribution + 5000.0).abs() < 1e-6);
    }

    #[test]
    fn low_sample_flag_uses_min_sample_threshold() {
        let cfg = ScanConfig::default();
        let scores = score_wallets(
            &[
                input("0xthin", 100.0, Side::Yes, 3),
                input("0xthick", 100.0, Side::Yes, 5),
            ],
            &cfg,
        )
        .unwrap();

        assert!(scores[0].low_sample_flag);
        assert!(!scores[1].low_sample_flag);
    }

    #[test]
    fn empty_batch_yields_empty_scores() {
        let cfg = ScanConfig::default();
        let scores = score_wallets(&[], &cfg).unwrap();
        assert!(scores.is_empty());
    }
}
