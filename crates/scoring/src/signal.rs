//! Market-level signal aggregation.
//!
//! Combines all wallet scores (and, optionally, an order-book-derived price
//! signal) into one directional market signal with an advisory label.

use edge_scan_core::stats::clip;
use edge_scan_core::ScanConfig;
use edge_scan_data::{MarketSignal, SignalDirection, WalletScore};

/// Aggregates wallet scores into a single market signal.
///
/// Each wallet's influence is its stake share of the total, capped at
/// `caps.max_influence_single_wallet` so one large holder cannot dominate.
/// Capped weights are deliberately NOT renormalized: when stake is
/// concentrated the summed influence shrinks below full weight, which reads
/// as lower confidence.
///
/// An empty wallet list is a defined degenerate case and yields the
/// zero/FLAT signal rather than an error.
#[must_use]
pub fn compute_market_signal(
    wallet_scores: &[WalletScore],
    yes_mid_price: Option<f64>,
    cfg: &ScanConfig,
) -> MarketSignal {
    if wallet_scores.is_empty() {
        return MarketSignal::flat();
    }

    let total_stake: f64 = wallet_scores.iter().map(|w| w.current_stake_usd).sum();

    let holder_signal = if total_stake == 0.0 {
        0.0
    } else {
        let sum: f64 = wallet_scores
            .iter()
            .map(|w| {
                let weight = (w.current_stake_usd / total_stake)
                    .min(cfg.caps.max_influence_single_wallet);
                w.insider_likelihood_score * weight * w.current_side.sign()
            })
            .sum();
        clip(sum, -1.0, 1.0)
    };

    let dir_score = match yes_mid_price {
        Some(price) if cfg.market_signal.use_dir_from_price => Some((price - 0.5) * 2.0),
        _ => None,
    };

    let final_score = match dir_score {
        Some(dir) => clip(
            cfg.market_signal.holder_weight * holder_signal + cfg.market_signal.dir_weight * dir,
            -1.0,
            1.0,
        ),
        None => clip(holder_signal, -1.0, 1.0),
    };

    let direction = SignalDirection::from_final_score(final_score);

    tracing::debug!(
        holder_signal = format!("{holder_signal:.4}"),
        final_score = format!("{final_score:.4}"),
        direction = %direction,
        wallets = wallet_scores.len(),
        "Computed market signal"
    );

    MarketSignal {
        holder_signal,
        dir_score,
        final_score,
        direction,
        top_wallets_count: wallet_scores.len(),
        total_stake_usd: total_stake,
    }
}
