//! Report writers for wallet scores, the market signal, and run metadata.
//!
//! CSV for spreadsheet work, JSON for downstream tooling, Markdown for a
//! human-readable summary. Wallets are always ordered by insider likelihood
//! score, highest first.

use crate::models::{MarketSignal, RunMetadata, WalletScore};
use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

/// Returns the wallet scores sorted by score descending.
fn sorted_by_score(scores: &[WalletScore]) -> Vec<&WalletScore> {
    let mut sorted: Vec<&WalletScore> = scores.iter().collect();
    sorted.sort_by(|a, b| {
        b.insider_likelihood_score
            .partial_cmp(&a.insider_likelihood_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Shortens a wallet address for display (`0x1234...abcd`).
fn short_address(address: &str) -> String {
    if address.len() > 12 {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Writes wallet scores to CSV, sorted by score descending.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_csv(scores: &[WalletScore], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "address",
        "username",
        "current_stake_usd",
        "current_side",
        "insider_likelihood_score",
        "win_rate",
        "pnl_per_usd",
        "timing_edge",
        "conviction_z",
        "consistency",
        "signed_contribution",
        "sample_size",
        "low_sample_flag",
    ])?;

    for score in sorted_by_score(scores) {
        writer.write_record(&[
            score.address.clone(),
            score.username.clone().unwrap_or_default(),
            format!("{:.2}", score.current_stake_usd),
            score.current_side.to_string(),
            format!("{:.4}", score.insider_likelihood_score),
            format!("{:.4}", score.features.win_rate),
            format!("{:.4}", score.features.pnl_per_usd),
            format!("{:.4}", score.features.timing_edge),
            format!("{:.4}", score.features.conviction_z),
            format!("{:.4}", score.features.consistency),
            format!("{:.2}", score.signed_contribution),
            score.sample_size.to_string(),
            score.low_sample_flag.to_string(),
        ])?;
    }

    writer.flush()?;
    tracing::info!(count = scores.len(), path = %path.display(), "Wrote wallet scores CSV");
    Ok(())
}

/// Complete JSON output document.
#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a RunMetadata,
    market_signal: &'a MarketSignal,
    wallets: Vec<&'a WalletScore>,
}

/// Writes the complete results document to JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_json(
    scores: &[WalletScore],
    signal: &MarketSignal,
    metadata: &RunMetadata,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let report = JsonReport {
        metadata,
        market_signal: signal,
        wallets: sorted_by_score(scores),
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, &report)
        .with_context(|| format!("Failed to serialize JSON report: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote JSON report");
    Ok(())
}

/// Writes a human-readable Markdown report.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_markdown(
    scores: &[WalletScore],
    signal: &MarketSignal,
    metadata: &RunMetadata,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut out = String::new();

    let _ = writeln!(out, "# Polymarket Holder Edge Analysis\n");
    let _ = writeln!(out, "**Market:** {}\n", metadata.market_title);
    let _ = writeln!(out, "**Condition ID:** `{}`\n", metadata.condition_id);
    let _ = writeln!(
        out,
        "**Analysis Time:** {}\n",
        metadata.run_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(out, "## Market Signal\n");
    let _ = writeln!(out, "- **Direction:** {}", signal.direction);
    let _ = writeln!(out, "- **Final Score:** {:.4}", signal.final_score);
    let _ = writeln!(out, "- **Holder Signal:** {:.4}", signal.holder_signal);
    if let Some(dir_score) = signal.dir_score {
        let _ = writeln!(out, "- **Price Direction Score:** {dir_score:.4}");
    }
    let _ = writeln!(out, "- **Wallets Analyzed:** {}", signal.top_wallets_count);
    let _ = writeln!(out, "- **Total Stake:** ${:.2}\n", signal.total_stake_usd);

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(
        out,
        "- **Total Holders Analyzed:** {}",
        metadata.holders_analyzed
    );
    let _ = writeln!(
        out,
        "- **Holders with Full Scores:** {}",
        metadata.holders_scored
    );
    let _ = writeln!(
        out,
        "- **Holders with Low Sample:** {}\n",
        metadata.holders_low_sample
    );

    let _ = writeln!(out, "## Top 20 Wallets by Insider Likelihood Score\n");
    let _ = writeln!(
        out,
        "| Rank | Address | Stake USD | Side | Score | Win Rate | PnL/USD | Sample | Low Sample |"
    );
    let _ = writeln!(
        out,
        "|------|---------|-----------|------|-------|----------|---------|--------|------------|"
    );

    for (rank, score) in sorted_by_score(scores).iter().take(20).enumerate() {
        let _ = writeln!(
            out,
            "| {} | `{}` | ${:.0} | {} | {:.3} | {:.3} | {:.3} | {} | {} |",
            rank + 1,
            short_address(&score.address),
            score.current_stake_usd,
            score.current_side,
            score.insider_likelihood_score,
            score.features.win_rate,
            score.features.pnl_per_usd,
            score.sample_size,
            if score.low_sample_flag { "Yes" } else { "No" },
        );
    }

    let _ = writeln!(out, "\n## Important Caveats\n");
    let _ = writeln!(out, "- **Behavioral Analysis Only:** Scores represent behavioral likelihood of informational edge based on historical patterns.");
    let _ = writeln!(
        out,
        "- **No Legal Assertion:** This tool makes no claims about illegal activity or insider trading."
    );
    let _ = writeln!(
        out,
        "- **Historical Performance:** Past performance does not guarantee future results."
    );
    let _ = writeln!(out, "- **Sample Size:** Wallets with `Low Sample = Yes` have limited historical data and scores may be unreliable.");

    let _ = writeln!(out, "\n## Glossary\n");
    let _ = writeln!(
        out,
        "- **Insider Likelihood Score:** Weighted combination of behavioral edge features [0-1]"
    );
    let _ = writeln!(
        out,
        "- **Win Rate:** Historical success rate on earnings markets, weighted by stake size"
    );
    let _ = writeln!(out, "- **PnL/USD:** Median profit/loss ratio per dollar risked");
    let _ = writeln!(
        out,
        "- **Conviction Z:** How unusual current stake is vs historical distribution"
    );

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write markdown report: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote markdown report");
    Ok(())
}

/// Writes run metadata to JSON.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_run_metadata(metadata: &RunMetadata, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create metadata file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, metadata)
        .with_context(|| format!("Failed to serialize run metadata: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote run metadata");
    Ok(())
}
