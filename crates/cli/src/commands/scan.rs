//! Scan command: fetch a market's holders, score each wallet's behavioral
//! edge, aggregate the market signal, and write reports.
//!
//! # Error Handling
//!
//! A single wallet that fails to fetch or parse is logged and excluded
//! rather than aborting the run. An unresolvable market or an empty holder
//! set fails the run with a nonzero exit.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use edge_scan_core::{ConfigLoader, ScanConfig};
use edge_scan_data::{report, Holder, RunMetadata};
use edge_scan_polymarket::{ClobClient, DataApiClient, GammaClient};
use edge_scan_scoring::{compute_market_signal, score_wallets, FeatureEngine, WalletInput};
use std::path::PathBuf;

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Market slug, condition ID, or Polymarket URL
    #[arg(short, long)]
    pub market: String,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    pub outdir: PathBuf,

    /// Path to a config TOML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Historical lookback in quarters (overrides config)
    #[arg(long)]
    pub since_quarters: Option<u32>,

    /// Minimum sample size for full scoring (overrides config)
    #[arg(long)]
    pub min_sample: Option<usize>,

    /// Maximum number of holders to analyze
    #[arg(long, default_value_t = 500)]
    pub limit: usize,

    /// Fetch the order book and blend the price direction into the signal
    #[arg(long)]
    pub include_book: bool,

    /// Ask the Data API to pre-filter closed positions to earnings markets
    #[arg(long)]
    pub earnings_only: bool,

    /// Save results to CSV
    #[arg(long)]
    pub save_csv: bool,

    /// Save results to JSON
    #[arg(long)]
    pub save_json: bool,

    /// Save results to a Markdown report
    #[arg(long)]
    pub save_md: bool,
}

/// Runs the scan command.
///
/// # Errors
/// Returns an error if the market cannot be resolved, no holders are found,
/// the configuration is invalid, or report writing fails.
pub async fn run_scan(mut args: ScanArgs) -> Result<()> {
    // Default to all output formats when none was requested.
    if !(args.save_csv || args.save_json || args.save_md) {
        args.save_csv = true;
        args.save_json = true;
        args.save_md = true;
    }

    let mut cfg = match &args.config {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            ConfigLoader::load_from(path)?
        }
        None => ConfigLoader::load()?,
    };

    // CLI overrides apply after file/env merging.
    if let Some(min_sample) = args.min_sample {
        cfg.history.min_sample = min_sample;
    }
    if let Some(quarters) = args.since_quarters {
        cfg.history.lookback_quarters = quarters;
    }

    tracing::info!(market = %args.market, "Resolving market");
    let gamma = GammaClient::new();
    let market = gamma
        .resolve_market(&args.market)
        .await
        .with_context(|| format!("Failed to resolve market: {}", args.market))?;
    tracing::info!(title = %market.title, condition_id = %market.condition_id, "Market resolved");

    let data_api = DataApiClient::new();
    let holders = data_api
        .get_holders(&market.condition_id, args.limit)
        .await
        .context("Failed to fetch holders")?;

    if holders.is_empty() {
        bail!("No holders found for market {}", market.condition_id);
    }

    let yes_mid_price = if args.include_book {
        fetch_mid_price(&market.yes_token_id).await
    } else {
        None
    };

    let engine = FeatureEngine::new(&cfg)?;

    tracing::info!(count = holders.len(), "Processing wallets");
    let mut inputs = Vec::new();
    let mut excluded = 0usize;

    for (i, holder) in holders.iter().enumerate() {
        if (i + 1) % 10 == 0 {
            tracing::info!("Processing wallet {}/{}", i + 1, holders.len());
        }

        match process_holder(&data_api, &engine, &market.condition_id, holder, &cfg, &args).await {
            Ok(Some(input)) => inputs.push(input),
            Ok(None) => {
                excluded += 1;
                tracing::debug!(address = %holder.address, "Skipping wallet, no activity and no current stake");
            }
            Err(e) => {
                excluded += 1;
                tracing::warn!(address = %holder.address, error = %e, "Failed to process wallet, excluding");
            }
        }
    }

    tracing::info!(
        scored = inputs.len(),
        excluded,
        "Finished processing wallets"
    );

    if inputs.is_empty() {
        bail!("No wallets met the criteria, cannot generate a report");
    }

    let wallet_scores = score_wallets(&inputs, &cfg)?;
    let signal = compute_market_signal(&wallet_scores, yes_mid_price, &cfg);

    tracing::info!(
        direction = %signal.direction,
        final_score = format!("{:.4}", signal.final_score),
        "Market signal computed"
    );

    let low_sample = wallet_scores.iter().filter(|w| w.low_sample_flag).count();
    let run_meta = RunMetadata {
        market_slug: market.slug.clone().unwrap_or_else(|| args.market.clone()),
        condition_id: market.condition_id.clone(),
        market_title: market.title.clone(),
        run_timestamp: Utc::now(),
        config: serde_json::to_value(&cfg).context("Failed to serialize configuration")?,
        holders_analyzed: wallet_scores.len(),
        holders_scored: wallet_scores.len() - low_sample,
        holders_low_sample: low_sample,
    };

    if args.save_csv {
        report::write_csv(&wallet_scores, args.outdir.join("holders.csv"))?;
    }
    if args.save_json {
        report::write_json(
            &wallet_scores,
            &signal,
            &run_meta,
            args.outdir.join("holders.json"),
        )?;
    }
    if args.save_md {
        report::write_markdown(
            &wallet_scores,
            &signal,
            &run_meta,
            args.outdir.join("report.md"),
        )?;
    }
    report::write_run_metadata(&run_meta, args.outdir.join("run_meta.json"))?;

    tracing::info!(outdir = %args.outdir.display(), "Analysis complete");
    Ok(())
}

/// Fetches the YES order book mid price, tolerating failure.
///
/// The price signal is an optional enrichment; a missing book only drops
/// the blend, it never fails the run.
async fn fetch_mid_price(yes_token_id: &Option<String>) -> Option<f64> {
    let token_id = yes_token_id.as_deref()?;

    tracing::info!(token_id, "Fetching order book");
    match ClobClient::new().get_order_book(token_id).await {
        Ok(book) => {
            let mid = book.mid_price_f64();
            if let Some(price) = mid {
                tracing::info!("YES mid price: {price:.4}");
            } else {
                tracing::warn!("Order book too thin for a mid price");
            }
            mid
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch order book, continuing without price signal");
            None
        }
    }
}

/// Fetches one holder's history and computes its feature vector.
///
/// Returns `Ok(None)` when the wallet is filtered out by the low-activity
/// threshold (and holds no current stake).
async fn process_holder(
    data_api: &DataApiClient,
    engine: &FeatureEngine,
    condition_id: &str,
    holder: &Holder,
    cfg: &ScanConfig,
    args: &ScanArgs,
) -> Result<Option<WalletInput>> {
    let title_filter = args.earnings_only.then_some("earnings");

    let closed_positions = data_api
        .get_closed_positions(&holder.address, title_filter, 500)
        .await?;
    let trades = data_api
        .get_trades(Some(condition_id), Some(&holder.address), 1000)
        .await?;

    let (features, sample_size) = engine.compute(holder.amount_usd, &closed_positions, &trades);

    // Wallets with a live stake are always included; dormant wallets with
    // negligible history are not worth a row in the report.
    let total_activity: f64 = closed_positions.iter().map(|p| p.risked_stake()).sum();
    if total_activity < cfg.filters.ignore_low_activity_usd && holder.amount_usd == 0.0 {
        return Ok(None);
    }

    Ok(Some(WalletInput {
        address: holder.address.clone(),
        username: holder.username.clone(),
        stake_usd: holder.amount_usd,
        side: holder.side(),
        features,
        sample_size,
    }))
}
