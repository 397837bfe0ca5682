use clap::{Parser, Subcommand};

mod commands;

use commands::ScanArgs;

#[derive(Parser)]
#[command(name = "edge-scan")]
#[command(about = "Polymarket holder edge and insider-likelihood scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the holders of an earnings market and aggregate a directional signal
    Scan(ScanArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Scan(args) => commands::run_scan(args).await?,
    }

    Ok(())
}
