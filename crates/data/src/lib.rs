pub mod models;
pub mod report;

pub use models::{
    ClosedPosition, FeatureVector, Holder, MarketInfo, MarketSignal, OrderBook, PriceLevel,
    RunMetadata, Side, SignalDirection, Trade, WalletScore,
};
pub use report::{write_csv, write_json, write_markdown, write_run_metadata};
