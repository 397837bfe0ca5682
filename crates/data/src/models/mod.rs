//! Data models for the holder edge scanner.
//!
//! Fetch-side records (markets, holders, trades, closed positions, order
//! books) use plain `f64` USD amounts as delivered by the Data API; order
//! book price levels keep `rust_decimal::Decimal` precision at the CLOB
//! boundary. Scoring-side records (feature vectors, wallet scores, market
//! signals) are produced once per run and immutable thereafter.

pub mod holder;
pub mod market;
pub mod metadata;
pub mod orderbook;
pub mod position;
pub mod score;
pub mod trade;

pub use holder::{Holder, Side};
pub use market::MarketInfo;
pub use metadata::RunMetadata;
pub use orderbook::{OrderBook, PriceLevel};
pub use position::ClosedPosition;
pub use score::{FeatureVector, MarketSignal, SignalDirection, WalletScore};
pub use trade::Trade;
