//! Order book snapshot for a single outcome token.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price level in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// Order book snapshot fetched from the CLOB API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    /// Outcome token ID.
    pub token_id: String,
    /// Bid levels (any order).
    pub bids: Vec<PriceLevel>,
    /// Ask levels (any order).
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Creates an empty book for a token.
    #[must_use]
    pub fn new(token_id: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Highest bid price, if any bids exist.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.iter().map(|level| level.price).max()
    }

    /// Lowest ask price, if any asks exist.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.iter().map(|level| level.price).min()
    }

    /// Mid price from the top of the book.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid + ask) / Decimal::TWO)
    }

    /// Bid-ask spread from the top of the book.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some(ask - bid)
    }

    /// Mid price as `f64` for the scoring layer.
    #[must_use]
    pub fn mid_price_f64(&self) -> Option<f64> {
        self.mid_price().and_then(|m| m.to_string().parse().ok())
    }
}
