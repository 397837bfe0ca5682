//! Current holder positions in the target market.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a binary market position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Sign applied to stake-weighted contributions: YES pushes the signal
    /// up, NO pushes it down.
    #[must_use]
    pub fn sign(&self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => -1.0,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet currently holding a position in the target market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holder {
    /// Wallet address.
    pub address: String,
    /// Username, if the API exposes one.
    pub username: Option<String>,
    /// Outcome index as reported by the API (0 = NO, 1 = YES).
    pub outcome_index: u32,
    /// Position size in USD.
    pub amount_usd: f64,
}

impl Holder {
    /// Maps the reported outcome index to a market side.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.outcome_index == 1 {
            Side::Yes
        } else {
            Side::No
        }
    }
}
