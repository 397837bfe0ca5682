//! Market metadata record resolved from the Gamma API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved metadata for a single binary market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Unique condition ID.
    pub condition_id: String,
    /// Market title/question.
    pub title: String,
    /// Market resolution time (UTC).
    pub end_time: DateTime<Utc>,
    /// YES outcome token ID, when known.
    pub yes_token_id: Option<String>,
    /// NO outcome token ID, when known.
    pub no_token_id: Option<String>,
    /// Market slug, when known.
    pub slug: Option<String>,
}

impl MarketInfo {
    /// Returns the slug if present, otherwise the condition ID.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.condition_id)
    }
}
