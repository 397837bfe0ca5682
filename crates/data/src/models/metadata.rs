//! Run metadata persisted alongside every report for auditability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Metadata describing a complete scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Market slug.
    pub market_slug: String,
    /// Condition ID.
    pub condition_id: String,
    /// Market title.
    pub market_title: String,
    /// Run timestamp (UTC).
    pub run_timestamp: DateTime<Utc>,
    /// Configuration used, serialized as an opaque structure.
    pub config: JsonValue,
    /// Number of holders analyzed.
    pub holders_analyzed: usize,
    /// Number of holders with full-sample scores.
    pub holders_scored: usize,
    /// Number of holders flagged for low sample.
    pub holders_low_sample: usize,
}
