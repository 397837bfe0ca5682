//! Polymarket API clients for the holder edge scanner.
//!
//! Three REST surfaces feed the scanner: the Gamma API resolves market
//! identity, the Data API supplies holders / trades / closed positions, and
//! the CLOB API supplies order books for the price signal. All clients are
//! rate limited and retry transient failures with exponential backoff.
//!
//! Response shapes vary across API versions, so parsing goes through
//! ordered accessor fallbacks over raw JSON rather than rigid structs.

pub mod clob;
pub mod data_api;
pub mod error;
pub mod fields;
pub mod gamma;
mod http;

pub use clob::{ClobClient, CLOB_API_URL};
pub use data_api::{DataApiClient, DATA_API_URL};
pub use error::{PolymarketError, Result};
pub use gamma::{extract_slug_from_url, GammaClient, GAMMA_API_URL};
pub use http::RetryPolicy;
