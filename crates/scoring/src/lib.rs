pub mod features;
pub mod score;
pub mod signal;

pub use features::FeatureEngine;
pub use score::{insider_likelihood_score, score_wallets, WalletInput};
pub use signal::compute_market_signal;
