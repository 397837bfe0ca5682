pub mod config;
pub mod config_loader;
pub mod error;
pub mod stats;

pub use config::{
    CapsConfig, FiltersConfig, HistoryConfig, MarketSignalConfig, ScanConfig, ScoringConfig,
    Weights,
};
pub use config_loader::ConfigLoader;
pub use error::{EdgeScanError, Result};
pub use stats::{clip, normalize_to_unit, robust_scale, shrink_to_prior, weighted_mean, winsorize};
