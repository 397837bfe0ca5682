use crate::config::ScanConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads scanner configuration by merging the default TOML file and
    /// environment variables over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<ScanConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads scanner configuration from a specific TOML file.
    ///
    /// Missing sections fall back to the built-in defaults, so a partial
    /// file overriding a single threshold is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<ScanConfig> {
        let config: ScanConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("EDGE_SCAN_").split("__"))
            .extract()?;

        Ok(config)
    }
}
