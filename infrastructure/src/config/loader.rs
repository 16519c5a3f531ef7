//! Configuration file loader with multi-source merging

use super::file_config::RegistryConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONSILIUM_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./consilium.toml` or `./.consilium.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<RegistryConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(RegistryConfig::default()));

        // Project-level config files (check both names)
        for filename in &["consilium.toml", ".consilium.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        // Explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CONSILIUM_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> RegistryConfig {
        RegistryConfig::default()
    }
}
