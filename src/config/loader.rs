//! Configuration loading from file system

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::RegistryConfig;

/// Path of the user config file with `~` expanded
pub fn config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from ~/.window-registry/config.json
///
/// Returns `RegistryConfig::default()` if anything goes wrong.
pub fn load_config() -> RegistryConfig {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path.
///
/// A missing file, an unreadable file and malformed JSON all fall back to
/// defaults; the reason is logged.
#[instrument(name = "load_config", skip_all, fields(path = %path.display()))]
pub fn load_config_from(path: &Path) -> RegistryConfig {
    if !path.exists() {
        info!("Config file not found, using defaults");
        return RegistryConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(error = %e, "Failed to read config file, using defaults");
            return RegistryConfig::default();
        }
    };

    match serde_json::from_str::<RegistryConfig>(&contents) {
        Ok(config) => {
            info!(
                overrides = config.preset_overrides.len(),
                "Successfully loaded config"
            );
            config
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse config JSON, using defaults");
            RegistryConfig::default()
        }
    }
}
