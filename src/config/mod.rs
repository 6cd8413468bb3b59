//! Configuration module - registry settings and per-type overrides
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_INTERFACE_URL, DEFAULT_POPUP_BASE_URL, EXTERNAL_TOOL_URL,
    PRELOAD_MAIN, PRELOAD_ONBOARDING, PRELOAD_POPUP_BASIC, PRELOAD_POPUP_WEB3, PRELOAD_SPLASH,
};

pub use types::RegistryConfig;

pub use loader::{config_path, load_config, load_config_from};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
