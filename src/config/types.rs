//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::defaults::*;
use crate::windows::{WindowOptions, WindowType};

/// Registry-wide settings.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// URL loaded into the main window (default: bundled interface)
    #[serde(default = "default_interface_url")]
    pub interface_url: String,
    /// Base URL for popups; the type key is appended as the fragment
    #[serde(default = "default_popup_base_url")]
    pub popup_base_url: String,
    /// Create the pooled generic window during init (default: true)
    #[serde(default = "default_prewarm_generic_window")]
    pub prewarm_generic_window: bool,
    /// Show the loading indicator while a fresh popup boots (default: true)
    #[serde(default = "default_show_loading_indicator")]
    pub show_loading_indicator: bool,
    /// Per-type layer applied above the built-in preset, keyed by type name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub preset_overrides: HashMap<String, WindowOptions>,
}

fn default_interface_url() -> String {
    DEFAULT_INTERFACE_URL.to_string()
}
fn default_popup_base_url() -> String {
    DEFAULT_POPUP_BASE_URL.to_string()
}
fn default_prewarm_generic_window() -> bool {
    DEFAULT_PREWARM_GENERIC_WINDOW
}
fn default_show_loading_indicator() -> bool {
    DEFAULT_SHOW_LOADING_INDICATOR
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            interface_url: default_interface_url(),
            popup_base_url: default_popup_base_url(),
            prewarm_generic_window: DEFAULT_PREWARM_GENERIC_WINDOW,
            show_loading_indicator: DEFAULT_SHOW_LOADING_INDICATOR,
            preset_overrides: HashMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Override layer for `kind`, empty when none is configured
    pub fn override_for(&self, kind: &WindowType) -> WindowOptions {
        self.preset_overrides
            .get(kind.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// URL a popup of `kind` loads when nothing else names one. Every kind
    /// has one, unrecognized kinds included.
    pub fn popup_url(&self, kind: &WindowType) -> String {
        format!("{}#{}", self.popup_base_url, kind.as_str())
    }

    /// URL a window of `kind` loads when nothing else names one.
    /// Unrecognized kinds have none.
    pub fn default_url(&self, kind: &WindowType) -> Option<String> {
        match kind {
            WindowType::Main => Some(self.interface_url.clone()),
            WindowType::Other(_) => None,
            other => Some(format!("{}#{}", self.popup_base_url, other.as_str())),
        }
    }
}
