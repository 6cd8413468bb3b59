//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Location of the user config file (tilde-expanded)
pub const DEFAULT_CONFIG_PATH: &str = "~/.window-registry/config.json";

/// Interface loaded into the main window
pub const DEFAULT_INTERFACE_URL: &str = "file:///app/interface/index.html";

/// Popups load `<base>#<type key>`
pub const DEFAULT_POPUP_BASE_URL: &str = "file:///app/interface/popups.html";

/// Default feature flags
pub const DEFAULT_PREWARM_GENERIC_WINDOW: bool = true;
pub const DEFAULT_SHOW_LOADING_INDICATOR: bool = true;

/// External web tool opened by the tool-launcher window
pub const EXTERNAL_TOOL_URL: &str = "https://remix.ethereum.org";

/// Content-bridge scripts
pub const PRELOAD_MAIN: &str = "preload/mainUI.js";
pub const PRELOAD_SPLASH: &str = "preload/splashScreen.js";
pub const PRELOAD_ONBOARDING: &str = "preload/onboardingScreen.js";
pub const PRELOAD_POPUP_WEB3: &str = "preload/popupWindows.js";
pub const PRELOAD_POPUP_BASIC: &str = "preload/popupWindowsNoWeb3.js";
