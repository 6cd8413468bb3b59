//! Window identity types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The kind of a window.
///
/// Each documented kind carries its own preset (see `presets`). Names the
/// registry does not recognize are kept as `Other` and resolve to an empty
/// preset instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// The main application window
    Main,
    /// Startup splash screen
    SplashScreen,
    /// Transient progress indicator shown while popups boot
    Loading,
    /// First-run onboarding flow
    Onboarding,
    About,
    /// Launcher for an external web tool
    ExternalTool,
    ImportAccount,
    RequestAccount,
    ConnectAccount,
    /// Transaction confirmation
    SendTransaction,
    UpdateAvailable,
    ClientUpdateAvailable,
    /// The pooled generic window reused for short-lived popups
    Generic,
    Other(String),
}

impl WindowType {
    /// All documented kinds, in preset-table order.
    pub const KNOWN: [WindowType; 13] = [
        WindowType::Main,
        WindowType::SplashScreen,
        WindowType::Loading,
        WindowType::Onboarding,
        WindowType::About,
        WindowType::ExternalTool,
        WindowType::ImportAccount,
        WindowType::RequestAccount,
        WindowType::ConnectAccount,
        WindowType::SendTransaction,
        WindowType::UpdateAvailable,
        WindowType::ClientUpdateAvailable,
        WindowType::Generic,
    ];

    /// Stable key used in config files, popup URLs and logs
    pub fn as_str(&self) -> &str {
        match self {
            WindowType::Main => "main",
            WindowType::SplashScreen => "splash",
            WindowType::Loading => "loading",
            WindowType::Onboarding => "onboardingScreen",
            WindowType::About => "about",
            WindowType::ExternalTool => "remix",
            WindowType::ImportAccount => "importAccount",
            WindowType::RequestAccount => "requestAccount",
            WindowType::ConnectAccount => "connectAccount",
            WindowType::SendTransaction => "sendTransactionConfirmation",
            WindowType::UpdateAvailable => "updateAvailable",
            WindowType::ClientUpdateAvailable => "clientUpdateAvailable",
            WindowType::Generic => "genericWindow",
            WindowType::Other(name) => name,
        }
    }

    /// Parse a key. Total: unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == name)
            .cloned()
            .unwrap_or_else(|| WindowType::Other(name.to_string()))
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, WindowType::Generic)
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WindowType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WindowType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(WindowType::from_name(&name))
    }
}

/// Registry-assigned identity of a managed window.
///
/// Two calls that return the same key refer to the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowKey(pub u64);

/// Content-side id, reported asynchronously once the content process is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub u32);
