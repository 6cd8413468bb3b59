//! Window management module
//!
//! Tracks every window the application opens under a single registry,
//! resolves their configuration from presets and recycles the generic window
//! for popups.

mod handle;
mod options;
mod pool;
mod presets;
mod registry;
mod types;

pub use handle::{LifecycleEvent, WindowEvent, WindowHandle, WindowState, SWITCH_TEMPLATE_CHANNEL};
pub use options::{merge_layers, Merge, WebPreferences, WindowOptions};
pub use pool::GenericPool;
pub use presets::{popup_defaults, popup_preload, preset};
pub use registry::WindowRegistry;
pub use types::{ContentId, WindowKey, WindowType};
