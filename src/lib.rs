//! Window Registry - lifecycle management for the windows of a desktop shell
//!
//! This library tracks every native window the application opens, resolves
//! their configuration from per-type presets, recycles a pooled generic window
//! for popups and decides when the application should quit.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod toolkit;
pub mod windows;

pub use config::RegistryConfig;
pub use error::{RegistryError, ToolkitError};
pub use store::{AppStore, InMemoryStore, RegistryEvent};
pub use toolkit::{HeadlessToolkit, NativeEvent, NativeResponse, NativeToolkit, NativeWindowId};
pub use windows::{WindowHandle, WindowKey, WindowOptions, WindowRegistry, WindowType};
