//! Native window toolkit seam.
//!
//! The registry never talks to a platform directly. It drives a
//! [`NativeToolkit`] and is fed back the toolkit's asynchronous callbacks as
//! [`NativeEvent`]s, all on the one control thread.
//!
//! # Event flow
//!
//! ```text
//!  registry ──create/load/show/hide/close/send──▶ toolkit
//!  registry ◀──────── NativeEvent (later) ──────── toolkit
//! ```
//!
//! Close attempts coming from the user (title-bar button, OS shortcut) are
//! reported as [`NativeEvent::CloseRequested`]; the toolkit must not close on
//! its own. The registry answers with a [`CloseDecision`] and, when the close
//! proceeds, issues [`NativeToolkit::close`] itself. `close` is then reported
//! back as [`NativeEvent::Closed`].

mod headless;

pub use headless::{HeadlessToolkit, HeadlessWindow};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolkitError;
use crate::windows::{ContentId, WindowOptions};

/// Identity the toolkit assigns to a native window at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NativeWindowId(pub u64);

/// Operations the registry needs from a native windowing layer.
///
/// Every call returns immediately; effects are observed later through
/// [`NativeEvent`]s.
pub trait NativeToolkit {
    /// Construct a native window. The window starts hidden.
    fn create_window(&mut self, options: &WindowOptions) -> Result<NativeWindowId, ToolkitError>;

    /// Navigate the window's content. A later call supersedes an in-flight one.
    fn load_url(&mut self, window: NativeWindowId, url: &str);

    fn show(&mut self, window: NativeWindowId);

    fn hide(&mut self, window: NativeWindowId);

    /// Destroy the native window; completion arrives as `NativeEvent::Closed`.
    fn close(&mut self, window: NativeWindowId);

    fn resize(&mut self, window: NativeWindowId, width: u32, height: u32);

    /// Anchor `window` to `parent`, or detach it with `None`.
    fn set_parent(&mut self, window: NativeWindowId, parent: Option<NativeWindowId>);

    /// Deliver a message to the window's content process.
    fn send(&mut self, window: NativeWindowId, channel: &str, args: &[Value]);

    /// Terminate the application.
    fn quit(&mut self);

    /// Next queued callback, for toolkits that are polled rather than pushing
    /// events into the registry themselves.
    fn poll_event(&mut self) -> Option<NativeEvent> {
        None
    }
}

/// Asynchronous callbacks from the toolkit.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// The content surface finished loading
    ContentReady { window: NativeWindowId },
    /// The content process announced its own id
    ContentIdReported {
        window: NativeWindowId,
        content_id: ContentId,
    },
    /// The content itself tried to navigate away
    WillNavigate { window: NativeWindowId, url: String },
    /// Something other than the registry asked the window to close
    CloseRequested { window: NativeWindowId },
    /// The native window is gone
    Closed { window: NativeWindowId },
}

impl NativeEvent {
    pub fn window(&self) -> NativeWindowId {
        match self {
            NativeEvent::ContentReady { window }
            | NativeEvent::ContentIdReported { window, .. }
            | NativeEvent::WillNavigate { window, .. }
            | NativeEvent::CloseRequested { window }
            | NativeEvent::Closed { window } => *window,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Proceed,
    Prevent,
}

/// The registry's answer to a [`NativeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeResponse {
    Handled,
    /// The event named a window the registry does not track
    Ignored,
    Navigation(NavigationDecision),
    Close(CloseDecision),
}
