//! One managed native window and its lifecycle.
//!
//! # State machine
//!
//! ```text
//! Created ──load──▶ Loading ──ready──▶ Ready ──show/hide──▶ Shown ⇄ Hidden
//!                                                              │
//!                                        close (non-generic) ──┴──▶ Closed
//! ```
//!
//! A pooled generic window never reaches `Closed` while the app is running:
//! its close is turned into hide + release, and the next `reuse` sends it
//! back to `Loading`.
//!
//! Every operation on a closed handle is a silent no-op. The registry owns
//! all handles; mutation goes through it so that events are recorded.

use serde_json::Value;
use tracing::debug;

use super::options::WindowOptions;
use super::types::{ContentId, WindowKey, WindowType};
use crate::toolkit::{NativeToolkit, NativeWindowId};

/// Channel used to tell a released generic window to drop its template.
pub const SWITCH_TEMPLATE_CHANNEL: &str = "uiAction_switchTemplate";

/// Collapsed view of a handle's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Created,
    Loading,
    /// Content ready, visibility not yet toggled
    Ready,
    Shown,
    Hidden,
    Closed,
}

/// Lifecycle events a handle emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Ready,
    Show,
    Hide,
    /// A close was accepted and forwarded to the toolkit
    Close,
    /// The native window is gone; fires once
    Closed,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::Ready => "ready",
            LifecycleEvent::Show => "show",
            LifecycleEvent::Hide => "hide",
            LifecycleEvent::Close => "close",
            LifecycleEvent::Closed => "closed",
        }
    }
}

/// A lifecycle event as observed by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub key: WindowKey,
    /// Effective type at the time of the event
    pub window_type: WindowType,
    pub event: LifecycleEvent,
}

/// Work deferred until the next content-ready report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadyAction {
    Show,
    HideLoading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentPhase {
    Created,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Untouched,
    Shown,
    Hidden,
}

/// What happened to a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseOutcome {
    /// Already closed or closing
    Ignored,
    /// Pooled window hidden and marked available instead of closing
    Released,
    /// Forwarded to the toolkit
    Closing,
}

#[derive(Debug)]
pub struct WindowHandle {
    key: WindowKey,
    kind: WindowType,
    acting_type: Option<WindowType>,
    native: NativeWindowId,
    id: Option<ContentId>,
    owner_id: Option<String>,
    is_primary: bool,
    is_popup: bool,
    is_available: bool,
    phase: ContentPhase,
    visibility: Visibility,
    closing: bool,
    superseded: bool,
    closed: bool,
    url: Option<String>,
    on_ready: Vec<ReadyAction>,
}

impl WindowHandle {
    pub(crate) fn new(
        key: WindowKey,
        kind: WindowType,
        native: NativeWindowId,
        options: &WindowOptions,
        is_popup: bool,
    ) -> Self {
        let is_available = kind.is_generic();
        Self {
            key,
            kind,
            acting_type: None,
            native,
            id: None,
            owner_id: options.owner_id.clone(),
            is_primary: options.primary.unwrap_or(false),
            is_popup,
            is_available,
            phase: ContentPhase::Created,
            visibility: Visibility::Untouched,
            closing: false,
            superseded: false,
            closed: false,
            url: None,
            on_ready: Vec::new(),
        }
    }

    pub fn key(&self) -> WindowKey {
        self.key
    }

    /// Type the handle currently serves as. A recycled generic window reports
    /// the type it was reused for.
    pub fn window_type(&self) -> &WindowType {
        self.acting_type.as_ref().unwrap_or(&self.kind)
    }

    /// Type the handle was constructed as. Never changes.
    pub fn kind(&self) -> &WindowType {
        &self.kind
    }

    pub fn native_id(&self) -> NativeWindowId {
        self.native
    }

    /// Content-side id, once reported
    pub fn id(&self) -> Option<ContentId> {
        self.id
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_popup(&self) -> bool {
        self.is_popup
    }

    /// Idle pooled window, eligible for reuse
    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn is_content_ready(&self) -> bool {
        !self.closed && self.phase == ContentPhase::Ready
    }

    pub fn is_shown(&self) -> bool {
        !self.closed && self.visibility == Visibility::Shown
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close forwarded to the toolkit, `Closed` not yet reported
    pub fn is_closing(&self) -> bool {
        self.closing && !self.closed
    }

    /// Replaced by a window of the same type for a different owner
    pub fn is_superseded(&self) -> bool {
        self.superseded
    }

    /// Last URL this handle navigated to
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn state(&self) -> WindowState {
        if self.closed {
            return WindowState::Closed;
        }
        match (self.phase, self.visibility) {
            (ContentPhase::Created, _) => WindowState::Created,
            (ContentPhase::Loading, _) => WindowState::Loading,
            (ContentPhase::Ready, Visibility::Untouched) => WindowState::Ready,
            (ContentPhase::Ready, Visibility::Shown) => WindowState::Shown,
            (ContentPhase::Ready, Visibility::Hidden) => WindowState::Hidden,
        }
    }

    // ---- Operations (driven by the registry) ----

    pub(crate) fn load(&mut self, toolkit: &mut dyn NativeToolkit, url: &str) {
        if self.closed {
            debug!(key = self.key.0, "load on closed window ignored");
            return;
        }
        toolkit.load_url(self.native, url);
        self.url = Some(url.to_string());
        self.phase = ContentPhase::Loading;
    }

    /// Best effort: dropped unless the content is ready. Returns whether the
    /// message went out.
    pub(crate) fn send(
        &self,
        toolkit: &mut dyn NativeToolkit,
        channel: &str,
        args: &[Value],
    ) -> bool {
        if !self.is_content_ready() {
            debug!(
                key = self.key.0,
                channel = channel,
                "Message dropped, content not ready"
            );
            return false;
        }
        toolkit.send(self.native, channel, args);
        true
    }

    pub(crate) fn show(&mut self, toolkit: &mut dyn NativeToolkit) -> Option<LifecycleEvent> {
        if self.closed {
            return None;
        }
        toolkit.show(self.native);
        self.visibility = Visibility::Shown;
        Some(LifecycleEvent::Show)
    }

    pub(crate) fn hide(&mut self, toolkit: &mut dyn NativeToolkit) -> Option<LifecycleEvent> {
        if self.closed {
            return None;
        }
        toolkit.hide(self.native);
        self.visibility = Visibility::Hidden;
        Some(LifecycleEvent::Hide)
    }

    pub(crate) fn queue_on_ready(&mut self, action: ReadyAction) {
        if !self.closed && !self.on_ready.contains(&action) {
            self.on_ready.push(action);
        }
    }

    /// Whether `action` is still waiting on content readiness
    pub(crate) fn awaits(&self, action: ReadyAction) -> bool {
        self.on_ready.contains(&action)
    }

    /// Record content readiness. Returns the deferred work to run, or `None`
    /// when the report is stale (window already closed).
    pub(crate) fn mark_ready(&mut self) -> Option<Vec<ReadyAction>> {
        if self.closed {
            return None;
        }
        if self.phase == ContentPhase::Ready {
            debug!(key = self.key.0, "Repeated ready report");
        }
        self.phase = ContentPhase::Ready;
        Some(std::mem::take(&mut self.on_ready))
    }

    pub(crate) fn set_content_id(&mut self, id: ContentId) {
        if !self.closed {
            self.id = Some(id);
        }
    }

    pub(crate) fn mark_superseded(&mut self) {
        self.superseded = true;
    }

    /// Handle a close request.
    ///
    /// Generic windows are released back to the pool unless `honor_generic`
    /// is set (app quitting or registry teardown).
    pub(crate) fn request_close(
        &mut self,
        toolkit: &mut dyn NativeToolkit,
        honor_generic: bool,
    ) -> CloseOutcome {
        if self.closed || self.closing {
            return CloseOutcome::Ignored;
        }
        if self.kind.is_generic() && !honor_generic {
            self.release(toolkit);
            return CloseOutcome::Released;
        }
        self.closing = true;
        self.on_ready.clear();
        toolkit.close(self.native);
        CloseOutcome::Closing
    }

    fn release(&mut self, toolkit: &mut dyn NativeToolkit) {
        toolkit.hide(self.native);
        self.visibility = Visibility::Hidden;
        self.is_available = true;
        self.acting_type = None;
        self.owner_id = None;
        self.is_primary = false;
        self.on_ready.clear();
        self.send(
            toolkit,
            SWITCH_TEMPLATE_CHANNEL,
            &[Value::from(WindowType::Generic.as_str())],
        );
    }

    /// The toolkit reported the native window gone. `Some` exactly once.
    pub(crate) fn mark_closed(&mut self) -> Option<LifecycleEvent> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.closing = true;
        self.is_available = false;
        self.visibility = Visibility::Hidden;
        self.phase = ContentPhase::Created;
        self.on_ready.clear();
        Some(LifecycleEvent::Closed)
    }

    /// Turn an idle generic window into a window of `kind`, keeping the
    /// native resource. Shows once the new content is ready; if there is no
    /// new URL and the current content is ready, shows right away.
    pub(crate) fn reuse(
        &mut self,
        toolkit: &mut dyn NativeToolkit,
        kind: WindowType,
        options: &WindowOptions,
    ) -> Option<LifecycleEvent> {
        if self.closed {
            return None;
        }
        self.is_available = false;
        self.acting_type = Some(kind);
        self.owner_id = options.owner_id.clone();
        self.is_primary = options.primary.unwrap_or(false);

        if let (Some(width), Some(height)) = (options.width, options.height) {
            toolkit.resize(self.native, width, height);
        }
        toolkit.set_parent(self.native, options.parent);

        match options.url.as_deref() {
            Some(url) => {
                self.load(toolkit, url);
                self.queue_on_ready(ReadyAction::Show);
                None
            }
            None if self.phase == ContentPhase::Ready => self.show(toolkit),
            None => {
                self.queue_on_ready(ReadyAction::Show);
                None
            }
        }
    }
}
