//! Window Registry
//!
//! Owns every live [`WindowHandle`], keyed by the type it currently serves as.
//!
//! # Responsibilities
//!
//! - Resolve configuration: preset < config override < caller options
//!   (popups get an extra popup-defaults layer underneath)
//! - Deduplicate by (type, owner): a repeated request returns the same key
//! - Recycle the pooled generic window for popups instead of constructing
//! - Quit the application when the last visible primary window goes away
//!
//! # Usage
//!
//! ```rust,ignore
//! use window_registry::{HeadlessToolkit, InMemoryStore, RegistryConfig, WindowRegistry};
//! use window_registry::windows::{WindowOptions, WindowType};
//!
//! let mut registry = WindowRegistry::new(HeadlessToolkit::new(), InMemoryStore::new(), RegistryConfig::default());
//! registry.init()?;
//!
//! let main = registry.create(WindowType::Main, WindowOptions::default())?;
//! let about = registry.create_popup(WindowType::About, WindowOptions::default())?;
//!
//! // Feed toolkit callbacks back in
//! registry.pump_events();
//! ```
//!
//! All of this runs on the single control thread. Each native callback is
//! processed to completion (bookkeeping, then shutdown evaluation) before the
//! next one is looked at.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::handle::{
    CloseOutcome, LifecycleEvent, ReadyAction, WindowEvent, WindowHandle,
};
use super::options::{merge_layers, WindowOptions};
use super::pool::GenericPool;
use super::presets::{popup_defaults, popup_preload, preset};
use super::types::{ContentId, WindowKey, WindowType};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result, ResultExt};
use crate::logging;
use crate::store::{AppStore, RegistryEvent};
use crate::toolkit::{
    CloseDecision, NativeEvent, NativeResponse, NativeToolkit, NativeWindowId,
    NavigationDecision,
};

pub struct WindowRegistry<T, S> {
    toolkit: T,
    store: S,
    config: RegistryConfig,
    /// Live handles in creation order
    windows: Vec<WindowHandle>,
    pool: GenericPool,
    loading: Option<WindowKey>,
    next_key: u64,
    events: Vec<WindowEvent>,
    initialized: bool,
    tearing_down: bool,
    quit_requested: bool,
}

impl<T: NativeToolkit, S: AppStore> WindowRegistry<T, S> {
    pub fn new(toolkit: T, store: S, config: RegistryConfig) -> Self {
        Self {
            toolkit,
            store,
            config,
            windows: Vec::new(),
            pool: GenericPool::new(),
            loading: None,
            next_key: 1,
            events: Vec::new(),
            initialized: false,
            tearing_down: false,
            quit_requested: false,
        }
    }

    /// Create the loading indicator and, if configured, pre-warm the generic
    /// window. Calling it again is a no-op.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        self.tearing_down = false;
        self.quit_requested = false;

        match self.create(WindowType::Loading, WindowOptions::default()) {
            Ok(key) => self.loading = Some(key),
            Err(e) => {
                self.initialized = false;
                return Err(e);
            }
        }

        if self.config.prewarm_generic_window {
            // Only an optimization; popups fall back to fresh windows
            self.create_popup(WindowType::Generic, WindowOptions::default())
                .log_err();
        }

        self.store.dispatch(&RegistryEvent::RegistryInitFinished);
        logging::log("WINDOW_REG", "Window registry initialized");
        Ok(())
    }

    /// Close every window, pooled generic window included. Further creation
    /// fails until `init` is called again.
    pub fn teardown(&mut self) {
        if self.tearing_down {
            return;
        }
        self.tearing_down = true;
        self.initialized = false;
        self.store.dispatch(&RegistryEvent::TeardownStarted);
        logging::log("WINDOW_REG", "Tearing down window registry");

        let keys: Vec<WindowKey> = self.windows.iter().map(|h| h.key()).collect();
        for key in keys {
            if let Some(idx) = self.index_of(key) {
                // Their Closed reports may land after a later init
                self.windows[idx].mark_superseded();
                self.close_at(idx);
            }
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Merged options for a regular window of `kind`.
    pub fn resolve_options(&self, kind: &WindowType, options: WindowOptions) -> WindowOptions {
        merge_layers([
            self.url_layer(kind),
            preset(kind),
            self.config.override_for(kind),
            options,
        ])
    }

    /// Merged options for a popup of `kind`, anchored to the main window and
    /// with its content bridge chosen.
    pub fn resolve_popup_options(
        &self,
        kind: &WindowType,
        options: WindowOptions,
    ) -> WindowOptions {
        let popup_url = WindowOptions {
            url: Some(self.config.popup_url(kind)),
            ..Default::default()
        };
        let mut merged = merge_layers([
            popup_defaults(),
            popup_url,
            preset(kind),
            self.config.override_for(kind),
            options,
        ]);
        if merged.parent.is_none() {
            merged.parent = self.main_window().map(|h| h.native_id());
        }
        let use_web3 = merged.use_web3.unwrap_or(true);
        merged.web_preferences.preload = Some(popup_preload(use_web3).to_string());
        merged
    }

    fn url_layer(&self, kind: &WindowType) -> WindowOptions {
        WindowOptions {
            url: self.config.default_url(kind),
            ..Default::default()
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a window of `kind`, or return the live one with the same owner.
    ///
    /// A live window of the same type for a *different* owner is superseded:
    /// it is closed and the new one takes over the type.
    pub fn create(&mut self, kind: WindowType, options: WindowOptions) -> Result<WindowKey> {
        self.ensure_initialized()?;
        let merged = self.resolve_options(&kind, options);
        self.create_resolved(kind, merged, false)
    }

    /// Open a popup of `kind`, recycling the idle generic window when there
    /// is one. Callers cannot tell a recycled window from a fresh one.
    pub fn create_popup(&mut self, kind: WindowType, options: WindowOptions) -> Result<WindowKey> {
        self.ensure_initialized()?;
        let merged = self.resolve_popup_options(&kind, options);
        let owner = merged.owner_id.clone();

        if kind.is_generic() {
            return self.create_resolved(kind, merged, true);
        }

        if let Some(key) = self.find_owned(&kind, owner.as_deref()) {
            debug!(window_type = %kind, key = key.0, "Popup already open for owner");
            return Ok(key);
        }
        self.supersede(&kind, owner.as_deref());

        if let Some(idx) = self.acquire_generic() {
            let key = self.windows[idx].key();
            if let Some(event) = self.windows[idx].reuse(&mut self.toolkit, kind.clone(), &merged) {
                self.record(idx, event);
            }
            self.store
                .dispatch(&RegistryEvent::GenericWindowReused { window_type: kind.clone() });
            logging::log_window_event(kind.as_str(), key.0, "recycled");
            return Ok(key);
        }

        self.show_loading();
        match self.create_resolved(kind, merged, true) {
            Ok(key) => {
                if let Some(idx) = self.index_of(key) {
                    self.windows[idx].queue_on_ready(ReadyAction::HideLoading);
                }
                Ok(key)
            }
            Err(e) => {
                self.hide_loading();
                Err(e)
            }
        }
    }

    fn create_resolved(
        &mut self,
        kind: WindowType,
        options: WindowOptions,
        is_popup: bool,
    ) -> Result<WindowKey> {
        if kind.is_generic() {
            // One generic window at a time, whatever it is acting as
            if let Some(key) = self.pool.pooled().filter(|key| self.is_live(*key)) {
                return Ok(key);
            }
        } else if let Some(key) = self.find_owned(&kind, options.owner_id.as_deref()) {
            debug!(window_type = %kind, key = key.0, "Window already open for owner");
            return Ok(key);
        }
        self.supersede(&kind, options.owner_id.as_deref());

        self.store.dispatch(&RegistryEvent::WindowCreateStarted {
            window_type: kind.clone(),
        });
        let native = self.toolkit.create_window(&options).map_err(|e| {
            logging::log_error("WINDOW_REG", &e.to_string(), Some(kind.as_str()));
            RegistryError::from(e)
        })?;

        let key = WindowKey(self.next_key);
        self.next_key += 1;

        let mut handle = WindowHandle::new(key, kind.clone(), native, &options, is_popup);
        if let Some(url) = options.url.as_deref() {
            handle.load(&mut self.toolkit, url);
        }
        if options.show.unwrap_or(false) {
            handle.queue_on_ready(ReadyAction::Show);
        }
        if kind.is_generic() {
            if let Some(stale) = self.pool.pooled() {
                self.pool.evict(stale);
            }
            if !self.pool.install(key) {
                crate::debug_panic!("Generic pool still occupied after evicting");
            }
        }
        self.windows.push(handle);

        self.store.dispatch(&RegistryEvent::WindowCreateFinished {
            window_type: kind.clone(),
            key,
        });
        logging::log_window_event(kind.as_str(), key.0, "created");
        Ok(key)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RegistryError::NotInitialized)
        }
    }

    /// Live window of `kind` belonging to `owner`
    fn find_owned(&self, kind: &WindowType, owner: Option<&str>) -> Option<WindowKey> {
        self.windows
            .iter()
            .find(|h| is_open(h) && h.window_type() == kind && h.owner_id() == owner)
            .map(|h| h.key())
    }

    /// Close live windows of `kind` owned by someone other than `owner`.
    fn supersede(&mut self, kind: &WindowType, owner: Option<&str>) {
        let stale: Vec<WindowKey> = self
            .windows
            .iter()
            .filter(|h| is_open(h) && h.window_type() == kind && h.owner_id() != owner)
            .map(|h| h.key())
            .collect();

        for key in stale {
            let Some(idx) = self.index_of(key) else {
                continue;
            };
            info!(
                window_type = %kind,
                key = key.0,
                "Superseding window owned by {:?}",
                self.windows[idx].owner_id()
            );
            if !self.windows[idx].kind().is_generic() {
                self.windows[idx].mark_superseded();
            }
            self.close_at(idx);
        }
    }

    /// Index of the pooled generic window if it is idle and usable.
    fn acquire_generic(&mut self) -> Option<usize> {
        let key = self.pool.acquire()?;
        match self.index_of(key) {
            Some(idx) if is_open(&self.windows[idx]) => Some(idx),
            _ => {
                self.pool.evict(key);
                None
            }
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get(&self, key: WindowKey) -> Option<&WindowHandle> {
        self.windows.iter().find(|h| h.key() == key)
    }

    /// Like [`get`](Self::get), but an unregistered key is an error.
    pub fn require(&self, key: WindowKey) -> Result<&WindowHandle> {
        self.get(key).ok_or(RegistryError::UnknownWindow(key))
    }

    /// Open window currently serving as `kind`
    pub fn get_by_type(&self, kind: &WindowType) -> Option<&WindowHandle> {
        self.windows
            .iter()
            .find(|h| is_open(h) && h.window_type() == kind)
    }

    /// Window whose content reported `id`
    pub fn get_by_id(&self, id: ContentId) -> Option<&WindowHandle> {
        self.windows.iter().find(|h| h.id() == Some(id))
    }

    pub fn get_by_native(&self, native: NativeWindowId) -> Option<&WindowHandle> {
        self.windows.iter().find(|h| h.native_id() == native)
    }

    pub fn main_window(&self) -> Option<&WindowHandle> {
        self.get_by_type(&WindowType::Main)
    }

    pub fn loading_window(&self) -> Option<&WindowHandle> {
        self.loading.and_then(|key| self.get(key))
    }

    pub fn generic_window(&self) -> Option<&WindowHandle> {
        self.pool.pooled().and_then(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn index_of(&self, key: WindowKey) -> Option<usize> {
        self.windows.iter().position(|h| h.key() == key)
    }

    fn index_of_native(&self, native: NativeWindowId) -> Option<usize> {
        self.windows.iter().position(|h| h.native_id() == native)
    }

    fn is_live(&self, key: WindowKey) -> bool {
        self.get(key).map(is_open).unwrap_or(false)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub fn show(&mut self, key: WindowKey) {
        if let Some(idx) = self.index_of(key) {
            self.show_at(idx);
        }
    }

    pub fn hide(&mut self, key: WindowKey) {
        if let Some(idx) = self.index_of(key) {
            self.hide_at(idx);
        }
    }

    pub fn load(&mut self, key: WindowKey, url: &str) {
        if let Some(idx) = self.index_of(key) {
            self.windows[idx].load(&mut self.toolkit, url);
        }
    }

    /// Best-effort delivery to one window. Returns whether it went out.
    pub fn send(&mut self, key: WindowKey, channel: &str, args: &[Value]) -> bool {
        match self.index_of(key) {
            Some(idx) => self.windows[idx].send(&mut self.toolkit, channel, args),
            None => false,
        }
    }

    /// Send to every registered window. Returns how many received it.
    pub fn broadcast(&mut self, channel: &str, args: &[Value]) -> usize {
        let mut delivered = 0;
        for handle in &self.windows {
            if handle.send(&mut self.toolkit, channel, args) {
                delivered += 1;
            }
        }
        debug!(channel = channel, delivered = delivered, "Broadcast");
        delivered
    }

    pub fn close(&mut self, key: WindowKey) {
        if let Some(idx) = self.index_of(key) {
            self.close_at(idx);
        }
    }

    /// Close the open window serving as `kind`. Returns whether one existed.
    pub fn close_by_type(&mut self, kind: &WindowType) -> bool {
        match self.get_by_type(kind).map(|h| h.key()) {
            Some(key) => {
                self.close(key);
                true
            }
            None => false,
        }
    }

    fn show_at(&mut self, idx: usize) {
        if let Some(event) = self.windows[idx].show(&mut self.toolkit) {
            self.record(idx, event);
        }
    }

    fn hide_at(&mut self, idx: usize) {
        if let Some(event) = self.windows[idx].hide(&mut self.toolkit) {
            self.record(idx, event);
            if self.windows[idx].is_primary() {
                self.evaluate_shutdown();
            }
        }
    }

    fn show_loading(&mut self) {
        if !self.config.show_loading_indicator {
            return;
        }
        if let Some(idx) = self.loading.and_then(|key| self.index_of(key)) {
            self.show_at(idx);
        }
    }

    fn hide_loading(&mut self) {
        if let Some(idx) = self.loading.and_then(|key| self.index_of(key)) {
            if self.windows[idx].is_shown() {
                self.hide_at(idx);
            }
        }
    }

    /// Some other open popup still hides the loading indicator when ready
    fn loading_awaited(&self) -> bool {
        self.windows
            .iter()
            .any(|h| is_open(h) && h.awaits(ReadyAction::HideLoading))
    }

    fn close_at(&mut self, idx: usize) -> CloseDecision {
        let honor_generic = self.tearing_down || self.store.app_quitting();
        let was_primary = self.windows[idx].is_primary();
        let acting_as = self.windows[idx].window_type().clone();
        let owed_loading_hide = self.windows[idx].awaits(ReadyAction::HideLoading);

        match self.windows[idx].request_close(&mut self.toolkit, honor_generic) {
            CloseOutcome::Ignored => CloseDecision::Proceed,
            CloseOutcome::Released => {
                let key = self.windows[idx].key();
                self.pool.release(key);
                // Reported under the type it served as, not the reset one
                self.push_event(key, acting_as, LifecycleEvent::Hide);
                logging::log_window_event(WindowType::Generic.as_str(), key.0, "released");
                if was_primary {
                    self.evaluate_shutdown();
                }
                CloseDecision::Prevent
            }
            CloseOutcome::Closing => {
                self.record(idx, LifecycleEvent::Close);
                // Its ready report will never come
                if owed_loading_hide && !self.loading_awaited() {
                    self.hide_loading();
                }
                CloseDecision::Proceed
            }
        }
    }

    // =========================================================================
    // Native callbacks
    // =========================================================================

    /// Process one toolkit callback.
    pub fn handle_native_event(&mut self, event: NativeEvent) -> NativeResponse {
        let Some(idx) = self.index_of_native(event.window()) else {
            debug!(event = ?event, "Event for untracked native window");
            return NativeResponse::Ignored;
        };

        match event {
            NativeEvent::ContentReady { .. } => {
                self.content_ready(idx);
                NativeResponse::Handled
            }
            NativeEvent::ContentIdReported { content_id, .. } => {
                self.windows[idx].set_content_id(content_id);
                debug!(
                    key = self.windows[idx].key().0,
                    content_id = content_id.0,
                    "Content id correlated"
                );
                NativeResponse::Handled
            }
            NativeEvent::WillNavigate { url, .. } => {
                warn!(
                    window_type = %self.windows[idx].window_type(),
                    url = %url,
                    "Blocked in-page navigation"
                );
                NativeResponse::Navigation(NavigationDecision::Deny)
            }
            NativeEvent::CloseRequested { .. } => NativeResponse::Close(self.close_at(idx)),
            NativeEvent::Closed { .. } => {
                self.window_closed(idx);
                NativeResponse::Handled
            }
        }
    }

    /// Drain the toolkit's queued callbacks. Returns how many were processed.
    pub fn pump_events(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.toolkit.poll_event() {
            self.handle_native_event(event);
            processed += 1;
        }
        processed
    }

    fn content_ready(&mut self, idx: usize) {
        let Some(actions) = self.windows[idx].mark_ready() else {
            return;
        };
        self.record(idx, LifecycleEvent::Ready);
        for action in actions {
            match action {
                ReadyAction::Show => self.show_at(idx),
                ReadyAction::HideLoading => self.hide_loading(),
            }
        }
    }

    fn window_closed(&mut self, idx: usize) {
        let Some(event) = self.windows[idx].mark_closed() else {
            return;
        };
        self.record(idx, event);

        // Removal targets this exact instance; the type may already belong
        // to a newer window.
        let handle = self.windows.remove(idx);
        let key = handle.key();
        self.pool.evict(key);
        if self.loading == Some(key) {
            self.loading = None;
        }

        if handle.is_primary() && !handle.is_superseded() {
            self.evaluate_shutdown();
        }
    }

    /// Quit once no primary window is left visible.
    fn evaluate_shutdown(&mut self) {
        if self.quit_requested || self.tearing_down {
            return;
        }
        let any_visible_primary = self
            .windows
            .iter()
            .any(|h| h.is_primary() && !h.is_closed() && h.is_shown());
        if any_visible_primary {
            return;
        }

        self.quit_requested = true;
        info!(
            event_type = "app_lifecycle",
            action = "quit",
            "No visible primary window left, quitting"
        );
        self.store.dispatch(&RegistryEvent::QuitRequested);
        self.toolkit.quit();
    }

    fn record(&mut self, idx: usize, event: LifecycleEvent) {
        let handle = &self.windows[idx];
        let (key, window_type) = (handle.key(), handle.window_type().clone());
        self.push_event(key, window_type, event);
    }

    fn push_event(&mut self, key: WindowKey, window_type: WindowType, event: LifecycleEvent) {
        logging::log_window_event(window_type.as_str(), key.0, event.as_str());
        self.events.push(WindowEvent {
            key,
            window_type,
            event,
        });
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lifecycle events observed since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

/// Neither closed nor on its way out
fn is_open(handle: &WindowHandle) -> bool {
    !handle.is_closed() && !handle.is_closing()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
