//! In-memory toolkit with no platform behind it.
//!
//! Used by the smoke test and the test suite. Asynchronous callbacks are
//! queued and handed out through `poll_event`, so the caller decides when
//! "later" happens:
//! - `close` queues `Closed` immediately
//! - loads complete only when `finish_load` / `finish_all_loads` is called
//! - user close attempts and content-id reports are injected explicitly

use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;

use super::{NativeEvent, NativeToolkit, NativeWindowId};
use crate::error::ToolkitError;
use crate::windows::{ContentId, WindowOptions};

/// Observable state of one headless window.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub options: WindowOptions,
    pub url: Option<String>,
    pub visible: bool,
    pub size: Option<(u32, u32)>,
    pub loading: bool,
    pub destroyed: bool,
    /// Messages delivered to the content, in order
    pub messages: Vec<(String, Vec<Value>)>,
}

#[derive(Debug, Default)]
pub struct HeadlessToolkit {
    next_id: u64,
    windows: BTreeMap<NativeWindowId, HeadlessWindow>,
    queue: VecDeque<NativeEvent>,
    constructions: usize,
    quit_calls: usize,
    fail_next_create: Option<String>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Number of successful native constructions so far
    pub fn constructions(&self) -> usize {
        self.constructions
    }

    pub fn quit_calls(&self) -> usize {
        self.quit_calls
    }

    pub fn window(&self, id: NativeWindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&id)
    }

    /// Windows whose native resource is still alive
    pub fn live_windows(&self) -> usize {
        self.windows.values().filter(|w| !w.destroyed).count()
    }

    /// Make the next `create_window` call fail with `reason`.
    pub fn fail_next_create(&mut self, reason: impl Into<String>) {
        self.fail_next_create = Some(reason.into());
    }

    /// Complete the in-flight load of `id`.
    pub fn finish_load(&mut self, id: NativeWindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            if window.loading && !window.destroyed {
                window.loading = false;
                self.queue.push_back(NativeEvent::ContentReady { window: id });
            }
        }
    }

    /// Complete every in-flight load.
    pub fn finish_all_loads(&mut self) {
        let loading: Vec<NativeWindowId> = self
            .windows
            .iter()
            .filter(|(_, w)| w.loading && !w.destroyed)
            .map(|(id, _)| *id)
            .collect();
        for id in loading {
            self.finish_load(id);
        }
    }

    /// Simulate the user clicking the window's close control.
    pub fn user_close(&mut self, id: NativeWindowId) {
        self.queue.push_back(NativeEvent::CloseRequested { window: id });
    }

    pub fn report_content_id(&mut self, id: NativeWindowId, content_id: ContentId) {
        self.queue.push_back(NativeEvent::ContentIdReported {
            window: id,
            content_id,
        });
    }

    /// Simulate in-page navigation initiated by the content.
    pub fn content_navigates(&mut self, id: NativeWindowId, url: impl Into<String>) {
        self.queue.push_back(NativeEvent::WillNavigate {
            window: id,
            url: url.into(),
        });
    }

    fn live_mut(&mut self, id: NativeWindowId) -> Option<&mut HeadlessWindow> {
        self.windows.get_mut(&id).filter(|w| !w.destroyed)
    }
}

impl NativeToolkit for HeadlessToolkit {
    fn create_window(&mut self, options: &WindowOptions) -> Result<NativeWindowId, ToolkitError> {
        if let Some(reason) = self.fail_next_create.take() {
            return Err(ToolkitError::Construction(reason));
        }
        if let Some(parent) = options.parent {
            if self.live_mut(parent).is_none() {
                return Err(ToolkitError::UnknownWindow(parent));
            }
        }
        let id = NativeWindowId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.windows.insert(
            id,
            HeadlessWindow {
                options: options.clone(),
                url: None,
                visible: false,
                size: options.width.zip(options.height),
                loading: false,
                destroyed: false,
                messages: Vec::new(),
            },
        );
        self.constructions += 1;
        Ok(id)
    }

    fn load_url(&mut self, window: NativeWindowId, url: &str) {
        if let Some(w) = self.live_mut(window) {
            w.url = Some(url.to_string());
            w.loading = true;
        }
    }

    fn show(&mut self, window: NativeWindowId) {
        if let Some(w) = self.live_mut(window) {
            w.visible = true;
        }
    }

    fn hide(&mut self, window: NativeWindowId) {
        if let Some(w) = self.live_mut(window) {
            w.visible = false;
        }
    }

    fn close(&mut self, window: NativeWindowId) {
        if let Some(w) = self.live_mut(window) {
            w.destroyed = true;
            w.visible = false;
            w.loading = false;
            self.queue.push_back(NativeEvent::Closed { window });
        }
    }

    fn resize(&mut self, window: NativeWindowId, width: u32, height: u32) {
        if let Some(w) = self.live_mut(window) {
            w.size = Some((width, height));
        }
    }

    fn set_parent(&mut self, window: NativeWindowId, parent: Option<NativeWindowId>) {
        if let Some(w) = self.live_mut(window) {
            w.options.parent = parent;
        }
    }

    fn send(&mut self, window: NativeWindowId, channel: &str, args: &[Value]) {
        if let Some(w) = self.live_mut(window) {
            w.messages.push((channel.to_string(), args.to_vec()));
        }
    }

    fn quit(&mut self) {
        self.quit_calls += 1;
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.queue.pop_front()
    }
}
