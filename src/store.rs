//! Process-wide store / event bus seam.
//!
//! The registry reports what it does here for observability and reads back a
//! single flag: whether the application is quitting.

use serde::Serialize;

use crate::windows::{WindowKey, WindowType};

/// Notifications the registry dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RegistryEvent {
    WindowCreateStarted { window_type: WindowType },
    WindowCreateFinished { window_type: WindowType, key: WindowKey },
    GenericWindowReused { window_type: WindowType },
    RegistryInitFinished,
    /// The last visible primary window went away
    QuitRequested,
    TeardownStarted,
}

pub trait AppStore {
    fn dispatch(&mut self, event: &RegistryEvent);

    /// While true, pooled generic windows close for real.
    fn app_quitting(&self) -> bool;
}

/// Store that keeps every dispatched event in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: Vec<RegistryEvent>,
    quitting: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn set_quitting(&mut self, quitting: bool) {
        self.quitting = quitting;
    }
}

impl AppStore for InMemoryStore {
    fn dispatch(&mut self, event: &RegistryEvent) {
        match event {
            RegistryEvent::QuitRequested | RegistryEvent::TeardownStarted => self.quitting = true,
            RegistryEvent::RegistryInitFinished => self.quitting = false,
            _ => {}
        }
        tracing::debug!(event_type = "store_dispatch", event = ?event, "Store event");
        self.events.push(event.clone());
    }

    fn app_quitting(&self) -> bool {
        self.quitting
    }
}
