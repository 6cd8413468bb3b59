//! Window configuration and its layered merge.
//!
//! Every field is optional so a layer only states what it sets. Layers are
//! combined low → high with [`Merge::merge`]:
//! - scalar leaves: a `Some` in the higher layer wins
//! - nested structs (`WebPreferences`): merged field by field
//! - `Vec` leaves: replaced wholesale, never concatenated

use serde::{Deserialize, Serialize};

use crate::toolkit::NativeWindowId;

/// Combine two configuration layers, `self` being the lower-precedence one.
pub trait Merge {
    fn merge(self, higher: Self) -> Self;
}

impl<T> Merge for Option<T> {
    fn merge(self, higher: Self) -> Self {
        higher.or(self)
    }
}

/// Settings for the content process hosted in a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPreferences {
    /// Content-bridge script injected before page scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_integration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_isolation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_security: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_arguments: Option<Vec<String>>,
}

impl Merge for WebPreferences {
    fn merge(self, higher: Self) -> Self {
        WebPreferences {
            preload: self.preload.merge(higher.preload),
            node_integration: self.node_integration.merge(higher.node_integration),
            context_isolation: self.context_isolation.merge(higher.context_isolation),
            sandbox: self.sandbox.merge(higher.sandbox),
            web_security: self.web_security.merge(higher.web_security),
            additional_arguments: self.additional_arguments.merge(higher.additional_arguments),
        }
    }
}

/// Options for creating (or recycling into) a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Content loaded right after construction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximizable: Option<bool>,
    /// Native chrome (title bar, borders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal: Option<bool>,
    /// Show the window once its content is ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_content_size: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_bar_style: Option<String>,
    /// Native window this one is anchored to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NativeWindowId>,
    /// Window that requested this one; part of the dedup identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Counts toward the "is anything still visible" shutdown check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    /// Popup needs the elevated content bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_web3: Option<bool>,
    #[serde(default)]
    pub web_preferences: WebPreferences,
}

impl WindowOptions {
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn with_web3(mut self, use_web3: bool) -> Self {
        self.use_web3 = Some(use_web3);
        self
    }
}

impl Merge for WindowOptions {
    fn merge(self, higher: Self) -> Self {
        WindowOptions {
            title: self.title.merge(higher.title),
            url: self.url.merge(higher.url),
            width: self.width.merge(higher.width),
            height: self.height.merge(higher.height),
            min_width: self.min_width.merge(higher.min_width),
            min_height: self.min_height.merge(higher.min_height),
            max_width: self.max_width.merge(higher.max_width),
            max_height: self.max_height.merge(higher.max_height),
            resizable: self.resizable.merge(higher.resizable),
            minimizable: self.minimizable.merge(higher.minimizable),
            maximizable: self.maximizable.merge(higher.maximizable),
            frame: self.frame.merge(higher.frame),
            center: self.center.merge(higher.center),
            always_on_top: self.always_on_top.merge(higher.always_on_top),
            modal: self.modal.merge(higher.modal),
            show: self.show.merge(higher.show),
            use_content_size: self.use_content_size.merge(higher.use_content_size),
            title_bar_style: self.title_bar_style.merge(higher.title_bar_style),
            parent: self.parent.merge(higher.parent),
            owner_id: self.owner_id.merge(higher.owner_id),
            primary: self.primary.merge(higher.primary),
            use_web3: self.use_web3.merge(higher.use_web3),
            web_preferences: self.web_preferences.merge(higher.web_preferences),
        }
    }
}

/// Merge any number of layers, lowest precedence first.
pub fn merge_layers<I>(layers: I) -> WindowOptions
where
    I: IntoIterator<Item = WindowOptions>,
{
    layers
        .into_iter()
        .fold(WindowOptions::default(), |acc, layer| acc.merge(layer))
}
