//! Built-in per-type presets.
//!
//! The lowest configuration layer. A pure function of the window type;
//! unrecognized types get the empty preset.

use super::options::{WebPreferences, WindowOptions};
use super::types::WindowType;
use crate::config::{
    EXTERNAL_TOOL_URL, PRELOAD_MAIN, PRELOAD_ONBOARDING, PRELOAD_POPUP_BASIC, PRELOAD_POPUP_WEB3,
    PRELOAD_SPLASH,
};

fn sized(width: u32, height: u32) -> WindowOptions {
    WindowOptions::default().with_size(width, height)
}

/// Preset for `kind`.
pub fn preset(kind: &WindowType) -> WindowOptions {
    match kind {
        WindowType::Main => WindowOptions {
            primary: Some(true),
            show: Some(true),
            min_width: Some(350),
            min_height: Some(250),
            title_bar_style: Some("hiddenInset".into()),
            web_preferences: WebPreferences {
                preload: Some(PRELOAD_MAIN.into()),
                node_integration: Some(false),
                context_isolation: Some(true),
                ..Default::default()
            },
            ..sized(1024, 720)
        },
        WindowType::SplashScreen => WindowOptions {
            primary: Some(true),
            show: Some(true),
            resizable: Some(false),
            frame: Some(false),
            center: Some(true),
            use_content_size: Some(true),
            web_preferences: WebPreferences {
                preload: Some(PRELOAD_SPLASH.into()),
                ..Default::default()
            },
            ..sized(400, 230)
        },
        WindowType::Loading => WindowOptions {
            show: Some(false),
            resizable: Some(false),
            frame: Some(false),
            center: Some(true),
            always_on_top: Some(true),
            use_content_size: Some(true),
            ..sized(100, 80)
        },
        WindowType::Onboarding => WindowOptions {
            primary: Some(true),
            show: Some(true),
            resizable: Some(false),
            web_preferences: WebPreferences {
                preload: Some(PRELOAD_ONBOARDING.into()),
                ..Default::default()
            },
            ..sized(576, 442)
        },
        WindowType::About => WindowOptions {
            always_on_top: Some(true),
            ..sized(420, 230)
        },
        WindowType::ExternalTool => WindowOptions {
            url: Some(EXTERNAL_TOOL_URL.into()),
            center: Some(true),
            frame: Some(true),
            resizable: Some(true),
            title_bar_style: Some("default".into()),
            web_preferences: WebPreferences {
                node_integration: Some(false),
                sandbox: Some(true),
                ..Default::default()
            },
            ..sized(1024, 720)
        },
        WindowType::ImportAccount => WindowOptions {
            always_on_top: Some(true),
            ..sized(600, 370)
        },
        WindowType::RequestAccount => WindowOptions {
            always_on_top: Some(true),
            ..sized(450, 180)
        },
        WindowType::ConnectAccount => WindowOptions {
            always_on_top: Some(true),
            minimizable: Some(false),
            maximizable: Some(false),
            ..sized(460, 520)
        },
        WindowType::SendTransaction => WindowOptions {
            always_on_top: Some(true),
            ..sized(580, 550)
        },
        WindowType::UpdateAvailable => WindowOptions {
            always_on_top: Some(true),
            maximizable: Some(false),
            ..sized(580, 250)
        },
        WindowType::ClientUpdateAvailable => WindowOptions {
            use_web3: Some(false),
            resizable: Some(false),
            maximizable: Some(false),
            ..sized(600, 340)
        },
        WindowType::Generic => WindowOptions {
            show: Some(false),
            use_web3: Some(false),
            ..sized(400, 400)
        },
        WindowType::Other(_) => WindowOptions::default(),
    }
}

/// Base layer shared by every popup, below the type preset.
pub fn popup_defaults() -> WindowOptions {
    WindowOptions {
        title: Some(String::new()),
        show: Some(true),
        use_web3: Some(true),
        always_on_top: Some(false),
        resizable: Some(false),
        center: Some(true),
        use_content_size: Some(true),
        title_bar_style: Some("hiddenInset".into()),
        web_preferences: WebPreferences {
            node_integration: Some(false),
            context_isolation: Some(true),
            ..Default::default()
        },
        ..sized(400, 400)
    }
}

/// Content bridge for a popup. Exactly one of the two scripts applies.
pub fn popup_preload(use_web3: bool) -> &'static str {
    if use_web3 {
        PRELOAD_POPUP_WEB3
    } else {
        PRELOAD_POPUP_BASIC
    }
}
