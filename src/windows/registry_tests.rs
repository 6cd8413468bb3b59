use serde_json::Value;

use super::*;
use crate::store::InMemoryStore;
use crate::toolkit::HeadlessToolkit;
use crate::windows::{WindowState, SWITCH_TEMPLATE_CHANNEL};

type TestRegistry = WindowRegistry<HeadlessToolkit, InMemoryStore>;

fn registry_with(config: RegistryConfig) -> TestRegistry {
    let mut registry = WindowRegistry::new(HeadlessToolkit::new(), InMemoryStore::new(), config);
    registry.init().unwrap();
    settle(&mut registry);
    registry.drain_events();
    registry
}

fn registry() -> TestRegistry {
    registry_with(RegistryConfig::default())
}

fn no_prewarm() -> TestRegistry {
    registry_with(RegistryConfig {
        prewarm_generic_window: false,
        ..Default::default()
    })
}

/// Complete every load and process every queued callback.
fn settle(registry: &mut TestRegistry) {
    registry.toolkit_mut().finish_all_loads();
    registry.pump_events();
}

fn open_main(registry: &mut TestRegistry) -> WindowKey {
    let key = registry
        .create(WindowType::Main, WindowOptions::default())
        .unwrap();
    settle(registry);
    key
}

fn events_for(events: &[WindowEvent], key: WindowKey) -> Vec<LifecycleEvent> {
    events
        .iter()
        .filter(|e| e.key == key)
        .map(|e| e.event)
        .collect()
}

#[test]
fn test_create_requires_init() {
    let mut registry = WindowRegistry::new(
        HeadlessToolkit::new(),
        InMemoryStore::new(),
        RegistryConfig::default(),
    );
    let result = registry.create(WindowType::Main, WindowOptions::default());
    assert!(matches!(result, Err(RegistryError::NotInitialized)));
    assert!(registry.is_empty());
}

#[test]
fn test_init_creates_loading_and_prewarmed_generic() {
    let registry = registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.toolkit().constructions(), 2);

    let loading = registry.loading_window().unwrap();
    assert_eq!(loading.window_type(), &WindowType::Loading);
    assert!(!loading.is_shown());

    let generic = registry.generic_window().unwrap();
    assert!(generic.is_available());
    assert!(generic.is_popup());
    assert!(!generic.is_shown());
}

#[test]
fn test_init_is_idempotent() {
    let mut registry = registry();
    registry.init().unwrap();
    assert_eq!(registry.toolkit().constructions(), 2);
}

#[test]
fn test_create_same_type_and_owner_returns_same_key() {
    let mut registry = registry();
    let first = registry
        .create(WindowType::About, WindowOptions::default().with_owner("dapp-1"))
        .unwrap();
    let constructions = registry.toolkit().constructions();

    let second = registry
        .create(
            WindowType::About,
            WindowOptions::default().with_owner("dapp-1").with_size(10, 10),
        )
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.toolkit().constructions(), constructions);

    // No configuration was reapplied
    let native = registry.get(first).unwrap().native_id();
    assert_eq!(registry.toolkit().window(native).unwrap().size, Some((420, 230)));
}

#[test]
fn test_different_owner_supersedes_existing_window() {
    let mut registry = registry();
    let first = registry
        .create(WindowType::RequestAccount, WindowOptions::default().with_owner("a"))
        .unwrap();
    let second = registry
        .create(WindowType::RequestAccount, WindowOptions::default().with_owner("b"))
        .unwrap();
    assert_ne!(first, second);

    let old = registry.get(first).unwrap();
    assert!(old.is_superseded());
    assert!(old.is_closing());
    assert_eq!(
        registry.get_by_type(&WindowType::RequestAccount).map(|h| h.key()),
        Some(second)
    );

    settle(&mut registry);
    assert!(registry.get(first).is_none());
    assert_eq!(
        registry.get_by_type(&WindowType::RequestAccount).map(|h| h.key()),
        Some(second)
    );
}

#[test]
fn test_superseded_primary_does_not_quit() {
    let mut registry = registry();
    registry
        .create(WindowType::Onboarding, WindowOptions::default().with_owner("a"))
        .unwrap();
    settle(&mut registry);
    registry
        .create(WindowType::Onboarding, WindowOptions::default().with_owner("b"))
        .unwrap();
    settle(&mut registry);

    assert!(!registry.quit_requested());
    assert_eq!(registry.toolkit().quit_calls(), 0);
}

#[test]
fn test_show_and_hide_emit_events() {
    let mut registry = registry();
    let key = registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();
    settle(&mut registry);

    registry.show(key);
    registry.hide(key);
    let events = registry.drain_events();
    assert_eq!(
        events_for(&events, key),
        vec![LifecycleEvent::Ready, LifecycleEvent::Show, LifecycleEvent::Hide]
    );
    assert_eq!(registry.get(key).unwrap().state(), WindowState::Hidden);
}

#[test]
fn test_show_option_defers_until_content_ready() {
    let mut registry = registry();
    let key = open_main(&mut registry);
    let events = registry.drain_events();
    assert_eq!(
        events_for(&events, key),
        vec![LifecycleEvent::Ready, LifecycleEvent::Show]
    );
    assert!(registry.get(key).unwrap().is_shown());
}

#[test]
fn test_generic_close_keeps_native_window() {
    let mut registry = registry();
    let generic = registry.generic_window().unwrap().key();
    let native = registry.generic_window().unwrap().native_id();

    registry.close(generic);
    settle(&mut registry);

    let handle = registry.get(generic).unwrap();
    assert!(!handle.is_closed());
    assert!(handle.is_available());
    assert!(!registry.toolkit().window(native).unwrap().destroyed);
}

#[test]
fn test_user_close_on_generic_is_prevented() {
    let mut registry = registry();
    let native = registry.generic_window().unwrap().native_id();
    let response = registry.handle_native_event(NativeEvent::CloseRequested { window: native });
    assert_eq!(response, NativeResponse::Close(CloseDecision::Prevent));
}

#[test]
fn test_user_close_on_regular_window_proceeds() {
    let mut registry = registry();
    let key = registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();
    let native = registry.get(key).unwrap().native_id();

    let response = registry.handle_native_event(NativeEvent::CloseRequested { window: native });
    assert_eq!(response, NativeResponse::Close(CloseDecision::Proceed));
    registry.pump_events();
    assert!(registry.get(key).is_none());
}

#[test]
fn test_popup_recycles_generic_window() {
    let mut registry = registry();
    let generic = registry.generic_window().unwrap().key();
    let constructions = registry.toolkit().constructions();

    let key = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    assert_eq!(key, generic);
    assert_eq!(registry.toolkit().constructions(), constructions);

    settle(&mut registry);
    let handle = registry.get(key).unwrap();
    assert_eq!(handle.window_type(), &WindowType::About);
    assert_eq!(handle.kind(), &WindowType::Generic);
    assert!(!handle.is_available());
    assert!(handle.is_shown());
    assert_eq!(
        registry.get_by_type(&WindowType::About).map(|h| h.key()),
        Some(key)
    );
    assert_eq!(
        registry.toolkit().window(handle.native_id()).unwrap().url.as_deref(),
        Some("file:///app/interface/popups.html#about")
    );
    assert!(registry.store().events().contains(&RegistryEvent::GenericWindowReused {
        window_type: WindowType::About
    }));
}

#[test]
fn test_released_generic_is_reset_and_reusable() {
    let mut registry = registry();
    let key = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    settle(&mut registry);
    registry.drain_events();

    registry.close(key);
    let events = registry.drain_events();
    assert_eq!(
        events,
        vec![WindowEvent {
            key,
            window_type: WindowType::About,
            event: LifecycleEvent::Hide,
        }]
    );

    let handle = registry.get(key).unwrap();
    assert_eq!(handle.window_type(), &WindowType::Generic);
    assert!(registry.get_by_type(&WindowType::About).is_none());

    // Content was ready, so the template switch went out
    let messages = &registry.toolkit().window(handle.native_id()).unwrap().messages;
    assert_eq!(
        messages.last(),
        Some(&(
            SWITCH_TEMPLATE_CHANNEL.to_string(),
            vec![Value::from("genericWindow")]
        ))
    );

    let constructions = registry.toolkit().constructions();
    let again = registry
        .create_popup(WindowType::RequestAccount, WindowOptions::default())
        .unwrap();
    assert_eq!(again, key);
    assert_eq!(registry.toolkit().constructions(), constructions);
}

#[test]
fn test_busy_generic_forces_fresh_popup_with_loading_indicator() {
    let mut registry = registry();
    let generic = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    settle(&mut registry);
    registry.drain_events();
    let constructions = registry.toolkit().constructions();

    let key = registry
        .create_popup(WindowType::UpdateAvailable, WindowOptions::default())
        .unwrap();
    assert_ne!(key, generic);
    assert_eq!(registry.toolkit().constructions(), constructions + 1);
    assert!(registry.loading_window().unwrap().is_shown());

    settle(&mut registry);
    assert!(!registry.loading_window().unwrap().is_shown());
    assert!(registry.get(key).unwrap().is_shown());
}

#[test]
fn test_loading_indicator_brackets_fresh_popup() {
    let mut registry = no_prewarm();
    assert!(registry.generic_window().is_none());
    let loading = registry.loading_window().unwrap().key();
    let constructions = registry.toolkit().constructions();

    let key = registry
        .create_popup(WindowType::ConnectAccount, WindowOptions::default())
        .unwrap();
    assert_eq!(registry.toolkit().constructions(), constructions + 1);
    assert!(registry.get(loading).unwrap().is_shown());

    settle(&mut registry);
    let events: Vec<(WindowKey, LifecycleEvent)> = registry
        .drain_events()
        .into_iter()
        .map(|e| (e.key, e.event))
        .collect();
    assert_eq!(
        events,
        vec![
            (loading, LifecycleEvent::Show),
            (key, LifecycleEvent::Ready),
            (key, LifecycleEvent::Show),
            (loading, LifecycleEvent::Hide),
        ]
    );
}

#[test]
fn test_loading_indicator_can_be_disabled() {
    let mut registry = registry_with(RegistryConfig {
        prewarm_generic_window: false,
        show_loading_indicator: false,
        ..Default::default()
    });
    registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    assert!(!registry.loading_window().unwrap().is_shown());
}

#[test]
fn test_popup_dedup_returns_existing_handle() {
    let mut registry = no_prewarm();
    let first = registry
        .create_popup(WindowType::SendTransaction, WindowOptions::default().with_owner("tab-1"))
        .unwrap();
    settle(&mut registry);
    registry.hide(first);
    let constructions = registry.toolkit().constructions();

    let second = registry
        .create_popup(WindowType::SendTransaction, WindowOptions::default().with_owner("tab-1"))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.toolkit().constructions(), constructions);
    assert!(!registry.get(first).unwrap().is_shown());
}

#[test]
fn test_popup_options_resolution() {
    let mut registry = registry();
    open_main(&mut registry);
    let main_native = registry.main_window().unwrap().native_id();

    let web3 = registry.resolve_popup_options(&WindowType::About, WindowOptions::default());
    assert_eq!(web3.parent, Some(main_native));
    assert_eq!(web3.width, Some(420));
    assert_eq!(web3.show, Some(true));
    assert_eq!(web3.web_preferences.preload.as_deref(), Some(crate::config::PRELOAD_POPUP_WEB3));

    let basic = registry.resolve_popup_options(
        &WindowType::ClientUpdateAvailable,
        WindowOptions::default(),
    );
    assert_eq!(basic.web_preferences.preload.as_deref(), Some(crate::config::PRELOAD_POPUP_BASIC));

    let caller = registry.resolve_popup_options(
        &WindowType::About,
        WindowOptions::default().with_size(300, 200).with_web3(false),
    );
    assert_eq!((caller.width, caller.height), (Some(300), Some(200)));
    assert_eq!(caller.web_preferences.preload.as_deref(), Some(crate::config::PRELOAD_POPUP_BASIC));
}

#[test]
fn test_config_override_sits_between_preset_and_caller() {
    let mut config = RegistryConfig::default();
    config.preset_overrides.insert(
        "about".to_string(),
        WindowOptions::default().with_size(500, 300),
    );
    let registry = registry_with(config);

    let merged = registry.resolve_options(&WindowType::About, WindowOptions::default());
    assert_eq!((merged.width, merged.height), (Some(500), Some(300)));
    assert_eq!(merged.always_on_top, Some(true));

    let merged = registry.resolve_options(
        &WindowType::About,
        WindowOptions::default().with_size(1, 2),
    );
    assert_eq!((merged.width, merged.height), (Some(1), Some(2)));
}

#[test]
fn test_unknown_type_uses_empty_preset() {
    let mut registry = registry();
    let kind = WindowType::from_name("pluginPanel");
    let merged = registry.resolve_options(&kind, WindowOptions::default());
    assert_eq!(merged, WindowOptions::default());

    let key = registry.create(kind.clone(), WindowOptions::default()).unwrap();
    let handle = registry.get(key).unwrap();
    assert_eq!(handle.window_type(), &kind);
    assert_eq!(handle.state(), WindowState::Created);
    assert!(!handle.is_primary());
}

#[test]
fn test_send_before_ready_is_dropped() {
    let mut registry = registry();
    let key = registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();
    assert!(!registry.send(key, "early", &[]));

    settle(&mut registry);
    assert!(registry.send(key, "late", &[Value::from(1)]));

    let native = registry.get(key).unwrap().native_id();
    let messages = &registry.toolkit().window(native).unwrap().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "late");
}

#[test]
fn test_broadcast_reaches_ready_windows_only() {
    let mut registry = registry();
    open_main(&mut registry);
    registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();

    // loading, generic and main are ready; about is still loading
    assert_eq!(registry.broadcast("uiAction_ping", &[]), 3);
}

#[test]
fn test_get_by_id_correlates_content_id() {
    let mut registry = registry();
    let key = open_main(&mut registry);
    let native = registry.get(key).unwrap().native_id();
    assert!(registry.get_by_id(ContentId(7)).is_none());

    registry.toolkit_mut().report_content_id(native, ContentId(7));
    registry.pump_events();
    assert_eq!(registry.get_by_id(ContentId(7)).map(|h| h.key()), Some(key));
    assert_eq!(registry.get_by_native(native).map(|h| h.key()), Some(key));
}

#[test]
fn test_in_page_navigation_is_denied() {
    let mut registry = registry();
    let key = open_main(&mut registry);
    let native = registry.get(key).unwrap().native_id();

    let response = registry.handle_native_event(NativeEvent::WillNavigate {
        window: native,
        url: "https://example.com".into(),
    });
    assert_eq!(response, NativeResponse::Navigation(NavigationDecision::Deny));
}

#[test]
fn test_events_for_unknown_native_window_are_ignored() {
    let mut registry = registry();
    let response = registry.handle_native_event(NativeEvent::ContentReady {
        window: NativeWindowId(999),
    });
    assert_eq!(response, NativeResponse::Ignored);
}

#[test]
fn test_construction_failure_leaves_nothing_registered() {
    let mut registry = no_prewarm();
    let before = registry.len();
    registry.toolkit_mut().fail_next_create("out of handles");

    let result = registry.create_popup(WindowType::ImportAccount, WindowOptions::default());
    assert!(matches!(result, Err(RegistryError::Toolkit(_))));
    assert_eq!(registry.len(), before);
    assert!(registry.get_by_type(&WindowType::ImportAccount).is_none());
    assert!(!registry.loading_window().unwrap().is_shown());
}

#[test]
fn test_require_reports_unknown_key() {
    let registry = registry();
    assert!(matches!(
        registry.require(WindowKey(404)),
        Err(RegistryError::UnknownWindow(WindowKey(404)))
    ));
    assert!(registry.require(registry.loading_window().unwrap().key()).is_ok());
}

#[test]
fn test_close_by_type() {
    let mut registry = registry();
    registry
        .create(WindowType::UpdateAvailable, WindowOptions::default())
        .unwrap();
    assert!(registry.close_by_type(&WindowType::UpdateAvailable));
    settle(&mut registry);
    assert!(registry.get_by_type(&WindowType::UpdateAvailable).is_none());
    assert!(!registry.close_by_type(&WindowType::UpdateAvailable));
}

#[test]
fn test_closed_event_fires_once_and_removes_handle() {
    let mut registry = registry();
    let key = registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();
    let native = registry.get(key).unwrap().native_id();
    registry.close(key);
    registry.close(key);
    settle(&mut registry);

    let events = registry.drain_events();
    assert_eq!(
        events_for(&events, key),
        vec![LifecycleEvent::Close, LifecycleEvent::Closed]
    );
    assert!(registry.get(key).is_none());
    assert_eq!(
        registry.handle_native_event(NativeEvent::Closed { window: native }),
        NativeResponse::Ignored
    );
}

#[test]
fn test_closing_main_quits_once() {
    let mut registry = registry();
    let main = open_main(&mut registry);
    registry.close(main);
    settle(&mut registry);

    assert!(registry.quit_requested());
    assert_eq!(registry.toolkit().quit_calls(), 1);

    // The generic window now closes for real
    let generic = registry.generic_window().unwrap().key();
    registry.close(generic);
    settle(&mut registry);
    assert!(registry.get(generic).is_none());
    assert_eq!(registry.toolkit().quit_calls(), 1);
}

#[test]
fn test_hidden_primary_counts_as_gone() {
    let mut registry = registry();
    let main = open_main(&mut registry);
    let splash = registry
        .create(WindowType::SplashScreen, WindowOptions::default())
        .unwrap();
    settle(&mut registry);

    registry.hide(main);
    assert!(!registry.quit_requested());

    registry.hide(splash);
    assert!(registry.quit_requested());
    registry.hide(main);
    assert_eq!(registry.toolkit().quit_calls(), 1);
    assert!(registry.store().events().contains(&RegistryEvent::QuitRequested));
}

#[test]
fn test_closing_non_primary_never_quits() {
    let mut registry = registry();
    let about = registry
        .create(WindowType::About, WindowOptions::default())
        .unwrap();
    registry.close(about);
    settle(&mut registry);
    assert!(!registry.quit_requested());
}

#[test]
fn test_teardown_closes_everything_without_quitting() {
    let mut registry = registry();
    open_main(&mut registry);
    registry.teardown();
    settle(&mut registry);

    assert!(registry.is_empty());
    assert_eq!(registry.toolkit().live_windows(), 0);
    assert_eq!(registry.toolkit().quit_calls(), 0);
    assert!(matches!(
        registry.create(WindowType::About, WindowOptions::default()),
        Err(RegistryError::NotInitialized)
    ));
}

#[test]
fn test_unrecognized_popup_loads_its_fragment_url() {
    let mut registry = no_prewarm();
    let kind = WindowType::from_name("walletSettings");
    let key = registry.create_popup(kind, WindowOptions::default()).unwrap();

    let native = registry.get(key).unwrap().native_id();
    assert_eq!(
        registry.toolkit().window(native).unwrap().url.as_deref(),
        Some("file:///app/interface/popups.html#walletSettings")
    );

    settle(&mut registry);
    assert!(registry.get(key).unwrap().is_shown());
    assert!(!registry.loading_window().unwrap().is_shown());
}

#[test]
fn test_unrecognized_popup_replaces_recycled_content() {
    let mut registry = registry();
    let generic = registry.generic_window().unwrap().key();
    let kind = WindowType::from_name("walletSettings");

    let key = registry.create_popup(kind.clone(), WindowOptions::default()).unwrap();
    assert_eq!(key, generic);
    let native = registry.get(key).unwrap().native_id();
    assert_eq!(
        registry.toolkit().window(native).unwrap().url.as_deref(),
        Some("file:///app/interface/popups.html#walletSettings")
    );

    settle(&mut registry);
    let handle = registry.get(key).unwrap();
    assert_eq!(handle.window_type(), &kind);
    assert!(handle.is_shown());
}

#[test]
fn test_closing_unready_popup_hides_loading_indicator() {
    let mut registry = no_prewarm();
    let key = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    assert!(registry.loading_window().unwrap().is_shown());

    registry.close(key);
    assert!(!registry.loading_window().unwrap().is_shown());

    settle(&mut registry);
    assert!(registry.get(key).is_none());
    assert!(!registry.loading_window().unwrap().is_shown());
}

#[test]
fn test_superseded_unready_popup_hands_loading_indicator_over() {
    let mut registry = no_prewarm();
    let first = registry
        .create_popup(WindowType::SendTransaction, WindowOptions::default().with_owner("a"))
        .unwrap();
    let second = registry
        .create_popup(WindowType::SendTransaction, WindowOptions::default().with_owner("b"))
        .unwrap();
    assert_ne!(first, second);

    // The replacement is still booting
    assert!(registry.loading_window().unwrap().is_shown());

    settle(&mut registry);
    assert!(registry.get(first).is_none());
    assert!(registry.get(second).unwrap().is_shown());
    assert!(!registry.loading_window().unwrap().is_shown());
}

#[test]
fn test_recycled_popup_is_anchored_to_main() {
    let mut registry = registry();
    let main = open_main(&mut registry);
    let main_native = registry.get(main).unwrap().native_id();

    let key = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    assert_eq!(Some(key), registry.generic_window().map(|h| h.key()));

    let native = registry.get(key).unwrap().native_id();
    assert_eq!(
        registry.toolkit().window(native).unwrap().options.parent,
        Some(main_native)
    );
}

#[test]
fn test_init_after_teardown_starts_clean() {
    let mut registry = registry();
    open_main(&mut registry);
    registry.teardown();

    // Closed reports from the teardown are still queued
    registry.init().unwrap();
    settle(&mut registry);

    assert!(!registry.quit_requested());
    assert_eq!(registry.toolkit().quit_calls(), 0);
    assert_eq!(registry.len(), 2);
    assert!(registry.generic_window().unwrap().is_available());

    let key = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    settle(&mut registry);
    registry.close(key);

    let handle = registry.get(key).unwrap();
    assert!(!handle.is_closed());
    assert!(handle.is_available());
}

#[test]
fn test_full_session() {
    let mut registry = registry();
    let main = open_main(&mut registry);
    assert!(registry.main_window().unwrap().is_shown());

    let constructions = registry.toolkit().constructions();
    let about = registry
        .create_popup(WindowType::About, WindowOptions::default())
        .unwrap();
    settle(&mut registry);
    assert_eq!(registry.toolkit().constructions(), constructions);
    assert!(registry.get(about).unwrap().is_shown());

    let native = registry.get(about).unwrap().native_id();
    registry.toolkit_mut().user_close(native);
    registry.pump_events();
    assert!(registry.get(about).unwrap().is_available());
    assert!(registry.get(main).unwrap().is_shown());
    assert!(!registry.quit_requested());

    registry.hide(main);
    assert!(registry.quit_requested());
    assert_eq!(registry.toolkit().quit_calls(), 1);
}
