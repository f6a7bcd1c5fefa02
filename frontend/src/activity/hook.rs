use std::rc::Rc;

use leptos::*;
use leptos_router::use_location;
use log::error;

use super::{
    browser::{
        BrowserScheduler, DomInteractionSource, LocationNavigator, SpawnLocal, StoreSessionAuth,
        SystemClock, ToastNotifier,
    },
    ActivityConfig, ActivityMonitor, MonitorEnv,
};
use crate::{
    api::ApiClient,
    state::{
        auth::{use_auth, AuthState},
        toast::use_toasts,
    },
};

/// Wires an [`ActivityMonitor`] to the current route, the auth store and the
/// owning view's lifetime. Must be called under a `Router`.
pub fn use_activity_tracker(config: ActivityConfig) -> ActivityMonitor {
    let (auth, set_auth) = use_auth();
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let env = MonitorEnv {
        auth: Rc::new(StoreSessionAuth {
            auth,
            set_auth,
            api,
        }),
        notifier: Rc::new(ToastNotifier(use_toasts())),
        navigator: Rc::new(LocationNavigator),
        clock: Rc::new(SystemClock::new()),
        scheduler: Rc::new(BrowserScheduler),
        signals: Rc::new(DomInteractionSource),
        spawner: Rc::new(SpawnLocal),
    };
    let monitor = ActivityMonitor::new(config, env);

    let location = use_location();
    {
        let monitor = monitor.clone();
        create_effect(move |_| {
            let path = location.pathname.get();
            if let Err(err) = monitor.on_route_changed(&path) {
                error!("activity tracking unavailable on {}: {}", path, err);
            }
        });
    }

    {
        let monitor = monitor.clone();
        create_effect(move |previous: Option<bool>| {
            let is_authenticated = auth.with(AuthState::is_authenticated);
            if let Some(was_authenticated) = previous {
                if let Err(err) = monitor.on_auth_changed(is_authenticated, was_authenticated) {
                    error!("failed to update activity tracking: {}", err);
                }
            }
            is_authenticated
        });
    }

    {
        let monitor = monitor.clone();
        on_cleanup(move || monitor.teardown());
    }

    monitor
}

/// Mounts inactivity tracking for the whole app and exposes the monitor
/// through context.
#[component]
pub fn ActivityTracker() -> impl IntoView {
    let config = ActivityConfig::from_runtime(&crate::config::current());
    let monitor = use_activity_tracker(config);
    provide_context(monitor);
}
