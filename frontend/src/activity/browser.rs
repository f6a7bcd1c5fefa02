//! Browser implementations of the monitor's collaborators.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, EventTarget, Performance, VisibilityState};

use super::{
    ActivityError, Clock, InteractionSource, ListenerGuard, Navigator, Notifier, Scheduler,
    SessionAuth, SignalHandlers, TaskSpawner, TimerHandle,
};
use crate::{
    api::{ApiClient, ApiError},
    state::{
        auth::{self, AuthState},
        toast::{ToastKind, ToastState},
    },
    utils::navigation,
};

/// DOM events that count as user activity. Registered in the capture phase.
pub const INTERACTION_EVENTS: &[&str] = &[
    "mousedown",
    "mousemove",
    "keypress",
    "scroll",
    "touchstart",
    "click",
    "keydown",
];

/// Wall time at construction advanced by `performance.now()`, so idle time
/// is immune to system clock corrections. Falls back to `Utc::now()` where
/// no `Performance` is available.
pub struct SystemClock {
    performance: Option<Performance>,
    wall_origin: DateTime<Utc>,
    mono_origin_ms: f64,
}

impl SystemClock {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let performance = web_sys::window().and_then(|w| w.performance());
        #[cfg(not(target_arch = "wasm32"))]
        let performance: Option<Performance> = None;
        let mono_origin_ms = performance.as_ref().map(Performance::now).unwrap_or_default();
        Self {
            performance,
            wall_origin: Utc::now(),
            mono_origin_ms,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `wall_origin` plus the monotonic time elapsed since `mono_origin_ms`.
/// A reading behind the origin counts as no time passed.
pub fn monotonic_now(wall_origin: DateTime<Utc>, mono_origin_ms: f64, mono_now_ms: f64) -> DateTime<Utc> {
    let elapsed_us = ((mono_now_ms - mono_origin_ms) * 1_000.0).max(0.0) as i64;
    wall_origin + chrono::Duration::microseconds(elapsed_us)
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        match &self.performance {
            Some(performance) => {
                monotonic_now(self.wall_origin, self.mono_origin_ms, performance.now())
            }
            None => Utc::now(),
        }
    }
}

pub struct BrowserScheduler;

struct BrowserTimer(Timeout);

impl TimerHandle for BrowserTimer {
    fn cancel(self: Box<Self>) {
        drop(self.0.cancel());
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Box::new(BrowserTimer(Timeout::new(millis, callback)))
    }
}

pub struct SpawnLocal;

impl TaskSpawner for SpawnLocal {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Full page navigation, so no stale in-memory state survives the logout.
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn go_to(&self, path: &str) {
        navigation::redirect(path);
    }
}

pub struct ToastNotifier(pub ToastState);

impl Notifier for ToastNotifier {
    fn warn(&self, message: &str, duration: Duration) {
        self.0.push(ToastKind::Warning, message, duration);
    }

    fn info(&self, message: &str, duration: Duration) {
        self.0.push(ToastKind::Info, message, duration);
    }
}

/// Bridges the auth store into the monitor.
pub struct StoreSessionAuth {
    pub auth: ReadSignal<AuthState>,
    pub set_auth: WriteSignal<AuthState>,
    pub api: ApiClient,
}

impl SessionAuth for StoreSessionAuth {
    fn is_authenticated(&self) -> bool {
        self.auth.with_untracked(AuthState::is_authenticated)
    }

    fn logout(&self) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let api = self.api.clone();
        let set_auth = self.set_auth;
        Box::pin(async move { auth::logout(&api, set_auth).await })
    }

    fn clear_auth_locally(&self) {
        auth::clear_auth(self.set_auth);
    }
}

struct Registration {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl Registration {
    /// Unregisters the listener. When the target refuses, the closure is
    /// leaked because the DOM may still call it.
    fn release(self) -> Result<(), JsValue> {
        let removed = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
        if removed.is_err() {
            self.callback.forget();
        }
        removed
    }
}

#[derive(Default)]
struct DomListeners {
    registrations: Vec<Registration>,
}

impl DomListeners {
    fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        capture: bool,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<(), ActivityError> {
        target
            .add_event_listener_with_callback_and_bool(
                event,
                callback.as_ref().unchecked_ref(),
                capture,
            )
            .map_err(|err| ActivityError::ListenerRegistration {
                event,
                reason: format!("{:?}", err),
            })?;
        self.registrations.push(Registration {
            target: target.clone(),
            event,
            capture,
            callback,
        });
        Ok(())
    }
}

impl ListenerGuard for DomListeners {
    fn detach(mut self: Box<Self>) -> Result<(), ActivityError> {
        let mut first_error = None;
        while let Some(registration) = self.registrations.pop() {
            let event = registration.event;
            if let Err(err) = registration.release() {
                first_error.get_or_insert(ActivityError::ListenerRemoval {
                    event,
                    reason: format!("{:?}", err),
                });
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for DomListeners {
    fn drop(&mut self) {
        for registration in self.registrations.drain(..) {
            let _ = registration.release();
        }
    }
}

/// Document interaction events plus window focus and visibility changes.
pub struct DomInteractionSource;

impl InteractionSource for DomInteractionSource {
    fn attach(&self, handlers: SignalHandlers) -> Result<Box<dyn ListenerGuard>, ActivityError> {
        let window =
            web_sys::window().ok_or_else(|| ActivityError::Unavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ActivityError::Unavailable("no document".into()))?;

        // On failure the partially filled guard drops and unregisters itself.
        let mut listeners = Box::new(DomListeners::default());
        for event in INTERACTION_EVENTS {
            let on_interaction = handlers.on_interaction.clone();
            let callback = Closure::wrap(Box::new(move |_: Event| on_interaction())
                as Box<dyn FnMut(Event)>);
            listeners.add(document.as_ref(), event, true, callback)?;
        }

        let on_focus = handlers.on_focus.clone();
        let callback = Closure::wrap(Box::new(move |_: Event| on_focus()) as Box<dyn FnMut(Event)>);
        listeners.add(window.as_ref(), "focus", false, callback)?;

        let on_focus = handlers.on_focus;
        let visible_document = document.clone();
        let callback = Closure::wrap(Box::new(move |_: Event| {
            if visible_document.visibility_state() == VisibilityState::Visible {
                on_focus();
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add(document.as_ref(), "visibilitychange", false, callback)?;

        Ok(listeners)
    }
}



#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Event target that keeps the last listener and refuses to remove it.
    fn locked_target() -> EventTarget {
        let target = js_sys::Object::new();
        let add = js_sys::Function::new_with_args("event, listener", "this.listener = listener;");
        let remove = js_sys::Function::new_no_args("throw new Error('locked');");
        js_sys::Reflect::set(&target, &"addEventListener".into(), &add).unwrap();
        js_sys::Reflect::set(&target, &"removeEventListener".into(), &remove).unwrap();
        target.unchecked_into()
    }

    fn counting_closure(hits: &Rc<Cell<u32>>) -> Closure<dyn FnMut(Event)> {
        let hits = hits.clone();
        Closure::wrap(Box::new(move |_: Event| hits.set(hits.get() + 1)) as Box<dyn FnMut(Event)>)
    }

    #[wasm_bindgen_test]
    fn failed_removal_keeps_the_listener_callable() {
        let target = locked_target();
        let hits = Rc::new(Cell::new(0));
        let mut listeners = Box::new(DomListeners::default());
        listeners
            .add(&target, "click", true, counting_closure(&hits))
            .unwrap();

        let err = listeners.detach().unwrap_err();
        assert!(matches!(err, ActivityError::ListenerRemoval { event: "click", .. }));

        let listener: js_sys::Function = js_sys::Reflect::get(&target, &"listener".into())
            .unwrap()
            .unchecked_into();
        listener
            .call1(&JsValue::NULL, &Event::new("click").unwrap())
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[wasm_bindgen_test]
    fn detached_document_listeners_stop_firing() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let guard = DomInteractionSource
            .attach(SignalHandlers {
                on_interaction: Rc::new(move || counter.set(counter.get() + 1)),
                on_focus: Rc::new(|| {}),
            })
            .unwrap();
        let document = web_sys::window().unwrap().document().unwrap();

        document.dispatch_event(&Event::new("click").unwrap()).unwrap();
        assert_eq!(hits.get(), 1);

        guard.detach().unwrap();
        document.dispatch_event(&Event::new("click").unwrap()).unwrap();
        assert_eq!(hits.get(), 1);
    }
}
