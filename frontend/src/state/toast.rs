use std::time::Duration;

use leptos::*;
use uuid::Uuid;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

/// Transient notifications shown by `ToastHost`.
#[derive(Clone, Copy)]
pub struct ToastState {
    pub toasts: RwSignal<Vec<Toast>>,
}

impl ToastState {
    pub fn new() -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
        }
    }

    pub fn push(&self, kind: ToastKind, message: &str, duration: Duration) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.to_string(),
            duration,
        };
        let id = toast.id;
        self.toasts.update(|list| list.push(toast));
        self.schedule_dismiss(id, duration);
        id
    }

    pub fn success(&self, message: &str) -> Uuid {
        self.push(ToastKind::Success, message, DEFAULT_TOAST_DURATION)
    }

    pub fn error(&self, message: &str) -> Uuid {
        self.push(ToastKind::Error, message, DEFAULT_TOAST_DURATION)
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.try_update(|list| list.retain(|toast| toast.id != id));
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_dismiss(&self, id: Uuid, after: Duration) {
        let state = *self;
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, move || state.dismiss(id)).forget();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_dismiss(&self, _id: Uuid, _after: Duration) {}
}

impl Default for ToastState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_toasts() -> ToastState {
    let state = ToastState::new();
    provide_context(state);
    state
}

pub fn use_toasts() -> ToastState {
    use_context::<ToastState>().unwrap_or_else(ToastState::new)
}
