use std::{rc::Rc, time::Duration};

use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;

use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("failed to register `{event}` listener: {reason}")]
    ListenerRegistration { event: &'static str, reason: String },
    #[error("failed to remove `{event}` listener: {reason}")]
    ListenerRemoval { event: &'static str, reason: String },
    #[error("browser environment unavailable: {0}")]
    Unavailable(String),
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// A scheduled callback that has not fired yet.
pub trait TimerHandle {
    fn cancel(self: Box<Self>);
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle>;
}

/// Authentication collaborator. `logout` may fail; the monitor recovers with
/// `clear_auth_locally`.
pub trait SessionAuth {
    fn is_authenticated(&self) -> bool;
    fn logout(&self) -> LocalBoxFuture<'static, Result<(), ApiError>>;
    fn clear_auth_locally(&self);
}

pub trait Notifier {
    fn warn(&self, message: &str, duration: Duration);
    fn info(&self, message: &str, duration: Duration);
}

pub trait Navigator {
    fn go_to(&self, path: &str);
}

pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Callbacks handed to an [`InteractionSource`] when listeners are attached.
#[derive(Clone)]
pub struct SignalHandlers {
    pub on_interaction: Rc<dyn Fn()>,
    pub on_focus: Rc<dyn Fn()>,
}

/// Registered interaction listeners. Dropping a guard without calling
/// `detach` still unregisters, but swallows failures.
pub trait ListenerGuard {
    fn detach(self: Box<Self>) -> Result<(), ActivityError>;
}

pub trait InteractionSource {
    fn attach(&self, handlers: SignalHandlers) -> Result<Box<dyn ListenerGuard>, ActivityError>;
}

/// Everything the monitor talks to.
#[derive(Clone)]
pub struct MonitorEnv {
    pub auth: Rc<dyn SessionAuth>,
    pub notifier: Rc<dyn Notifier>,
    pub navigator: Rc<dyn Navigator>,
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn Scheduler>,
    pub signals: Rc<dyn InteractionSource>,
    pub spawner: Rc<dyn TaskSpawner>,
}
