//! Deterministic collaborators for driving [`ActivityMonitor`] in tests.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
    time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use futures::{
    executor::{LocalPool, LocalSpawner},
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};

use super::{
    ActivityConfig, ActivityError, ActivityMonitor, Clock, InteractionSource, ListenerGuard,
    MonitorEnv, Navigator, Notifier, Scheduler, SessionAuth, SignalHandlers, TaskSpawner,
    TimerHandle,
};
use crate::api::ApiError;

type TimerKey = (DateTime<Utc>, u64);

struct TimelineState {
    origin: DateTime<Utc>,
    now: DateTime<Utc>,
    next_id: u64,
    pending: BTreeMap<TimerKey, Box<dyn FnOnce()>>,
}

/// Virtual clock plus timer queue. Time only moves when the test says so.
#[derive(Clone)]
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
    after_fire: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl Timeline {
    pub fn new() -> Self {
        let origin = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        Self {
            state: Rc::new(RefCell::new(TimelineState {
                origin,
                now: origin,
                next_id: 0,
                pending: BTreeMap::new(),
            })),
            after_fire: Rc::new(RefCell::new(None)),
        }
    }

    /// Runs `hook` after every fired timer, while the clock still reads the
    /// firing time.
    pub fn after_each_timer(&self, hook: impl Fn() + 'static) {
        *self.after_fire.borrow_mut() = Some(Rc::new(hook));
    }

    /// Milliseconds since the timeline started.
    pub fn elapsed_ms(&self) -> i64 {
        let state = self.state.borrow();
        (state.now - state.origin).num_milliseconds()
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves time forward, firing due timers in order.
    pub fn advance(&self, by: Duration) {
        let target = self.state.borrow().now + chrono::Duration::from_std(by).unwrap();
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(at, _)| *at <= target);
                due.and_then(|key| {
                    state.now = key.0;
                    state.pending.remove(&key)
                })
            };
            match next {
                Some(callback) => {
                    callback();
                    let hook = self.after_fire.borrow().clone();
                    if let Some(hook) = hook {
                        hook();
                    }
                }
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }

    /// Moves time forward without firing anything, like a suspended tab.
    pub fn suspend_for(&self, by: Duration) {
        let mut state = self.state.borrow_mut();
        state.now = state.now + chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for Timeline {
    fn now(&self) -> DateTime<Utc> {
        self.state.borrow().now
    }
}

struct ManualTimer {
    key: TimerKey,
    timeline: Weak<RefCell<TimelineState>>,
}

impl TimerHandle for ManualTimer {
    fn cancel(self: Box<Self>) {
        if let Some(state) = self.timeline.upgrade() {
            state.borrow_mut().pending.remove(&self.key);
        }
    }
}

impl Scheduler for Timeline {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let key = (state.now + chrono::Duration::from_std(delay).unwrap(), id);
        state.pending.insert(key, callback);
        Box::new(ManualTimer {
            key,
            timeline: Rc::downgrade(&self.state),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Warn { at_ms: i64, message: String },
    Info { at_ms: i64, message: String },
    RemoteLogout { at_ms: i64 },
    ClearedLocally,
    Navigated(String),
}

#[derive(Clone)]
pub struct Recorder {
    timeline: Timeline,
    events: Rc<RefCell<Vec<Recorded>>>,
}

impl Recorder {
    fn push(&self, event: Recorded) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<i64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Warn { at_ms, .. } => Some(at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<i64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Info { at_ms, .. } => Some(at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn remote_logouts(&self) -> Vec<i64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::RemoteLogout { at_ms } => Some(at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Recorded) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }
}

impl Notifier for Recorder {
    fn warn(&self, message: &str, _duration: Duration) {
        self.push(Recorded::Warn {
            at_ms: self.timeline.elapsed_ms(),
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str, _duration: Duration) {
        self.push(Recorded::Info {
            at_ms: self.timeline.elapsed_ms(),
            message: message.to_string(),
        });
    }
}

impl Navigator for Recorder {
    fn go_to(&self, path: &str) {
        self.push(Recorded::Navigated(path.to_string()));
    }
}

#[derive(Clone)]
pub struct FakeAuth {
    authenticated: Rc<Cell<bool>>,
    fail_logout: Rc<Cell<bool>>,
    recorder: Recorder,
}

impl FakeAuth {
    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.set(value);
    }

    pub fn fail_next_logout(&self) {
        self.fail_logout.set(true);
    }
}

impl SessionAuth for FakeAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    fn logout(&self) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let this = self.clone();
        Box::pin(async move {
            this.recorder.push(Recorded::RemoteLogout {
                at_ms: this.recorder.timeline.elapsed_ms(),
            });
            if this.fail_logout.replace(false) {
                return Err(ApiError::request_failed("network down"));
            }
            this.authenticated.set(false);
            Ok(())
        })
    }

    fn clear_auth_locally(&self) {
        self.authenticated.set(false);
        self.recorder.push(Recorded::ClearedLocally);
    }
}

#[derive(Default)]
struct SignalsState {
    handlers: Option<SignalHandlers>,
    attach_calls: usize,
    fail_attach: bool,
}

/// Stand-in for DOM listeners; tests fire interactions and focus by hand.
#[derive(Clone, Default)]
pub struct FakeSignals {
    state: Rc<RefCell<SignalsState>>,
}

impl FakeSignals {
    pub fn is_attached(&self) -> bool {
        self.state.borrow().handlers.is_some()
    }

    pub fn attach_calls(&self) -> usize {
        self.state.borrow().attach_calls
    }

    pub fn fail_attach(&self) {
        self.state.borrow_mut().fail_attach = true;
    }

    pub fn interact(&self) {
        let handler = self
            .state
            .borrow()
            .handlers
            .as_ref()
            .map(|h| h.on_interaction.clone());
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn focus(&self) {
        let handler = self
            .state
            .borrow()
            .handlers
            .as_ref()
            .map(|h| h.on_focus.clone());
        if let Some(handler) = handler {
            handler();
        }
    }
}

struct FakeListeners {
    state: Rc<RefCell<SignalsState>>,
}

impl ListenerGuard for FakeListeners {
    fn detach(self: Box<Self>) -> Result<(), ActivityError> {
        self.state.borrow_mut().handlers = None;
        Ok(())
    }
}

impl InteractionSource for FakeSignals {
    fn attach(&self, handlers: SignalHandlers) -> Result<Box<dyn ListenerGuard>, ActivityError> {
        let mut state = self.state.borrow_mut();
        state.attach_calls += 1;
        if state.fail_attach {
            return Err(ActivityError::ListenerRegistration {
                event: "mousedown",
                reason: "blocked".into(),
            });
        }
        state.handlers = Some(handlers);
        Ok(Box::new(FakeListeners {
            state: self.state.clone(),
        }))
    }
}

struct PoolSpawner(LocalSpawner);

impl TaskSpawner for PoolSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.0.spawn_local(task).expect("spawn logout task");
    }
}

/// A monitor wired to fakes, starting authenticated on `/`.
pub struct Harness {
    pub timeline: Timeline,
    pub recorder: Recorder,
    pub auth: FakeAuth,
    pub signals: FakeSignals,
    pub monitor: ActivityMonitor,
    pool: Rc<RefCell<LocalPool>>,
    holding: Rc<Cell<bool>>,
}

impl Harness {
    pub fn new(config: ActivityConfig) -> Self {
        let timeline = Timeline::new();
        let recorder = Recorder {
            timeline: timeline.clone(),
            events: Rc::new(RefCell::new(Vec::new())),
        };
        let auth = FakeAuth {
            authenticated: Rc::new(Cell::new(true)),
            fail_logout: Rc::new(Cell::new(false)),
            recorder: recorder.clone(),
        };
        let signals = FakeSignals::default();
        let pool = Rc::new(RefCell::new(LocalPool::new()));
        let holding = Rc::new(Cell::new(false));
        let drained = Rc::downgrade(&pool);
        let held = holding.clone();
        timeline.after_each_timer(move || {
            if held.get() {
                return;
            }
            if let Some(pool) = drained.upgrade() {
                pool.borrow_mut().run_until_stalled();
            }
        });
        let env = MonitorEnv {
            auth: Rc::new(auth.clone()),
            notifier: Rc::new(recorder.clone()),
            navigator: Rc::new(recorder.clone()),
            clock: Rc::new(timeline.clone()),
            scheduler: Rc::new(timeline.clone()),
            signals: Rc::new(signals.clone()),
            spawner: Rc::new(PoolSpawner(pool.borrow().spawner())),
        };
        let monitor = ActivityMonitor::new(config, env);
        Self {
            timeline,
            recorder,
            auth,
            signals,
            monitor,
            pool,
            holding,
        }
    }

    pub fn with_ms(timeout_ms: u64, lead_ms: u64) -> Self {
        Self::new(ActivityConfig::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(lead_ms),
        ))
    }

    /// Runs spawned logout tasks to completion and stops holding them.
    pub fn run_tasks(&self) {
        self.holding.set(false);
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Leaves spawned tasks queued after timers fire, so a test can act in
    /// the same tick before they run.
    pub fn hold_tasks(&self) {
        self.holding.set(true);
    }

    /// Tasks spawned by a timer run at that timer's instant.
    pub fn advance_ms(&self, ms: u64) {
        self.timeline.advance(Duration::from_millis(ms));
        self.run_tasks();
    }
}
