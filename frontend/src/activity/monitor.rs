use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use super::{ActivityConfig, ActivityError, ListenerGuard, MonitorEnv, SignalHandlers, TimerHandle};
use crate::labels;

/// Screens on which an authenticated user is tracked for inactivity.
pub const TRACKED_ROUTES: &[&str] = &["/", "/profile", "/transactions", "/transactions/create"];
pub const LOGIN_PATH: &str = "/login";
/// Pause after a login before tracking is evaluated, so the post-login
/// navigation can land first.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);
pub const LOGOUT_NOTICE_DURATION: Duration = Duration::from_secs(5);
// Window focus and visibilitychange usually arrive together.
const FOCUS_COALESCE_WINDOW: Duration = Duration::from_millis(250);

pub fn should_track(path: &str, is_authenticated: bool) -> bool {
    is_authenticated && TRACKED_ROUTES.contains(&path)
}

/// Human readable lead time used in the warning toast.
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        match secs / 60 {
            1 => "1 minute".to_string(),
            minutes => format!("{} minutes", minutes),
        }
    } else if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}

fn elapsed_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub last_activity_at: DateTime<Utc>,
    pub is_active: bool,
    pub warning_issued: bool,
    pub tracking_enabled: bool,
}

/// What a focus catch-up check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    LoggedOut,
    Warned,
    WarningRepeated,
    Idle,
    Ignored,
}

struct SessionState {
    last_activity_at: DateTime<Utc>,
    is_active: bool,
    warning_issued: bool,
    logging_out: bool,
    // Bumped on every reset/stop/logout; timer callbacks from an older
    // generation are ignored.
    generation: u64,
    warn_timer: Option<Box<dyn TimerHandle>>,
    logout_timer: Option<Box<dyn TimerHandle>>,
    settle_timer: Option<Box<dyn TimerHandle>>,
    listeners: Option<Box<dyn ListenerGuard>>,
    last_focus_check: Option<DateTime<Utc>>,
    current_path: String,
}

impl SessionState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_activity_at: now,
            is_active: true,
            warning_issued: false,
            logging_out: false,
            generation: 0,
            warn_timer: None,
            logout_timer: None,
            settle_timer: None,
            listeners: None,
            last_focus_check: None,
            current_path: String::new(),
        }
    }

    fn take_timers(&mut self) -> Vec<Box<dyn TimerHandle>> {
        self.warn_timer
            .take()
            .into_iter()
            .chain(self.logout_timer.take())
            .collect()
    }
}

fn cancel_all(timers: Vec<Box<dyn TimerHandle>>) {
    for timer in timers {
        timer.cancel();
    }
}

struct Inner {
    config: ActivityConfig,
    env: MonitorEnv,
    state: RefCell<SessionState>,
}

/// Session-expiry state machine.
///
/// Cheap to clone; clones share state. Timer and listener callbacks only hold
/// weak references, so they turn into no-ops once every clone is dropped.
///
/// Timer handles are never cancelled from inside their own callback: a fired
/// or superseded handle is released by the next `reset` or `stop`.
#[derive(Clone)]
pub struct ActivityMonitor {
    inner: Rc<Inner>,
}

impl ActivityMonitor {
    pub fn new(config: ActivityConfig, env: MonitorEnv) -> Self {
        let now = env.clock.now();
        Self {
            inner: Rc::new(Inner {
                config,
                env,
                state: RefCell::new(SessionState::new(now)),
            }),
        }
    }

    pub fn config(&self) -> ActivityConfig {
        self.inner.config
    }

    fn weak(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn is_authenticated(&self) -> bool {
        self.inner.env.auth.is_authenticated()
    }

    pub fn is_started(&self) -> bool {
        self.inner.state.borrow().listeners.is_some()
    }

    pub fn tracking_enabled(&self) -> bool {
        let path = self.inner.state.borrow().current_path.clone();
        should_track(&path, self.is_authenticated())
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        let tracking_enabled = self.tracking_enabled();
        let state = self.inner.state.borrow();
        ActivitySnapshot {
            last_activity_at: state.last_activity_at,
            is_active: state.is_active,
            warning_issued: state.warning_issued,
            tracking_enabled,
        }
    }

    /// Registers interaction and focus listeners and arms the timers.
    ///
    /// A no-op when already started or when nobody is logged in. On
    /// registration failure the monitor stays stopped.
    pub fn start(&self) -> Result<(), ActivityError> {
        if self.is_started() || !self.is_authenticated() {
            return Ok(());
        }
        let guard = self.inner.env.signals.attach(self.signal_handlers())?;
        self.inner.state.borrow_mut().listeners = Some(guard);
        debug!("activity tracking started");
        self.reset();
        Ok(())
    }

    fn signal_handlers(&self) -> SignalHandlers {
        let on_interaction = {
            let weak = self.weak();
            Rc::new(move || {
                if let Some(monitor) = Self::upgrade(&weak) {
                    monitor.record_interaction();
                }
            })
        };
        let on_focus = {
            let weak = self.weak();
            Rc::new(move || {
                if let Some(monitor) = Self::upgrade(&weak) {
                    monitor.on_page_regains_focus();
                }
            })
        };
        SignalHandlers {
            on_interaction,
            on_focus,
        }
    }

    fn record_interaction(&self) {
        if self.is_authenticated() {
            self.reset();
        }
    }

    /// Removes listeners, cancels every pending timer and clears the warning.
    /// Safe to call when not started.
    pub fn stop(&self) -> Result<(), ActivityError> {
        let (listeners, mut timers) = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            state.is_active = true;
            state.warning_issued = false;
            state.logging_out = false;
            state.last_focus_check = None;
            (state.listeners.take(), state.take_timers())
        };
        timers.extend(self.inner.state.borrow_mut().settle_timer.take());
        cancel_all(timers);
        if let Some(listeners) = listeners {
            listeners.detach()?;
            debug!("activity tracking stopped");
        }
        Ok(())
    }

    /// Marks "now" as the last activity and re-arms both timers.
    pub fn reset(&self) {
        if !self.is_authenticated() {
            return;
        }
        let now = self.inner.env.clock.now();
        let (generation, stale) = {
            let mut state = self.inner.state.borrow_mut();
            if state.logging_out {
                return;
            }
            state.generation += 1;
            state.last_activity_at = now;
            state.is_active = true;
            state.warning_issued = false;
            (state.generation, state.take_timers())
        };
        cancel_all(stale);

        let config = self.inner.config;
        let warn_timer =
            self.schedule_for_generation(config.warning_threshold(), generation, Self::on_warning_due);
        let logout_timer =
            self.schedule_for_generation(config.inactivity_timeout, generation, Self::on_logout_due);

        let mut state = self.inner.state.borrow_mut();
        state.warn_timer = Some(warn_timer);
        state.logout_timer = Some(logout_timer);
    }

    fn schedule_for_generation(
        &self,
        delay: Duration,
        generation: u64,
        action: fn(&ActivityMonitor),
    ) -> Box<dyn TimerHandle> {
        let weak = self.weak();
        self.inner.env.scheduler.schedule(
            delay,
            Box::new(move || {
                let Some(monitor) = Self::upgrade(&weak) else {
                    return;
                };
                let current = monitor.inner.state.borrow().generation;
                if current == generation {
                    action(&monitor);
                }
            }),
        )
    }

    fn on_warning_due(&self) {
        if self.is_authenticated() {
            self.show_warning();
        }
    }

    fn on_logout_due(&self) {
        if self.is_authenticated() {
            self.trigger_logout();
        }
    }

    fn show_warning(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.warning_issued {
                return false;
            }
            state.warning_issued = true;
        }
        self.display_warning();
        true
    }

    fn display_warning(&self) {
        let lead = self.inner.config.warning_lead_time;
        let message = labels::label(
            "session.inactivityWarning",
            &[("duration", describe_duration(lead).as_str())],
        );
        self.inner.env.notifier.warn(&message, lead);
    }

    /// Catch-up check for time that passed while timers may not have run.
    pub fn on_page_regains_focus(&self) -> FocusOutcome {
        if !self.is_authenticated() {
            return FocusOutcome::Ignored;
        }
        let now = self.inner.env.clock.now();
        let (elapsed, warning_issued) = {
            let mut state = self.inner.state.borrow_mut();
            if state.listeners.is_none() || state.logging_out {
                return FocusOutcome::Ignored;
            }
            if let Some(previous) = state.last_focus_check {
                if elapsed_between(previous, now) < FOCUS_COALESCE_WINDOW {
                    return FocusOutcome::Ignored;
                }
            }
            state.last_focus_check = Some(now);
            (elapsed_between(state.last_activity_at, now), state.warning_issued)
        };

        let config = self.inner.config;
        if elapsed >= config.inactivity_timeout {
            info!(
                "page regained focus after {} ms idle; ending session",
                elapsed.as_millis()
            );
            self.trigger_logout();
            FocusOutcome::LoggedOut
        } else if elapsed >= config.warning_threshold() && !warning_issued {
            self.show_warning();
            FocusOutcome::Warned
        } else if warning_issued {
            self.display_warning();
            FocusOutcome::WarningRepeated
        } else {
            FocusOutcome::Idle
        }
    }

    /// Ends the session. Single-shot until the monitor is stopped again.
    pub fn trigger_logout(&self) {
        if !self.is_authenticated() {
            return;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            if state.logging_out {
                return;
            }
            state.logging_out = true;
            state.is_active = false;
            state.generation += 1;
        }
        info!("ending session after inactivity");

        let env = &self.inner.env;
        env.notifier.info(
            &labels::label("session.loggedOutInactivity", &[]),
            LOGOUT_NOTICE_DURATION,
        );
        let auth = env.auth.clone();
        let navigator = env.navigator.clone();
        env.spawner.spawn(Box::pin(async move {
            if let Err(err) = auth.logout().await {
                warn!("remote logout failed during auto-logout: {}", err);
                auth.clear_auth_locally();
            }
            navigator.go_to(LOGIN_PATH);
        }));
    }

    /// Starts tracking when the current screen qualifies.
    pub fn initialize(&self) -> Result<(), ActivityError> {
        if self.tracking_enabled() {
            self.start()
        } else {
            Ok(())
        }
    }

    pub fn on_auth_changed(
        &self,
        is_authenticated: bool,
        was_authenticated: bool,
    ) -> Result<(), ActivityError> {
        match (was_authenticated, is_authenticated) {
            (false, true) => {
                self.schedule_settle();
                Ok(())
            }
            (true, false) => self.stop(),
            _ => Ok(()),
        }
    }

    fn schedule_settle(&self) {
        let weak = self.weak();
        let handle = self.inner.env.scheduler.schedule(
            SETTLE_DELAY,
            Box::new(move || {
                if let Some(monitor) = Self::upgrade(&weak) {
                    if let Err(err) = monitor.initialize() {
                        error!("failed to start activity tracking: {}", err);
                    }
                }
            }),
        );
        let previous = self.inner.state.borrow_mut().settle_timer.replace(handle);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Tracks on eligible screens and pauses everywhere else.
    pub fn on_route_changed(&self, path: &str) -> Result<(), ActivityError> {
        self.inner.state.borrow_mut().current_path = path.to_string();
        if should_track(path, self.is_authenticated()) {
            self.start()
        } else if self.is_started() {
            self.stop()
        } else {
            Ok(())
        }
    }

    /// Releases everything; used when the owning view unmounts.
    pub fn teardown(&self) {
        if let Err(err) = self.stop() {
            error!("failed to tear down activity tracking: {}", err);
        }
    }

    pub fn check_activity(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.idle_for() < self.inner.config.inactivity_timeout
    }

    pub fn time_until_logout(&self) -> Duration {
        if !self.is_authenticated() {
            return Duration::ZERO;
        }
        self.inner
            .config
            .inactivity_timeout
            .saturating_sub(self.idle_for())
    }

    fn idle_for(&self) -> Duration {
        let last = self.inner.state.borrow().last_activity_at;
        elapsed_between(last, self.inner.env.clock.now())
    }
}
