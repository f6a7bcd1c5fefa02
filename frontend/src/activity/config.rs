use std::time::Duration;

use crate::config::RuntimeConfig;

pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(2 * 60);
pub const DEFAULT_WARNING_LEAD_TIME: Duration = Duration::from_secs(60);

/// Timing knobs for the inactivity monitor.
///
/// `warning_lead_time` is measured backwards from the logout deadline. A lead
/// time longer than the timeout is not rejected; the warning threshold then
/// saturates to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityConfig {
    pub inactivity_timeout: Duration,
    pub warning_lead_time: Duration,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            warning_lead_time: DEFAULT_WARNING_LEAD_TIME,
        }
    }
}

impl ActivityConfig {
    pub fn new(inactivity_timeout: Duration, warning_lead_time: Duration) -> Self {
        Self {
            inactivity_timeout,
            warning_lead_time,
        }
    }

    /// Idle time after which the warning is due.
    pub fn warning_threshold(&self) -> Duration {
        self.inactivity_timeout
            .saturating_sub(self.warning_lead_time)
    }

    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        let defaults = Self::default();
        Self {
            inactivity_timeout: runtime
                .inactivity_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.inactivity_timeout),
            warning_lead_time: runtime
                .warning_lead_time_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.warning_lead_time),
        }
    }
}
