//! Inactivity tracking for authenticated screens.
//!
//! [`ActivityMonitor`] owns the session-expiry state machine. It is driven by
//! DOM interaction signals, page focus/visibility changes and authentication
//! transitions, and it decides when to warn the user and when to end the
//! session. The browser-facing collaborators live in [`browser`]; the Leptos
//! wiring lives in [`hook`].

pub mod browser;
mod config;
mod env;
pub mod hook;
mod monitor;

pub use config::ActivityConfig;
pub use env::*;
pub use monitor::*;

#[cfg(test)]
pub mod test_support;
