//! Real-time wallet notifications over Pusher Channels.
//!
//! [`PusherClient`] speaks the Pusher WebSocket protocol through a pluggable
//! [`SocketConnector`]; [`handlers`] turns wallet events into toasts.

pub mod handlers;
pub mod hook;
pub mod protocol;
mod service;
pub mod socket;

pub use service::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("real-time notifications are not configured")]
    NotConfigured,
    #[error("websocket error: {0}")]
    Socket(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("not connected")]
    NotConnected,
    #[error("authorization for `{channel}` failed: {reason}")]
    Authorization { channel: String, reason: String },
}
