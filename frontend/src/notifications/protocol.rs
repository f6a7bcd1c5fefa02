//! Pusher Channels wire format (protocol 7).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::NotificationError;

pub const PROTOCOL_VERSION: u8 = 7;

pub fn socket_url(key: &str, cluster: &str) -> String {
    format!(
        "wss://ws-{}.pusher.com/app/{}?protocol={}",
        cluster, key, PROTOCOL_VERSION
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Public,
    Private,
    Presence,
}

impl ChannelKind {
    pub fn of(channel: &str) -> Self {
        if channel.starts_with("private-") {
            ChannelKind::Private
        } else if channel.starts_with("presence-") {
            ChannelKind::Presence
        } else {
            ChannelKind::Public
        }
    }

    pub fn needs_auth(&self) -> bool {
        !matches!(self, ChannelKind::Public)
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Event payloads are usually JSON encoded a second time as a string.
fn decode_data(data: Value) -> Value {
    match data {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    ConnectionEstablished {
        socket_id: String,
        activity_timeout: Option<u64>,
    },
    Ping,
    Pong,
    Error {
        code: Option<u16>,
        message: String,
    },
    SubscriptionSucceeded {
        channel: String,
    },
    SubscriptionError {
        channel: String,
        data: Value,
    },
    ChannelEvent {
        channel: String,
        event: String,
        data: Value,
    },
}

pub fn parse(text: &str) -> Result<ServerMessage, NotificationError> {
    let frame: RawFrame = serde_json::from_str(text)
        .map_err(|err| NotificationError::Protocol(format!("malformed frame: {}", err)))?;
    let RawFrame {
        event,
        channel,
        data,
    } = frame;
    let data = decode_data(data);
    let channel = || {
        channel
            .clone()
            .ok_or_else(|| NotificationError::Protocol(format!("`{}` without channel", event)))
    };

    let message = match event.as_str() {
        "pusher:connection_established" => ServerMessage::ConnectionEstablished {
            socket_id: data
                .get("socket_id")
                .and_then(Value::as_str)
                .ok_or_else(|| NotificationError::Protocol("missing socket_id".into()))?
                .to_string(),
            activity_timeout: data.get("activity_timeout").and_then(Value::as_u64),
        },
        "pusher:ping" => ServerMessage::Ping,
        "pusher:pong" => ServerMessage::Pong,
        "pusher:error" => ServerMessage::Error {
            code: data
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok()),
            message: data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "pusher_internal:subscription_succeeded" => ServerMessage::SubscriptionSucceeded {
            channel: channel()?,
        },
        "pusher:subscription_error" => ServerMessage::SubscriptionError {
            channel: channel()?,
            data,
        },
        _ => ServerMessage::ChannelEvent {
            channel: channel()?,
            event: event.clone(),
            data,
        },
    };
    Ok(message)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Subscribe {
        channel: String,
        auth: Option<String>,
        channel_data: Option<String>,
    },
    Unsubscribe {
        channel: String,
    },
    Ping,
    Pong,
}

impl ClientMessage {
    pub fn encode(&self) -> String {
        let frame = match self {
            ClientMessage::Subscribe {
                channel,
                auth,
                channel_data,
            } => {
                let mut data = json!({ "channel": channel });
                if let Some(auth) = auth {
                    data["auth"] = json!(auth);
                }
                if let Some(channel_data) = channel_data {
                    data["channel_data"] = json!(channel_data);
                }
                json!({ "event": "pusher:subscribe", "data": data })
            }
            ClientMessage::Unsubscribe { channel } => {
                json!({ "event": "pusher:unsubscribe", "data": { "channel": channel } })
            }
            ClientMessage::Ping => json!({ "event": "pusher:ping", "data": {} }),
            ClientMessage::Pong => json!({ "event": "pusher:pong", "data": {} }),
        };
        frame.to_string()
    }
}
