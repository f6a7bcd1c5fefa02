//! Wallet events broadcast on the user's private channel.

use std::{rc::Rc, time::Duration};

use serde::Deserialize;
use serde_json::Value;

use super::PusherClient;
use crate::{
    labels::label,
    state::toast::{ToastKind, ToastState},
};

pub const TRANSACTION_CREATED: &str = "transaction.created";
pub const EMAIL_VERIFIED: &str = "email.verified";
pub const PASSWORD_CHANGED: &str = "password.changed";

pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

pub fn user_channel(user_id: i64) -> String {
    format!("private-user.{}", user_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    fn from_labels(key: &str, data: &[(&str, &str)]) -> Self {
        Self {
            title: label(&format!("notifications.{}", key), &[]),
            message: label(&format!("notifications.{}Detail", key), data),
        }
    }

    pub fn text(&self) -> String {
        format!("{}: {}", self.title, self.message)
    }
}

// The broadcast payload only carries a partial transaction.
#[derive(Debug, Deserialize)]
struct TransactionCreated {
    transaction: BroadcastTransaction,
}

#[derive(Debug, Deserialize)]
struct BroadcastTransaction {
    receiver_id: i64,
    #[serde(default)]
    sender_name: Option<String>,
}

/// "Money Received" when `current_user` is the receiver.
pub fn transaction_notice(data: &Value, current_user: Option<i64>) -> Option<Notice> {
    let current_user = current_user?;
    let event = match TransactionCreated::deserialize(data) {
        Ok(event) => event,
        Err(err) => {
            log::warn!("malformed {} payload: {}", TRANSACTION_CREATED, err);
            return None;
        }
    };
    if event.transaction.receiver_id != current_user {
        return None;
    }
    let sender = event.transaction.sender_name.unwrap_or_default();
    Some(Notice::from_labels("moneyReceived", &[("sender", &sender)]))
}

pub fn email_verified_notice() -> Notice {
    Notice::from_labels("emailVerified", &[])
}

pub fn password_changed_notice() -> Notice {
    Notice::from_labels("passwordChanged", &[])
}

/// Callbacks the wallet handlers need from the app.
#[derive(Clone)]
pub struct WalletHooks {
    pub toasts: ToastState,
    pub current_user: Rc<dyn Fn() -> Option<i64>>,
    /// Reloads balances and history after a transaction lands.
    pub on_transaction: Rc<dyn Fn()>,
}

fn show(toasts: ToastState, notice: Notice) {
    toasts.push(ToastKind::Success, &notice.text(), NOTICE_DURATION);
}

/// Subscribes the wallet handlers to the user's private channel and returns
/// its name.
pub fn bind_wallet_handlers(client: &PusherClient, user_id: i64, hooks: WalletHooks) -> String {
    let channel = user_channel(user_id);
    {
        let hooks = hooks.clone();
        client.subscribe_private(
            &channel,
            TRANSACTION_CREATED,
            Rc::new(move |data: &Value| {
                if let Some(notice) = transaction_notice(data, (hooks.current_user)()) {
                    show(hooks.toasts, notice);
                }
                (hooks.on_transaction)();
            }),
        );
    }
    {
        let toasts = hooks.toasts;
        client.subscribe_private(
            &channel,
            EMAIL_VERIFIED,
            Rc::new(move |_: &Value| show(toasts, email_verified_notice())),
        );
    }
    let toasts = hooks.toasts;
    client.subscribe_private(
        &channel,
        PASSWORD_CHANGED,
        Rc::new(move |_: &Value| show(toasts, password_changed_notice())),
    );
    channel
}
