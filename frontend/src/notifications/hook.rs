use std::rc::Rc;

use leptos::*;
use log::{info, warn};

use super::{
    handlers::{bind_wallet_handlers, WalletHooks},
    socket::WebSocketConnector,
    ApiChannelAuthorizer, PusherClient, PusherConfig,
};
use crate::{
    activity::browser::SpawnLocal,
    api::ApiClient,
    state::{
        auth::use_auth,
        toast::use_toasts,
        transactions::{fetch_transactions, use_transactions},
    },
};

/// Connects the signed-in user's private channel and keeps it in step with
/// the auth store. The client is provided through context; `None` when no
/// Pusher key is configured.
pub fn use_wallet_notifications() -> Option<PusherClient> {
    let Some(config) = PusherConfig::from_runtime(&crate::config::current()) else {
        info!("Pusher key not configured; realtime notifications disabled");
        return None;
    };
    let api = use_context::<ApiClient>().unwrap_or_else(ApiClient::new);
    let client = PusherClient::new(
        config,
        Rc::new(WebSocketConnector),
        Rc::new(ApiChannelAuthorizer(api.clone())),
        Rc::new(SpawnLocal),
    );
    provide_context(client.clone());

    let (auth, _) = use_auth();
    let toasts = use_toasts();
    let (transactions, set_transactions) = use_transactions();

    let signed_in_user = create_memo(move |_| {
        auth.with(|state| {
            state
                .is_authenticated()
                .then(|| state.user.as_ref().map(|user| user.id))
                .flatten()
        })
    });

    let hooks = WalletHooks {
        toasts,
        current_user: Rc::new(move || signed_in_user.get_untracked()),
        on_transaction: Rc::new(move || {
            let api = api.clone();
            let (page, per_page) = transactions.with_untracked(|state| {
                (state.pagination.current_page, state.pagination.per_page)
            });
            spawn_local(async move {
                // Failures are logged by the store.
                let _ = fetch_transactions(&api, page, per_page, set_transactions).await;
            });
        }),
    };

    {
        let client = client.clone();
        create_effect(move |_| {
            let user = signed_in_user.get();
            client.disconnect();
            let Some(user_id) = user else {
                return;
            };
            bind_wallet_handlers(&client, user_id, hooks.clone());
            if let Err(err) = client.connect() {
                warn!("Pusher initialization failed: {}", err);
            }
        });
    }

    {
        let client = client.clone();
        on_cleanup(move || client.disconnect());
    }

    Some(client)
}

/// Mounts real-time notifications for the signed-in user.
#[component]
pub fn WalletNotifications() -> impl IntoView {
    use_wallet_notifications();
}
