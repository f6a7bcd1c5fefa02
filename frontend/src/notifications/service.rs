use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use futures::future::LocalBoxFuture;
use log::{debug, error, info, warn};
use serde_json::Value;

use super::{
    protocol::{self, ChannelKind, ClientMessage, ServerMessage},
    NotificationError,
};
use crate::{
    activity::TaskSpawner,
    api::{ApiClient, ApiError, ChannelAuth},
    config::RuntimeConfig,
    utils::storage as storage_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PusherConfig {
    pub key: String,
    pub cluster: String,
}

impl PusherConfig {
    /// `None` when no app key is configured.
    pub fn from_runtime(cfg: &RuntimeConfig) -> Option<Self> {
        Some(Self {
            key: cfg.pusher_key()?.to_string(),
            cluster: cfg.pusher_cluster().to_string(),
        })
    }

    pub fn socket_url(&self) -> String {
        protocol::socket_url(&self.key, &self.cluster)
    }
}

/// An open WebSocket.
pub trait Socket {
    fn send(&self, text: &str) -> Result<(), NotificationError>;
    /// Closes the connection and stops delivering events. The handle itself
    /// is dropped later, outside of any socket callback.
    fn close(&self);
}

#[derive(Clone)]
pub struct SocketEvents {
    pub on_open: Rc<dyn Fn()>,
    pub on_message: Rc<dyn Fn(String)>,
    pub on_close: Rc<dyn Fn()>,
    pub on_error: Rc<dyn Fn(String)>,
}

pub trait SocketConnector {
    fn connect(&self, url: &str, events: SocketEvents)
        -> Result<Box<dyn Socket>, NotificationError>;
}

/// Signs private and presence channel subscriptions.
pub trait ChannelAuthorizer {
    fn authorize(
        &self,
        socket_id: &str,
        channel: &str,
    ) -> LocalBoxFuture<'static, Result<ChannelAuth, ApiError>>;
}

pub struct ApiChannelAuthorizer(pub ApiClient);

impl ChannelAuthorizer for ApiChannelAuthorizer {
    fn authorize(
        &self,
        socket_id: &str,
        channel: &str,
    ) -> LocalBoxFuture<'static, Result<ChannelAuth, ApiError>> {
        let api = self.0.clone();
        let socket_id = socket_id.to_string();
        let channel = channel.to_string();
        Box::pin(async move { api.authorize_channel(&socket_id, &channel).await })
    }
}

pub type EventHandler = Rc<dyn Fn(&Value)>;

#[derive(Default)]
struct Channel {
    requested: bool,
    subscribed: bool,
    bindings: Vec<(String, EventHandler)>,
}

struct ClientState {
    connection: ConnectionState,
    socket: Option<Box<dyn Socket>>,
    socket_id: Option<String>,
    // Bumped per connection attempt; events from older sockets are dropped.
    generation: u64,
    channels: BTreeMap<String, Channel>,
}

struct Inner {
    config: PusherConfig,
    connector: Rc<dyn SocketConnector>,
    authorizer: Rc<dyn ChannelAuthorizer>,
    spawner: Rc<dyn TaskSpawner>,
    state: RefCell<ClientState>,
}

/// Pusher client owned by the app shell and shared through context.
///
/// Channels may be subscribed before the socket is up; the subscribe frames
/// go out once the server confirms the connection.
#[derive(Clone)]
pub struct PusherClient {
    inner: Rc<Inner>,
}

fn with_prefix(prefix: &str, name: &str) -> String {
    if name.starts_with(prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name)
    }
}

impl PusherClient {
    pub fn new(
        config: PusherConfig,
        connector: Rc<dyn SocketConnector>,
        authorizer: Rc<dyn ChannelAuthorizer>,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                connector,
                authorizer,
                spawner,
                state: RefCell::new(ClientState {
                    connection: ConnectionState::Disconnected,
                    socket: None,
                    socket_id: None,
                    generation: 0,
                    channels: BTreeMap::new(),
                }),
            }),
        }
    }

    fn weak(&self) -> Weak<Inner> {
        Rc::downgrade(&self.inner)
    }

    /// Upgrades a callback's weak handle if its connection is still current.
    fn live(weak: &Weak<Inner>, generation: u64) -> Option<Self> {
        let inner = weak.upgrade()?;
        let current = inner.state.borrow().generation;
        (current == generation).then_some(Self { inner })
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.state.borrow().connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    pub fn socket_id(&self) -> Option<String> {
        self.inner.state.borrow().socket_id.clone()
    }

    pub fn is_channel_subscribed(&self, channel: &str) -> bool {
        self.inner.state.borrow().channels.contains_key(channel)
    }

    /// Whether the server confirmed the subscription.
    pub fn is_channel_confirmed(&self, channel: &str) -> bool {
        self.inner
            .state
            .borrow()
            .channels
            .get(channel)
            .map(|c| c.subscribed)
            .unwrap_or(false)
    }

    pub fn connect(&self) -> Result<(), NotificationError> {
        let generation = {
            let mut state = self.inner.state.borrow_mut();
            if state.socket.is_some() {
                return Ok(());
            }
            state.generation += 1;
            state.connection = ConnectionState::Connecting;
            state.generation
        };
        let url = self.inner.config.socket_url();
        match self
            .inner
            .connector
            .connect(&url, self.socket_events(generation))
        {
            Ok(socket) => {
                self.inner.state.borrow_mut().socket = Some(socket);
                debug!("pusher connecting to {}", url);
                Ok(())
            }
            Err(err) => {
                self.inner.state.borrow_mut().connection = ConnectionState::Failed;
                Err(err)
            }
        }
    }

    fn socket_events(&self, generation: u64) -> SocketEvents {
        let weak = self.weak();
        let on_open = {
            let weak = weak.clone();
            Rc::new(move || {
                if Self::live(&weak, generation).is_some() {
                    debug!("pusher socket open");
                }
            })
        };
        let on_message = {
            let weak = weak.clone();
            Rc::new(move |text: String| {
                if let Some(client) = Self::live(&weak, generation) {
                    client.handle_message(&text);
                }
            })
        };
        let on_close = {
            let weak = weak.clone();
            Rc::new(move || {
                if let Some(client) = Self::live(&weak, generation) {
                    client.handle_close();
                }
            })
        };
        let on_error = Rc::new(move |message: String| {
            if let Some(client) = Self::live(&weak, generation) {
                client.handle_error(&message);
            }
        });
        SocketEvents {
            on_open,
            on_message,
            on_close,
            on_error,
        }
    }

    fn handle_message(&self, text: &str) {
        let message = match protocol::parse(text) {
            Ok(message) => message,
            Err(err) => {
                warn!("ignoring pusher frame: {}", err);
                return;
            }
        };
        match message {
            ServerMessage::ConnectionEstablished { socket_id, .. } => {
                {
                    let mut state = self.inner.state.borrow_mut();
                    state.connection = ConnectionState::Connected;
                    state.socket_id = Some(socket_id.clone());
                }
                info!("pusher connected (socket {})", socket_id);
                self.flush_subscriptions();
            }
            ServerMessage::Ping => {
                if let Err(err) = self.send(&ClientMessage::Pong) {
                    warn!("failed to answer pusher ping: {}", err);
                }
            }
            ServerMessage::Pong => {}
            ServerMessage::Error { code, message } => {
                warn!("pusher error {:?}: {}", code, message);
            }
            ServerMessage::SubscriptionSucceeded { channel } => {
                if let Some(entry) = self.inner.state.borrow_mut().channels.get_mut(&channel) {
                    entry.subscribed = true;
                }
                debug!("subscribed to {}", channel);
            }
            ServerMessage::SubscriptionError { channel, data } => {
                error!("Failed to subscribe to channel {}: {}", channel, data);
                if let Some(entry) = self.inner.state.borrow_mut().channels.get_mut(&channel) {
                    entry.requested = false;
                    entry.subscribed = false;
                }
            }
            ServerMessage::ChannelEvent {
                channel,
                event,
                data,
            } => self.dispatch(&channel, &event, &data),
        }
    }

    fn dispatch(&self, channel: &str, event: &str, data: &Value) {
        let handlers: Vec<EventHandler> = self
            .inner
            .state
            .borrow()
            .channels
            .get(channel)
            .map(|entry| {
                entry
                    .bindings
                    .iter()
                    .filter(|(name, _)| name == event)
                    .map(|(_, handler)| handler.clone())
                    .collect()
            })
            .unwrap_or_default();
        for handler in handlers {
            handler(data);
        }
    }

    fn handle_close(&self) {
        let socket = {
            let mut state = self.inner.state.borrow_mut();
            state.connection = ConnectionState::Disconnected;
            state.socket_id = None;
            for entry in state.channels.values_mut() {
                entry.requested = false;
                entry.subscribed = false;
            }
            state.socket.take()
        };
        info!("pusher disconnected");
        if let Some(socket) = socket {
            self.release(socket);
        }
    }

    fn handle_error(&self, message: &str) {
        error!("Pusher connection error: {}", message);
        let mut state = self.inner.state.borrow_mut();
        if state.connection == ConnectionState::Connecting {
            state.connection = ConnectionState::Failed;
        }
    }

    // Socket callbacks may still be on the stack; drop the handle later.
    fn release(&self, socket: Box<dyn Socket>) {
        socket.close();
        self.inner.spawner.spawn(Box::pin(async move { drop(socket) }));
    }

    fn send(&self, message: &ClientMessage) -> Result<(), NotificationError> {
        let state = self.inner.state.borrow();
        state
            .socket
            .as_ref()
            .ok_or(NotificationError::NotConnected)?
            .send(&message.encode())
    }

    fn flush_subscriptions(&self) {
        let pending: Vec<String> = self
            .inner
            .state
            .borrow()
            .channels
            .iter()
            .filter(|(_, entry)| !entry.requested)
            .map(|(name, _)| name.clone())
            .collect();
        for channel in pending {
            self.request_subscription(&channel);
        }
    }

    fn request_subscription(&self, channel: &str) {
        let (socket_id, generation) = {
            let mut state = self.inner.state.borrow_mut();
            if state.connection != ConnectionState::Connected {
                return;
            }
            let Some(entry) = state.channels.get_mut(channel) else {
                return;
            };
            if entry.requested {
                return;
            }
            entry.requested = true;
            (state.socket_id.clone(), state.generation)
        };

        if !ChannelKind::of(channel).needs_auth() {
            self.send_subscribe(channel, None);
            return;
        }

        let Some(socket_id) = socket_id else {
            return;
        };
        let weak = self.weak();
        let channel = channel.to_string();
        let authorization = self.inner.authorizer.authorize(&socket_id, &channel);
        self.inner.spawner.spawn(Box::pin(async move {
            let result = authorization.await;
            let Some(client) = Self::live(&weak, generation) else {
                return;
            };
            match result {
                Ok(auth) => client.send_subscribe(&channel, Some(auth)),
                Err(err) => {
                    let err = NotificationError::Authorization {
                        channel: channel.clone(),
                        reason: err.error,
                    };
                    error!("{}", err);
                    if let Some(entry) = client.inner.state.borrow_mut().channels.get_mut(&channel)
                    {
                        entry.requested = false;
                    }
                }
            }
        }));
    }

    fn send_subscribe(&self, channel: &str, auth: Option<ChannelAuth>) {
        if !self.is_channel_subscribed(channel) {
            return;
        }
        let (auth, channel_data) = match auth {
            Some(auth) => (Some(auth.auth), auth.channel_data),
            None => (None, None),
        };
        let message = ClientMessage::Subscribe {
            channel: channel.to_string(),
            auth,
            channel_data,
        };
        if let Err(err) = self.send(&message) {
            error!("Failed to subscribe to channel {}: {}", channel, err);
            if let Some(entry) = self.inner.state.borrow_mut().channels.get_mut(channel) {
                entry.requested = false;
            }
        }
    }

    /// Binds `handler` to `event` on a public channel.
    pub fn subscribe(&self, channel: &str, event: &str, handler: EventHandler) {
        {
            let mut state = self.inner.state.borrow_mut();
            state
                .channels
                .entry(channel.to_string())
                .or_default()
                .bindings
                .push((event.to_string(), handler));
        }
        self.request_subscription(channel);
    }

    /// Like [`subscribe`](Self::subscribe) for `private-` channels, which the
    /// broadcasting auth endpoint signs.
    pub fn subscribe_private(&self, channel: &str, event: &str, handler: EventHandler) -> String {
        let name = with_prefix("private-", channel);
        self.subscribe(&name, event, handler);
        name
    }

    pub fn subscribe_presence(&self, channel: &str, event: &str, handler: EventHandler) -> String {
        let name = with_prefix("presence-", channel);
        self.subscribe(&name, event, handler);
        name
    }

    pub fn unsubscribe(&self, channel: &str) {
        let removed = self.inner.state.borrow_mut().channels.remove(channel);
        if let Some(entry) = removed {
            if entry.requested && self.is_connected() {
                let message = ClientMessage::Unsubscribe {
                    channel: channel.to_string(),
                };
                if let Err(err) = self.send(&message) {
                    warn!("Failed to unsubscribe from channel {}: {}", channel, err);
                }
            }
        }
    }

    pub fn unsubscribe_all(&self) {
        let names: Vec<String> = self
            .inner
            .state
            .borrow()
            .channels
            .keys()
            .cloned()
            .collect();
        for name in names {
            self.unsubscribe(&name);
        }
    }

    pub fn disconnect(&self) {
        self.unsubscribe_all();
        let socket = {
            let mut state = self.inner.state.borrow_mut();
            state.generation += 1;
            state.connection = ConnectionState::Disconnected;
            state.socket_id = None;
            state.socket.take()
        };
        if let Some(socket) = socket {
            self.release(socket);
            info!("pusher disconnected");
        }
    }

    /// Reconnects so private channels are re-authorized with the latest
    /// session token. Bindings survive. Returns `false` when there is no
    /// token or no connection to refresh.
    pub fn refresh_auth(&self) -> bool {
        if storage_utils::auth_token().is_none() {
            return false;
        }
        let socket = {
            let mut state = self.inner.state.borrow_mut();
            let Some(socket) = state.socket.take() else {
                return false;
            };
            state.generation += 1;
            state.connection = ConnectionState::Disconnected;
            state.socket_id = None;
            for entry in state.channels.values_mut() {
                entry.requested = false;
                entry.subscribed = false;
            }
            socket
        };
        self.release(socket);
        match self.connect() {
            Ok(()) => true,
            Err(err) => {
                error!("Error refreshing Pusher authentication: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{
        executor::{LocalPool, LocalSpawner},
        task::LocalSpawnExt,
    };
    use std::cell::Cell;

    #[derive(Clone, Default)]
    struct Wire {
        sent: Rc<RefCell<Vec<Value>>>,
        closed: Rc<Cell<usize>>,
    }

    impl Wire {
        fn frames(&self, event: &str) -> Vec<Value> {
            self.sent
                .borrow()
                .iter()
                .filter(|f| f["event"] == event)
                .cloned()
                .collect()
        }
    }

    struct FakeSocket(Wire);

    impl Socket for FakeSocket {
        fn send(&self, text: &str) -> Result<(), NotificationError> {
            self.0
                .sent
                .borrow_mut()
                .push(serde_json::from_str(text).unwrap());
            Ok(())
        }

        fn close(&self) {
            self.0.closed.set(self.0.closed.get() + 1);
        }
    }

    #[derive(Clone, Default)]
    struct FakeConnector {
        wire: Wire,
        urls: Rc<RefCell<Vec<String>>>,
        events: Rc<RefCell<Vec<SocketEvents>>>,
    }

    impl FakeConnector {
        fn server_says(&self, frame: Value) {
            let events = self.events.borrow().last().cloned().unwrap();
            (events.on_message)(frame.to_string());
        }

        fn establish(&self, socket_id: &str) {
            let data = serde_json::json!({ "socket_id": socket_id, "activity_timeout": 120 });
            self.server_says(serde_json::json!({
                "event": "pusher:connection_established",
                "data": data.to_string()
            }));
        }
    }

    impl SocketConnector for FakeConnector {
        fn connect(
            &self,
            url: &str,
            events: SocketEvents,
        ) -> Result<Box<dyn Socket>, NotificationError> {
            self.urls.borrow_mut().push(url.to_string());
            self.events.borrow_mut().push(events);
            Ok(Box::new(FakeSocket(self.wire.clone())))
        }
    }

    struct FakeAuthorizer {
        fail: bool,
    }

    impl ChannelAuthorizer for FakeAuthorizer {
        fn authorize(
            &self,
            socket_id: &str,
            channel: &str,
        ) -> LocalBoxFuture<'static, Result<ChannelAuth, ApiError>> {
            let result = if self.fail {
                Err(ApiError::unauthorized("Unauthenticated."))
            } else {
                Ok(ChannelAuth {
                    auth: format!("key:{}:{}", socket_id, channel),
                    channel_data: None,
                })
            };
            Box::pin(async move { result })
        }
    }

    struct PoolSpawner(LocalSpawner);

    impl TaskSpawner for PoolSpawner {
        fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
            self.0.spawn_local(task).expect("spawn task");
        }
    }

    struct Fixture {
        client: PusherClient,
        connector: FakeConnector,
        pool: LocalPool,
    }

    impl Fixture {
        fn new(fail_auth: bool) -> Self {
            let connector = FakeConnector::default();
            let pool = LocalPool::new();
            let client = PusherClient::new(
                PusherConfig {
                    key: "app-key".into(),
                    cluster: "ap2".into(),
                },
                Rc::new(connector.clone()),
                Rc::new(FakeAuthorizer { fail: fail_auth }),
                Rc::new(PoolSpawner(pool.spawner())),
            );
            Self {
                client,
                connector,
                pool,
            }
        }

        fn run(&mut self) {
            self.pool.run_until_stalled();
        }
    }

    fn noop() -> EventHandler {
        Rc::new(|_| {})
    }

    #[test]
    fn config_requires_a_key() {
        assert!(PusherConfig::from_runtime(&RuntimeConfig::default()).is_none());
        let cfg = PusherConfig::from_runtime(&RuntimeConfig {
            pusher_key: Some("k".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.cluster, "ap2");
    }

    #[test]
    fn subscriptions_wait_for_the_connection() {
        let mut fx = Fixture::new(false);
        fx.client.subscribe("news", "posted", noop());
        fx.client.connect().unwrap();
        assert_eq!(fx.client.connection_state(), ConnectionState::Connecting);
        assert_eq!(
            fx.connector.urls.borrow()[0],
            "wss://ws-ap2.pusher.com/app/app-key?protocol=7"
        );
        assert!(fx.connector.wire.frames("pusher:subscribe").is_empty());

        fx.connector.establish("1.2");
        fx.run();
        assert!(fx.client.is_connected());
        assert_eq!(fx.client.socket_id().as_deref(), Some("1.2"));
        let subscribes = fx.connector.wire.frames("pusher:subscribe");
        assert_eq!(subscribes.len(), 1);
        assert_eq!(subscribes[0]["data"]["channel"], "news");
    }

    #[test]
    fn private_channels_are_signed_before_subscribing() {
        let mut fx = Fixture::new(false);
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        let name = fx.client.subscribe_private("user.7", "transaction.created", noop());
        assert_eq!(name, "private-user.7");
        fx.run();

        let subscribes = fx.connector.wire.frames("pusher:subscribe");
        assert_eq!(subscribes.len(), 1);
        assert_eq!(subscribes[0]["data"]["auth"], "key:1.2:private-user.7");
        assert!(!fx.client.is_channel_confirmed("private-user.7"));

        fx.connector.server_says(serde_json::json!({
            "event": "pusher_internal:subscription_succeeded",
            "channel": "private-user.7",
            "data": "{}"
        }));
        assert!(fx.client.is_channel_confirmed("private-user.7"));
    }

    #[test]
    fn failed_authorization_sends_nothing() {
        let mut fx = Fixture::new(true);
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        fx.client.subscribe_private("private-user.7", "x", noop());
        fx.run();
        assert!(fx.connector.wire.frames("pusher:subscribe").is_empty());
        assert!(fx.client.is_channel_subscribed("private-user.7"));
        assert!(!fx.client.is_channel_confirmed("private-user.7"));
    }

    #[test]
    fn presence_channels_get_their_prefix() {
        let fx = Fixture::new(false);
        let name = fx.client.subscribe_presence("room", "joined", noop());
        assert_eq!(name, "presence-room");
        assert!(fx.client.is_channel_subscribed("presence-room"));
    }

    #[test]
    fn ping_is_answered_with_pong() {
        let fx = Fixture::new(false);
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        fx.connector
            .server_says(serde_json::json!({ "event": "pusher:ping", "data": {} }));
        assert_eq!(fx.connector.wire.frames("pusher:pong").len(), 1);
    }

    #[test]
    fn events_reach_only_matching_bindings() {
        let mut fx = Fixture::new(false);
        let hits = Rc::new(RefCell::new(Vec::new()));
        {
            let hits = hits.clone();
            fx.client.subscribe(
                "news",
                "posted",
                Rc::new(move |data: &Value| hits.borrow_mut().push(data["id"].clone())),
            );
        }
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        fx.run();

        fx.connector.server_says(serde_json::json!({
            "event": "posted", "channel": "news", "data": "{\"id\":1}"
        }));
        fx.connector.server_says(serde_json::json!({
            "event": "deleted", "channel": "news", "data": "{\"id\":2}"
        }));
        fx.connector.server_says(serde_json::json!({
            "event": "posted", "channel": "other", "data": "{\"id\":3}"
        }));
        assert_eq!(*hits.borrow(), vec![serde_json::json!(1)]);
    }

    #[test]
    fn unsubscribe_and_disconnect_release_everything() {
        let mut fx = Fixture::new(false);
        fx.client.subscribe("a", "e", noop());
        fx.client.subscribe("b", "e", noop());
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        fx.run();

        fx.client.unsubscribe("a");
        assert!(!fx.client.is_channel_subscribed("a"));
        assert_eq!(fx.connector.wire.frames("pusher:unsubscribe").len(), 1);

        fx.client.disconnect();
        fx.run();
        assert_eq!(fx.client.connection_state(), ConnectionState::Disconnected);
        assert!(!fx.client.is_channel_subscribed("b"));
        assert_eq!(fx.connector.wire.frames("pusher:unsubscribe").len(), 2);
        assert_eq!(fx.connector.wire.closed.get(), 1);

        // Late frames from the old socket are ignored.
        fx.connector.establish("9.9");
        assert_eq!(fx.client.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn server_close_marks_channels_for_resubscription() {
        let mut fx = Fixture::new(false);
        fx.client.subscribe("news", "posted", noop());
        fx.client.connect().unwrap();
        fx.connector.establish("1.2");
        fx.run();

        let events = fx.connector.events.borrow().last().cloned().unwrap();
        (events.on_close)();
        fx.run();
        assert_eq!(fx.client.connection_state(), ConnectionState::Disconnected);
        assert!(fx.client.is_channel_subscribed("news"));

        fx.client.connect().unwrap();
        fx.connector.establish("3.4");
        fx.run();
        assert_eq!(fx.connector.wire.frames("pusher:subscribe").len(), 2);
    }

    #[test]
    fn refresh_auth_reconnects_and_resubscribes() {
        let mut fx = Fixture::new(false);
        assert!(!fx.client.refresh_auth());

        storage_utils::set_item(storage_utils::AUTH_TOKEN_KEY, "fresh").unwrap();
        assert!(!fx.client.refresh_auth());

        fx.client.subscribe_private("private-user.1", "e", noop());
        fx.client.connect().unwrap();
        fx.connector.establish("1.1");
        fx.run();

        assert!(fx.client.refresh_auth());
        fx.connector.establish("2.2");
        fx.run();
        assert_eq!(fx.connector.urls.borrow().len(), 2);
        let subscribes = fx.connector.wire.frames("pusher:subscribe");
        assert_eq!(subscribes.len(), 2);
        assert_eq!(subscribes[1]["data"]["auth"], "key:2.2:private-user.1");
        storage_utils::clear_session();
    }
}
