use crate::{
    api::{
        ApiClient, ApiError, ChangePasswordRequest, LoginRequest, MessageResponse,
        RegisterRequest, User,
    },
    labels::label,
    state::toast::use_toasts,
    utils::storage as storage_utils,
};
use leptos::*;

pub type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
}

impl AuthState {
    /// Rebuilds the session persisted in session storage. A stored user that
    /// fails to parse is dropped.
    pub fn restore() -> Self {
        let user = match storage_utils::get_item(storage_utils::USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    log::error!("Error parsing user from session storage: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::error!("Error reading user from session storage: {}", err);
                None
            }
        };
        Self {
            user,
            token: storage_utils::auth_token(),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_email_verified(&self) -> bool {
        self.user
            .as_ref()
            .map(|user| user.email_verified_at.is_some())
            .unwrap_or(false)
    }
}

fn create_auth_context() -> AuthContext {
    create_signal(AuthState::restore())
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

fn persist_user(user: &User) {
    match serde_json::to_string(user) {
        Ok(json) => {
            if let Err(err) = storage_utils::set_item(storage_utils::USER_KEY, &json) {
                log::error!("Error setting auth in session storage: {}", err);
            }
        }
        Err(err) => log::error!("Failed to serialize user profile: {}", err),
    }
}

pub fn set_auth(set_auth_state: WriteSignal<AuthState>, user: User, token: String) {
    persist_user(&user);
    if let Err(err) = storage_utils::set_item(storage_utils::AUTH_TOKEN_KEY, &token) {
        log::error!("Error setting auth in session storage: {}", err);
    }
    set_auth_state.update(|state| {
        state.user = Some(user);
        state.token = Some(token);
    });
}

pub fn clear_auth(set_auth_state: WriteSignal<AuthState>) {
    storage_utils::clear_session();
    set_auth_state.update(|state| {
        state.user = None;
        state.token = None;
        state.loading = false;
    });
}

pub async fn login(
    api: &ApiClient,
    request: LoginRequest,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<User, ApiError> {
    set_auth_state.update(|state| state.loading = true);
    let result = api.login(&request).await;
    set_auth_state.update(|state| state.loading = false);
    let payload = result.map_err(|err| {
        log::error!("Login error: {}", err);
        err
    })?;
    let user = payload.user.clone();
    set_auth(set_auth_state, payload.user, payload.access_token);
    Ok(user)
}

pub async fn register(
    api: &ApiClient,
    request: RegisterRequest,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<User, ApiError> {
    set_auth_state.update(|state| state.loading = true);
    let result = api.register(&request).await;
    set_auth_state.update(|state| state.loading = false);
    let payload = result.map_err(|err| {
        log::error!("Register error: {}", err);
        err
    })?;
    let user = payload.user.clone();
    set_auth(set_auth_state, payload.user, payload.access_token);
    Ok(user)
}

/// Ends the session remotely. Local auth is cleared whatever the server says.
pub async fn logout(
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    let result = api.logout().await;
    if let Err(err) = &result {
        log::error!("Logout error: {}", err);
    }
    clear_auth(set_auth_state);
    result
}

pub async fn fetch_user(
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<User, ApiError> {
    match api.get_user().await {
        Ok(user) => {
            persist_user(&user);
            set_auth_state.update(|state| state.user = Some(user.clone()));
            Ok(user)
        }
        Err(err) => {
            clear_auth(set_auth_state);
            Err(err)
        }
    }
}

pub async fn send_email_verification_token(api: &ApiClient) -> Result<MessageResponse, ApiError> {
    api.send_email_verification_token().await
}

/// Marks the current user verified. Only `email_verified_at` changes when a
/// user is already loaded; otherwise the returned user replaces it.
pub async fn verify_email_token(
    api: &ApiClient,
    token: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<User, ApiError> {
    let verified = api.verify_email_token(&token).await.map_err(|err| {
        log::error!("Email verification error: {}", err);
        err
    })?;
    let mut updated = None;
    set_auth_state.update(|state| {
        let user = match (state.user.take(), verified.email_verified_at) {
            (Some(mut current), Some(at)) => {
                current.email_verified_at = Some(at);
                current
            }
            _ => verified.clone(),
        };
        updated = Some(user.clone());
        state.user = Some(user);
    });
    let user = updated.unwrap_or(verified);
    persist_user(&user);
    Ok(user)
}

pub async fn change_password(
    api: &ApiClient,
    request: ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    api.change_password(&request).await
}

fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(ApiClient::new)
}

pub fn use_login_action() -> Action<LoginRequest, Result<User, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let api = api.clone();
        async move {
            let result = login(&api, payload, set_auth).await;
            match &result {
                Ok(_) => toasts.success(&label("messages.success.login", &[])),
                Err(err) => toasts.error(&err.error),
            };
            result
        }
    })
}

pub fn use_register_action() -> Action<RegisterRequest, Result<User, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |request: &RegisterRequest| {
        let payload = request.clone();
        let api = api.clone();
        async move {
            let result = register(&api, payload, set_auth).await;
            match &result {
                Ok(_) => toasts.success(&label("messages.success.register", &[])),
                Err(err) => toasts.error(&err.error),
            };
            result
        }
    })
}

pub fn use_logout_action() -> Action<(), Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |_: &()| {
        let api = api.clone();
        async move {
            let result = logout(&api, set_auth).await;
            toasts.success(&label("messages.success.logout", &[]));
            result
        }
    })
}

pub fn use_send_verification_action() -> Action<(), Result<MessageResponse, ApiError>> {
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |_: &()| {
        let api = api.clone();
        async move {
            let result = send_email_verification_token(&api).await;
            match &result {
                Ok(_) => toasts.success(&label("messages.success.verificationSent", &[])),
                Err(err) => toasts.error(&err.error),
            };
            result
        }
    })
}

pub fn use_verify_email_action() -> Action<String, Result<User, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |token: &String| {
        let token = token.clone();
        let api = api.clone();
        async move {
            let result = verify_email_token(&api, token, set_auth).await;
            match &result {
                Ok(_) => toasts.success(&label("messages.success.emailVerified", &[])),
                Err(err) => toasts.error(&err.error),
            };
            result
        }
    })
}

pub fn use_change_password_action() -> Action<ChangePasswordRequest, Result<MessageResponse, ApiError>>
{
    let api = use_api();
    let toasts = use_toasts();

    create_action(move |request: &ChangePasswordRequest| {
        let payload = request.clone();
        let api = api.clone();
        async move {
            let result = change_password(&api, payload).await;
            match &result {
                Ok(_) => toasts.success(&label("messages.success.passwordChanged", &[])),
                Err(err) => toasts.error(&err.error),
            };
            result
        }
    })
}
