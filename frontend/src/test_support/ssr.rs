//! Host-side rendering for component tests. Effects never run here, so
//! screens render their initial state.

use leptos::*;

use crate::{
    api::User,
    state::{auth::AuthState, toast::provide_toasts},
};

/// Runs `f` in a fresh reactive runtime that is disposed afterwards.
pub fn with_runtime<T>(f: impl FnOnce() -> T) -> T {
    let runtime = create_runtime();
    let output = f();
    runtime.dispose();
    output
}

/// Renders `view` to HTML with resource loading suppressed.
pub fn render_to_string<F, N>(view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    leptos_reactive::suppress_resource_load(true);
    let html = with_runtime(|| view().into_view().render_to_string().to_string());
    leptos_reactive::suppress_resource_load(false);
    html
}

/// Toast context plus an auth context holding `user` with a token.
pub fn provide_session(user: User) {
    provide_toasts();
    provide_context(create_signal(AuthState {
        user: Some(user),
        token: Some("token".into()),
        loading: false,
    }));
}

/// Renders a signed-in screen as `user`.
pub fn render_signed_in<F, N>(user: User, view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    render_to_string(move || {
        provide_session(user);
        view()
    })
}
