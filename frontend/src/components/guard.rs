use crate::{
    router::{route_meta, GuardDecision, GuardSession, RedirectTracker, LOGIN_PATH},
    state::auth::use_auth,
};
use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};

/// Navigation history the guard needs across route changes.
#[derive(Clone, Copy)]
pub struct GuardState {
    tracker: StoredValue<RedirectTracker>,
    last_path: StoredValue<Option<String>>,
}

impl GuardState {
    pub fn new() -> Self {
        Self {
            tracker: store_value(RedirectTracker::default()),
            last_path: store_value(None),
        }
    }

    /// Decides a navigation to `to`, remembering it when it is allowed.
    pub fn decide(&self, to: &str, session: &GuardSession) -> GuardDecision {
        let from = self.last_path.get_value().unwrap_or_default();
        let decision = self
            .tracker
            .try_update_value(|tracker| tracker.decide(&from, to, session))
            .unwrap_or(GuardDecision::Proceed);
        if decision == GuardDecision::Proceed {
            self.last_path.set_value(Some(to.to_string()));
        }
        decision
    }
}

impl Default for GuardState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_route_guard() -> GuardState {
    let state = GuardState::new();
    provide_context(state);
    state
}

/// Renders `children` once the current route's requirements are met and
/// redirects otherwise. Also leaves a protected page when the session ends.
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let (auth, _) = use_auth();
    let location = use_location();
    let guard = use_context::<GuardState>().unwrap_or_default();

    let path = location.pathname.get_untracked();
    let decision = guard.decide(&path, &GuardSession::from_state(&auth.get_untracked()));
    let requires_auth = route_meta(&path).map(|m| m.requires_auth).unwrap_or(false);
    let session_lost = create_memo(move |_| {
        requires_auth && !auth.with(|state| GuardSession::from_state(state).is_authenticated)
    });

    let navigate = use_navigate();
    create_effect(move |_| {
        let target = match decision {
            GuardDecision::Redirect(target) => target,
            GuardDecision::Proceed if session_lost.get() => LOGIN_PATH,
            GuardDecision::Proceed => return,
        };
        navigate(
            target,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    });

    view! {
        <Show when=move || should_render_children(decision, session_lost.get()) fallback=|| ()>
            {children()}
        </Show>
    }
}

fn should_render_children(decision: GuardDecision, session_lost: bool) -> bool {
    decision == GuardDecision::Proceed && !session_lost
}
