use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;

use crate::{
    activity::hook::ActivityTracker,
    api::ApiClient,
    components::{
        guard::{provide_route_guard, RouteGuard},
        toast::ToastHost,
    },
    labels::label,
    notifications::hook::WalletNotifications,
    pages::{
        CreateTransactionPage, DashboardPage, EmailVerificationPage, ForgotPasswordPage, LoginPage,
        ProfilePage, RegisterPage, ResetPasswordPage, TransactionsPage, VerifyOtpPage,
    },
    state::{
        auth::{AuthProvider, AuthState},
        toast::provide_toasts,
        transactions::provide_transactions,
    },
};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const EMAIL_VERIFICATION_PATH: &str = "/email-verification";

/// Consecutive guard redirects tolerated before navigation is let through.
pub const MAX_REDIRECT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_verified_email: bool,
}

const fn guest(path: &'static str, name: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        name,
        requires_auth: false,
        requires_guest: true,
        requires_verified_email: false,
    }
}

const fn verified(path: &'static str, name: &'static str) -> RouteMeta {
    RouteMeta {
        path,
        name,
        requires_auth: true,
        requires_guest: false,
        requires_verified_email: true,
    }
}

pub const ROUTES: &[RouteMeta] = &[
    verified("/", "dashboard"),
    guest("/login", "login"),
    guest("/register", "register"),
    guest("/forgot-password", "forgot-password"),
    guest("/forgot-password/verify-otp", "forgot-password-verify-otp"),
    guest("/forgot-password/reset-password", "forgot-password-reset"),
    RouteMeta {
        path: "/email-verification",
        name: "email-verification",
        requires_auth: true,
        requires_guest: false,
        requires_verified_email: false,
    },
    verified("/profile", "profile"),
    verified("/transactions", "transactions"),
    verified("/transactions/create", "create-transaction"),
];

pub fn route_meta(path: &str) -> Option<&'static RouteMeta> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    ROUTES.iter().find(|route| route.path == path)
}

/// What the guard knows about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSession {
    pub is_authenticated: bool,
    /// `None` when no user profile is known.
    pub email_verified: Option<bool>,
}

impl GuardSession {
    /// Falls back to session storage when the store has not caught up yet.
    pub fn from_state(state: &AuthState) -> Self {
        let stored = (state.user.is_none() || state.token.is_none()).then(AuthState::restore);
        let is_authenticated = state.is_authenticated()
            || stored.as_ref().map(AuthState::is_authenticated).unwrap_or(false);
        let user = state
            .user
            .as_ref()
            .or_else(|| stored.as_ref().and_then(|s| s.user.as_ref()));
        Self {
            is_authenticated,
            email_verified: user.map(|u| u.email_verified_at.is_some()),
        }
    }
}

/// Where `meta` sends this session, if anywhere.
pub fn required_redirect(meta: &RouteMeta, session: &GuardSession) -> Option<&'static str> {
    let target = if meta.requires_auth && !session.is_authenticated {
        LOGIN_PATH
    } else if meta.requires_guest && session.is_authenticated {
        HOME_PATH
    } else if meta.requires_verified_email && session.email_verified == Some(false) {
        EMAIL_VERIFICATION_PATH
    } else {
        return None;
    };
    (meta.path != target).then_some(target)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Counts consecutive guard redirects so a misconfigured session cannot
/// bounce between routes forever.
#[derive(Debug, Clone, Default)]
pub struct RedirectTracker {
    attempts: u32,
}

impl RedirectTracker {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn decide(&mut self, from: &str, to: &str, session: &GuardSession) -> GuardDecision {
        if from != to {
            self.attempts = 0;
        }
        if self.attempts >= MAX_REDIRECT_ATTEMPTS {
            self.attempts = 0;
            return GuardDecision::Proceed;
        }
        if from == to {
            return GuardDecision::Proceed;
        }
        match route_meta(to).and_then(|meta| required_redirect(meta, session)) {
            Some(target) => {
                self.attempts += 1;
                GuardDecision::Redirect(target)
            }
            None => {
                self.attempts = 0;
                GuardDecision::Proceed
            }
        }
    }
}

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_context(ApiClient::new());
    provide_toasts();
    provide_transactions();
    provide_route_guard();
    provide_meta_context();
    view! {
        <Title text=label("app.title", &[])/>
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/" view=GuardedDashboard/>
                    <Route path="/login" view=GuardedLogin/>
                    <Route path="/register" view=GuardedRegister/>
                    <Route path="/forgot-password" view=GuardedForgotPassword/>
                    <Route path="/forgot-password/verify-otp" view=GuardedVerifyOtp/>
                    <Route path="/forgot-password/reset-password" view=GuardedResetPassword/>
                    <Route path="/email-verification" view=GuardedEmailVerification/>
                    <Route path="/profile" view=GuardedProfile/>
                    <Route path="/transactions" view=GuardedTransactions/>
                    <Route path="/transactions/create" view=GuardedCreateTransaction/>
                </Routes>
                <ActivityTracker/>
                <WalletNotifications/>
            </Router>
            <ToastHost/>
        </AuthProvider>
    }
}

#[component]
fn GuardedDashboard() -> impl IntoView {
    view! { <RouteGuard><DashboardPage/></RouteGuard> }
}

#[component]
fn GuardedLogin() -> impl IntoView {
    view! { <RouteGuard><LoginPage/></RouteGuard> }
}

#[component]
fn GuardedRegister() -> impl IntoView {
    view! { <RouteGuard><RegisterPage/></RouteGuard> }
}

#[component]
fn GuardedForgotPassword() -> impl IntoView {
    view! { <RouteGuard><ForgotPasswordPage/></RouteGuard> }
}

#[component]
fn GuardedVerifyOtp() -> impl IntoView {
    view! { <RouteGuard><VerifyOtpPage/></RouteGuard> }
}

#[component]
fn GuardedResetPassword() -> impl IntoView {
    view! { <RouteGuard><ResetPasswordPage/></RouteGuard> }
}

#[component]
fn GuardedEmailVerification() -> impl IntoView {
    view! { <RouteGuard><EmailVerificationPage/></RouteGuard> }
}

#[component]
fn GuardedProfile() -> impl IntoView {
    view! { <RouteGuard><ProfilePage/></RouteGuard> }
}

#[component]
fn GuardedTransactions() -> impl IntoView {
    view! { <RouteGuard><TransactionsPage/></RouteGuard> }
}

#[component]
fn GuardedCreateTransaction() -> impl IntoView {
    view! { <RouteGuard><CreateTransactionPage/></RouteGuard> }
}
