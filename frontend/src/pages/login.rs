use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiError, LoginRequest},
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::AuthCard,
    },
    labels::label,
    pages::validation,
    router::HOME_PATH,
    state::auth,
    utils::navigation,
};

#[component]
pub fn LoginPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.login.{}", key), &[]);
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);

    let login_action = auth::use_login_action();
    let pending = login_action.pending();

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(_) => {
                    error.set(None);
                    navigation::redirect(HOME_PATH);
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let address = email.get_untracked().trim().to_string();
        let secret = password.get_untracked();
        if let Err(msg) = validation::email(&address).and_then(|_| validation::required(&secret)) {
            error.set(Some(ApiError::validation(msg)));
            return;
        }
        error.set(None);
        login_action.dispatch(LoginRequest {
            email: address,
            password: secret,
        });
    };

    view! {
        <AuthCard title=t("title")>
            <p class="text-center text-sm text-fg-muted">
                {t("subtitle")}" "
                <a href="/register" class="font-medium text-action-primary-bg">{t("createAccount")}</a>
            </p>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField
                    id="email"
                    label=t("email")
                    value=email
                    input_type="email"
                    autocomplete="email"
                    placeholder=t("emailPlaceholder")
                />
                <TextField
                    id="password"
                    label=t("password")
                    value=password
                    input_type="password"
                    autocomplete="current-password"
                    placeholder=t("passwordPlaceholder")
                />
                <div class="text-sm text-right">
                    <a href="/forgot-password" class="font-medium text-action-primary-bg">
                        {t("forgotPassword")}
                    </a>
                </div>
                <InlineErrorMessage error=error />
                <SubmitButton
                    label=t("signIn")
                    pending_label=t("signingIn")
                    pending=pending
                />
            </form>
        </AuthCard>
    }
}
