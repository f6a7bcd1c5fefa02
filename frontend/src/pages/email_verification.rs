use leptos::{ev::SubmitEvent, *};

use crate::{
    api::ApiError,
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::AuthCard,
    },
    labels::label,
    pages::validation,
    router::{HOME_PATH, LOGIN_PATH},
    state::auth,
    utils::navigation,
};

#[component]
pub fn EmailVerificationPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.emailVerification.{}", key), &[]);
    let code = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);

    let verify_action = auth::use_verify_email_action();
    let pending = verify_action.pending();
    let resend_action = auth::use_send_verification_action();
    let resending = resend_action.pending();
    let logout_action = auth::use_logout_action();

    create_effect(move |_| {
        if let Some(result) = verify_action.value().get() {
            match result {
                Ok(_) => navigation::redirect(HOME_PATH),
                Err(err) => error.set(Some(err)),
            }
        }
    });
    create_effect(move |_| {
        if logout_action.value().get().is_some() {
            navigation::redirect(LOGIN_PATH);
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match validation::otp(&code.get_untracked()) {
            Ok(token) => {
                error.set(None);
                verify_action.dispatch(token);
            }
            Err(msg) => error.set(Some(ApiError::validation(msg))),
        }
    };

    view! {
        <AuthCard title=t("title") subtitle=t("subtitle")>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField id="verification_code" label=t("otp") value=code autocomplete="one-time-code" />
                <InlineErrorMessage error=error />
                <SubmitButton label=t("verify") pending_label=t("verifying") pending=pending />
            </form>
            <p class="text-sm text-center text-fg-muted">{t("backToLogin")}</p>
            <div class="flex justify-between text-sm">
                <button
                    type="button"
                    class="font-medium text-action-primary-bg disabled:opacity-50"
                    disabled=move || resending.get()
                    on:click=move |_| resend_action.dispatch(())
                >
                    {move || if resending.get() { t("resending") } else { t("resend") }}
                </button>
                <button
                    type="button"
                    class="font-medium text-fg-muted"
                    on:click=move |_| logout_action.dispatch(())
                >
                    {label("navigation.logout", &[])}
                </button>
            </div>
        </AuthCard>
    }
}
