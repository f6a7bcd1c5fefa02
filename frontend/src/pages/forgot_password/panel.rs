use leptos::{ev::SubmitEvent, *};

use super::flow::{self, ResetFlow};
use crate::{
    api::{ApiClient, ApiError, MessageResponse},
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::AuthCard,
    },
    labels::label,
    pages::validation,
    router::LOGIN_PATH,
    state::toast::use_toasts,
    utils::navigation,
};

const FORGOT_PASSWORD_PATH: &str = "/forgot-password";
const VERIFY_OTP_PATH: &str = "/forgot-password/verify-otp";
const RESET_PASSWORD_PATH: &str = "/forgot-password/reset-password";

fn use_reset_flow() -> ResetFlow {
    ResetFlow::new(use_context::<ApiClient>().unwrap_or_else(ApiClient::new))
}

/// Sends the user back to the first step when an earlier step is missing.
fn require_progress(ready: bool) {
    create_effect(move |_| {
        if !ready {
            navigation::redirect(FORGOT_PASSWORD_PATH);
        }
    });
}

/// Toasts success, then moves on to `next`; failures land in `error`.
fn on_step_result(
    action: Action<String, Result<MessageResponse, ApiError>>,
    error: RwSignal<Option<ApiError>>,
    success_key: &'static str,
    next: &'static str,
) {
    let toasts = use_toasts();
    create_effect(move |_| {
        if let Some(result) = action.value().get() {
            match result {
                Ok(_) => {
                    error.set(None);
                    toasts.success(&label(success_key, &[]));
                    navigation::redirect(next);
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });
}

fn back_to_login(text: String) -> impl IntoView {
    view! {
        <div class="text-sm text-center">
            <a href=LOGIN_PATH class="font-medium text-action-primary-bg">{text}</a>
        </div>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.forgotPassword.{}", key), &[]);
    let reset_flow = use_reset_flow();
    let email = create_rw_signal(flow::pending_email().unwrap_or_default());
    let error = create_rw_signal(None::<ApiError>);

    let request_action = create_action(move |address: &String| {
        let reset_flow = reset_flow.clone();
        let address = address.clone();
        async move { reset_flow.request_otp(address).await }
    });
    let pending = request_action.pending();
    on_step_result(request_action, error, "messages.success.otpSent", VERIFY_OTP_PATH);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let address = email.get_untracked().trim().to_string();
        if let Err(msg) = validation::email(&address) {
            error.set(Some(ApiError::validation(msg)));
            return;
        }
        request_action.dispatch(address);
    };

    view! {
        <AuthCard title=t("title") subtitle=t("subtitle")>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField id="email" label=t("email") value=email input_type="email"
                    autocomplete="email" placeholder=t("emailPlaceholder") />
                <InlineErrorMessage error=error />
                <SubmitButton label=t("sendOtp") pending_label=t("sending") pending=pending />
            </form>
            {back_to_login(t("backToLogin"))}
        </AuthCard>
    }
}

#[component]
pub fn VerifyOtpPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.forgotPasswordVerifyOtp.{}", key), &[]);
    let reset_flow = use_reset_flow();
    let otp = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);
    let toasts = use_toasts();
    require_progress(flow::pending_email().is_some());

    let verify_action = {
        let reset_flow = reset_flow.clone();
        create_action(move |code: &String| {
            let reset_flow = reset_flow.clone();
            let code = code.clone();
            async move { reset_flow.verify_otp(code).await }
        })
    };
    let pending = verify_action.pending();
    on_step_result(verify_action, error, "messages.success.otpVerified", RESET_PASSWORD_PATH);

    let resend_action = create_action(move |_: &()| {
        let reset_flow = reset_flow.clone();
        async move {
            match flow::pending_email() {
                Some(address) => reset_flow.request_otp(address).await,
                None => Err(ApiError::validation(label("messages.validation.email", &[]))),
            }
        }
    });
    let resending = resend_action.pending();
    create_effect(move |_| match resend_action.value().get() {
        Some(Ok(_)) => {
            toasts.success(&label("messages.success.otpSent", &[]));
        }
        Some(Err(err)) => error.set(Some(err)),
        None => {}
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match validation::otp(&otp.get_untracked()) {
            Ok(code) => verify_action.dispatch(code),
            Err(msg) => error.set(Some(ApiError::validation(msg))),
        }
    };

    view! {
        <AuthCard title=t("title") subtitle=t("subtitle")>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField id="otp" label=t("otp") value=otp autocomplete="one-time-code" />
                <InlineErrorMessage error=error />
                <SubmitButton label=t("verify") pending_label=t("verifying") pending=pending />
            </form>
            <div class="text-sm text-center">
                <button
                    type="button"
                    class="font-medium text-action-primary-bg disabled:opacity-50"
                    disabled=move || resending.get()
                    on:click=move |_| resend_action.dispatch(())
                >
                    {move || if resending.get() { t("resending") } else { t("resend") }}
                </button>
            </div>
            {back_to_login(t("backToLogin"))}
        </AuthCard>
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.forgotPasswordReset.{}", key), &[]);
    let reset_flow = use_reset_flow();
    let password = create_rw_signal(String::new());
    let confirmation = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);
    require_progress(flow::pending_email().is_some() && flow::pending_token().is_some());

    let reset_action = create_action(move |(new_password, confirm): &(String, String)| {
        let reset_flow = reset_flow.clone();
        let (new_password, confirm) = (new_password.clone(), confirm.clone());
        async move { reset_flow.reset_password(new_password, confirm).await }
    });
    let pending = reset_action.pending();
    let toasts = use_toasts();
    create_effect(move |_| {
        if let Some(result) = reset_action.value().get() {
            match result {
                Ok(_) => {
                    toasts.success(&label("messages.success.passwordReset", &[]));
                    navigation::redirect(LOGIN_PATH);
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
        let (new_password, confirm) = (password.get_untracked(), confirmation.get_untracked());
        if let Err(msg) = validation::password(&new_password)
            .and_then(|_| validation::password_match(&new_password, &confirm))
        {
            error.set(Some(ApiError::validation(msg)));
            return;
        }
        reset_action.dispatch((new_password, confirm));
    };

    view! {
        <AuthCard title=t("title") subtitle=t("subtitle")>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField id="password" label=t("newPassword") value=password
                    input_type="password" autocomplete="new-password"
                    placeholder=t("newPasswordPlaceholder") />
                <TextField id="password_confirmation" label=t("confirmPassword")
                    value=confirmation input_type="password" autocomplete="new-password"
                    placeholder=t("confirmPasswordPlaceholder") />
                <InlineErrorMessage error=error />
                <SubmitButton label=t("resetPassword") pending_label=t("resetting") pending=pending />
            </form>
            {back_to_login(t("backToLogin"))}
        </AuthCard>
    }
}
