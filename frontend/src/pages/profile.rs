use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiError, ChangePasswordRequest, User},
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::Layout,
    },
    labels::label,
    pages::validation,
    router::EMAIL_VERIFICATION_PATH,
    state::{
        auth::{self, use_auth},
        transactions::{use_transactions, DEFAULT_BALANCE},
    },
};

/// The profile balance wins; the wallet store covers users loaded before
/// the backend started returning it.
pub fn display_balance(user: Option<&User>, wallet_balance: &str) -> String {
    user.and_then(|u| u.balance.clone())
        .filter(|b| !b.is_empty())
        .or_else(|| Some(wallet_balance.to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| DEFAULT_BALANCE.to_string())
}

pub fn validate(request: &ChangePasswordRequest) -> Result<(), String> {
    validation::required(&request.current_password)?;
    validation::password(&request.new_password)?;
    validation::password_match(&request.new_password, &request.new_password_confirmation)
}

#[component]
fn ChangePasswordForm() -> impl IntoView {
    let t = |key: &str| label(&format!("profile.{}", key), &[]);
    let current = create_rw_signal(String::new());
    let new_password = create_rw_signal(String::new());
    let confirmation = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);

    let change_action = auth::use_change_password_action();
    let pending = change_action.pending();
    create_effect(move |_| {
        if let Some(result) = change_action.value().get() {
            match result {
                Ok(_) => {
                    error.set(None);
                    current.set(String::new());
                    new_password.set(String::new());
                    confirmation.set(String::new());
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
        let request = ChangePasswordRequest {
            current_password: current.get_untracked(),
            new_password: new_password.get_untracked(),
            new_password_confirmation: confirmation.get_untracked(),
        };
        if let Err(msg) = validate(&request) {
            error.set(Some(ApiError::validation(msg)));
            return;
        }
        error.set(None);
        change_action.dispatch(request);
    };

    view! {
        <div class="bg-surface-elevated shadow rounded-lg p-6">
            <h2 class="text-lg font-medium text-fg mb-4">{t("changePassword")}</h2>
            <form class="space-y-4" on:submit=on_submit>
                <TextField id="current_password" label=t("currentPassword") value=current
                    input_type="password" autocomplete="current-password"
                    placeholder=t("currentPasswordPlaceholder") />
                <TextField id="new_password" label=t("newPassword") value=new_password
                    input_type="password" autocomplete="new-password"
                    placeholder=t("newPasswordPlaceholder") />
                <TextField id="new_password_confirmation" label=t("confirmPassword") value=confirmation
                    input_type="password" autocomplete="new-password"
                    placeholder=t("confirmPasswordPlaceholder") />
                <InlineErrorMessage error=error />
                <SubmitButton label=t("updatePassword") pending_label=t("updating") pending=pending />
            </form>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let t = |key: &str| label(&format!("profile.{}", key), &[]);
    let (auth, _) = use_auth();
    let (transactions, _) = use_transactions();

    let verified = move || auth.with(|s| s.is_email_verified());
    let name = move || auth.with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());
    let email = move || auth.with(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let balance = move || {
        let wallet = transactions.with(|s| s.balance.clone());
        auth.with(|s| display_balance(s.user.as_ref(), &wallet))
    };

    view! {
        <Layout>
            <div class="max-w-2xl mx-auto px-4 py-6 sm:px-0 space-y-6">
                <div class="bg-surface-elevated shadow rounded-lg p-6 space-y-4">
                    <h1 class="text-2xl font-bold text-fg">{t("title")}</h1>
                    <dl class="space-y-3">
                        <div>
                            <dt class="text-sm text-fg-muted">{t("name")}</dt>
                            <dd class="text-fg">{name}</dd>
                        </div>
                        <div>
                            <dt class="text-sm text-fg-muted">{t("email")}</dt>
                            <dd class="text-fg">{email}</dd>
                        </div>
                        <div>
                            <dt class="text-sm text-fg-muted">{t("emailVerificationStatus")}</dt>
                            <dd>
                                {move || if verified() {
                                    view! { <span class="text-status-success-text">{t("emailVerified")}</span> }
                                } else {
                                    view! { <span class="text-status-warning-text">{t("emailNotVerified")}</span> }
                                }}
                            </dd>
                        </div>
                        <div>
                            <dt class="text-sm text-fg-muted">{t("accountBalance")}</dt>
                            <dd class="text-fg font-semibold">{move || format!("${}", balance())}</dd>
                        </div>
                    </dl>
                </div>
                <Show
                    when=verified
                    fallback=move || view! {
                        <div class="rounded-md bg-status-warning-bg p-4 space-y-2">
                            <p class="text-sm text-status-warning-text">{t("emailNotVerifiedWarning")}</p>
                            <a href=EMAIL_VERIFICATION_PATH class="text-sm font-medium text-action-primary-bg">
                                {t("verifyEmail")}
                            </a>
                        </div>
                    }
                >
                    <ChangePasswordForm />
                </Show>
            </div>
        </Layout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::verified_user;

    #[test]
    fn balance_prefers_the_profile() {
        let mut user = verified_user();
        assert_eq!(display_balance(Some(&user), "90.00"), "150.00");
        user.balance = None;
        assert_eq!(display_balance(Some(&user), "90.00"), "90.00");
        assert_eq!(display_balance(None, ""), "0.00");
    }

    #[test]
    fn change_password_checks_fields() {
        let mut request = ChangePasswordRequest {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            new_password_confirmation: "new-secret".into(),
        };
        assert!(validate(&request).is_ok());
        request.new_password_confirmation = "different".into();
        assert_eq!(validate(&request).unwrap_err(), "Passwords do not match");
        request.current_password = String::new();
        assert_eq!(validate(&request).unwrap_err(), "This field is required");
    }
}
