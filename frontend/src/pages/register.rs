use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiError, RegisterRequest},
    components::{
        error::InlineErrorMessage,
        forms::{SubmitButton, TextField},
        layout::AuthCard,
    },
    labels::label,
    pages::validation,
    router::EMAIL_VERIFICATION_PATH,
    state::auth,
    utils::navigation,
};

pub fn validate(request: &RegisterRequest) -> Result<(), String> {
    validation::required(&request.name)?;
    validation::email(&request.email)?;
    validation::password(&request.password)?;
    validation::password_match(&request.password, &request.password_confirmation)
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let t = |key: &str| label(&format!("auth.register.{}", key), &[]);
    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirmation = create_rw_signal(String::new());
    let error = create_rw_signal(None::<ApiError>);

    let register_action = auth::use_register_action();
    let pending = register_action.pending();

    create_effect(move |_| {
        if let Some(result) = register_action.value().get() {
            match result {
                // New accounts start unverified.
                Ok(_) => navigation::redirect(EMAIL_VERIFICATION_PATH),
                Err(err) => error.set(Some(err)),
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let request = RegisterRequest {
            name: name.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            password_confirmation: confirmation.get_untracked(),
        };
        if let Err(msg) = validate(&request) {
            error.set(Some(ApiError::validation(msg)));
            return;
        }
        error.set(None);
        register_action.dispatch(request);
    };

    view! {
        <AuthCard title=t("title")>
            <p class="text-center text-sm text-fg-muted">
                {t("subtitle")}" "
                <a href="/login" class="font-medium text-action-primary-bg">{t("signIn")}</a>
            </p>
            <form class="mt-8 space-y-6" on:submit=on_submit>
                <TextField id="name" label=t("name") value=name autocomplete="name"
                    placeholder=t("namePlaceholder") />
                <TextField id="email" label=t("email") value=email input_type="email"
                    autocomplete="email" placeholder=t("emailPlaceholder") />
                <TextField id="password" label=t("password") value=password
                    input_type="password" autocomplete="new-password"
                    placeholder=t("passwordPlaceholder") />
                <TextField id="password_confirmation" label=t("confirmPassword")
                    value=confirmation input_type="password" autocomplete="new-password"
                    placeholder=t("confirmPasswordPlaceholder") />
                <InlineErrorMessage error=error />
                <SubmitButton
                    label=t("createAccount")
                    pending_label=t("creating")
                    pending=pending
                />
            </form>
        </AuthCard>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "password1".into(),
            password_confirmation: "password1".into(),
        }
    }

    #[test]
    fn validate_checks_every_field() {
        assert!(validate(&request()).is_ok());
        let missing_name = RegisterRequest {
            name: String::new(),
            ..request()
        };
        assert_eq!(validate(&missing_name).unwrap_err(), "This field is required");
        let mismatch = RegisterRequest {
            password_confirmation: "password2".into(),
            ..request()
        };
        assert_eq!(validate(&mismatch).unwrap_err(), "Passwords do not match");
    }
}
