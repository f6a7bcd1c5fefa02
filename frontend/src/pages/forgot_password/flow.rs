use crate::{
    api::{ApiClient, ApiError, MessageResponse, ResetPasswordRequest, VerifyResetTokenRequest},
    utils::storage as storage_utils,
};

pub const RESET_EMAIL_KEY: &str = "password_reset_email";
pub const RESET_TOKEN_KEY: &str = "password_reset_token";

fn read(key: &str) -> Option<String> {
    storage_utils::get_item(key)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

fn write(key: &str, value: &str) {
    if let Err(err) = storage_utils::set_item(key, value) {
        log::error!("Error saving password reset progress: {}", err);
    }
}

pub fn pending_email() -> Option<String> {
    read(RESET_EMAIL_KEY)
}

pub fn pending_token() -> Option<String> {
    read(RESET_TOKEN_KEY)
}

pub fn clear() {
    for key in [RESET_EMAIL_KEY, RESET_TOKEN_KEY] {
        if let Err(err) = storage_utils::remove_item(key) {
            log::warn!("{}", err);
        }
    }
}

#[derive(Clone)]
pub struct ResetFlow {
    api: ApiClient,
}

impl ResetFlow {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn request_otp(&self, email: String) -> Result<MessageResponse, ApiError> {
        let response = self.api.request_password_reset(&email).await?;
        write(RESET_EMAIL_KEY, &email);
        if let Err(err) = storage_utils::remove_item(RESET_TOKEN_KEY) {
            log::warn!("{}", err);
        }
        Ok(response)
    }

    pub async fn verify_otp(&self, token: String) -> Result<MessageResponse, ApiError> {
        let email = pending_email().ok_or_else(|| ApiError::validation("Email is required"))?;
        let response = self
            .api
            .verify_password_reset_token(&VerifyResetTokenRequest {
                email,
                token: token.clone(),
            })
            .await?;
        write(RESET_TOKEN_KEY, &token);
        Ok(response)
    }

    pub async fn reset_password(
        &self,
        password: String,
        password_confirmation: String,
    ) -> Result<MessageResponse, ApiError> {
        let (Some(email), Some(token)) = (pending_email(), pending_token()) else {
            return Err(ApiError::validation("OTP has expired. Please request a new one."));
        };
        let response = self
            .api
            .reset_password(&ResetPasswordRequest {
                email,
                token,
                password,
                password_confirmation,
            })
            .await?;
        clear();
        Ok(response)
    }
}
