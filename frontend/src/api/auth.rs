use serde_json::json;

use super::{
    client::ApiClient,
    types::{
        ApiError, AuthPayload, ChangePasswordRequest, Envelope, LoginRequest, MessageResponse,
        RegisterRequest, ResetPasswordRequest, User, UserResponse,
        VerifyResetTokenRequest,
    },
};

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ApiError> {
        self.post_json::<_, Envelope<AuthPayload>>("/register", Some(request))
            .await?
            .into_data()
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.post_json::<_, Envelope<AuthPayload>>("/login", Some(request))
            .await?
            .into_data()
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.post_json("/forgot-password/email/token", Some(&json!({ "email": email })))
            .await
    }

    pub async fn verify_password_reset_token(
        &self,
        request: &VerifyResetTokenRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json("/forgot-password/verify/token", Some(request))
            .await
    }

    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json("/forgot-password/reset-password", Some(request))
            .await
    }

    pub async fn send_email_verification_token(&self) -> Result<MessageResponse, ApiError> {
        self.post_json::<(), _>("/email/send-token", None).await
    }

    pub async fn verify_email_token(&self, token: &str) -> Result<User, ApiError> {
        let response: UserResponse = self
            .post_json("/email/verify-token", Some(&json!({ "token": token })))
            .await?;
        response.into_user()
    }

    pub async fn get_user(&self) -> Result<User, ApiError> {
        self.get_json::<UserResponse>("/user", &[])
            .await?
            .into_user()
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_json::<(), MessageResponse>("/logout", None)
            .await
            .map(|_| ())
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.post_json("/change-password", Some(request)).await
    }
}
