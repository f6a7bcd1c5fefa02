use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    api::types::ApiError,
    config,
    utils::{navigation, storage as storage_utils},
};

pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Clone, Default)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    pub(super) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(super) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    async fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.resolved_base_url().await.trim_end_matches('/'), path)
    }

    /// JSON headers plus the bearer token when a session is persisted.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = storage_utils::auth_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => log::error!("stored auth token is not a valid header value"),
            }
        }
        headers
    }

    fn handle_unauthorized_status(status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            storage_utils::clear_session();
            Self::redirect_to_login_if_needed();
        }
    }

    fn redirect_to_login_if_needed() {
        if navigation::should_redirect_to_login(&navigation::current_path()) {
            navigation::redirect("/login");
        }
    }

    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self
            .http_client()
            .get(self.endpoint(path).await)
            .headers(Self::default_headers());
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::send(request).await
    }

    pub(super) async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client()
            .post(self.endpoint(path).await)
            .headers(Self::default_headers());
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::send(request).await
    }

    pub(super) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut headers = Self::default_headers();
        headers.remove(CONTENT_TYPE);
        let request = self
            .http_client()
            .post(self.endpoint(path).await)
            .headers(headers)
            .form(form);
        Self::send(request).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;

        let status = response.status();
        Self::handle_unauthorized_status(status);
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            Err(error_from_response(status, &body))
        }
    }
}

/// Maps a failed response to an [`ApiError`], taking the message from the
/// body's `message` field.
pub fn error_from_response(status: StatusCode, body: &Value) -> ApiError {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_ERROR_MESSAGE);
    let code = match status {
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
        _ => "HTTP_ERROR",
    };
    ApiError {
        error: message.to_string(),
        code: code.to_string(),
        details: body.get("errors").cloned(),
    }
}
