use chrono::{DateTime, Utc};
use leptos::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Monetary amounts arrive as strings or plain JSON numbers.
fn decimal_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected decimal, got {}",
            other
        ))),
    }
}

fn optional_decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = decimal_string(deserializer)?;
    Ok((!raw.is_empty()).then_some(raw))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "optional_decimal_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<String>,
}

/// `{ success, message, data }` wrapper used by most endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::unknown("Response did not include data"))
    }
}

/// Server reply without a payload worth keeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: User,
}

/// `GET /user` answers with `data.user` or a bare `user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub data: Option<UserPayload>,
    #[serde(default)]
    pub user: Option<User>,
}

impl UserResponse {
    pub fn into_user(self) -> Result<User, ApiError> {
        self.data
            .map(|payload| payload.user)
            .or(self.user)
            .ok_or_else(|| ApiError::unknown("Response did not include a user"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetTokenRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<i64>,
    pub sender_id: i64,
    pub receiver_id: i64,
    #[serde(deserialize_with = "decimal_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "decimal_string")]
    pub commission_fee: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsPage {
    #[serde(default)]
    pub data: Vec<Transaction>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsData {
    #[serde(default, deserialize_with = "optional_decimal_string")]
    pub balance: Option<String>,
    #[serde(default)]
    pub transactions: TransactionsPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub receiver_id: i64,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

/// Signature returned by the broadcasting auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAuth {
    pub auth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl IntoView for ApiError {
    fn into_view(self) -> View {
        self.error.into_view()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "VALIDATION_ERROR".to_string(),
            details: None,
        }
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
            details: None,
        }
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
            details: None,
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNAUTHORIZED".to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == "UNAUTHORIZED"
    }
}
