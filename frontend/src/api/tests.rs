#![cfg(not(coverage))]

use super::*;
use crate::utils::storage as storage_utils;
use httpmock::prelude::*;
use serde_json::json;

fn user_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Alice Example",
        "email": "alice@example.com",
        "email_verified_at": "2025-01-01T08:00:00.000000Z",
        "balance": "150.00"
    })
}

fn transaction_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "sender_id": 1,
        "receiver_id": 2,
        "amount": "25.00",
        "commission_fee": 0.38,
        "sender_name": "Alice Example",
        "receiver_name": "Bob Example",
        "created_at": "2025-01-02T10:00:00.000000Z"
    })
}

fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new_with_base_url(server.url("/api/v1"))
}

#[tokio::test]
async fn login_and_register_unwrap_the_envelope() {
    let server = MockServer::start_async().await;
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/login")
            .header("accept", "application/json")
            .json_body(json!({ "email": "alice@example.com", "password": "secret" }));
        then.status(200).json_body(json!({
            "success": true,
            "message": "Logged in",
            "data": { "user": user_json(1), "access_token": "tok-1" }
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/register");
        then.status(201).json_body(json!({
            "success": true,
            "data": { "user": user_json(2), "access_token": "tok-2" }
        }));
    });

    let client = api_client(&server);
    let payload = client
        .login(&LoginRequest {
            email: "alice@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    login.assert();
    assert_eq!(payload.access_token, "tok-1");
    assert_eq!(payload.user.balance.as_deref(), Some("150.00"));

    let registered = client
        .register(&RegisterRequest {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "secret123".into(),
            password_confirmation: "secret123".into(),
        })
        .await
        .unwrap();
    assert_eq!(registered.user.id, 2);
}

#[tokio::test]
async fn authenticated_requests_carry_the_session_token() {
    let server = MockServer::start_async().await;
    storage_utils::set_item(storage_utils::AUTH_TOKEN_KEY, "tok-abc").unwrap();
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/user")
            .header("authorization", "Bearer tok-abc");
        then.status(200)
            .json_body(json!({ "data": { "user": user_json(1) } }));
    });

    let user = api_client(&server).get_user().await.unwrap();
    me.assert();
    assert_eq!(user.email, "alice@example.com");
    storage_utils::clear_session();
}

#[tokio::test]
async fn password_and_email_endpoints_succeed() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/forgot-password/email/token")
            .json_body(json!({ "email": "alice@example.com" }));
        then.status(200).json_body(json!({ "success": true, "message": "sent" }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/forgot-password/verify/token");
        then.status(200).json_body(json!({ "success": true, "message": "valid" }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/forgot-password/reset-password");
        then.status(200).json_body(json!({ "success": true, "message": "reset" }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/email/send-token");
        then.status(200).json_body(json!({ "success": true }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/email/verify-token")
            .json_body(json!({ "token": "123456" }));
        then.status(200).json_body(json!({ "user": user_json(1) }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/change-password");
        then.status(200).json_body(json!({ "success": true, "message": "changed" }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/logout");
        then.status(200).json_body(json!({ "success": true }));
    });

    let client = api_client(&server);
    let sent = client
        .request_password_reset("alice@example.com")
        .await
        .unwrap();
    assert_eq!(sent.message.as_deref(), Some("sent"));
    client
        .verify_password_reset_token(&VerifyResetTokenRequest {
            email: "alice@example.com".into(),
            token: "123456".into(),
        })
        .await
        .unwrap();
    let reset = client
        .reset_password(&ResetPasswordRequest {
            email: "alice@example.com".into(),
            token: "123456".into(),
            password: "newsecret".into(),
            password_confirmation: "newsecret".into(),
        })
        .await
        .unwrap();
    assert_eq!(reset.message.as_deref(), Some("reset"));
    client.send_email_verification_token().await.unwrap();
    let verified = client.verify_email_token("123456").await.unwrap();
    assert!(verified.email_verified_at.is_some());
    client
        .change_password(&ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "newsecret".into(),
            new_password_confirmation: "newsecret".into(),
        })
        .await
        .unwrap();
    client.logout().await.unwrap();
}

#[tokio::test]
async fn transactions_are_listed_with_paging_params() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/transactions")
            .query_param("page", "2")
            .query_param("per_page", "5");
        then.status(200).json_body(json!({
            "success": true,
            "data": {
                "balance": 120.5,
                "transactions": {
                    "data": [transaction_json(11), transaction_json(10)],
                    "current_page": 2,
                    "last_page": 3,
                    "per_page": 5,
                    "total": 12,
                    "from": 6,
                    "to": 10
                }
            }
        }));
    });

    let data = api_client(&server).get_transactions(2, 5).await.unwrap();
    list.assert();
    assert_eq!(data.balance.as_deref(), Some("120.5"));
    assert_eq!(data.transactions.data.len(), 2);
    assert_eq!(data.transactions.data[0].commission_fee, "0.38");
    assert_eq!(data.transactions.last_page, Some(3));
}

#[tokio::test]
async fn create_transaction_and_channel_auth() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/transactions")
            .json_body(json!({ "receiver_id": 2, "amount": "25.00" }));
        then.status(201).json_body(json!({
            "message": "Transfer completed",
            "transaction": transaction_json(12)
        }));
    });
    let auth = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/broadcasting/auth")
            .body_contains("socket_id=123.456")
            .body_contains("channel_name=private-user.1");
        then.status(200).json_body(json!({ "auth": "key:signature" }));
    });

    let client = api_client(&server);
    let created = client
        .create_transaction(&CreateTransactionRequest {
            receiver_id: 2,
            amount: "25.00".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.transaction.and_then(|t| t.id), Some(12));

    let signature = client
        .authorize_channel("123.456", "private-user.1")
        .await
        .unwrap();
    auth.assert();
    assert_eq!(signature.auth, "key:signature");
    assert!(signature.channel_data.is_none());
}

#[tokio::test]
async fn failures_use_the_server_message_or_a_fallback() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/transactions");
        then.status(422).json_body(json!({
            "message": "Insufficient balance",
            "errors": { "amount": ["Insufficient balance"] }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/transactions");
        then.status(500).body("oops");
    });

    let client = api_client(&server);
    let err = client
        .create_transaction(&CreateTransactionRequest {
            receiver_id: 2,
            amount: "1000000".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, "VALIDATION_ERROR");
    assert_eq!(err.error, "Insufficient balance");
    assert!(err.details.is_some());

    let err = client.get_transactions(1, 10).await.unwrap_err();
    assert_eq!(err.code, "HTTP_ERROR");
    assert_eq!(err.error, FALLBACK_ERROR_MESSAGE);
}

#[tokio::test]
async fn unauthorized_response_clears_the_persisted_session() {
    let server = MockServer::start_async().await;
    storage_utils::set_item(storage_utils::AUTH_TOKEN_KEY, "expired").unwrap();
    storage_utils::set_item(storage_utils::USER_KEY, "{}").unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/user");
        then.status(401).json_body(json!({ "message": "Unauthenticated." }));
    });

    let err = api_client(&server).get_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.error, "Unauthenticated.");
    assert!(storage_utils::auth_token().is_none());
    assert_eq!(
        storage_utils::get_item(storage_utils::USER_KEY).unwrap(),
        None
    );
}

#[tokio::test]
async fn unreachable_server_is_a_request_failure() {
    let client = ApiClient::new_with_base_url("http://127.0.0.1:9/api/v1");
    let err = client.logout().await.unwrap_err();
    assert_eq!(err.code, "REQUEST_FAILED");
}
