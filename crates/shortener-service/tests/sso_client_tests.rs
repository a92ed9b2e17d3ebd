//! Integration tests for the SSO client retry behavior.
//!
//! Runs the client against a real tonic stub server with scripted
//! responses so the retry loop is exercised over an actual transport.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use tonic::Code;

use shortener_service::services::{SsoClient, SsoError};
use shortener_test_utils::{ScriptedAuthService, ScriptedReply, StubSsoServer};

const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);

// ============================================================================
// Happy Path Tests
// ============================================================================

#[tokio::test]
async fn test_is_admin_true_on_first_attempt() {
    let server = StubSsoServer::spawn(ScriptedAuthService::always(true))
        .await
        .unwrap();

    let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
        .await
        .unwrap();

    let verdict = client.is_admin(42).await.unwrap();
    assert!(verdict);
    assert_eq!(server.call_count(), 1);
}

#[tokio::test]
async fn test_is_admin_false_is_an_answer_not_an_error() {
    let server = StubSsoServer::spawn(ScriptedAuthService::always(false))
        .await
        .unwrap();

    let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
        .await
        .unwrap();

    let verdict = client.is_admin(42).await.unwrap();
    assert!(!verdict);
    assert_eq!(server.call_count(), 1);
}

// ============================================================================
// Retry Tests
// ============================================================================

#[tokio::test]
async fn test_retries_transient_failures_then_succeeds() {
    // Two transient failures followed by success fits in a budget of 3.
    let service = ScriptedAuthService::new(vec![
        ScriptedReply::Fail(Code::DeadlineExceeded),
        ScriptedReply::Fail(Code::DeadlineExceeded),
        ScriptedReply::Admin(true),
    ]);
    let server = StubSsoServer::spawn(service).await.unwrap();

    let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
        .await
        .unwrap();

    let verdict = client.is_admin(42).await.unwrap();
    assert!(verdict);
    assert_eq!(server.call_count(), 3);
}

#[tokio::test]
async fn test_retries_each_retryable_code() {
    for code in [Code::NotFound, Code::Aborted, Code::DeadlineExceeded] {
        let service = ScriptedAuthService::new(vec![
            ScriptedReply::Fail(code),
            ScriptedReply::Admin(true),
        ]);
        let server = StubSsoServer::spawn(service).await.unwrap();

        let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
            .await
            .unwrap();

        let verdict = client.is_admin(42).await.unwrap();
        assert!(verdict, "code {code:?} should have been retried");
        assert_eq!(server.call_count(), 2, "code {code:?}");
    }
}

#[tokio::test]
async fn test_exhausted_retries_return_error() {
    let service = ScriptedAuthService::new(vec![ScriptedReply::Fail(Code::Aborted)]);
    let server = StubSsoServer::spawn(service).await.unwrap();

    let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
        .await
        .unwrap();

    let result = client.is_admin(42).await;
    assert!(matches!(result, Err(SsoError::Rpc(_))));
    assert_eq!(server.call_count(), 3);
}

#[tokio::test]
async fn test_non_retryable_code_fails_immediately() {
    let service = ScriptedAuthService::new(vec![ScriptedReply::Fail(Code::PermissionDenied)]);
    let server = StubSsoServer::spawn(service).await.unwrap();

    let client = SsoClient::connect(&server.url(), ATTEMPT_TIMEOUT, 3)
        .await
        .unwrap();

    let result = client.is_admin(42).await;
    assert!(matches!(result, Err(SsoError::Rpc(_))));
    assert_eq!(server.call_count(), 1);
}

// ============================================================================
// Deadline Tests
// ============================================================================

#[tokio::test]
async fn test_slow_server_hits_per_attempt_deadline_then_succeeds() {
    // The first attempt hangs past the per-attempt timeout; the elapsed
    // deadline counts as transient and the second attempt answers.
    let service = ScriptedAuthService::new(vec![ScriptedReply::Hang, ScriptedReply::Admin(true)]);
    let server = StubSsoServer::spawn(service).await.unwrap();

    let client = SsoClient::connect(&server.url(), Duration::from_millis(100), 3)
        .await
        .unwrap();

    let verdict = client.is_admin(42).await.unwrap();
    assert!(verdict);
    assert_eq!(server.call_count(), 2);
}

#[tokio::test]
async fn test_all_attempts_time_out() {
    let service = ScriptedAuthService::new(vec![ScriptedReply::Hang]);
    let server = StubSsoServer::spawn(service).await.unwrap();

    let client = SsoClient::connect(&server.url(), Duration::from_millis(100), 2)
        .await
        .unwrap();

    let result = client.is_admin(42).await;
    assert!(matches!(result, Err(SsoError::Rpc(_))));
    assert_eq!(server.call_count(), 2);
}
