//! SSO gRPC client.
//!
//! Wraps a single plaintext channel to the SSO service, established once at
//! startup and shared by every request. tonic channels are cheaply cloneable
//! and multiplex calls internally, so no locking is needed.
//!
//! # Security
//!
//! - The transport is plaintext; the deployment assumes a trusted network
//!   boundary between this service and SSO. Documented limitation, not a
//!   recommendation.
//!
//! # Retry policy
//!
//! Transient failures (`NotFound`, `Aborted`, `DeadlineExceeded`) are
//! retried up to the configured attempt count, each attempt bounded by the
//! configured timeout. Other status codes propagate immediately. One log
//! entry is emitted per attempt, never per logical call, so retries do not
//! duplicate logs.

use sso_proto::sso::v1::auth_client::AuthClient;
use sso_proto::sso::v1::IsAdminRequest;
use std::time::Duration;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, error, info, warn};

/// Default connect timeout for the SSO channel.
const SSO_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Status codes treated as transient and retried.
const RETRYABLE_CODES: [Code; 3] = [Code::NotFound, Code::Aborted, Code::DeadlineExceeded];

#[derive(Debug, Error)]
pub enum SsoError {
    #[error("invalid SSO endpoint: {0}")]
    Endpoint(String),

    #[error("failed to connect to SSO: {0}")]
    Connect(String),

    #[error("is_admin rpc failed: {0}")]
    Rpc(String),
}

/// Client operations the admin gate depends on (enables mocking).
#[async_trait::async_trait]
pub trait SsoClientApi: Send + Sync {
    /// Ask the SSO service whether `user_id` holds admin privilege.
    async fn is_admin(&self, user_id: i64) -> Result<bool, SsoError>;
}

/// SSO client backed by a shared tonic channel.
#[derive(Debug, Clone)]
pub struct SsoClient {
    channel: Channel,
    /// Per-attempt timeout.
    timeout: Duration,
    /// Maximum number of attempts (>= 1).
    retries_count: u32,
}

impl SsoClient {
    /// Connect to the SSO service with eager channel initialization.
    ///
    /// The channel is created once at startup (fail fast) and reused by all
    /// requests concurrently.
    ///
    /// # Errors
    ///
    /// Returns `SsoError::Endpoint` if the address is not a valid URI and
    /// `SsoError::Connect` if the initial connection fails.
    pub async fn connect(
        addr: &str,
        timeout: Duration,
        retries_count: u32,
    ) -> Result<Self, SsoError> {
        let channel = Endpoint::from_shared(addr.to_string())
            .map_err(|e| {
                error!(
                    target: "shortener.services.sso",
                    error = %e,
                    addr = %addr,
                    "Invalid SSO endpoint"
                );
                SsoError::Endpoint(format!("invalid SSO endpoint: {e}"))
            })?
            .connect_timeout(SSO_CONNECT_TIMEOUT)
            .connect()
            .await
            .map_err(|e| {
                warn!(
                    target: "shortener.services.sso",
                    error = %e,
                    addr = %addr,
                    "Failed to connect to SSO"
                );
                SsoError::Connect(format!("failed to connect to SSO: {e}"))
            })?;

        info!(
            target: "shortener.services.sso",
            addr = %addr,
            timeout_ms = timeout.as_millis() as u64,
            retries_count,
            "Connected to SSO service"
        );

        Ok(Self {
            channel,
            timeout,
            retries_count: retries_count.max(1),
        })
    }

    /// Ask the SSO service whether `user_id` holds admin privilege.
    ///
    /// A "not admin" answer is `Ok(false)`, never an error. Dropping the
    /// returned future (e.g. the inbound request was aborted) cancels the
    /// in-flight attempt and the retry loop with it.
    ///
    /// # Errors
    ///
    /// Returns `SsoError::Rpc` wrapping the last attempt's status once a
    /// non-retryable code is seen or the attempt budget is exhausted.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, SsoError> {
        let mut last_status = Status::unknown("no attempts made");

        for attempt in 1..=self.retries_count {
            debug!(
                target: "shortener.services.sso",
                user_id,
                attempt,
                "Sending IsAdmin request"
            );

            // Clone the channel (cheap operation) for this attempt.
            let mut client = AuthClient::new(self.channel.clone());
            let call = client.is_admin(IsAdminRequest { user_id });

            let status = match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(response)) => {
                    let inner = response.into_inner();
                    debug!(
                        target: "shortener.services.sso",
                        user_id,
                        attempt,
                        is_admin = inner.is_admin,
                        "IsAdmin response received"
                    );
                    return Ok(inner.is_admin);
                }
                Ok(Err(status)) => status,
                Err(_) => Status::deadline_exceeded("per-attempt timeout elapsed"),
            };

            let retryable = RETRYABLE_CODES.contains(&status.code());
            warn!(
                target: "shortener.services.sso",
                user_id,
                attempt,
                code = ?status.code(),
                error = %status,
                retryable,
                "IsAdmin attempt failed"
            );

            if !retryable {
                return Err(SsoError::Rpc(format!("is_admin({user_id}): {status}")));
            }

            last_status = status;
        }

        Err(SsoError::Rpc(format!(
            "is_admin({user_id}): retries exhausted: {last_status}"
        )))
    }
}

#[async_trait::async_trait]
impl SsoClientApi for SsoClient {
    async fn is_admin(&self, user_id: i64) -> Result<bool, SsoError> {
        self.is_admin(user_id).await
    }
}

/// Mock SSO client module for testing.
pub mod mock {

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock SSO client for unit testing.
    pub struct MockSsoClient {
        /// Responses to return (cycles through them).
        responses: Vec<bool>,
        /// Number of calls made.
        call_count: AtomicUsize,
        /// Whether to return errors.
        return_error: bool,
    }

    impl MockSsoClient {
        /// Create a mock that always answers "admin".
        pub fn admin() -> Self {
            Self {
                responses: vec![true],
                call_count: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a mock that always answers "not admin".
        pub fn non_admin() -> Self {
            Self {
                responses: vec![false],
                call_count: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a mock that returns custom answers in sequence.
        pub fn with_responses(responses: Vec<bool>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a mock that returns errors.
        pub fn failing() -> Self {
            Self {
                responses: vec![],
                call_count: AtomicUsize::new(0),
                return_error: true,
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl SsoClientApi for MockSsoClient {
        async fn is_admin(&self, _user_id: i64) -> Result<bool, SsoError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);

            if self.return_error {
                return Err(SsoError::Rpc("mock SSO client error".to_string()));
            }

            if self.responses.is_empty() {
                return Ok(true);
            }

            // Cycle through responses
            let idx = count % self.responses.len();
            Ok(self.responses.get(idx).copied().unwrap_or(true))
        }
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_codes() {
        assert!(RETRYABLE_CODES.contains(&Code::NotFound));
        assert!(RETRYABLE_CODES.contains(&Code::Aborted));
        assert!(RETRYABLE_CODES.contains(&Code::DeadlineExceeded));
        assert!(!RETRYABLE_CODES.contains(&Code::PermissionDenied));
        assert!(!RETRYABLE_CODES.contains(&Code::Unavailable));
    }

    #[tokio::test]
    async fn test_connect_with_invalid_endpoint() {
        let result = SsoClient::connect("not a uri", Duration::from_millis(100), 3).await;
        assert!(matches!(result, Err(SsoError::Endpoint(_))));
    }

    #[tokio::test]
    async fn test_connect_with_unreachable_endpoint() {
        // Valid endpoint but no server running.
        let result =
            SsoClient::connect("http://127.0.0.1:59999", Duration::from_millis(100), 3).await;
        assert!(matches!(result, Err(SsoError::Connect(_))));
    }
}
