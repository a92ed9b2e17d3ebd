//! Test server harness for E2E testing
//!
//! Provides TestShortenerServer for spawning real shortener server instances
//! in tests, with an injectable SSO client so tests control admin verdicts.

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::task::JoinHandle;

use shortener_service::handlers::AppState;
use shortener_service::middleware::AdminGateState;
use shortener_service::repositories::{MemoryRepository, UrlRepository};
use shortener_service::routes;
use shortener_service::services::SsoClientApi;

use crate::TEST_APP_SECRET;

/// Alias length used by the test harness.
pub const TEST_ALIAS_LENGTH: usize = 6;

/// Test harness for spawning the shortener server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_save_url() -> anyhow::Result<()> {
///     let sso = Arc::new(MockSsoClient::admin());
///     let server = TestShortenerServer::spawn(sso).await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/url", server.url()))
///         .bearer_auth(TestTokenBuilder::new().sign())
///         .json(&serde_json::json!({"url": "https://example.com"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestShortenerServer {
    addr: SocketAddr,
    repository: Arc<dyn UrlRepository>,
    _handle: JoinHandle<()>,
}

impl TestShortenerServer {
    /// Spawn a new test server instance on a random port.
    ///
    /// The server uses an in-memory repository and the provided SSO client
    /// for admin checks. Tokens are verified against [`TEST_APP_SECRET`].
    pub async fn spawn(sso: Arc<dyn SsoClientApi>) -> Result<Self, anyhow::Error> {
        let repository: Arc<dyn UrlRepository> = Arc::new(MemoryRepository::new());

        let state = Arc::new(AppState {
            repository: Arc::clone(&repository),
            alias_length: TEST_ALIAS_LENGTH,
        });

        let gate = Arc::new(AdminGateState {
            app_secret: SecretString::from(TEST_APP_SECRET),
            sso,
        });

        let app = routes::build_routes(state, gate);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            repository,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get a handle to the backing repository for direct seeding/inspection
    pub fn repository(&self) -> Arc<dyn UrlRepository> {
        Arc::clone(&self.repository)
    }
}

impl Drop for TestShortenerServer {
    fn drop(&mut self) {
        // Stop the HTTP server task when the test completes.
        self._handle.abort();
    }
}
