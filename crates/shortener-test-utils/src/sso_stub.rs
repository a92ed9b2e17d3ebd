//! Scripted SSO gRPC stub server.
//!
//! Runs a real tonic server on an ephemeral port with a scripted
//! per-call response sequence, so retry behavior can be exercised
//! against an actual wire transport.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic::{Code, Request, Response, Status};

use sso_proto::sso::v1::auth_server::{Auth, AuthServer};
use sso_proto::sso::v1::{IsAdminRequest, IsAdminResponse};

/// One scripted reply from the stub authority.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedReply {
    /// Answer the admin check with the given verdict.
    Admin(bool),
    /// Fail the call with the given gRPC status code.
    Fail(Code),
    /// Never answer; the caller's deadline has to fire.
    Hang,
}

/// Scripted IsAdmin service.
///
/// Replies are consumed in order; once the script is exhausted the last
/// entry repeats. Every received call is counted.
pub struct ScriptedAuthService {
    script: Vec<ScriptedReply>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedAuthService {
    pub fn new(script: Vec<ScriptedReply>) -> Self {
        assert!(!script.is_empty(), "script must have at least one reply");
        Self {
            script,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answers with the given admin verdict.
    pub fn always(is_admin: bool) -> Self {
        Self::new(vec![ScriptedReply::Admin(is_admin)])
    }

    /// Handle on the call counter, valid after the service is moved into the server.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[tonic::async_trait]
impl Auth for ScriptedAuthService {
    async fn is_admin(
        &self,
        _request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(ScriptedReply::Admin(false));

        match reply {
            ScriptedReply::Admin(is_admin) => Ok(Response::new(IsAdminResponse { is_admin })),
            ScriptedReply::Fail(code) => Err(Status::new(code, "scripted failure")),
            ScriptedReply::Hang => {
                // Longer than any per-attempt deadline used in tests.
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(Status::deadline_exceeded("stub hang elapsed"))
            }
        }
    }
}

/// A running stub SSO server.
///
/// The server shuts down when dropped (or when [`StubSsoServer::shutdown`]
/// is called).
pub struct StubSsoServer {
    addr: SocketAddr,
    call_count: Arc<AtomicUsize>,
    cancel_token: CancellationToken,
}

impl StubSsoServer {
    /// Spawn the stub on an ephemeral port.
    pub async fn spawn(service: ScriptedAuthService) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let call_count = service.call_counter();
        let cancel_token = CancellationToken::new();
        let cancel_token_clone = cancel_token.clone();

        // Convert tokio listener to tonic-compatible incoming stream
        let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);

        let server = Server::builder()
            .add_service(AuthServer::new(service))
            .serve_with_incoming_shutdown(incoming, async move {
                cancel_token_clone.cancelled().await;
            });

        tokio::spawn(async move {
            let _ = server.await;
        });

        // Give the server time to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(Self {
            addr,
            call_count,
            cancel_token,
        })
    }

    /// gRPC endpoint URL for the stub.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of IsAdmin calls the stub has received.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Stop the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for StubSsoServer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
