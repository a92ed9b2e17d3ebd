//! Service layer.
//!
//! # Components
//!
//! - `sso_client` - gRPC client for the SSO authorization service

pub mod sso_client;

pub use sso_client::mock::MockSsoClient;
pub use sso_client::{SsoClient, SsoClientApi, SsoError};
