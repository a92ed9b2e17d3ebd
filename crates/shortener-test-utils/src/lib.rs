//! # Shortener Test Utilities
//!
//! Shared test utilities for the URL shortener service.
//!
//! This crate provides:
//! - JWT builders for admin-gate scenarios (TestTokenBuilder)
//! - A scripted SSO gRPC stub server (StubSsoServer)
//! - An HTTP server harness (TestShortenerServer)

pub mod server_harness;
pub mod sso_stub;
pub mod token_builders;

// Re-export commonly used items
pub use server_harness::*;
pub use sso_stub::*;
pub use token_builders::*;

/// Signing secret used by every test harness.
pub const TEST_APP_SECRET: &str = "test-app-secret";
