//! Bearer token validation and identity types.
//!
//! # Components
//!
//! - `claims` - Claims extracted from a verified token, and the identity
//!   struct attached to forwarded requests
//! - `token` - HMAC JWT verification

pub mod claims;
pub mod token;

pub use claims::{AuthenticatedIdentity, TokenClaims};
pub use token::TokenError;
