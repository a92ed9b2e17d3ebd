//! URL Shortener Service Library
//!
//! A small HTTP service that maps long URLs to short aliases. Write
//! operations are restricted to admin users: a JWT middleware validates the
//! bearer token locally and delegates the final authorization decision to an
//! external SSO service over gRPC.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `auth` - Bearer token validation and identity types
//! - `middleware` - Admin authorization gate
//! - `services` - SSO gRPC client with retry policy
//! - `handlers` - HTTP request handlers
//! - `repositories` - URL storage layer
//! - `routes` - Router construction

pub mod alias;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
