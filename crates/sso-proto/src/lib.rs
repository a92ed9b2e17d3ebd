//! Generated Protocol Buffer code for the SSO authorization service.
//!
//! The source of truth is `proto/sso.proto`. The generated module under
//! `src/generated/` is checked in so the workspace builds without a protoc
//! toolchain; regenerate with `tonic-build` after editing the proto file.

#![allow(clippy::doc_markdown)] // Generated code has various doc formatting

// Re-export prost traits for convenience
pub use prost::Message;

pub mod sso {
    //! SSO service messages and stubs.
    pub mod v1 {
        include!("generated/sso.v1.rs");
    }
}
