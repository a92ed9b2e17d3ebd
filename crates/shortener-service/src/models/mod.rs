//! Shared API types.

use serde::{Deserialize, Serialize};

/// Response envelope used by every JSON endpoint.
///
/// Success bodies carry `{"status": "OK"}`, failures
/// `{"status": "Error", "error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "Error".to_string(),
            error: Some(message.into()),
        }
    }
}
