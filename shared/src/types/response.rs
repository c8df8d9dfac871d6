//! Gateway response payloads
//!
//! The authentication gateway answers every verification endpoint with the
//! same shape; error responses reuse it with only `message` populated.

use serde::{Deserialize, Serialize};

/// Successful response from the verification endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Human-readable outcome message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether the email address is now verified
    #[serde(
        default,
        rename = "isVerified",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_verified: Option<bool>,
}

impl VerifyResponse {
    /// Create a response carrying only a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            is_verified: None,
        }
    }
}

/// Error payload consumed from non-success gateway responses
///
/// Only `message` is ever inspected; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
