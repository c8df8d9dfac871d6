//! Traits for authentication gateway integration

use async_trait::async_trait;

use vf_shared::types::VerifyResponse;

use crate::errors::GatewayError;

/// Trait for the authentication gateway
///
/// Any transport and encoding may stand behind this as long as the semantics
/// match: the gateway issues one-time codes bound to an email address,
/// confirms them, and performs the password reset a confirmed code
/// authorizes.
#[async_trait]
pub trait AuthGatewayTrait: Send + Sync {
    /// Request a one-time code for an email address
    async fn request_code(&self, email: &str) -> Result<VerifyResponse, GatewayError>;

    /// Confirm a one-time code previously sent to an email address
    async fn confirm_code(&self, email: &str, code: &str) -> Result<VerifyResponse, GatewayError>;

    /// Reset the account password after a confirmed code
    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<VerifyResponse, GatewayError>;
}
