//! Configuration for the verification flow

use super::cooldown::RESEND_COOLDOWN_SECONDS;

/// Configuration for a verification flow instance
#[derive(Debug, Clone)]
pub struct VerificationFlowConfig {
    /// Seconds a user must wait between code requests
    pub resend_cooldown_seconds: u32,
}

impl Default for VerificationFlowConfig {
    fn default() -> Self {
        Self {
            resend_cooldown_seconds: RESEND_COOLDOWN_SECONDS,
        }
    }
}
