//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator seams the core flow injects:
//!
//! - **Gateway**: HTTP client for the authentication gateway (reqwest)
//! - **Session**: in-memory token store and JWT claims decoder

/// Gateway module - HTTP authentication gateway client
pub mod gateway;

/// Session module - token persistence and claims decoding
pub mod session;

use vf_shared::config::GatewayConfig;

/// Load gateway configuration from the environment
///
/// Reads a `.env` file when present, then falls back to process environment
/// variables and defaults.
pub fn load_gateway_config() -> GatewayConfig {
    dotenvy::dotenv().ok();
    GatewayConfig::from_env()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction or transport error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
