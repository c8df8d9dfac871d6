//! Error types for the verification flow and session handling.

use thiserror::Error;

/// Errors surfaced by the authentication gateway boundary
///
/// All of them are terminal to the current attempt only: the flow always
/// stays on a step the user can retry from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure, or a response carrying no usable message
    #[error("authentication gateway unreachable")]
    Unreachable,

    /// The gateway rejected the request with a message meant for the user
    #[error("{message}")]
    Rejected { message: String },

    /// The confirm endpoint rejected the code as wrong or expired
    #[error("invalid verification code")]
    InvalidCode,
}

impl GatewayError {
    /// Message supplied by the server, when one exists
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// Token decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    TokenExpired,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("invalid token claims")]
    InvalidClaims,

    #[error("missing claim: {claim}")]
    MissingClaim { claim: String },
}

/// Top-level flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("validation error: {message}")]
    Validation { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type FlowResult<T> = Result<T, FlowError>;
