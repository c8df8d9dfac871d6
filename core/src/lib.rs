//! # Veriflow Core
//!
//! Core flow logic and domain layer for the Veriflow client. This crate
//! contains the verification state machine, the one-time-code entry buffer,
//! the resend cooldown, the password policy, the session service, and the
//! error types — with every external collaborator injected behind a trait.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
