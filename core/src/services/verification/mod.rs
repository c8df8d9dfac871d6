//! Verification flow module for email-based identity confirmation
//!
//! This module provides the complete client-side verification workflow:
//! - Step progression for the verify and forgot-password journeys
//! - One-time-code entry with paste and auto-advance
//! - Resend cooldown driven by a message-passing ticker task
//! - Password-policy gate unlocking the reset submission
//! - Integration with an injected authentication gateway

mod config;
mod cooldown;
mod flow;
mod machine;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationFlowConfig;
pub use cooldown::{CooldownState, CooldownTicker, RESEND_COOLDOWN_SECONDS};
pub use flow::{FlowHandle, VerificationFlow};
pub use machine::{messages, Command, FlowInput, FlowMode, FlowState, GatewayReply, Step};
pub use traits::AuthGatewayTrait;
pub use types::FlowSnapshot;
