//! Observable snapshot of the flow state

use serde::Serialize;

use crate::domain::entities::code_buffer::CODE_LENGTH;
use crate::domain::value_objects::password_policy::PolicyReport;

use super::machine::{FlowMode, FlowState, Step};

/// Point-in-time view of the flow, published after every applied input
///
/// Plain data, no behavior: everything an embedding UI needs to render the
/// current step, and nothing it could use to mutate the flow directly.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub mode: FlowMode,
    pub step: Step,
    pub email: String,
    /// One entry per code cell; empty string for an empty cell
    pub digits: Vec<String>,
    pub focus_index: usize,
    pub cooldown_seconds: u32,
    pub resend_ready: bool,
    pub is_busy: bool,
    pub last_error: Option<String>,
    pub last_success: Option<String>,
    pub policy: PolicyReport,
    pub passwords_match: bool,
    pub can_submit_reset: bool,
}

impl FlowSnapshot {
    /// Captures the current state
    pub fn of(state: &FlowState) -> Self {
        let mut digits = Vec::with_capacity(CODE_LENGTH);
        for index in 0..CODE_LENGTH {
            digits.push(
                state
                    .code()
                    .digit(index)
                    .map(String::from)
                    .unwrap_or_default(),
            );
        }

        Self {
            mode: state.mode(),
            step: state.step(),
            email: state.email().to_string(),
            digits,
            focus_index: state.code().focus_index(),
            cooldown_seconds: state.cooldown().seconds_remaining(),
            resend_ready: state.cooldown().is_ready(),
            is_busy: state.is_busy(),
            last_error: state.last_error().map(String::from),
            last_success: state.last_success().map(String::from),
            policy: state.password().policy(),
            passwords_match: state.password().passwords_match(),
            can_submit_reset: state.password().can_submit(),
        }
    }
}
