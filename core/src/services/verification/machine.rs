//! Verification flow state machine
//!
//! The machine is a deterministic transition function over [`FlowState`]:
//! [`apply`] consumes one input, updates the state, and returns the commands
//! the driver must execute (gateway calls, cooldown start/stop). It performs
//! no I/O itself, which keeps every transition directly testable.
//!
//! Gateway calls resolve asynchronously; their completions come back as
//! [`FlowInput::GatewayReply`] tagged with the generation that was current
//! when the call was dispatched. A reply whose generation no longer matches
//! (the user navigated away in the meantime) is dropped.
//!
//! [`apply`]: FlowState::apply

use serde::Serialize;

use vf_shared::types::VerifyResponse;
use vf_shared::utils::validation::validators;

use crate::domain::entities::code_buffer::CodeBuffer;
use crate::domain::entities::password_draft::PasswordDraft;
use crate::errors::GatewayError;

use super::config::VerificationFlowConfig;
use super::cooldown::CooldownState;

/// Which journey this flow instance serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowMode {
    /// Confirm ownership of an email address
    Verify,
    /// Confirm ownership, then authorize a password reset
    ForgotPassword,
}

/// Current step of the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    EmailEntry,
    CodeEntry,
    /// Reachable only in [`FlowMode::ForgotPassword`]
    PasswordReset,
    Succeeded,
}

/// Inputs accepted by the machine: user actions, timer ticks, gateway replies
#[derive(Debug, Clone)]
pub enum FlowInput {
    EmailChanged(String),
    SubmitEmail,
    DigitEntered { index: usize, value: String },
    Backspace { index: usize },
    Paste(String),
    ResendRequested,
    ChangeEmail,
    NewPasswordChanged(String),
    ConfirmPasswordChanged(String),
    SubmitReset,
    Tick,
    GatewayReply { generation: u64, reply: GatewayReply },
}

/// Completion of an asynchronous gateway call
#[derive(Debug, Clone)]
pub enum GatewayReply {
    CodeRequested(Result<VerifyResponse, GatewayError>),
    CodeConfirmed(Result<VerifyResponse, GatewayError>),
    PasswordReset(Result<VerifyResponse, GatewayError>),
}

/// Side effects the driver must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestCode {
        email: String,
        generation: u64,
    },
    ConfirmCode {
        email: String,
        code: String,
        generation: u64,
    },
    ResetPassword {
        email: String,
        new_password: String,
        generation: u64,
    },
    StartCooldown {
        seconds: u32,
    },
    StopCooldown,
}

/// Fallback messages shown when the gateway supplies none
pub mod messages {
    pub const REQUEST_FAILED: &str = "Unable to send the verification code. Please try again.";
    pub const CODE_REJECTED: &str = "The verification code is incorrect or has expired.";
    pub const EMAIL_VERIFIED: &str = "Email verified successfully.";
    pub const RESET_FAILED: &str = "Unable to reset the password. Please try again.";
    pub const RESET_DONE: &str = "Password has been reset successfully.";
    pub const PASSWORDS_DONT_MATCH: &str = "Passwords do not match.";
}

/// Complete state of one verification flow instance
///
/// Owned and mutated exclusively through [`apply`]; everything else is
/// read-only access for the driver and the snapshot.
///
/// [`apply`]: FlowState::apply
#[derive(Debug, Clone)]
pub struct FlowState {
    mode: FlowMode,
    step: Step,
    email: String,
    code: CodeBuffer,
    password: PasswordDraft,
    cooldown: CooldownState,
    last_error: Option<String>,
    last_success: Option<String>,
    is_busy: bool,
    generation: u64,
    config: VerificationFlowConfig,
}

impl FlowState {
    /// Creates a fresh flow at the email entry step
    ///
    /// `mode` and the pre-filled email are construction-time inputs and are
    /// never re-read afterwards.
    pub fn new(
        mode: FlowMode,
        prefilled_email: impl Into<String>,
        config: VerificationFlowConfig,
    ) -> Self {
        Self {
            mode,
            step: Step::EmailEntry,
            email: prefilled_email.into(),
            code: CodeBuffer::new(),
            password: PasswordDraft::new(),
            cooldown: CooldownState::default(),
            last_error: None,
            last_success: None,
            is_busy: false,
            generation: 0,
            config,
        }
    }

    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn code(&self) -> &CodeBuffer {
        &self.code
    }

    pub fn password(&self) -> &PasswordDraft {
        &self.password
    }

    pub fn cooldown(&self) -> CooldownState {
        self.cooldown
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<&str> {
        self.last_success.as_deref()
    }

    /// Whether a gateway call is in flight
    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    /// Tag identifying the most recent accepted trigger
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Applies one input and returns the commands to execute
    pub fn apply(&mut self, input: FlowInput) -> Vec<Command> {
        match input {
            FlowInput::EmailChanged(value) => {
                if self.step == Step::EmailEntry && !self.is_busy {
                    self.email = value;
                }
                Vec::new()
            }
            FlowInput::SubmitEmail => self.submit_email(),
            FlowInput::DigitEntered { index, value } => self.enter_digit(index, &value),
            FlowInput::Backspace { index } => {
                if self.accepts_code_input() {
                    self.code.backspace(index);
                }
                Vec::new()
            }
            FlowInput::Paste(text) => self.paste(&text),
            FlowInput::ResendRequested => self.resend(),
            FlowInput::ChangeEmail => self.change_email(),
            FlowInput::NewPasswordChanged(value) => {
                if self.step == Step::PasswordReset {
                    self.password.set_new_password(value);
                }
                Vec::new()
            }
            FlowInput::ConfirmPasswordChanged(value) => {
                if self.step == Step::PasswordReset {
                    self.password.set_confirm_password(value);
                }
                Vec::new()
            }
            FlowInput::SubmitReset => self.submit_reset(),
            FlowInput::Tick => self.on_tick(),
            FlowInput::GatewayReply { generation, reply } => self.on_reply(generation, reply),
        }
    }

    /// Marks the start of a gateway-calling attempt: messages cleared, the
    /// busy gate raised, and a fresh generation minted for the reply.
    fn begin_attempt(&mut self) {
        self.last_error = None;
        self.last_success = None;
        self.is_busy = true;
        self.generation += 1;
    }

    fn accepts_code_input(&self) -> bool {
        self.step == Step::CodeEntry && !self.is_busy
    }

    fn submit_email(&mut self) -> Vec<Command> {
        if self.step != Step::EmailEntry || self.is_busy {
            return Vec::new();
        }
        if !validators::not_empty(&self.email) {
            return Vec::new();
        }

        self.begin_attempt();
        tracing::info!(event = "code_requested", "Requesting verification code");
        vec![Command::RequestCode {
            email: self.email.clone(),
            generation: self.generation,
        }]
    }

    fn enter_digit(&mut self, index: usize, value: &str) -> Vec<Command> {
        if !self.accepts_code_input() {
            return Vec::new();
        }
        let changed = self.code.set_digit(index, value);
        self.maybe_confirm(changed)
    }

    fn paste(&mut self, text: &str) -> Vec<Command> {
        if !self.accepts_code_input() {
            return Vec::new();
        }
        let changed = self.code.paste(text);
        self.maybe_confirm(changed)
    }

    /// Auto-submit: fires the confirm call exactly once per distinct
    /// completion, i.e. when an input mutated the buffer and left it
    /// complete. Inputs that change nothing never re-fire a stale one.
    fn maybe_confirm(&mut self, buffer_changed: bool) -> Vec<Command> {
        if !buffer_changed {
            return Vec::new();
        }
        let Some(code) = self.code.code() else {
            return Vec::new();
        };

        self.begin_attempt();
        tracing::info!(event = "code_complete", "Code entry complete, confirming");
        vec![Command::ConfirmCode {
            email: self.email.clone(),
            code,
            generation: self.generation,
        }]
    }

    fn resend(&mut self) -> Vec<Command> {
        if self.step != Step::CodeEntry || self.is_busy || !self.cooldown.is_ready() {
            return Vec::new();
        }

        self.begin_attempt();
        tracing::info!(event = "code_resend", "Resending verification code");
        vec![Command::RequestCode {
            email: self.email.clone(),
            generation: self.generation,
        }]
    }

    fn change_email(&mut self) -> Vec<Command> {
        if self.step != Step::CodeEntry {
            return Vec::new();
        }

        // Navigation is allowed even mid-request; bumping the generation
        // makes any in-flight reply stale.
        self.generation += 1;
        self.is_busy = false;
        self.step = Step::EmailEntry;
        self.last_error = None;
        self.last_success = None;
        self.code.reset();
        tracing::debug!(event = "change_email", "Returning to email entry");
        vec![Command::StopCooldown]
    }

    fn submit_reset(&mut self) -> Vec<Command> {
        if self.step != Step::PasswordReset || self.is_busy {
            return Vec::new();
        }

        self.last_error = None;
        self.last_success = None;

        if !self.password.passwords_match() {
            self.last_error = Some(messages::PASSWORDS_DONT_MATCH.to_string());
            return Vec::new();
        }
        if !self.password.policy().is_valid() {
            // The submit control stays disabled until the policy holds; a
            // stray submit is rejected without a gateway call.
            return Vec::new();
        }

        self.begin_attempt();
        tracing::info!(event = "reset_submitted", "Submitting password reset");
        vec![Command::ResetPassword {
            email: self.email.clone(),
            new_password: self.password.new_password().to_string(),
            generation: self.generation,
        }]
    }

    fn on_tick(&mut self) -> Vec<Command> {
        if self.cooldown.is_ready() {
            // Stray tick queued before the ticker was stopped
            return Vec::new();
        }
        if self.cooldown.tick() {
            vec![Command::StopCooldown]
        } else {
            Vec::new()
        }
    }

    fn on_reply(&mut self, generation: u64, reply: GatewayReply) -> Vec<Command> {
        if generation != self.generation {
            tracing::warn!(
                stale = generation,
                current = self.generation,
                event = "stale_reply_dropped",
                "Ignoring gateway reply for a superseded request"
            );
            return Vec::new();
        }

        self.is_busy = false;
        match reply {
            GatewayReply::CodeRequested(result) => self.on_code_requested(result),
            GatewayReply::CodeConfirmed(result) => self.on_code_confirmed(result),
            GatewayReply::PasswordReset(result) => self.on_password_reset(result),
        }
    }

    fn on_code_requested(
        &mut self,
        result: Result<VerifyResponse, GatewayError>,
    ) -> Vec<Command> {
        match result {
            Ok(_) => {
                self.step = Step::CodeEntry;
                self.code.reset();
                self.cooldown.start(self.config.resend_cooldown_seconds);
                tracing::info!(event = "code_sent", "Verification code sent");
                vec![Command::StartCooldown {
                    seconds: self.config.resend_cooldown_seconds,
                }]
            }
            Err(error) => {
                tracing::warn!(%error, event = "code_request_failed", "Code request failed");
                self.last_error = Some(
                    error
                        .server_message()
                        .unwrap_or(messages::REQUEST_FAILED)
                        .to_string(),
                );
                Vec::new()
            }
        }
    }

    fn on_code_confirmed(
        &mut self,
        result: Result<VerifyResponse, GatewayError>,
    ) -> Vec<Command> {
        match result {
            Ok(response) => {
                match self.mode {
                    FlowMode::Verify => {
                        self.step = Step::Succeeded;
                        self.last_success = Some(
                            response
                                .message
                                .unwrap_or_else(|| messages::EMAIL_VERIFIED.to_string()),
                        );
                        tracing::info!(event = "email_verified", "Email verified");
                    }
                    FlowMode::ForgotPassword => {
                        self.step = Step::PasswordReset;
                        self.last_error = None;
                        self.last_success = None;
                        self.password.reset();
                        tracing::info!(event = "reset_unlocked", "Password reset unlocked");
                    }
                }
                vec![Command::StopCooldown]
            }
            Err(error) => {
                tracing::warn!(%error, event = "code_rejected", "Verification code rejected");
                self.code.reset();
                self.last_error = Some(messages::CODE_REJECTED.to_string());
                Vec::new()
            }
        }
    }

    fn on_password_reset(
        &mut self,
        result: Result<VerifyResponse, GatewayError>,
    ) -> Vec<Command> {
        match result {
            Ok(response) => {
                self.step = Step::Succeeded;
                self.last_success = Some(
                    response
                        .message
                        .unwrap_or_else(|| messages::RESET_DONE.to_string()),
                );
                tracing::info!(event = "password_reset", "Password reset completed");
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(%error, event = "reset_failed", "Password reset failed");
                self.last_error = Some(messages::RESET_FAILED.to_string());
                Vec::new()
            }
        }
    }
}
