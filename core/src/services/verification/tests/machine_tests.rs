//! Unit tests for the state machine transitions

use vf_shared::types::VerifyResponse;

use crate::errors::GatewayError;
use crate::services::verification::{
    messages, Command, FlowInput, FlowMode, FlowState, GatewayReply, Step, VerificationFlowConfig,
};

fn new_state(mode: FlowMode) -> FlowState {
    FlowState::new(mode, "user@example.com", VerificationFlowConfig::default())
}

/// Wraps a reply with the state's current generation (a live reply)
fn live_reply(state: &FlowState, reply: GatewayReply) -> FlowInput {
    FlowInput::GatewayReply {
        generation: state.generation(),
        reply,
    }
}

/// Drives a fresh state to the code entry step
fn to_code_entry(state: &mut FlowState) {
    let commands = state.apply(FlowInput::SubmitEmail);
    assert!(matches!(commands[..], [Command::RequestCode { .. }]));
    let reply = live_reply(
        state,
        GatewayReply::CodeRequested(Ok(VerifyResponse::with_message("sent"))),
    );
    state.apply(reply);
    assert_eq!(state.step(), Step::CodeEntry);
}

/// Types all six digits of `code`, returning the commands of the last input
fn fill_code(state: &mut FlowState, code: &str) -> Vec<Command> {
    let mut last = Vec::new();
    for (index, digit) in code.chars().enumerate() {
        last = state.apply(FlowInput::DigitEntered {
            index,
            value: digit.to_string(),
        });
    }
    last
}

/// Drives a forgot-password state to the password reset step
fn to_password_reset(state: &mut FlowState) {
    to_code_entry(state);
    fill_code(state, "123456");
    let reply = live_reply(
        state,
        GatewayReply::CodeConfirmed(Ok(VerifyResponse::with_message("ok"))),
    );
    state.apply(reply);
    assert_eq!(state.step(), Step::PasswordReset);
}

#[test]
fn test_submit_email_requests_code() {
    let mut state = new_state(FlowMode::Verify);
    let commands = state.apply(FlowInput::SubmitEmail);

    assert_eq!(
        commands,
        vec![Command::RequestCode {
            email: "user@example.com".to_string(),
            generation: 1,
        }]
    );
    assert!(state.is_busy());
    assert!(state.last_error().is_none());
}

#[test]
fn test_submit_empty_email_is_rejected() {
    let mut state = FlowState::new(FlowMode::Verify, "", VerificationFlowConfig::default());
    assert!(state.apply(FlowInput::SubmitEmail).is_empty());

    state.apply(FlowInput::EmailChanged("   ".to_string()));
    assert!(state.apply(FlowInput::SubmitEmail).is_empty());
    assert!(!state.is_busy());
}

#[test]
fn test_submit_while_busy_is_rejected() {
    let mut state = new_state(FlowMode::Verify);
    assert_eq!(state.apply(FlowInput::SubmitEmail).len(), 1);
    assert!(state.apply(FlowInput::SubmitEmail).is_empty());
}

#[test]
fn test_email_only_editable_at_idle_email_entry() {
    let mut state = new_state(FlowMode::Verify);
    state.apply(FlowInput::SubmitEmail);
    state.apply(FlowInput::EmailChanged("other@example.com".to_string()));
    assert_eq!(state.email(), "user@example.com");

    let reply = live_reply(
        &state,
        GatewayReply::CodeRequested(Ok(VerifyResponse::default())),
    );
    state.apply(reply);
    // Now at the code entry step: edits are ignored there too
    state.apply(FlowInput::EmailChanged("other@example.com".to_string()));
    assert_eq!(state.email(), "user@example.com");
}

#[test]
fn test_request_success_enters_code_entry() {
    let mut state = new_state(FlowMode::Verify);
    state.apply(FlowInput::SubmitEmail);
    let reply = live_reply(
        &state,
        GatewayReply::CodeRequested(Ok(VerifyResponse::with_message("sent"))),
    );
    let commands = state.apply(reply);

    assert_eq!(state.step(), Step::CodeEntry);
    assert!(!state.is_busy());
    assert_eq!(state.cooldown().seconds_remaining(), 60);
    assert!(!state.code().is_complete());
    assert_eq!(state.code().focus_index(), 0);
    assert_eq!(commands, vec![Command::StartCooldown { seconds: 60 }]);
}

#[test]
fn test_request_failure_surfaces_server_message() {
    let mut state = new_state(FlowMode::Verify);
    state.apply(FlowInput::SubmitEmail);
    let reply = live_reply(
        &state,
        GatewayReply::CodeRequested(Err(GatewayError::Rejected {
            message: "No account found with this email address".to_string(),
        })),
    );
    state.apply(reply);

    assert_eq!(state.step(), Step::EmailEntry);
    assert_eq!(
        state.last_error(),
        Some("No account found with this email address")
    );
    assert!(!state.is_busy());
}

#[test]
fn test_request_failure_falls_back_to_generic_message() {
    let mut state = new_state(FlowMode::Verify);
    state.apply(FlowInput::SubmitEmail);
    let reply = live_reply(
        &state,
        GatewayReply::CodeRequested(Err(GatewayError::Unreachable)),
    );
    state.apply(reply);

    assert_eq!(state.last_error(), Some(messages::REQUEST_FAILED));
}

#[test]
fn test_completed_buffer_confirms_exactly_once() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    for (index, digit) in "12345".chars().enumerate() {
        let commands = state.apply(FlowInput::DigitEntered {
            index,
            value: digit.to_string(),
        });
        assert!(commands.is_empty());
    }

    let commands = state.apply(FlowInput::DigitEntered {
        index: 5,
        value: "6".to_string(),
    });
    assert_eq!(
        commands,
        vec![Command::ConfirmCode {
            email: "user@example.com".to_string(),
            code: "123456".to_string(),
            generation: state.generation(),
        }]
    );
    assert!(state.is_busy());
}

#[test]
fn test_paste_with_noise_confirms_cleaned_code() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    let commands = state.apply(FlowInput::Paste("12ab3456".to_string()));
    assert!(matches!(
        &commands[..],
        [Command::ConfirmCode { code, .. }] if code == "123456"
    ));
    assert_eq!(state.code().focus_index(), 5);
}

#[test]
fn test_partial_paste_does_not_confirm() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    let commands = state.apply(FlowInput::Paste("123".to_string()));
    assert!(commands.is_empty());
    assert_eq!(state.code().focus_index(), 3);
    assert!(!state.is_busy());
}

#[test]
fn test_backspace_retreats_without_deleting() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    state.apply(FlowInput::Paste("123".to_string()));

    state.apply(FlowInput::Backspace { index: 3 });
    assert_eq!(state.code().focus_index(), 2);
    assert_eq!(state.code().digit(2), Some('3'));
}

#[test]
fn test_confirm_failure_resets_buffer_and_sets_error() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    fill_code(&mut state, "000000");

    let reply = live_reply(
        &state,
        GatewayReply::CodeConfirmed(Err(GatewayError::InvalidCode)),
    );
    state.apply(reply);

    assert_eq!(state.step(), Step::CodeEntry);
    assert!(state.code().digits().iter().all(Option::is_none));
    assert_eq!(state.code().focus_index(), 0);
    assert_eq!(state.last_error(), Some(messages::CODE_REJECTED));
    assert!(!state.is_busy());
}

#[test]
fn test_recompletion_after_failure_confirms_again() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    fill_code(&mut state, "000000");
    let first_generation = state.generation();

    let reply = live_reply(
        &state,
        GatewayReply::CodeConfirmed(Err(GatewayError::InvalidCode)),
    );
    state.apply(reply);

    let commands = fill_code(&mut state, "654321");
    assert!(matches!(
        &commands[..],
        [Command::ConfirmCode { code, generation, .. }]
            if code == "654321" && *generation == first_generation + 1
    ));
}

#[test]
fn test_code_input_rejected_while_busy() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    fill_code(&mut state, "123456");
    assert!(state.is_busy());

    let commands = state.apply(FlowInput::DigitEntered {
        index: 0,
        value: "9".to_string(),
    });
    assert!(commands.is_empty());
    assert_eq!(state.code().digit(0), Some('1'));
}

#[test]
fn test_confirm_success_in_verify_mode_succeeds() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    fill_code(&mut state, "123456");

    let reply = live_reply(
        &state,
        GatewayReply::CodeConfirmed(Ok(VerifyResponse {
            message: Some("Email verified successfully.".to_string()),
            is_verified: Some(true),
        })),
    );
    let commands = state.apply(reply);

    assert_eq!(state.step(), Step::Succeeded);
    assert_eq!(state.last_success(), Some("Email verified successfully."));
    assert_eq!(commands, vec![Command::StopCooldown]);
}

#[test]
fn test_confirm_success_in_forgot_mode_unlocks_reset() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_code_entry(&mut state);
    fill_code(&mut state, "123456");

    let reply = live_reply(
        &state,
        GatewayReply::CodeConfirmed(Ok(VerifyResponse::with_message("ok"))),
    );
    state.apply(reply);

    assert_eq!(state.step(), Step::PasswordReset);
    assert!(state.last_error().is_none());
    assert!(state.last_success().is_none());
}

#[test]
fn test_resend_is_a_noop_during_cooldown() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    assert!(state.apply(FlowInput::ResendRequested).is_empty());

    for _ in 0..48 {
        state.apply(FlowInput::Tick);
    }
    assert_eq!(state.cooldown().seconds_remaining(), 12);
    assert!(state.apply(FlowInput::ResendRequested).is_empty());
}

#[test]
fn test_resend_after_cooldown_reissues_request() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    let mut stop_seen = false;
    for _ in 0..60 {
        let commands = state.apply(FlowInput::Tick);
        if !commands.is_empty() {
            assert_eq!(commands, vec![Command::StopCooldown]);
            stop_seen = true;
        }
    }
    assert!(stop_seen);
    assert!(state.cooldown().is_ready());

    let commands = state.apply(FlowInput::ResendRequested);
    assert!(matches!(&commands[..], [Command::RequestCode { .. }]));

    let reply = live_reply(
        &state,
        GatewayReply::CodeRequested(Ok(VerifyResponse::with_message("sent"))),
    );
    let commands = state.apply(reply);
    assert_eq!(state.cooldown().seconds_remaining(), 60);
    assert_eq!(commands, vec![Command::StartCooldown { seconds: 60 }]);
}

#[test]
fn test_tick_saturates_at_zero() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    for _ in 0..120 {
        state.apply(FlowInput::Tick);
    }
    assert_eq!(state.cooldown().seconds_remaining(), 0);
}

#[test]
fn test_change_email_returns_to_email_entry() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    fill_code(&mut state, "000000");
    let reply = live_reply(
        &state,
        GatewayReply::CodeConfirmed(Err(GatewayError::InvalidCode)),
    );
    state.apply(reply);
    assert!(state.last_error().is_some());

    let commands = state.apply(FlowInput::ChangeEmail);
    assert_eq!(state.step(), Step::EmailEntry);
    assert!(state.last_error().is_none());
    assert!(state.code().digits().iter().all(Option::is_none));
    assert_eq!(commands, vec![Command::StopCooldown]);
}

#[test]
fn test_stale_reply_after_change_email_is_dropped() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);
    for _ in 0..60 {
        state.apply(FlowInput::Tick);
    }

    // Resend goes in flight, then the user backs out mid-request
    let commands = state.apply(FlowInput::ResendRequested);
    let in_flight_generation = match &commands[..] {
        [Command::RequestCode { generation, .. }] => *generation,
        other => panic!("expected a request command, got {other:?}"),
    };
    state.apply(FlowInput::ChangeEmail);
    assert_eq!(state.step(), Step::EmailEntry);
    assert!(!state.is_busy());

    let commands = state.apply(FlowInput::GatewayReply {
        generation: in_flight_generation,
        reply: GatewayReply::CodeRequested(Ok(VerifyResponse::with_message("sent"))),
    });
    assert!(commands.is_empty());
    assert_eq!(state.step(), Step::EmailEntry);
    assert!(state.cooldown().is_ready());
}

#[test]
fn test_password_typing_reevaluates_policy() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_password_reset(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Weak1".to_string()));
    let policy = state.password().policy();
    assert!(!policy.min_length);
    assert!(!policy.has_special_char);
    assert!(policy.has_uppercase);
    assert!(policy.has_digit);

    state.apply(FlowInput::NewPasswordChanged("Abcdefg1!".to_string()));
    assert!(state.password().policy().is_valid());
}

#[test]
fn test_reset_mismatch_is_blocked_locally() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_password_reset(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Abcdefg1!".to_string()));
    state.apply(FlowInput::ConfirmPasswordChanged("Abcdefg1?".to_string()));

    let commands = state.apply(FlowInput::SubmitReset);
    assert!(commands.is_empty());
    assert_eq!(state.last_error(), Some(messages::PASSWORDS_DONT_MATCH));
    assert!(!state.is_busy());
}

#[test]
fn test_reset_with_unmet_policy_is_blocked_locally() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_password_reset(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Weak1".to_string()));
    state.apply(FlowInput::ConfirmPasswordChanged("Weak1".to_string()));

    let commands = state.apply(FlowInput::SubmitReset);
    assert!(commands.is_empty());
    assert!(!state.is_busy());
    assert_eq!(state.step(), Step::PasswordReset);
}

#[test]
fn test_valid_reset_submits_and_succeeds() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_password_reset(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Abcdefg1!".to_string()));
    state.apply(FlowInput::ConfirmPasswordChanged("Abcdefg1!".to_string()));

    let commands = state.apply(FlowInput::SubmitReset);
    assert_eq!(
        commands,
        vec![Command::ResetPassword {
            email: "user@example.com".to_string(),
            new_password: "Abcdefg1!".to_string(),
            generation: state.generation(),
        }]
    );

    let reply = live_reply(
        &state,
        GatewayReply::PasswordReset(Ok(VerifyResponse::with_message(
            "Password has been reset successfully.",
        ))),
    );
    state.apply(reply);
    assert_eq!(state.step(), Step::Succeeded);
    assert_eq!(
        state.last_success(),
        Some("Password has been reset successfully.")
    );
}

#[test]
fn test_reset_gateway_failure_sets_generic_error() {
    let mut state = new_state(FlowMode::ForgotPassword);
    to_password_reset(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Abcdefg1!".to_string()));
    state.apply(FlowInput::ConfirmPasswordChanged("Abcdefg1!".to_string()));
    state.apply(FlowInput::SubmitReset);

    let reply = live_reply(
        &state,
        GatewayReply::PasswordReset(Err(GatewayError::Unreachable)),
    );
    state.apply(reply);

    assert_eq!(state.step(), Step::PasswordReset);
    assert_eq!(state.last_error(), Some(messages::RESET_FAILED));
}

#[test]
fn test_password_inputs_ignored_outside_reset_step() {
    let mut state = new_state(FlowMode::Verify);
    to_code_entry(&mut state);

    state.apply(FlowInput::NewPasswordChanged("Abcdefg1!".to_string()));
    assert_eq!(state.password().new_password(), "");
    assert!(state.apply(FlowInput::SubmitReset).is_empty());
}
