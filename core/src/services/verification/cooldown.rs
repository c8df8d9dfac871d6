//! Resend cooldown: the countdown state plus the 1 Hz ticker task.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::machine::FlowInput;

/// Seconds a user must wait before requesting another code
pub const RESEND_COOLDOWN_SECONDS: u32 = 60;

/// Countdown until a new code may be requested
///
/// Only [`tick`] decrements the counter, and it saturates at zero.
/// [`start`] may be called mid-countdown (resend cycle) and overwrites the
/// counter with the full value.
///
/// [`tick`]: CooldownState::tick
/// [`start`]: CooldownState::start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownState {
    seconds_remaining: u32,
}

impl CooldownState {
    /// Restarts the countdown at `seconds`
    pub fn start(&mut self, seconds: u32) {
        self.seconds_remaining = seconds;
    }

    /// Consumes one tick; returns `true` once the counter sits at zero
    pub fn tick(&mut self) -> bool {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining == 0
    }

    /// Whether a new code may be requested
    pub fn is_ready(&self) -> bool {
        self.seconds_remaining == 0
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }
}

/// Task emitting one [`FlowInput::Tick`] per second into the flow's channel
///
/// The task is aborted when the handle drops, so a torn-down flow can never
/// receive further ticks.
#[derive(Debug)]
pub struct CooldownTicker {
    handle: JoinHandle<()>,
}

impl CooldownTicker {
    /// Spawns a ticker delivering ticks into `events`
    pub fn spawn(events: UnboundedSender<FlowInput>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // A tokio interval yields immediately on its first tick; skip it
            // so the first delivered tick lands a full second after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if events.send(FlowInput::Tick).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for CooldownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
