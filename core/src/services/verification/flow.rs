//! Asynchronous driver for the verification flow
//!
//! The driver owns the machine state and two channels: user inputs arrive
//! from [`FlowHandle`]s, internal events (cooldown ticks and gateway replies)
//! arrive on a channel only the driver's own tasks hold. Applying an input
//! yields commands; the driver executes them by spawning gateway calls whose
//! completions are fed back in as events, tagged with the generation current
//! at dispatch time, and by starting or stopping the cooldown ticker.
//!
//! Everything converges on one logical thread: events are applied strictly
//! one at a time, so the machine never observes interleaved mutation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::config::VerificationFlowConfig;
use super::cooldown::CooldownTicker;
use super::machine::{Command, FlowInput, FlowMode, FlowState, GatewayReply};
use super::traits::AuthGatewayTrait;
use super::types::FlowSnapshot;

/// Cloneable sender used by an embedding UI to feed inputs into the flow
#[derive(Debug, Clone)]
pub struct FlowHandle {
    inputs: mpsc::UnboundedSender<FlowInput>,
}

impl FlowHandle {
    /// Sends an input to the flow; silently dropped if the flow is gone
    pub fn send(&self, input: FlowInput) {
        let _ = self.inputs.send(input);
    }
}

/// Driver owning one verification flow instance
///
/// Lifecycle matches one mount of the flow: created with its mode and an
/// optional pre-filled email, torn down by dropping it (or by dropping every
/// [`FlowHandle`] while it sits in [`run`]). The cooldown ticker is aborted
/// on teardown, so a disposed flow never receives another tick.
///
/// [`run`]: VerificationFlow::run
pub struct VerificationFlow<G: AuthGatewayTrait + 'static> {
    state: FlowState,
    gateway: Arc<G>,
    inputs_tx: mpsc::UnboundedSender<FlowInput>,
    inputs_rx: mpsc::UnboundedReceiver<FlowInput>,
    events_tx: mpsc::UnboundedSender<FlowInput>,
    events_rx: mpsc::UnboundedReceiver<FlowInput>,
    snapshot_tx: watch::Sender<FlowSnapshot>,
    ticker: Option<CooldownTicker>,
    flow_id: Uuid,
}

impl<G: AuthGatewayTrait + 'static> VerificationFlow<G> {
    /// Creates a flow at the email entry step
    pub fn new(
        gateway: Arc<G>,
        config: VerificationFlowConfig,
        mode: FlowMode,
        prefilled_email: impl Into<String>,
    ) -> Self {
        let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = FlowState::new(mode, prefilled_email, config);
        let (snapshot_tx, _) = watch::channel(FlowSnapshot::of(&state));
        let flow_id = Uuid::new_v4();

        tracing::info!(%flow_id, ?mode, event = "flow_started", "Verification flow created");

        Self {
            state,
            gateway,
            inputs_tx,
            inputs_rx,
            events_tx,
            events_rx,
            snapshot_tx,
            ticker: None,
            flow_id,
        }
    }

    /// Handle for feeding user input into the flow
    pub fn handle(&self) -> FlowHandle {
        FlowHandle {
            inputs: self.inputs_tx.clone(),
        }
    }

    /// Subscribes to state snapshots, updated after every applied event
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current machine state
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Applies one input now and executes the resulting commands
    pub fn dispatch(&mut self, input: FlowInput) {
        let commands = self.state.apply(input);
        for command in commands {
            self.execute(command);
        }
        let _ = self.snapshot_tx.send(FlowSnapshot::of(&self.state));
    }

    /// Waits for the next internal event (tick or gateway reply) and applies
    /// it. Internal senders live as long as the flow, so this only returns
    /// after an event was applied.
    pub async fn pump(&mut self) {
        let event = self.events_rx.recv().await;
        if let Some(event) = event {
            self.dispatch(event);
        }
    }

    /// Drives the flow until the in-flight gateway call, if any, has resolved
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            self.pump().await;
        }
    }

    /// Consumes the flow, applying inputs and events until every
    /// [`FlowHandle`] has been dropped
    pub async fn run(mut self) {
        loop {
            let next = tokio::select! {
                maybe_input = self.inputs_rx.recv() => maybe_input,
                maybe_event = self.events_rx.recv() => maybe_event,
            };
            match next {
                Some(input) => self.dispatch(input),
                // Only the input channel can close: every handle was dropped,
                // so the session is torn down
                None => break,
            }
        }
        tracing::debug!(flow_id = %self.flow_id, event = "flow_stopped", "Verification flow torn down");
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::RequestCode { email, generation } => {
                let gateway = Arc::clone(&self.gateway);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.request_code(&email).await;
                    let _ = events.send(FlowInput::GatewayReply {
                        generation,
                        reply: GatewayReply::CodeRequested(result),
                    });
                });
            }
            Command::ConfirmCode {
                email,
                code,
                generation,
            } => {
                let gateway = Arc::clone(&self.gateway);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.confirm_code(&email, &code).await;
                    let _ = events.send(FlowInput::GatewayReply {
                        generation,
                        reply: GatewayReply::CodeConfirmed(result),
                    });
                });
            }
            Command::ResetPassword {
                email,
                new_password,
                generation,
            } => {
                let gateway = Arc::clone(&self.gateway);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.reset_password(&email, &new_password).await;
                    let _ = events.send(FlowInput::GatewayReply {
                        generation,
                        reply: GatewayReply::PasswordReset(result),
                    });
                });
            }
            Command::StartCooldown { seconds } => {
                tracing::debug!(seconds, event = "cooldown_started", "Cooldown ticker started");
                self.ticker = Some(CooldownTicker::spawn(self.events_tx.clone()));
            }
            Command::StopCooldown => {
                // Dropping the ticker aborts its task
                self.ticker = None;
            }
        }
    }
}
