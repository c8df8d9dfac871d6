//! End-to-end wiring demo against a running authentication gateway
//!
//! Usage:
//!     VERIFLOW_GATEWAY_URL=http://localhost:8080/api/v1 \
//!         cargo run --example verification_demo -- user@example.com

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use vf_core::services::verification::{
    FlowInput, FlowMode, Step, VerificationFlow, VerificationFlowConfig,
};
use vf_infra::gateway::HttpAuthGateway;
use vf_infra::load_gateway_config;
use vf_shared::utils::validation::validators;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let email = std::env::args().nth(1).unwrap_or_default();
    if !validators::is_valid_email(&email) {
        anyhow::bail!("usage: verification_demo <email>");
    }

    let gateway = Arc::new(HttpAuthGateway::new(load_gateway_config())?);
    let mut flow = VerificationFlow::new(
        gateway,
        VerificationFlowConfig::default(),
        FlowMode::Verify,
        email,
    );

    flow.dispatch(FlowInput::SubmitEmail);
    flow.settle().await;

    if flow.state().step() != Step::CodeEntry {
        anyhow::bail!(
            "code request failed: {}",
            flow.state().last_error().unwrap_or("unknown error")
        );
    }

    println!("A verification code was sent to your inbox.");
    print!("Enter the 6-digit code: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    flow.dispatch(FlowInput::Paste(line.trim().to_string()));
    flow.settle().await;

    match flow.state().step() {
        Step::Succeeded => println!(
            "{}",
            flow.state().last_success().unwrap_or("Email verified.")
        ),
        _ => println!(
            "{}",
            flow.state().last_error().unwrap_or("Verification failed.")
        ),
    }

    Ok(())
}
