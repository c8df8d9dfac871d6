//! HTTP Authentication Gateway Implementation
//!
//! Implements `AuthGatewayTrait` against the gateway's REST endpoints.
//! Transport failures and responses carrying no usable message surface as
//! `GatewayError::Unreachable`; rejections with a server message surface as
//! `GatewayError::Rejected`, and rejections of the confirm endpoint as
//! `GatewayError::InvalidCode`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use vf_core::errors::GatewayError;
use vf_core::services::verification::AuthGatewayTrait;
use vf_shared::config::GatewayConfig;
use vf_shared::types::{ErrorBody, VerifyResponse};

use crate::InfrastructureError;

const REQUEST_PATH: &str = "/auth/verify/request";
const CONFIRM_PATH: &str = "/auth/verify/confirm";
const RESET_PATH: &str = "/auth/verify/reset-password";

#[derive(Debug, Serialize)]
struct RequestCodeBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ConfirmCodeBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordBody<'a> {
    email: &'a str,
    #[serde(rename = "newPassword")]
    new_password: &'a str,
}

/// HTTP client for the authentication gateway
pub struct HttpAuthGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpAuthGateway {
    /// Create a new gateway client
    pub fn new(config: GatewayConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        debug!(base_url = %config.base_url, "HTTP auth gateway initialized");
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(GatewayConfig::from_env())
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        is_confirm: bool,
    ) -> Result<VerifyResponse, GatewayError> {
        let url = self.config.endpoint(path);
        debug!(%url, "Calling authentication gateway");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| {
                warn!(%error, %url, "Gateway request failed to send");
                GatewayError::Unreachable
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<VerifyResponse>().await.map_err(|error| {
                warn!(%error, %url, "Gateway response body was not valid JSON");
                GatewayError::Unreachable
            });
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "Gateway rejected the request");
        Err(classify_rejection(status, body.message, is_confirm))
    }
}

/// Map a non-success gateway response onto the flow's error taxonomy
fn classify_rejection(
    status: StatusCode,
    message: Option<String>,
    is_confirm: bool,
) -> GatewayError {
    if is_confirm && status.is_client_error() {
        return GatewayError::InvalidCode;
    }
    match message {
        Some(message) if !message.trim().is_empty() => GatewayError::Rejected { message },
        _ => GatewayError::Unreachable,
    }
}

#[async_trait]
impl AuthGatewayTrait for HttpAuthGateway {
    async fn request_code(&self, email: &str) -> Result<VerifyResponse, GatewayError> {
        self.post(REQUEST_PATH, &RequestCodeBody { email }, false)
            .await
    }

    async fn confirm_code(&self, email: &str, code: &str) -> Result<VerifyResponse, GatewayError> {
        self.post(CONFIRM_PATH, &ConfirmCodeBody { email, code }, true)
            .await
    }

    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<VerifyResponse, GatewayError> {
        self.post(
            RESET_PATH,
            &ResetPasswordBody {
                email,
                new_password,
            },
            false,
        )
        .await
    }
}
