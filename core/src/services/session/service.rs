//! Session service implementation

use std::sync::Arc;

use chrono::Utc;

use crate::errors::{FlowResult, TokenError};

use super::traits::{ClaimsDecoderTrait, SessionStoreTrait};
use super::types::Claims;

/// Service establishing and querying the authenticated context
///
/// Performs no I/O of its own: the store and the decoder are injected, and
/// the token string flows between them untouched.
pub struct SessionService<S: SessionStoreTrait, D: ClaimsDecoderTrait> {
    store: Arc<S>,
    decoder: Arc<D>,
}

impl<S: SessionStoreTrait, D: ClaimsDecoderTrait> SessionService<S, D> {
    /// Create a new session service
    pub fn new(store: Arc<S>, decoder: Arc<D>) -> Self {
        Self { store, decoder }
    }

    /// Persist a freshly issued token and return its claims
    ///
    /// Tokens that fail to decode or have already expired are rejected and
    /// nothing is stored.
    pub fn login(&self, token: &str) -> FlowResult<Claims> {
        let claims = self.decoder.decode(token)?;
        if claims.is_expired_at(Utc::now()) {
            return Err(TokenError::TokenExpired.into());
        }

        self.store.set(token);
        tracing::info!(
            subject = %claims.subject,
            event = "session_started",
            "Session established"
        );
        Ok(claims)
    }

    /// Clear the stored token
    pub fn logout(&self) {
        self.store.remove();
        tracing::info!(event = "session_ended", "Session cleared");
    }

    /// Claims of the current session, if a valid token is stored
    ///
    /// Stored tokens that no longer decode or have expired are evicted.
    pub fn current(&self) -> Option<Claims> {
        let token = self.store.get()?;
        match self.decoder.decode(&token) {
            Ok(claims) if !claims.is_expired_at(Utc::now()) => Some(claims),
            Ok(_) => {
                tracing::debug!(event = "session_expired", "Stored token expired, evicting");
                self.store.remove();
                None
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    event = "session_invalid",
                    "Stored token no longer decodes, evicting"
                );
                self.store.remove();
                None
            }
        }
    }

    /// Whether a valid session exists
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}
