//! JWT claims decoder
//!
//! Extracts identity claims from the gateway-issued token without verifying
//! the signature: the client treats the token as opaque and leaves
//! authenticity to the server. Expiry is surfaced as a claim and enforced by
//! the session service, not during decoding.

use chrono::DateTime;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use vf_core::errors::TokenError;
use vf_core::services::session::{Claims, ClaimsDecoderTrait};

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Claims decoder for JWT-shaped tokens
pub struct JwtClaimsDecoder {
    validation: Validation,
}

impl JwtClaimsDecoder {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        // Expiry is reported through the claims, not enforced here
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self { validation }
    }
}

impl Default for JwtClaimsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsDecoderTrait for JwtClaimsDecoder {
    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &self.validation)
            .map_err(|error| {
                tracing::debug!(%error, "Token failed to decode");
                TokenError::InvalidTokenFormat
            })?;

        let subject = data.claims.sub.ok_or(TokenError::MissingClaim {
            claim: "sub".to_string(),
        })?;
        let expires_at = match data.claims.exp {
            Some(seconds) => {
                Some(DateTime::from_timestamp(seconds, 0).ok_or(TokenError::InvalidClaims)?)
            }
            None => None,
        };

        Ok(Claims {
            subject,
            email: data.claims.email,
            expires_at,
        })
    }
}
