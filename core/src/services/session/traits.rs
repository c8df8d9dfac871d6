//! Traits for token persistence and claims decoding

use crate::errors::TokenError;

use super::types::Claims;

/// Trait for persisting the opaque authentication token
pub trait SessionStoreTrait: Send + Sync {
    /// The stored token, if any
    fn get(&self) -> Option<String>;

    /// Persist a token, replacing any previous one
    fn set(&self, token: &str);

    /// Remove the stored token
    fn remove(&self);
}

/// Trait for extracting identity claims from an opaque token
pub trait ClaimsDecoderTrait: Send + Sync {
    /// Decode the claims carried by `token`
    fn decode(&self, token: &str) -> Result<Claims, TokenError>;
}
