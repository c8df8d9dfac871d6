//! Session module for the post-verification authenticated context
//!
//! Persists the gateway-issued token and exposes the identity claims it
//! carries. The token is opaque to this module: an injected decoder extracts
//! the claims and an injected store persists the raw string.

mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use service::SessionService;
pub use traits::{ClaimsDecoderTrait, SessionStoreTrait};
pub use types::Claims;
