//! Shared type definitions for gateway payloads.

pub mod response;

pub use response::{ErrorBody, VerifyResponse};
