//! # Veriflow Shared
//!
//! Cross-cutting types shared by the core flow and the infrastructure layer:
//! gateway wire payloads, configuration structures, and validation utilities.

pub mod config;
pub mod types;
pub mod utils;
