//! Domain entities.

pub mod code_buffer;
pub mod password_draft;

pub use code_buffer::{CodeBuffer, CODE_LENGTH};
pub use password_draft::PasswordDraft;
