//! In-memory token store
//!
//! Process-lifetime stand-in for platform persistence (keychain, browser
//! storage). The stored token does not survive a restart.

use std::sync::Mutex;

use vf_core::services::session::SessionStoreTrait;

/// Token store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStoreTrait for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    fn remove(&self) {
        *self.token.lock().unwrap() = None;
    }
}
