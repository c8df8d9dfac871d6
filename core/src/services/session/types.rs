//! Types for the authenticated session

use chrono::{DateTime, Utc};

/// Identity claims extracted from the authentication token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject identifier of the account
    pub subject: String,

    /// Email address bound to the account, when the token carries one
    pub email: Option<String>,

    /// Expiry instant, when the token carries one
    pub expires_at: Option<DateTime<Utc>>,
}

impl Claims {
    /// Whether the token had expired at `now`
    ///
    /// Tokens without an expiry claim never expire client-side; the gateway
    /// remains the authority on their validity.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}
