use chrono::{DateTime, Utc};

use super::AggregateError;

/// Credentials handed to a traversal at start time.
///
/// The aggregator only checks that a token exists and has not expired. A token
/// that expires while a traversal is running surfaces as a page failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
    expiry: DateTime<Utc>,
}

impl AuthContext {
    pub fn new(token: Option<String>, expiry: DateTime<Utc>) -> Self {
        Self { token, expiry }
    }

    /// A context without any token. Every traversal started with it fails
    /// with [`AggregateError::AuthMissing`].
    pub fn anonymous() -> Self {
        Self {
            token: None,
            expiry: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn token_exists(&self) -> bool {
        self.token.is_some()
    }

    pub fn token_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns the bearer token if it can be used right now.
    pub fn bearer(&self) -> Result<&str, AggregateError> {
        self.bearer_at(Utc::now())
    }

    pub fn bearer_at(&self, now: DateTime<Utc>) -> Result<&str, AggregateError> {
        let Some(token) = self.token.as_deref() else {
            return Err(AggregateError::AuthMissing);
        };

        if !self.token_valid_at(now) {
            return Err(AggregateError::AuthExpired {
                expired_at: self.expiry,
            });
        }

        Ok(token)
    }
}
