use std::fmt;

use chrono::{DateTime, Utc};

/// Failure of a single page request.
#[derive(Debug)]
pub enum FetchError {
    /// Network failure, non-success status or undecodable body reported by reqwest.
    Http(reqwest::Error),
    /// The access token was rejected (401).
    Unauthorized,
    /// The API asked us to slow down (429). `retry_after` is in seconds.
    RateLimited { retry_after: Option<u64> },
    Status { status: u16, message: String },
    /// A chain that ended without a result, e.g. after its page source panicked.
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "request failed: {}", err),
            FetchError::Unauthorized => write!(f, "access token was rejected"),
            FetchError::RateLimited {
                retry_after: Some(secs),
            } => write!(f, "rate limited, retry after {} seconds", secs),
            FetchError::RateLimited { retry_after: None } => write!(f, "rate limited"),
            FetchError::Status { status, message } => {
                write!(f, "unexpected status {}: {}", status, message)
            }
            FetchError::Other(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

/// Terminal failures of a traversal, either before it starts or mid-chain.
#[derive(Debug)]
pub enum AggregateError {
    AuthMissing,
    AuthExpired {
        expired_at: DateTime<Utc>,
    },
    Transport {
        key: String,
        offset: u32,
        source: FetchError,
    },
}

impl AggregateError {
    /// True for the variants that require the user to (re)authenticate.
    pub fn needs_login(&self) -> bool {
        match self {
            AggregateError::AuthMissing | AggregateError::AuthExpired { .. } => true,
            AggregateError::Transport { source, .. } => {
                matches!(source, FetchError::Unauthorized)
            }
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateError::AuthMissing => write!(f, "no access token available"),
            AggregateError::AuthExpired { expired_at } => {
                write!(f, "access token expired at {}", expired_at.to_rfc3339())
            }
            AggregateError::Transport {
                key,
                offset,
                source,
            } => write!(
                f,
                "fetching page at offset {} of '{}' failed: {}",
                offset, key, source
            ),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AggregateError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
