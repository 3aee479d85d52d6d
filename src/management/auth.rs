use std::{fmt, io::Error, path::PathBuf};

use chrono::{DateTime, Utc};

use crate::{config, paging::AuthContext, spotify, types::Token};

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug)]
pub enum TokenError {
    IoError(Error),
    SerdeError(serde_json::Error),
    HttpError(reqwest::Error),
    Config(String),
    MissingField(&'static str),
    Timeout,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::IoError(e) => write!(f, "token cache: {}", e),
            TokenError::SerdeError(e) => write!(f, "token cache is corrupt: {}", e),
            TokenError::HttpError(e) => write!(f, "token request failed: {}", e),
            TokenError::Config(e) => write!(f, "{}", e),
            TokenError::MissingField(field) => {
                write!(f, "token response is missing '{}'", field)
            }
            TokenError::Timeout => write!(f, "authentication failed or timed out"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<Error> for TokenError {
    fn from(err: Error) -> Self {
        TokenError::IoError(err)
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::SerdeError(err)
    }
}

impl From<reqwest::Error> for TokenError {
    fn from(err: reqwest::Error) -> Self {
        TokenError::HttpError(err)
    }
}

/// Owns the persisted OAuth token and turns it into an [`AuthContext`].
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, TokenError> {
        let content = async_fs::read_to_string(Self::token_path()).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Point in time after which the token must not be used anymore.
    pub fn expiry(&self) -> DateTime<Utc> {
        let expires_at = (self.token.obtained_at + self.token.expires_in)
            .saturating_sub(EXPIRY_MARGIN_SECS);
        DateTime::<Utc>::from_timestamp(expires_at as i64, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expiry()
    }

    /// Refreshes the token when it is expired and stores the new one.
    ///
    /// Returns `Ok(true)` if a refresh happened.
    pub async fn refresh_if_expired(&mut self) -> Result<bool, TokenError> {
        if !self.is_expired() {
            return Ok(false);
        }

        self.token = spotify::auth::refresh_token(&self.token.refresh_token).await?;
        self.persist().await?;
        Ok(true)
    }

    pub fn auth_context(&self) -> AuthContext {
        let token = Some(self.token.access_token.clone()).filter(|t| !t.is_empty());
        AuthContext::new(token, self.expiry())
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
