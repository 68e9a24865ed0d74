//! OAuth token and its on-disk cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Tokens are treated as expired this many seconds before their actual expiry
const EXPIRY_DELTA_SECS: i64 = 10;

/// Cached OAuth token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer token sent with API requests
    pub access_token: String,
    /// Token type reported by the server (usually "Bearer")
    #[serde(default)]
    pub token_type: String,
    /// Long-lived token used to obtain new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the access token stops being valid (None = never)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Whether the access token must be refreshed before use at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return true;
        }
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_DELTA_SECS) <= now,
            None => false,
        }
    }
}

/// Response body of the token endpoint
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert to a [`Token`], anchoring `expires_in` at `now`
    pub(super) fn into_token(self, now: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token,
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// Read a cached token
pub async fn load_token(path: &Path) -> Result<Token> {
    let bytes = tokio::fs::read(path).await?;
    let token = serde_json::from_slice(&bytes)?;
    Ok(token)
}

/// Write a token to the cache, readable only by the current user
pub async fn save_token(path: &Path, token: &Token) -> Result<()> {
    tracing::info!(path = %path.display(), "Saving credential file");

    let json = serde_json::to_vec(token)?;
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await.map_err(|e| {
        Error::Token(format!("unable to cache token at {}: {e}", path.display()))
    })?;
    file.write_all(&json).await?;
    file.flush().await?;
    Ok(())
}
