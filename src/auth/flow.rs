//! Interactive consent flow and the refreshing token source.

use async_trait::async_trait;
use chrono::Utc;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::TokenProvider;
use super::credentials::ClientSecret;
use super::token::{Token, TokenResponse, load_token, save_token};
use crate::config::AuthConfig;
use crate::error::{Error, Result, TransportError};

/// Opaque value round-tripped through the consent page
const CONSENT_STATE: &str = "state-token";

/// Load the cached token, or run the consent flow and cache the result.
///
/// The authorization code is read as one line from `input`. Pass the same buffered
/// reader that later feeds identifiers to the downloader so no input is lost.
pub async fn obtain_token<R>(
    client: &reqwest::Client,
    secret: &ClientSecret,
    auth: &AuthConfig,
    input: &mut R,
) -> Result<Token>
where
    R: AsyncBufRead + Unpin,
{
    match load_token(&auth.token_path).await {
        Ok(token) => return Ok(token),
        Err(e) => {
            tracing::debug!(path = %auth.token_path.display(), error = %e, "No usable cached token")
        }
    }

    let url = secret.authorization_url(&auth.scope, CONSENT_STATE)?;
    {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Go to the following link in your browser:\n{url}")?;
        write!(stdout, "Then type the authorization code: ")?;
        stdout.flush()?;
    }

    let mut code = String::new();
    input.read_line(&mut code).await?;
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::Token("unable to read authorization code".into()));
    }

    let token = exchange_code(client, secret, code).await?;
    save_token(&auth.token_path, &token).await?;
    Ok(token)
}

/// Trade an authorization code for a token
pub(super) async fn exchange_code(
    client: &reqwest::Client,
    secret: &ClientSecret,
    code: &str,
) -> Result<Token> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("redirect_uri", secret.redirect_uri()),
    ];
    request_token(client, &secret.token_uri, &params)
        .await
        .map_err(|e| Error::Token(format!("unable to retrieve token from web: {e}")))
}

async fn request_token(
    client: &reqwest::Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> std::result::Result<Token, TransportError> {
    let response = client.post(token_uri).form(params).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    let parsed: TokenResponse = serde_json::from_slice(&body)?;
    Ok(parsed.into_token(Utc::now()))
}

/// Token provider that refreshes the access token shortly before it expires
///
/// Refreshed tokens stay in memory; the on-disk cache is only written by
/// [`obtain_token`].
pub struct OAuthTokenSource {
    client: reqwest::Client,
    secret: ClientSecret,
    token: tokio::sync::Mutex<Token>,
}

impl OAuthTokenSource {
    /// Wrap an initial token
    pub fn new(client: reqwest::Client, secret: ClientSecret, token: Token) -> Self {
        Self {
            client,
            secret,
            token: tokio::sync::Mutex::new(token),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> std::result::Result<Token, TransportError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
        ];
        let mut fresh = request_token(&self.client, &self.secret.token_uri, &params).await?;
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = Some(refresh_token.to_string());
        }
        Ok(fresh)
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenSource {
    async fn access_token(&self) -> std::result::Result<String, TransportError> {
        // Held across the refresh so concurrent jobs wait for one refresh.
        let mut token = self.token.lock().await;
        if token.is_expired(Utc::now()) {
            let refresh_token = token.refresh_token.clone().ok_or_else(|| {
                TransportError::Auth("access token expired and no refresh token".to_string())
            })?;
            let fresh = self
                .refresh(&refresh_token)
                .await
                .map_err(|e| TransportError::Auth(format!("token refresh failed: {e}")))?;
            tracing::debug!(expiry = ?fresh.expiry, "Refreshed access token");
            *token = fresh;
        }
        Ok(token.access_token.clone())
    }
}
