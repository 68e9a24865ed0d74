//! Google OAuth client secret file (`credentials.json`).

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Top-level layout of the file downloaded from the Google Cloud console
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

/// OAuth client registration
#[derive(Clone, Debug, Deserialize)]
pub struct ClientSecret {
    /// OAuth client identifier
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Consent page endpoint
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token exchange endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Registered redirect URIs; the first is used
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl ClientSecret {
    /// Parse a client secret file's contents
    ///
    /// Accepts both the `installed` and `web` application layouts.
    pub fn from_json(bytes: &[u8]) -> std::result::Result<Self, String> {
        let file: ClientSecretFile = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let secret = file
            .installed
            .or(file.web)
            .ok_or_else(|| "no \"installed\" or \"web\" client entry".to_string())?;

        if secret.redirect_uris.is_empty() {
            return Err("missing redirect URL".to_string());
        }
        Ok(secret)
    }

    /// Read and parse a client secret file
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| Error::Credential {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&bytes).map_err(|message| Error::Credential {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Redirect URI sent with the consent request and the code exchange
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Consent page URL asking for offline access to `scope`
    pub fn authorization_url(&self, scope: &str, state: &str) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.auth_uri)
            .map_err(|e| Error::Token(format!("invalid auth_uri {}: {e}", self.auth_uri)))?;
        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", scope)
            .append_pair("state", state);
        Ok(url)
    }
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}
