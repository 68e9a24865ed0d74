//! OAuth plumbing that produces bearer tokens for the Drive transport.
//!
//! - [`credentials`] - Google client secret file
//! - [`token`] - Token type and the on-disk token cache
//! - [`flow`] - Interactive consent flow and the refreshing token source

mod credentials;
mod flow;
mod token;

pub use credentials::ClientSecret;
pub use flow::{OAuthTokenSource, obtain_token};
pub use token::{Token, load_token, save_token};

use async_trait::async_trait;

use crate::error::TransportError;

/// Supplies the bearer token attached to every Drive request
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently valid access token
    async fn access_token(&self) -> Result<String, TransportError>;
}

/// A fixed access token, never refreshed
#[derive(Clone, Debug)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap an access token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, TransportError> {
        Ok(self.0.clone())
    }
}
