//! Google Drive v3 implementation of [`RemoteTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde::Deserialize;
use tokio_util::io::StreamReader;

use super::{ContentStream, RemoteTransport};
use crate::auth::TokenProvider;
use crate::config::DriveConfig;
use crate::error::{Error, Result, TransportError};
use crate::types::{FileId, RemoteItem};

/// Fields requested for metadata lookups
const METADATA_FIELDS: &str = "name,parents";

/// Subset of the Drive `File` resource we ask for
#[derive(Debug, Deserialize)]
struct FileResource {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
}

/// Drive REST client sharing one connection pool across all jobs
pub struct DriveTransport {
    client: reqwest::Client,
    base_url: url::Url,
    supports_all_drives: bool,
    tokens: Arc<dyn TokenProvider>,
}

impl DriveTransport {
    /// Create a transport for the configured API endpoint
    pub fn new(
        client: reqwest::Client,
        config: &DriveConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let base_url = url::Url::parse(&config.api_base_url).map_err(|e| Error::Config {
            message: format!("invalid API base URL {}: {}", config.api_base_url, e),
            key: Some("api_base_url".to_string()),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("API base URL cannot be a base: {}", config.api_base_url),
                key: Some("api_base_url".to_string()),
            });
        }

        Ok(Self {
            client,
            base_url,
            supports_all_drives: config.supports_all_drives,
            tokens,
        })
    }

    /// `{base}/files/{id}`, with the identifier percent-encoded as one segment
    fn file_url(&self, id: &FileId) -> std::result::Result<url::Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Other("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("files")
            .push(id.as_str());
        if self.supports_all_drives {
            url.query_pairs_mut()
                .append_pair("supportsAllDrives", "true");
        }
        Ok(url)
    }

    async fn get(&self, url: url::Url) -> std::result::Result<reqwest::Response, TransportError> {
        let token = self.tokens.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteTransport for DriveTransport {
    async fn fetch_metadata(&self, id: &FileId) -> std::result::Result<RemoteItem, TransportError> {
        let mut url = self.file_url(id)?;
        url.query_pairs_mut().append_pair("fields", METADATA_FIELDS);

        let body = self.get(url).await?.bytes().await?;
        let resource: FileResource = serde_json::from_slice(&body)?;

        tracing::trace!(
            file_id = %id,
            name = %resource.name,
            parents = resource.parents.len(),
            "Fetched metadata"
        );

        Ok(RemoteItem {
            id: id.clone(),
            name: resource.name,
            parents: resource.parents.into_iter().map(FileId::from).collect(),
        })
    }

    async fn fetch_content(
        &self,
        id: &FileId,
    ) -> std::result::Result<ContentStream, TransportError> {
        let mut url = self.file_url(id)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.get(url).await?;
        let stream = response.bytes_stream().map_err(std::io::Error::other);

        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }
}
