//! Remote storage access.
//!
//! The downloader only talks to the remote through [`RemoteTransport`], so the
//! pipeline can run against [`DriveTransport`] in production and an in-memory fake
//! in tests.

mod drive;

pub use drive::DriveTransport;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::TransportError;
use crate::types::{FileId, RemoteItem};

/// Raw content of a remote file
pub type ContentStream = Box<dyn AsyncRead + Send + Unpin>;

/// Authenticated access to a hierarchical remote store.
///
/// Implementations must be safe to call from many jobs at once.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Fetch the name and parent identifiers of an item
    async fn fetch_metadata(&self, id: &FileId) -> Result<RemoteItem, TransportError>;

    /// Open a stream over the raw bytes of a file
    async fn fetch_content(&self, id: &FileId) -> Result<ContentStream, TransportError>;
}
