//! In-memory transport for exercising the pipeline without network access.

use std::collections::{HashMap, HashSet};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, ReadBuf};

use crate::error::TransportError;
use crate::transport::{ContentStream, RemoteTransport};
use crate::types::{FileId, RemoteItem};

/// Fake remote hierarchy with failure injection and concurrency instrumentation.
///
/// A job counts as live from the metadata lookup of its file (its first request) until
/// the content reader it was handed is dropped, or until its file metadata or content
/// request fails. Jobs that fail while resolving ancestors stay counted, so concurrency
/// assertions should use hierarchies that resolve.
#[derive(Default)]
pub(crate) struct FakeTransport {
    items: HashMap<FileId, RemoteItem>,
    contents: HashMap<FileId, Vec<u8>>,
    failing_metadata: HashSet<FileId>,
    failing_content: HashSet<FileId>,
    metadata_delay: Option<Duration>,
    content_delay: Option<Duration>,
    lookups: Mutex<HashMap<FileId, usize>>,
    live: Arc<AtomicUsize>,
    peak: AtomicUsize,
}

/// Decrements the live job count when dropped
struct LiveJob(Arc<AtomicUsize>);

impl Drop for LiveJob {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Content reader that keeps its job live until the pipeline drops it
struct TrackedReader {
    inner: std::io::Cursor<Vec<u8>>,
    _job: LiveJob,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_item(mut self, id: &str, name: &str, parent: Option<&str>) -> Self {
        let id = FileId::from(id);
        self.items.insert(
            id.clone(),
            RemoteItem {
                id,
                name: name.to_string(),
                parents: parent.into_iter().map(FileId::from).collect(),
            },
        );
        self
    }

    /// Add a folder (no content)
    pub(crate) fn with_folder(self, id: &str, name: &str, parent: Option<&str>) -> Self {
        self.with_item(id, name, parent)
    }

    /// Add a downloadable file
    pub(crate) fn with_file(
        mut self,
        id: &str,
        name: &str,
        parent: Option<&str>,
        content: &[u8],
    ) -> Self {
        self.contents.insert(FileId::from(id), content.to_vec());
        self.with_item(id, name, parent)
    }

    /// Make metadata lookups of `id` fail
    pub(crate) fn fail_metadata(mut self, id: &str) -> Self {
        self.failing_metadata.insert(FileId::from(id));
        self
    }

    /// Make content downloads of `id` fail
    pub(crate) fn fail_content(mut self, id: &str) -> Self {
        self.failing_content.insert(FileId::from(id));
        self
    }

    /// Sleep inside every file metadata lookup
    pub(crate) fn with_metadata_delay(mut self, delay: Duration) -> Self {
        self.metadata_delay = Some(delay);
        self
    }

    /// Sleep before handing out every file's content reader
    pub(crate) fn with_content_delay(mut self, delay: Duration) -> Self {
        self.content_delay = Some(delay);
        self
    }

    /// Metadata lookups made for `id`
    pub(crate) fn lookups(&self, id: &str) -> usize {
        self.lookups
            .lock()
            .unwrap()
            .get(&FileId::from(id))
            .copied()
            .unwrap_or(0)
    }

    /// Metadata lookups made for any id
    pub(crate) fn total_lookups(&self) -> usize {
        self.lookups.lock().unwrap().values().sum()
    }

    /// Highest number of live jobs observed at once
    pub(crate) fn peak_live_jobs(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Jobs currently between their file metadata lookup and the end of their content
    pub(crate) fn live_jobs(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn job_started(&self) {
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn job_ended(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteTransport for FakeTransport {
    async fn fetch_metadata(&self, id: &FileId) -> Result<RemoteItem, TransportError> {
        *self.lookups.lock().unwrap().entry(id.clone()).or_default() += 1;

        let is_file = self.contents.contains_key(id);
        if is_file {
            self.job_started();
            if let Some(delay) = self.metadata_delay {
                tokio::time::sleep(delay).await;
            }
        }

        if self.failing_metadata.contains(id) {
            if is_file {
                self.job_ended();
            }
            return Err(TransportError::Status {
                status: 500,
                body: "injected metadata failure".to_string(),
            });
        }
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                body: format!("File not found: {id}"),
            })
    }

    async fn fetch_content(&self, id: &FileId) -> Result<ContentStream, TransportError> {
        let Some(bytes) = self.contents.get(id).cloned() else {
            return Err(TransportError::Status {
                status: 403,
                body: "Only files with binary content can be downloaded".to_string(),
            });
        };
        if self.failing_content.contains(id) {
            self.job_ended();
            return Err(TransportError::Other("injected download failure".into()));
        }
        if let Some(delay) = self.content_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(Box::new(TrackedReader {
            inner: std::io::Cursor::new(bytes),
            _job: LiveJob(Arc::clone(&self.live)),
        }))
    }
}

/// Create a downloader writing into a fresh temp dir.
/// Returns the downloader, the shared fake, and the tempdir (which must be kept alive).
pub(crate) fn create_test_downloader(
    transport: FakeTransport,
    max_concurrent_jobs: usize,
) -> (super::Downloader, Arc<FakeTransport>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = crate::config::Config {
        max_concurrent_jobs,
        destination_root: temp_dir.path().to_path_buf(),
        ..Default::default()
    };

    let transport = Arc::new(transport);
    let downloader = super::Downloader::new(config, transport.clone()).unwrap();

    (downloader, transport, temp_dir)
}
