//! Core downloader implementation split into focused submodules.
//!
//! - [`intake`] - Reads identifiers, admits jobs under the concurrency ceiling, waits
//!   for the drain
//! - [`job`] - The per-identifier pipeline (metadata, path, download, write)

mod intake;
mod job;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::transport::RemoteTransport;

/// Outcome of one [`Downloader::run`]
///
/// Per-job results are not collected; failures only show up in the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of identifiers that were admitted as jobs
    pub admitted: u64,
}

/// Bounded-parallelism downloader
///
/// Every admitted identifier runs in its own task. At most
/// `config.max_concurrent_jobs` tasks hold an admission permit at once.
#[derive(Clone)]
pub struct Downloader {
    transport: Arc<dyn RemoteTransport>,
    config: Arc<Config>,
    /// Admission permits (one per running job)
    admission: Arc<tokio::sync::Semaphore>,
}

impl Downloader {
    /// Create a downloader over the given transport
    pub fn new(config: Config, transport: Arc<dyn RemoteTransport>) -> Result<Self> {
        config.validate()?;
        let admission = Arc::new(tokio::sync::Semaphore::new(config.max_concurrent_jobs));

        Ok(Self {
            transport,
            config: Arc::new(config),
            admission,
        })
    }

    /// The configuration this downloader runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Permits not currently held by a job
    pub fn available_permits(&self) -> usize {
        self.admission.available_permits()
    }
}
