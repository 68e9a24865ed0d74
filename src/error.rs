//! Error types for drive-mirror
//!
//! Two layers of errors exist:
//! - [`Error`] covers startup problems (configuration, credentials, token cache).
//!   These are fatal and end the process.
//! - [`JobError`] covers the per-identifier pipeline. These are logged at the job
//!   boundary and never leave the job that produced them.
//!
//! [`TransportError`] is what the remote collaborator returns; job errors wrap it
//! together with the identifier and stage that failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{FileId, JobStage};

/// Result type alias for drive-mirror operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for drive-mirror
///
/// Every variant here is fatal: it is raised once at startup, before any identifier
/// is read.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_jobs")
        key: Option<String>,
    },

    /// OAuth client secrets could not be read or parsed
    #[error("unable to load client secrets from {path}: {message}")]
    Credential {
        /// Path of the client secret file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Obtaining or exchanging an OAuth token failed
    #[error("token error: {0}")]
    Token(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors returned by a [`RemoteTransport`](crate::transport::RemoteTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("remote returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text (may be empty)
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No bearer token could be produced for the request
    #[error("authorization failed: {0}")]
    Auth(String),

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

/// Per-job pipeline errors
///
/// Each variant corresponds to the stage that failed. The remaining stages of the
/// job are skipped and the job ends in the failed state.
#[derive(Debug, Error)]
pub enum JobError {
    /// Fetching the metadata of the requested file failed
    #[error("unable to retrieve file {id}: {source}")]
    MetadataFetch {
        /// Identifier read from input
        id: FileId,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// Fetching one of the ancestors failed while building the folder path
    #[error("unable to retrieve folder path for {id}: parent {ancestor}: {source}")]
    PathResolution {
        /// Identifier read from input
        id: FileId,
        /// The ancestor whose lookup failed
        ancestor: FileId,
        /// Underlying metadata fetch error
        #[source]
        source: TransportError,
    },

    /// The ancestor walk exceeded the configured depth limit
    #[error("folder path for {id} exceeds {limit} ancestors")]
    AncestorDepthExceeded {
        /// Identifier read from input
        id: FileId,
        /// Configured `max_ancestor_depth`
        limit: usize,
    },

    /// Opening the content stream failed
    #[error("unable to download file {id}: {source}")]
    ContentDownload {
        /// Identifier read from input
        id: FileId,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// Creating the destination folder failed
    #[error("unable to create destination folder {path}: {source}")]
    DirectoryCreate {
        /// Folder that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Creating or writing the destination file failed
    #[error("unable to write file content to {path}: {source}")]
    FileWrite {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl JobError {
    /// The pipeline stage that produced this error
    pub fn stage(&self) -> JobStage {
        match self {
            JobError::MetadataFetch { .. } => JobStage::FetchMetadata,
            JobError::PathResolution { .. } | JobError::AncestorDepthExceeded { .. } => {
                JobStage::ResolvePath
            }
            JobError::ContentDownload { .. } => JobStage::Download,
            JobError::DirectoryCreate { .. } | JobError::FileWrite { .. } => JobStage::Write,
        }
    }
}
