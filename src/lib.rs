//! # drive-mirror
//!
//! Downloads Google Drive files by identifier and recreates their folder hierarchy
//! on local disk.
//!
//! Identifiers are read one per line. Each one becomes an independent job:
//! fetch metadata, walk the parent chain to build the folder path, download the
//! content, write it below the destination root. At most
//! [`Config::max_concurrent_jobs`] jobs run at once; a failing job is logged and
//! never affects the others.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use drive_mirror::{Config, Downloader, DriveTransport, StaticToken};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let transport = DriveTransport::new(
//!         reqwest::Client::new(),
//!         &config.drive,
//!         Arc::new(StaticToken::new("ya29.access-token")),
//!     )?;
//!     let downloader = Downloader::new(config, Arc::new(transport))?;
//!
//!     let input = tokio::io::BufReader::new(tokio::io::stdin());
//!     let report = downloader.run(input).await;
//!     println!("admitted {} jobs", report.admitted);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// OAuth credentials and token handling
pub mod auth;
/// Configuration types
pub mod config;
/// Bounded-parallelism download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Writing content to local disk
pub mod materializer;
/// Ancestor path resolution
pub mod resolver;
/// Advisory interrupt handling
pub mod shutdown;
/// Remote storage access
pub mod transport;
/// Core types
pub mod types;

// Re-export commonly used types
pub use auth::{ClientSecret, OAuthTokenSource, StaticToken, Token, TokenProvider, obtain_token};
pub use config::{AuthConfig, Config, DriveConfig};
pub use downloader::{Downloader, RunReport};
pub use error::{Error, JobError, Result, TransportError};
pub use shutdown::spawn_interrupt_listener;
pub use transport::{ContentStream, DriveTransport, RemoteTransport};
pub use types::{FileId, JobStage, RemoteItem, ResolvedPath};
