//! Configuration types for drive-mirror

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Scope requested during the OAuth consent flow
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// Drive REST API settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the Drive v3 API (default: "https://www.googleapis.com/drive/v3")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Send `supportsAllDrives=true` so items in shared drives resolve (default: true)
    #[serde(default = "default_true")]
    pub supports_all_drives: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            supports_all_drives: true,
        }
    }
}

/// Credential and token cache locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth client secret file (None = `~/.credentials.json`)
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// Cached token file (default: "token.json")
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    /// OAuth scope to request
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            token_path: default_token_path(),
            scope: default_scope(),
        }
    }
}

impl AuthConfig {
    /// Resolve the client secret path, falling back to `~/.credentials.json`
    pub fn resolved_credentials_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.credentials_path {
            return Ok(path.clone());
        }
        home::home_dir()
            .map(|home| home.join(".credentials.json"))
            .ok_or_else(|| Error::Config {
                message: "unable to determine home directory".to_string(),
                key: Some("credentials_path".to_string()),
            })
    }
}

/// Main configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of jobs past admission at once (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_jobs: usize,

    /// Root under which the remote hierarchy is recreated (default: ".")
    #[serde(default = "default_destination_root")]
    pub destination_root: PathBuf,

    /// Upper bound on ancestor lookups per file (None = follow parents until the root)
    ///
    /// Without a bound, a parent cycle in the remote hierarchy makes the job walk
    /// forever while holding its permit.
    #[serde(default)]
    pub max_ancestor_depth: Option<usize>,

    /// Drive API settings
    #[serde(default)]
    pub drive: DriveConfig,

    /// Credential settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent(),
            destination_root: default_destination_root(),
            max_ancestor_depth: None,
            drive: DriveConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the downloader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_jobs == 0 {
            return Err(Error::Config {
                message: "max_concurrent_jobs must be at least 1".to_string(),
                key: Some("max_concurrent_jobs".to_string()),
            });
        }
        if url::Url::parse(&self.drive.api_base_url).is_err() {
            return Err(Error::Config {
                message: format!("invalid API base URL: {}", self.drive.api_base_url),
                key: Some("api_base_url".to_string()),
            });
        }
        Ok(())
    }
}

fn default_max_concurrent() -> usize {
    10
}

fn default_destination_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_scope() -> String {
    DRIVE_READONLY_SCOPE.to_string()
}

fn default_true() -> bool {
    true
}
