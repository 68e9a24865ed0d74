//! drive-mirror - download Drive files listed on stdin into a mirrored folder tree.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use drive_mirror::auth::{ClientSecret, OAuthTokenSource, StaticToken, TokenProvider};
use drive_mirror::{
    Config, Downloader, DriveTransport, RunReport, obtain_token, spawn_interrupt_listener,
};

/// Download Google Drive files by identifier, one per line on stdin
#[derive(Parser, Debug)]
#[command(name = "drive-mirror")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Maximum number of files processed at once
    #[arg(short = 'j', long, default_value_t = 10)]
    concurrency: usize,

    /// Directory the Drive hierarchy is recreated in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// OAuth client secret file [default: ~/.credentials.json]
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Cached OAuth token file
    #[arg(long, default_value = "token.json")]
    token_file: PathBuf,

    /// Give up on a file after this many ancestor folders (unbounded by default)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Drive API base URL
    #[arg(long, default_value = "https://www.googleapis.com/drive/v3")]
    api_base_url: String,

    /// Use this access token instead of the OAuth flow
    #[arg(long, env = "DRIVE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Enable debug logging (on top of any RUST_LOG directives)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        let mut config = Config {
            max_concurrent_jobs: self.concurrency,
            destination_root: self.output_dir.clone(),
            max_ancestor_depth: self.max_depth,
            ..Default::default()
        };
        config.drive.api_base_url = self.api_base_url.clone();
        config.auth.credentials_path = self.credentials.clone();
        config.auth.token_path = self.token_file.clone();
        config
    }
}

/// Log filter from `RUST_LOG` directives, defaulting to `info`
///
/// `verbose` raises the default level to debug while keeping any per-target directives.
fn log_filter(directives: Option<&str>, verbose: bool) -> EnvFilter {
    let mut filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        filter = filter.add_directive(LevelFilter::DEBUG.into());
    }
    filter
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(directives.as_deref(), cli.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(report) => {
            tracing::debug!(admitted = report.admitted, "All jobs finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> drive_mirror::Result<RunReport> {
    let config = cli.to_config();
    config.validate()?;

    let client = reqwest::Client::new();
    // Shared by the consent prompt and the identifier stream
    let mut input = tokio::io::BufReader::new(tokio::io::stdin());

    let tokens: Arc<dyn TokenProvider> = match cli.access_token {
        Some(token) => Arc::new(StaticToken::new(token)),
        None => {
            let secret_path = config.auth.resolved_credentials_path()?;
            let secret = ClientSecret::load(&secret_path).await?;
            let token = obtain_token(&client, &secret, &config.auth, &mut input).await?;
            Arc::new(OAuthTokenSource::new(client.clone(), secret, token))
        }
    };

    let transport = DriveTransport::new(client, &config.drive, tokens)?;
    let downloader = Downloader::new(config, Arc::new(transport))?;

    let _listener = spawn_interrupt_listener();
    Ok(downloader.run(input).await)
}
