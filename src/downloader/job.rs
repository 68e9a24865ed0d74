//! Job pipeline -- metadata, ancestor path, content, local file.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::JobError;
use crate::materializer::materialize;
use crate::resolver::resolve_path;
use crate::transport::RemoteTransport;
use crate::types::FileId;

/// Everything one job needs, owned by its task
pub(crate) struct JobContext {
    pub(crate) id: FileId,
    pub(crate) transport: Arc<dyn RemoteTransport>,
    pub(crate) config: Arc<Config>,
}

/// Run a job to its terminal state, logging a failure instead of returning it
pub(crate) async fn run_job(ctx: JobContext) {
    match execute(&ctx).await {
        Ok(dest) => {
            tracing::debug!(file_id = %ctx.id, path = %dest.display(), "Download complete");
        }
        Err(e) => {
            tracing::error!(file_id = %ctx.id, stage = %e.stage(), error = %e, "Download failed");
        }
    }
}

/// The four stages in order; the first error skips the rest
pub(crate) async fn execute(ctx: &JobContext) -> Result<PathBuf, JobError> {
    let item = ctx
        .transport
        .fetch_metadata(&ctx.id)
        .await
        .map_err(|source| JobError::MetadataFetch {
            id: ctx.id.clone(),
            source,
        })?;

    let path = resolve_path(ctx.transport.as_ref(), &item, ctx.config.max_ancestor_depth).await?;

    let content = ctx
        .transport
        .fetch_content(&ctx.id)
        .await
        .map_err(|source| JobError::ContentDownload {
            id: ctx.id.clone(),
            source,
        })?;

    materialize(&ctx.config.destination_root, &path, &item.name, content).await
}
