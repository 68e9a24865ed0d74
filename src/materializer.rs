//! Writing downloaded content below the destination root.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::JobError;
use crate::types::ResolvedPath;

/// Directory used when the destination root is empty
pub const CURRENT_DIR_MARKER: &str = ".";

/// Replacement for characters and names that cannot be a single path component
const REPLACEMENT: &str = "_";

/// Turn a remote display name into one path component.
///
/// Remote names may contain separators or be `.`/`..`; neither may change which
/// directory a file lands in.
pub fn sanitize_component(name: &str) -> String {
    match name {
        "" | "." | ".." => REPLACEMENT.to_string(),
        _ => name.replace(['/', '\\'], REPLACEMENT),
    }
}

/// Directory a file with the given ancestors is written to
pub fn destination_dir(root: &Path, path: &ResolvedPath) -> PathBuf {
    let mut dir = if root.as_os_str().is_empty() {
        PathBuf::from(CURRENT_DIR_MARKER)
    } else {
        root.to_path_buf()
    };
    for segment in path.segments() {
        dir.push(sanitize_component(segment));
    }
    dir
}

/// Create the folder chain for `path` under `root` and copy `content` into
/// `file_name` there, truncating any existing file.
///
/// A failure during the copy leaves the partially written file in place.
pub async fn materialize<R>(
    root: &Path,
    path: &ResolvedPath,
    file_name: &str,
    mut content: R,
) -> Result<PathBuf, JobError>
where
    R: AsyncRead + Unpin,
{
    let dir = destination_dir(root, path);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| JobError::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;

    let dest = dir.join(sanitize_component(file_name));
    let write_err = |source: std::io::Error| JobError::FileWrite {
        path: dest.clone(),
        source,
    };

    let mut file = tokio::fs::File::create(&dest).await.map_err(write_err)?;
    let copied = tokio::io::copy(&mut content, &mut file).await;
    // Flush even after a failed copy so the bytes already handed to the file land on disk.
    let flushed = file.flush().await;
    let bytes = copied.map_err(write_err)?;
    flushed.map_err(write_err)?;

    tracing::trace!(path = %dest.display(), bytes, "Wrote file");
    Ok(dest)
}
