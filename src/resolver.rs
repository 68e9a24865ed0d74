//! Ancestor path resolution.
//!
//! Walks first-parent links upward from an item until reaching an ancestor that has
//! no parent, collecting folder names along the way.

use std::collections::VecDeque;

use crate::error::JobError;
use crate::transport::RemoteTransport;
use crate::types::{RemoteItem, ResolvedPath};

/// Resolve the folder path of `item`, root first, excluding the item's own name.
///
/// Performs exactly one metadata lookup per ancestor. An item with no parent resolves
/// to the empty path. The first failed lookup aborts the walk; no partial path is
/// returned.
///
/// With `max_depth` set to `None` the walk has no cycle protection: a hierarchy in
/// which an ancestor lists one of its descendants as parent never terminates.
/// `Some(limit)` fails the job once `limit` ancestors have been fetched and the
/// chain still continues.
pub async fn resolve_path(
    transport: &dyn RemoteTransport,
    item: &RemoteItem,
    max_depth: Option<usize>,
) -> Result<ResolvedPath, JobError> {
    let Some(mut parent_id) = item.first_parent().cloned() else {
        return Ok(ResolvedPath::default());
    };

    let mut names = VecDeque::new();
    loop {
        if let Some(limit) = max_depth
            && names.len() >= limit
        {
            return Err(JobError::AncestorDepthExceeded {
                id: item.id.clone(),
                limit,
            });
        }

        let parent = transport
            .fetch_metadata(&parent_id)
            .await
            .map_err(|source| JobError::PathResolution {
                id: item.id.clone(),
                ancestor: parent_id.clone(),
                source,
            })?;

        names.push_front(parent.name);
        match parent.parents.into_iter().next() {
            Some(next) => parent_id = next,
            None => break,
        }
    }

    Ok(ResolvedPath::new(names.into()))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::test_helpers::FakeTransport;
    use crate::types::FileId;

    fn item(id: &str, parent: Option<&str>) -> RemoteItem {
        RemoteItem {
            id: FileId::from(id),
            name: id.to_string(),
            parents: parent.into_iter().map(FileId::from).collect(),
        }
    }

    #[tokio::test]
    async fn item_without_parent_resolves_to_root() {
        let transport = FakeTransport::new();

        let path = resolve_path(&transport, &item("file", None), None)
            .await
            .unwrap();

        assert!(path.is_root());
        assert_eq!(path.to_relative_path(), "");
        assert_eq!(transport.total_lookups(), 0);
    }

    #[tokio::test]
    async fn chain_resolves_root_first_with_one_lookup_per_ancestor() {
        let transport = FakeTransport::new()
            .with_folder("root", "My Drive", None)
            .with_folder("f1", "folder1", Some("root"))
            .with_folder("f2", "folder2", Some("f1"))
            .with_folder("f3", "folder3", Some("f2"));

        let path = resolve_path(&transport, &item("file", Some("f3")), None)
            .await
            .unwrap();

        assert_eq!(path.to_relative_path(), "My Drive/folder1/folder2/folder3");
        assert_eq!(path.depth(), 4);
        assert_eq!(transport.total_lookups(), 4);
        for id in ["root", "f1", "f2", "f3"] {
            assert_eq!(transport.lookups(id), 1, "ancestor {id} looked up once");
        }
    }

    #[tokio::test]
    async fn only_first_parent_is_followed() {
        let transport = FakeTransport::new()
            .with_folder("a", "A", None)
            .with_folder("b", "B", None);
        let file = RemoteItem {
            id: FileId::from("file"),
            name: "file".to_string(),
            parents: vec![FileId::from("a"), FileId::from("b")],
        };

        let path = resolve_path(&transport, &file, None).await.unwrap();

        assert_eq!(path.to_relative_path(), "A");
        assert_eq!(transport.lookups("b"), 0);
    }

    #[tokio::test]
    async fn failed_ancestor_lookup_aborts_without_partial_path() {
        let transport = FakeTransport::new()
            .with_folder("f1", "folder1", Some("missing"))
            .with_folder("f2", "folder2", Some("f1"));

        let err = resolve_path(&transport, &item("file", Some("f2")), None)
            .await
            .unwrap_err();

        match err {
            JobError::PathResolution { id, ancestor, .. } => {
                assert_eq!(id, FileId::from("file"));
                assert_eq!(ancestor, FileId::from("missing"));
            }
            other => panic!("expected PathResolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn depth_limit_allows_chain_of_exact_length() {
        let transport = FakeTransport::new()
            .with_folder("f1", "folder1", None)
            .with_folder("f2", "folder2", Some("f1"));

        let path = resolve_path(&transport, &item("file", Some("f2")), Some(2))
            .await
            .unwrap();

        assert_eq!(path.to_relative_path(), "folder1/folder2");
    }

    #[tokio::test]
    async fn depth_limit_stops_parent_cycle() {
        let transport = FakeTransport::new()
            .with_folder("a", "A", Some("b"))
            .with_folder("b", "B", Some("a"));

        let err = resolve_path(&transport, &item("file", Some("a")), Some(5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::AncestorDepthExceeded { limit: 5, .. }
        ));
        assert_eq!(transport.total_lookups(), 5);
    }
}
