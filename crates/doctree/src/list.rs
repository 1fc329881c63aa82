// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::node::EntryType;
use crate::path::PathSpecifier;
use crate::resolve::{Leaf, resolve};
use crate::tree::DocumentTree;
use diagnostics::debug;
use futures::StreamExt;

/// Names of the immediate children of the directory at `path` whose kind
/// is `kind`, in the order the tree yields them.
///
/// A missing path is `NotFound`; a path naming a file is `NotADirectory`.
pub async fn list(
    tree: &dyn DocumentTree,
    path: &PathSpecifier,
    kind: EntryType,
) -> Result<Vec<String>> {
    let wrap = |e: Error| {
        e.or_else_wrap(|detail| Error::ListFailed {
            path: path.clone(),
            detail,
        })
    };

    let dir = resolve(tree, path, Leaf::Any).await.map_err(wrap)?;
    if !dir.is_directory() {
        return Err(Error::not_a_directory(path));
    }

    let mut names = Vec::new();
    let mut stream = tree.entries(&dir).await.map_err(wrap)?;
    while let Some(entry) = stream.next().await {
        let entry = entry.map_err(wrap)?;
        if entry.kind == kind {
            names.push(entry.name);
        }
    }

    let path_str = path.to_string();
    let kind_str = kind.to_string();
    let count = names.len();
    debug!("Listed {count} {kind} entries under {path}", count: count, kind: kind_str, path: path_str);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTree;

    fn sample_tree() -> MemoryTree {
        let tree = MemoryTree::new();
        tree.add_dir(&["music"]).unwrap();
        tree.add_dir(&["music", "jazz"]).unwrap();
        tree.add_dir(&["music", "rock"]).unwrap();
        tree.add_file(&["music", "playlist.m3u"], b"#EXTM3U").unwrap();
        tree.add_file(&["readme.txt"], b"hi").unwrap();
        tree
    }

    #[tokio::test]
    async fn test_filters_by_kind() {
        let tree = sample_tree();
        let music = PathSpecifier::from(["music"]);

        let mut dirs = list(&tree, &music, EntryType::Directory).await.unwrap();
        dirs.sort();
        assert_eq!(dirs, vec!["jazz", "rock"]);

        let files = list(&tree, &music, EntryType::File).await.unwrap();
        assert_eq!(files, vec!["playlist.m3u"]);
    }

    #[tokio::test]
    async fn test_root_listing() {
        let tree = sample_tree();
        let root = PathSpecifier::root();
        assert_eq!(list(&tree, &root, EntryType::Directory).await.unwrap(), vec!["music"]);
        assert_eq!(list(&tree, &root, EntryType::File).await.unwrap(), vec!["readme.txt"]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let tree = sample_tree();
        let jazz = PathSpecifier::from(["music", "jazz"]);
        assert!(list(&tree, &jazz, EntryType::File).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_wrong_kind() {
        let tree = sample_tree();
        let err = list(&tree, &PathSpecifier::from(["video"]), EntryType::File)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = list(&tree, &PathSpecifier::from(["readme.txt"]), EntryType::File)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_A_DIRECTORY");
    }
}
