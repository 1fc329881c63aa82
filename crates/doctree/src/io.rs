// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Whole-file reads and writes.

use crate::error::{Error, Result};
use crate::path::PathSpecifier;
use crate::resolve::{Leaf, resolve};
use crate::tree::DocumentTree;
use diagnostics::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Read the whole file at `path`.
///
/// Returns `None` when the path does not resolve or names a directory;
/// only an I/O failure on the file itself is an error.
pub async fn read(tree: &dyn DocumentTree, path: &PathSpecifier) -> Result<Option<Vec<u8>>> {
    let read_failed = |detail: String| Error::ReadFailed {
        path: path.clone(),
        detail,
    };

    let file = match resolve(tree, path, Leaf::Any).await {
        Ok(node) if node.is_file() => node,
        Ok(_) | Err(Error::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.or_else_wrap(read_failed)),
    };

    let mut reader = tree
        .open_read(&file)
        .await
        .map_err(|e| e.or_else_wrap(read_failed))?;
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .await
        .map_err(|e| read_failed(e.to_string()))?;

    let path_str = path.to_string();
    let size = content.len();
    debug!("Read {size} bytes from {path}", size: size, path: path_str);
    Ok(Some(content))
}

/// Replace the content of the file at `path` with `data`, creating the
/// file if needed.
///
/// The parent directory must already exist. The replacement is not
/// atomic: if it fails partway the file content is unspecified.
pub async fn write(
    tree: &dyn DocumentTree,
    path: &PathSpecifier,
    data: &[u8],
    content_type: &str,
) -> Result<()> {
    let (parent_path, name) = match path.split_leaf() {
        Some((parent, name)) if !name.is_empty() => (parent, name),
        _ => return Err(Error::InvalidPath),
    };
    let write_failed = |detail: String| Error::WriteFailed {
        path: path.clone(),
        detail,
    };

    let parent = match resolve(tree, &parent_path, Leaf::Directory).await {
        Ok(parent) => parent,
        Err(Error::NotFound(_)) => return Err(Error::parent_not_found(&parent_path)),
        Err(e) => return Err(e.or_else_wrap(write_failed)),
    };

    let file = match tree
        .child_by_name(&parent, name)
        .await
        .map_err(|e| e.or_else_wrap(write_failed))?
    {
        Some(existing) if existing.is_file() => existing,
        Some(_) => {
            return Err(Error::create_failed(path, "a directory with that name exists"));
        }
        None => {
            let created = tree
                .create_file(&parent, name, content_type)
                .await
                .map_err(|e| e.or_else_wrap(|detail| Error::create_failed(path, detail)))?;
            let path_str = path.to_string();
            debug!("Created file {path}", path: path_str);
            created
        }
    };

    let mut writer = tree
        .open_write(&file)
        .await
        .map_err(|e| e.or_else_wrap(write_failed))?;
    writer
        .write_all(data)
        .await
        .map_err(|e| write_failed(e.to_string()))?;
    writer
        .shutdown()
        .await
        .map_err(|e| write_failed(e.to_string()))?;

    let path_str = path.to_string();
    let size = data.len();
    debug!("Wrote {size} bytes to {path}", size: size, path: path_str);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTree;
    use crate::tree::DEFAULT_CONTENT_TYPE;

    #[tokio::test]
    async fn test_write_then_read() {
        let tree = MemoryTree::new();
        let path = PathSpecifier::from(["a.bin"]);
        write(&tree, &path, &[0, 1, 2, 255], DEFAULT_CONTENT_TYPE)
            .await
            .unwrap();
        assert_eq!(read(&tree, &path).await.unwrap(), Some(vec![0, 1, 2, 255]));
        assert_eq!(
            tree.content_type(&["a.bin"]).as_deref(),
            Some("application/octet-stream")
        );
    }

    #[tokio::test]
    async fn test_empty_content_round_trips() {
        let tree = MemoryTree::new();
        let path = PathSpecifier::from(["empty"]);
        write(&tree, &path, b"", DEFAULT_CONTENT_TYPE).await.unwrap();
        assert_eq!(read(&tree, &path).await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_overwrite_truncates() {
        let tree = MemoryTree::new();
        tree.add_file(&["f"], b"a much longer original").unwrap();
        let path = PathSpecifier::from(["f"]);
        write(&tree, &path, b"short", DEFAULT_CONTENT_TYPE).await.unwrap();
        assert_eq!(read(&tree, &path).await.unwrap(), Some(b"short".to_vec()));
        // The existing node was reused, not duplicated.
        assert_eq!(tree.node_count(), 2);
    }

    #[tokio::test]
    async fn test_read_absent_cases() {
        let tree = MemoryTree::new();
        tree.add_dir(&["dir"]).unwrap();
        assert_eq!(read(&tree, &PathSpecifier::from(["nope"])).await.unwrap(), None);
        assert_eq!(read(&tree, &PathSpecifier::from(["dir"])).await.unwrap(), None);
        assert_eq!(read(&tree, &PathSpecifier::root()).await.unwrap(), None);
        assert_eq!(
            read(&tree, &PathSpecifier::from(["dir", "x", "y"])).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_read_io_failure() {
        let tree = MemoryTree::new();
        tree.add_file(&["f"], b"data").unwrap();
        tree.set_failing_io(true);
        let err = read(&tree, &PathSpecifier::from(["f"])).await.unwrap_err();
        assert_eq!(err.code(), "READ_FAILED");
    }

    #[tokio::test]
    async fn test_invalid_paths() {
        let tree = MemoryTree::new();
        let err = write(&tree, &PathSpecifier::root(), b"x", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath));

        let err = write(&tree, &PathSpecifier::from([""]), b"x", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath));
        assert_eq!(tree.node_count(), 1);
    }

    #[tokio::test]
    async fn test_parent_must_exist() {
        let tree = MemoryTree::new();
        tree.add_dir(&["docs"]).unwrap();
        tree.add_file(&["docs", "plain"], b"").unwrap();

        let err = write(
            &tree,
            &PathSpecifier::from(["docs", "missing", "a.txt"]),
            b"x",
            DEFAULT_CONTENT_TYPE,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "PARENT_NOT_FOUND");

        let err = write(
            &tree,
            &PathSpecifier::from(["docs", "plain", "a.txt"]),
            b"x",
            DEFAULT_CONTENT_TYPE,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "PARENT_NOT_FOUND");
        assert_eq!(tree.node_count(), 3);
    }

    #[tokio::test]
    async fn test_directory_in_the_way() {
        let tree = MemoryTree::new();
        tree.add_dir(&["taken"]).unwrap();
        let err = write(&tree, &PathSpecifier::from(["taken"]), b"x", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CREATE_FAILED");
    }

    #[tokio::test]
    async fn test_create_and_write_failures() {
        let tree = MemoryTree::new();
        tree.add_file(&["existing"], b"keep").unwrap();
        tree.set_writable(false);

        let err = write(&tree, &PathSpecifier::from(["new"]), b"x", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CREATE_FAILED");

        let err = write(&tree, &PathSpecifier::from(["existing"]), b"x", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "WRITE_FAILED");
        assert_eq!(tree.content(&["existing"]).unwrap(), b"keep");
    }

    /// Serves nodes from a memory tree but streams file content through
    /// scripted mock I/O.
    struct MockedIo {
        tree: MemoryTree,
        reads: fn() -> tokio_test::io::Mock,
        writes: fn() -> tokio_test::io::Mock,
    }

    #[async_trait::async_trait]
    impl DocumentTree for MockedIo {
        async fn root(&self) -> Result<crate::node::DocumentNode> {
            self.tree.root().await
        }

        async fn entries(&self, dir: &crate::node::DocumentNode) -> Result<crate::tree::EntryStream> {
            self.tree.entries(dir).await
        }

        async fn create_directory(
            &self,
            parent: &crate::node::DocumentNode,
            name: &str,
        ) -> Result<crate::node::DocumentNode> {
            self.tree.create_directory(parent, name).await
        }

        async fn create_file(
            &self,
            parent: &crate::node::DocumentNode,
            name: &str,
            content_type: &str,
        ) -> Result<crate::node::DocumentNode> {
            self.tree.create_file(parent, name, content_type).await
        }

        async fn open_read(&self, _file: &crate::node::DocumentNode) -> Result<crate::tree::FileReader> {
            Ok(Box::pin((self.reads)()))
        }

        async fn open_write(&self, _file: &crate::node::DocumentNode) -> Result<crate::tree::FileWriter> {
            Ok(Box::pin((self.writes)()))
        }
    }

    fn unused() -> tokio_test::io::Mock {
        tokio_test::io::Builder::new().build()
    }

    #[tokio::test]
    async fn test_error_while_streaming_read() {
        let tree = MemoryTree::new();
        tree.add_file(&["f"], b"").unwrap();
        let mocked = MockedIo {
            tree,
            reads: || {
                tokio_test::io::Builder::new()
                    .read(b"par")
                    .read_error(std::io::Error::other("device gone"))
                    .build()
            },
            writes: unused,
        };
        let err = read(&mocked, &PathSpecifier::from(["f"])).await.unwrap_err();
        assert_eq!(err.code(), "READ_FAILED");
        assert!(err.detail().unwrap().contains("device gone"));
    }

    #[tokio::test]
    async fn test_error_while_streaming_write() {
        let mocked = MockedIo {
            tree: MemoryTree::new(),
            reads: unused,
            writes: || {
                tokio_test::io::Builder::new()
                    .write_error(std::io::Error::other("disk full"))
                    .build()
            },
        };
        let err = write(&mocked, &PathSpecifier::from(["f"]), b"abc", DEFAULT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "WRITE_FAILED");
        assert!(err.detail().unwrap().contains("disk full"));
    }
}
