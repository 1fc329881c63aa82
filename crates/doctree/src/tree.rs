// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The capability tree seen by every operation.
//!
//! A `DocumentTree` exposes one granted root and the nodes below it. No
//! host paths are visible: navigation happens only through `entries` and
//! `child_by_name` starting from `root`. Backends adapt whatever storage
//! the host provides (see `memory` and `hostmount`).

use crate::error::Result;
use crate::handle::TreeHandle;
use crate::node::DocumentNode;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

pub type EntryStream = Pin<Box<dyn Stream<Item = Result<DocumentNode>> + Send>>;
pub type FileReader = Pin<Box<dyn AsyncRead + Send>>;
pub type FileWriter = Pin<Box<dyn AsyncWrite + Send>>;

/// Content type given to files created by the writer unless configured.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[async_trait]
pub trait DocumentTree: Send + Sync {
    /// The granted root directory.
    async fn root(&self) -> Result<DocumentNode>;

    /// Immediate children of a directory, in backend order.
    async fn entries(&self, dir: &DocumentNode) -> Result<EntryStream>;

    /// The first child whose name equals `name` exactly.
    async fn child_by_name(&self, dir: &DocumentNode, name: &str) -> Result<Option<DocumentNode>> {
        let mut stream = self.entries(dir).await?;
        while let Some(entry) = stream.next().await {
            let entry = entry?;
            if entry.name == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    async fn create_directory(&self, parent: &DocumentNode, name: &str) -> Result<DocumentNode>;

    async fn create_file(
        &self,
        parent: &DocumentNode,
        name: &str,
        content_type: &str,
    ) -> Result<DocumentNode>;

    async fn open_read(&self, file: &DocumentNode) -> Result<FileReader>;

    /// Opens a file for writing. Content is replaced entirely; the write is
    /// complete once the writer has been shut down.
    async fn open_write(&self, file: &DocumentNode) -> Result<FileWriter>;
}

/// Re-derives the tree behind a granted handle.
///
/// Called once per operation; implementations must not hand out trees for
/// handles whose grant is unknown or revoked.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    async fn open(&self, handle: &TreeHandle) -> Result<Arc<dyn DocumentTree>>;
}

/// Whether `name` can name a single node: non-empty, not a relative
/// component and free of separators.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("a.txt"));
        assert!(is_valid_name(".hidden"));
        assert!(is_valid_name("Docs 2024"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("a\\b"));
    }
}
