// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::node::{DocumentNode, EntryType, NodeId};
use crate::tree::{DocumentTree, EntryStream, FileReader, FileWriter, is_valid_name};
use async_trait::async_trait;
use diagnostics::debug;
use futures::stream;
use std::path::{Path, PathBuf};

/// A document tree backed by a host directory.
///
/// Node ids are `/`-separated paths relative to the root, the root itself
/// being the empty id. Every id segment is checked before it touches the
/// host, so no id can reach outside the root.
#[derive(Debug, Clone)]
pub struct HostTree {
    /// Canonical host path of the granted directory
    root_path: PathBuf,
    writable: bool,
}

impl HostTree {
    /// Open the tree rooted at `root`, which must be an existing directory.
    pub async fn open<P: AsRef<Path>>(root: P, writable: bool) -> Result<Self> {
        let root = root.as_ref();
        let invalid = |reason: String| {
            Error::InvalidRoot(format!("{}: {}", root.display(), reason))
        };
        let canonical = tokio::fs::canonicalize(root)
            .await
            .map_err(|e| invalid(e.to_string()))?;
        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|e| invalid(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }

        let root_str = canonical.display().to_string();
        debug!("Opened host tree at {root} writable={writable}", root: root_str, writable: writable);
        Ok(Self {
            root_path: canonical,
            writable,
        })
    }

    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn host_path(&self, node: &DocumentNode) -> Result<PathBuf> {
        let id = node.id.as_str();
        let mut path = self.root_path.clone();
        if id.is_empty() {
            return Ok(path);
        }
        for segment in id.split('/') {
            if !is_valid_name(segment) {
                return Err(Error::rejected(format!("unknown node {}", node.id)));
            }
            path.push(segment);
        }
        Ok(path)
    }

    fn child(parent: &DocumentNode, name: &str, kind: EntryType) -> DocumentNode {
        let id = if parent.id.as_str().is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", parent.id, name)
        };
        DocumentNode::new(NodeId::new(id), name, kind)
    }

    fn creatable(&self, parent: &DocumentNode, name: &str) -> Result<PathBuf> {
        if !self.writable {
            return Err(Error::rejected("tree is read-only"));
        }
        if !is_valid_name(name) {
            return Err(Error::rejected(format!("invalid name '{}'", name)));
        }
        if !parent.is_directory() {
            return Err(Error::rejected(format!("'{}' is not a directory", parent.name)));
        }
        Ok(self.host_path(parent)?.join(name))
    }
}

#[async_trait]
impl DocumentTree for HostTree {
    async fn root(&self) -> Result<DocumentNode> {
        Ok(DocumentNode::new(NodeId::new(""), "", EntryType::Directory))
    }

    async fn entries(&self, dir: &DocumentNode) -> Result<EntryStream> {
        let host_path = self.host_path(dir)?;
        let mut read_dir = tokio::fs::read_dir(&host_path).await?;

        let mut items = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            // Names that could not address a node later are not listed.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_valid_name(&name) {
                continue;
            }
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_dir() {
                EntryType::Directory
            } else if file_type.is_file() {
                EntryType::File
            } else {
                // Symlinks and special files are not part of the tree.
                continue;
            };
            items.push(Self::child(dir, &name, kind));
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Box::pin(stream::iter(items.into_iter().map(Ok))))
    }

    async fn create_directory(&self, parent: &DocumentNode, name: &str) -> Result<DocumentNode> {
        let path = self.creatable(parent, name)?;
        tokio::fs::create_dir(&path).await?;
        Ok(Self::child(parent, name, EntryType::Directory))
    }

    async fn create_file(
        &self,
        parent: &DocumentNode,
        name: &str,
        _content_type: &str,
    ) -> Result<DocumentNode> {
        // Host files carry no content type.
        let path = self.creatable(parent, name)?;
        let _file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok(Self::child(parent, name, EntryType::File))
    }

    async fn open_read(&self, file: &DocumentNode) -> Result<FileReader> {
        let path = self.host_path(file)?;
        let file = tokio::fs::File::open(&path).await?;
        Ok(Box::pin(file))
    }

    async fn open_write(&self, file: &DocumentNode) -> Result<FileWriter> {
        if !self.writable {
            return Err(Error::rejected("tree is read-only"));
        }
        let path = self.host_path(file)?;
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .await?;
        Ok(Box::pin(file))
    }
}
