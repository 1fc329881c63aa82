// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::node::{DocumentNode, EntryType, NodeId};
use crate::tree::{DocumentTree, EntryStream, FileReader, FileWriter, is_valid_name};
use async_trait::async_trait;
use futures::stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

const ROOT_INDEX: usize = 0;

struct MemoryNode {
    name: String,
    kind: EntryType,
    content_type: Option<String>,
    children: Vec<usize>,
    content: Vec<u8>,
}

struct State {
    nodes: Vec<MemoryNode>,
    writable: bool,
    failing_io: bool,
    allow_duplicates: bool,
}

/// A document tree held entirely in memory.
///
/// Children keep insertion order. Clones share the same tree, so a test
/// can keep one clone for inspection while a provider hands out another.
#[derive(Clone)]
pub struct MemoryTree {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Create an empty tree holding only its root directory
    #[must_use]
    pub fn new() -> Self {
        let root = MemoryNode {
            name: String::new(),
            kind: EntryType::Directory,
            content_type: None,
            children: Vec::new(),
            content: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(State {
                nodes: vec![root],
                writable: true,
                failing_io: false,
                allow_duplicates: false,
            })),
        }
    }

    /// Let creation add a child whose name is already taken, as some
    /// hosts do.
    #[must_use]
    pub fn allow_duplicates(self) -> Self {
        self.lock().allow_duplicates = true;
        self
    }

    /// When false, creations and writes are rejected as if write access
    /// had been withdrawn.
    pub fn set_writable(&self, writable: bool) {
        self.lock().writable = writable;
    }

    /// When true, opening a file for reading or writing fails with an I/O
    /// error.
    pub fn set_failing_io(&self, failing: bool) {
        self.lock().failing_io = failing;
    }

    /// Number of nodes in the tree, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Create a directory at `path`, whose parent must exist.
    pub fn add_dir(&self, path: &[&str]) -> Result<DocumentNode> {
        self.add(path, EntryType::Directory, &[])
    }

    /// Create a file at `path` with `content`, whose parent must exist.
    pub fn add_file(&self, path: &[&str], content: &[u8]) -> Result<DocumentNode> {
        self.add(path, EntryType::File, content)
    }

    /// Content of the file at `path`, if there is one.
    #[must_use]
    pub fn content(&self, path: &[&str]) -> Option<Vec<u8>> {
        let state = self.lock();
        let index = state.locate(path)?;
        let node = &state.nodes[index];
        node.kind.is_file().then(|| node.content.clone())
    }

    /// Content type recorded when the file at `path` was created.
    #[must_use]
    pub fn content_type(&self, path: &[&str]) -> Option<String> {
        let state = self.lock();
        let index = state.locate(path)?;
        state.nodes[index].content_type.clone()
    }

    fn add(&self, path: &[&str], kind: EntryType, content: &[u8]) -> Result<DocumentNode> {
        let (name, parent_path) = path
            .split_last()
            .ok_or_else(|| Error::rejected("cannot add the root"))?;
        let mut state = self.lock();
        let parent = state
            .locate(parent_path)
            .ok_or_else(|| Error::rejected(format!("no parent for '{}'", path.join("/"))))?;
        let index = state.insert_child(parent, name, kind, None)?;
        state.nodes[index].content = content.to_vec();
        Ok(state.document(index))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn index_of(&self, node: &DocumentNode) -> Result<usize> {
        node.id
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|index| *index < self.nodes.len())
            .ok_or_else(|| Error::rejected(format!("unknown node {}", node.id)))
    }

    fn document(&self, index: usize) -> DocumentNode {
        let node = &self.nodes[index];
        DocumentNode::new(NodeId::new(index.to_string()), node.name.clone(), node.kind)
    }

    fn directory(&self, node: &DocumentNode) -> Result<usize> {
        let index = self.index_of(node)?;
        if !self.nodes[index].kind.is_directory() {
            return Err(Error::rejected(format!("'{}' is not a directory", node.name)));
        }
        Ok(index)
    }

    fn file(&self, node: &DocumentNode) -> Result<usize> {
        let index = self.index_of(node)?;
        if !self.nodes[index].kind.is_file() {
            return Err(Error::rejected(format!("'{}' is not a file", node.name)));
        }
        Ok(index)
    }

    fn locate(&self, path: &[&str]) -> Option<usize> {
        let mut current = ROOT_INDEX;
        for name in path {
            current = *self.nodes[current]
                .children
                .iter()
                .find(|child| self.nodes[**child].name == *name)?;
        }
        Some(current)
    }

    fn insert_child(
        &mut self,
        parent: usize,
        name: &str,
        kind: EntryType,
        content_type: Option<&str>,
    ) -> Result<usize> {
        if !is_valid_name(name) {
            return Err(Error::rejected(format!("invalid name '{}'", name)));
        }
        if !self.nodes[parent].kind.is_directory() {
            return Err(Error::rejected("parent is not a directory"));
        }
        if !self.allow_duplicates
            && self.nodes[parent]
                .children
                .iter()
                .any(|child| self.nodes[*child].name == name)
        {
            return Err(Error::rejected(format!("entry already exists: '{}'", name)));
        }
        let index = self.nodes.len();
        self.nodes.push(MemoryNode {
            name: name.to_string(),
            kind,
            content_type: content_type.map(str::to_string),
            children: Vec::new(),
            content: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        Ok(index)
    }

    fn check_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(Error::rejected("write access withdrawn"))
        }
    }

    fn check_io(&self) -> Result<()> {
        if self.failing_io {
            Err(Error::Io(std::io::Error::other("injected I/O failure")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentTree for MemoryTree {
    async fn root(&self) -> Result<DocumentNode> {
        Ok(self.lock().document(ROOT_INDEX))
    }

    async fn entries(&self, dir: &DocumentNode) -> Result<EntryStream> {
        let state = self.lock();
        let index = state.directory(dir)?;
        let items: Vec<_> = state.nodes[index]
            .children
            .iter()
            .map(|child| Ok(state.document(*child)))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    async fn create_directory(&self, parent: &DocumentNode, name: &str) -> Result<DocumentNode> {
        let mut state = self.lock();
        state.check_writable()?;
        let parent = state.directory(parent)?;
        let index = state.insert_child(parent, name, EntryType::Directory, None)?;
        Ok(state.document(index))
    }

    async fn create_file(
        &self,
        parent: &DocumentNode,
        name: &str,
        content_type: &str,
    ) -> Result<DocumentNode> {
        let mut state = self.lock();
        state.check_writable()?;
        let parent = state.directory(parent)?;
        let index = state.insert_child(parent, name, EntryType::File, Some(content_type))?;
        Ok(state.document(index))
    }

    async fn open_read(&self, file: &DocumentNode) -> Result<FileReader> {
        let state = self.lock();
        state.check_io()?;
        let index = state.file(file)?;
        Ok(Box::pin(std::io::Cursor::new(state.nodes[index].content.clone())))
    }

    async fn open_write(&self, file: &DocumentNode) -> Result<FileWriter> {
        let state = self.lock();
        state.check_writable()?;
        state.check_io()?;
        let index = state.file(file)?;
        Ok(Box::pin(MemoryWriter {
            state: self.state.clone(),
            index,
            buffer: Vec::new(),
        }))
    }
}

/// Buffers written bytes and replaces the file content on shutdown.
struct MemoryWriter {
    state: Arc<Mutex<State>>,
    index: usize,
    buffer: Vec<u8>,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        let buffer = std::mem::take(&mut self.buffer);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.nodes.get_mut(self.index) {
            Some(node) => {
                node.content = buffer;
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(std::io::Error::other("file vanished before commit"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_entries_keep_insertion_order() {
        let tree = MemoryTree::new();
        tree.add_file(&["b"], b"").unwrap();
        tree.add_dir(&["a"]).unwrap();
        let root = tree.root().await.unwrap();
        let names: Vec<String> = tree
            .entries(&root)
            .await
            .unwrap()
            .map(|entry| entry.unwrap().name)
            .collect()
            .await;
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_duplicate_names_rejected_by_default() {
        let tree = MemoryTree::new();
        let root = tree.root().await.unwrap();
        tree.create_directory(&root, "a").await.unwrap();
        let err = tree.create_file(&root, "a", "text/plain").await.unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
    }

    #[tokio::test]
    async fn test_write_replaces_content_on_shutdown() {
        let tree = MemoryTree::new();
        let file = tree.add_file(&["f"], b"old content").unwrap();

        let mut writer = tree.open_write(&file).await.unwrap();
        writer.write_all(b"new").await.unwrap();
        assert_eq!(tree.content(&["f"]).unwrap(), b"old content");
        writer.shutdown().await.unwrap();
        assert_eq!(tree.content(&["f"]).unwrap(), b"new");

        let mut reader = tree.open_read(&file).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"new");
    }

    #[tokio::test]
    async fn test_read_only_tree_rejects_mutation() {
        let tree = MemoryTree::new();
        let file = tree.add_file(&["f"], b"x").unwrap();
        tree.set_writable(false);
        let root = tree.root().await.unwrap();
        assert!(tree.create_directory(&root, "d").await.is_err());
        assert!(tree.open_write(&file).await.is_err());
        assert!(tree.open_read(&file).await.is_ok());
    }

    #[tokio::test]
    async fn test_stale_node_is_rejected() {
        let tree = MemoryTree::new();
        let bogus = DocumentNode::new(NodeId::new("99"), "ghost", EntryType::File);
        assert!(matches!(tree.open_read(&bogus).await, Err(Error::Rejected(_))));
    }
}
