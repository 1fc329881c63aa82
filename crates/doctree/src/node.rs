// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Kind of a node in a document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

impl EntryType {
    #[must_use]
    pub fn is_directory(self) -> bool {
        self == EntryType::Directory
    }

    #[must_use]
    pub fn is_file(self) -> bool {
        self == EntryType::File
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::File => write!(f, "file"),
            EntryType::Directory => write!(f, "directory"),
        }
    }
}

/// Backend-private identifier used to re-open a node for I/O
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to a single file or directory.
///
/// Nodes are re-derived from the root on every call and must not be kept
/// after the call that produced them returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    pub id: NodeId,
    pub name: String,
    pub kind: EntryType,
}

impl DocumentNode {
    pub fn new<S: Into<String>>(id: NodeId, name: S, kind: EntryType) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}
