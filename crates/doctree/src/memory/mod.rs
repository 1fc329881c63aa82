// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Memory-based implementations of the tree and approval seams
//!
//! These are used for testing and for embedding hosts that keep their
//! documents in memory. `MemoryTree` stores nodes in an arena behind a
//! mutex; `MemoryTreeProvider` hands out trees by handle; `MemoryApprover`
//! answers folder requests from a script.

mod approver;
mod tree;

pub use approver::MemoryApprover;
pub use tree::MemoryTree;

use crate::error::{Error, Result};
use crate::handle::TreeHandle;
use crate::tree::{DocumentTree, TreeProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Provider that serves registered in-memory trees
#[derive(Default)]
pub struct MemoryTreeProvider {
    trees: Mutex<HashMap<TreeHandle, MemoryTree>>,
}

impl MemoryTreeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tree` under a freshly minted handle.
    pub fn mount(&self, tree: MemoryTree) -> TreeHandle {
        let handle = TreeHandle::generate();
        self.insert(handle.clone(), tree);
        handle
    }

    pub fn insert(&self, handle: TreeHandle, tree: MemoryTree) {
        self.trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, tree);
    }

    /// Forget a handle, as if its grant had been revoked.
    pub fn revoke(&self, handle: &TreeHandle) -> bool {
        self.trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(handle)
            .is_some()
    }
}

#[async_trait]
impl TreeProvider for MemoryTreeProvider {
    async fn open(&self, handle: &TreeHandle) -> Result<Arc<dyn DocumentTree>> {
        let tree = self
            .trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(handle)
            .cloned()
            .ok_or_else(|| Error::InvalidRoot(handle.to_string()))?;
        Ok(Arc::new(tree))
    }
}
