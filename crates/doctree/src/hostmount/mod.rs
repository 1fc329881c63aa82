// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hostmount -- granted host directories as document trees
//!
//! `HostTree` maps one host directory onto the `DocumentTree` interface
//! using `tokio::fs`. It is a peer of the `memory` backend. Names are
//! matched by scanning the directory, so matching stays exact and
//! case-sensitive even where the host filesystem is not.
//!
//! `HostTreeProvider` re-derives the tree for a handle from the grant
//! store on every call. Revoking the grant makes the handle invalid at
//! once.

mod tree;


pub use tree::HostTree;

use crate::error::{Error, Result};
use crate::grant::GrantStore;
use crate::handle::TreeHandle;
use crate::tree::{DocumentTree, TreeProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens host trees for handles recorded in a grant store
pub struct HostTreeProvider {
    store: Arc<dyn GrantStore>,
}

impl HostTreeProvider {
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TreeProvider for HostTreeProvider {
    async fn open(&self, handle: &TreeHandle) -> Result<Arc<dyn DocumentTree>> {
        let grant = self
            .store
            .lookup(handle)
            .await?
            .ok_or_else(|| Error::InvalidRoot(format!("{}: no such grant", handle)))?;
        if !grant.rights.read {
            return Err(Error::InvalidRoot(format!("{}: grant has no read access", handle)));
        }
        let tree = HostTree::open(&grant.location, grant.rights.write).await?;
        Ok(Arc::new(tree))
    }
}
