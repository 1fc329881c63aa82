// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{Grant, GrantStore};
use crate::error::Result;
use crate::handle::TreeHandle;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Grant store that forgets everything when dropped
#[derive(Default)]
pub struct MemoryGrantStore {
    grants: Mutex<BTreeMap<TreeHandle, Grant>>,
}

impl MemoryGrantStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn record(&self, grant: &Grant) -> Result<()> {
        self.grants
            .lock()
            .await
            .insert(grant.handle.clone(), grant.clone());
        Ok(())
    }

    async fn lookup(&self, handle: &TreeHandle) -> Result<Option<Grant>> {
        Ok(self.grants.lock().await.get(handle).cloned())
    }

    async fn revoke(&self, handle: &TreeHandle) -> Result<bool> {
        Ok(self.grants.lock().await.remove(handle).is_some())
    }

    async fn list(&self) -> Result<Vec<Grant>> {
        let mut grants: Vec<Grant> = self.grants.lock().await.values().cloned().collect();
        grants.sort_by_key(|grant| grant.granted_at);
        Ok(grants)
    }
}
