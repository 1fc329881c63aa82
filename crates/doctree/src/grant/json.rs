// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{Grant, GrantStore};
use crate::error::Result;
use crate::handle::TreeHandle;
use async_trait::async_trait;
use diagnostics::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct GrantFile {
    version: u32,
    grants: Vec<Grant>,
}

/// Grant store kept in a single JSON file.
///
/// Every mutation rewrites the file through a sibling temp file and a
/// rename, so a crash leaves either the old or the new set of grants.
pub struct JsonGrantStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonGrantStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Grant>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let file: GrantFile = serde_json::from_slice(&bytes).map_err(std::io::Error::from)?;
        Ok(file.grants)
    }

    async fn save(&self, grants: Vec<Grant>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = GrantFile {
            version: FORMAT_VERSION,
            grants,
        };
        let bytes = serde_json::to_vec_pretty(&file).map_err(std::io::Error::from)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        let path_str = self.path.display().to_string();
        let count = file.grants.len();
        debug!("Saved {count} grant(s) to {path}", count: count, path: path_str);
        Ok(())
    }
}

#[async_trait]
impl GrantStore for JsonGrantStore {
    async fn record(&self, grant: &Grant) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut grants = self.load().await?;
        grants.retain(|existing| existing.handle != grant.handle);
        grants.push(grant.clone());
        self.save(grants).await
    }

    async fn lookup(&self, handle: &TreeHandle) -> Result<Option<Grant>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|grant| &grant.handle == handle))
    }

    async fn revoke(&self, handle: &TreeHandle) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut grants = self.load().await?;
        let before = grants.len();
        grants.retain(|grant| &grant.handle != handle);
        if grants.len() == before {
            return Ok(false);
        }
        self.save(grants).await?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<Grant>> {
        let _guard = self.lock.lock().await;
        let mut grants = self.load().await?;
        grants.sort_by_key(|grant| grant.granted_at);
        Ok(grants)
    }
}
