// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Grant store -- remembers which roots have been granted, and where.
//!
//! A grant ties a `TreeHandle` to a host location together with the rights
//! approved for it. Providers consult the store on every call, so revoking
//! a grant takes effect immediately for all later operations.

mod json;
mod memory;

pub use json::JsonGrantStore;
pub use memory::MemoryGrantStore;

use crate::error::Result;
use crate::handle::TreeHandle;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Access rights recorded with a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rights {
    pub read: bool,
    pub write: bool,
}

impl Rights {
    #[must_use]
    pub fn read_write() -> Self {
        Self {
            read: true,
            write: true,
        }
    }

    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read: true,
            write: false,
        }
    }
}

impl std::fmt::Display for Rights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = if self.read { "r" } else { "-" };
        let w = if self.write { "w" } else { "-" };
        write!(f, "{}{}", r, w)
    }
}

/// A persisted root access grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub handle: TreeHandle,
    pub location: PathBuf,
    pub rights: Rights,
    pub granted_at: DateTime<Utc>,
}

impl Grant {
    #[must_use]
    pub fn new(handle: TreeHandle, location: PathBuf, rights: Rights) -> Self {
        Self {
            handle,
            location,
            rights,
            granted_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Persist a grant, replacing any grant with the same handle.
    async fn record(&self, grant: &Grant) -> Result<()>;

    async fn lookup(&self, handle: &TreeHandle) -> Result<Option<Grant>>;

    /// Forget a grant. Returns false if the handle was not granted.
    async fn revoke(&self, handle: &TreeHandle) -> Result<bool>;

    /// All grants, oldest first.
    async fn list(&self) -> Result<Vec<Grant>>;
}
