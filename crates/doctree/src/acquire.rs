// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Grant acquisition -- the human-approval handshake that yields a root.
//!
//! The handshake moves `Idle -> Pending -> {Granted, Cancelled, Failed} ->
//! Idle`. Only one handshake may be pending at a time; an overlapping
//! request is refused with `Error::Busy` and the pending one is left to
//! finish and deliver its own result.

use crate::error::{Error, Result};
use crate::grant::{Grant, GrantStore, Rights};
use crate::handle::TreeHandle;
use async_trait::async_trait;
use diagnostics::{debug, info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the human decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approval {
    /// A directory was selected and access approved
    Selected(PathBuf),
    /// The chooser was dismissed
    Declined,
}

/// The external approval step, typically a chooser dialog.
///
/// `request_folder` suspends until the human has answered.
#[async_trait]
pub trait Approver: Send + Sync {
    async fn request_folder(&self) -> Result<Approval>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Granted,
    Cancelled,
    Failed,
}

struct Slot {
    state: HandshakeState,
    last: Option<HandshakeOutcome>,
}

pub struct GrantAcquirer {
    approver: Arc<dyn Approver>,
    store: Arc<dyn GrantStore>,
    slot: Arc<Mutex<Slot>>,
}

/// Holds the pending slot; returns it to `Idle` when dropped, so an
/// abandoned or panicking handshake is recorded as failed.
struct PendingGuard {
    slot: Arc<Mutex<Slot>>,
    outcome: HandshakeOutcome,
}

impl PendingGuard {
    fn finish(mut self, outcome: HandshakeOutcome) {
        self.outcome = outcome;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        slot.state = HandshakeState::Idle;
        slot.last = Some(self.outcome);
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GrantAcquirer {
    pub fn new(approver: Arc<dyn Approver>, store: Arc<dyn GrantStore>) -> Self {
        Self {
            approver,
            store,
            slot: Arc::new(Mutex::new(Slot {
                state: HandshakeState::Idle,
                last: None,
            })),
        }
    }

    #[must_use]
    pub fn state(&self) -> HandshakeState {
        lock(&self.slot).state
    }

    /// Terminal state of the most recent completed handshake.
    #[must_use]
    pub fn last_outcome(&self) -> Option<HandshakeOutcome> {
        lock(&self.slot).last
    }

    /// Run the approval handshake.
    ///
    /// Returns the new handle on approval and `None` when the human
    /// declines. The grant is recorded with read/write rights before the
    /// handle is returned.
    pub async fn acquire_root(&self) -> Result<Option<TreeHandle>> {
        let pending = self.begin()?;
        let result = self.handshake().await;
        pending.finish(match &result {
            Ok(Some(_)) => HandshakeOutcome::Granted,
            Ok(None) => HandshakeOutcome::Cancelled,
            Err(_) => HandshakeOutcome::Failed,
        });
        result
    }

    fn begin(&self) -> Result<PendingGuard> {
        let mut slot = lock(&self.slot);
        if slot.state == HandshakeState::Pending {
            warn!("Rejecting folder request: a handshake is already pending");
            return Err(Error::Busy);
        }
        slot.state = HandshakeState::Pending;
        debug!("Folder request pending");
        Ok(PendingGuard {
            slot: self.slot.clone(),
            outcome: HandshakeOutcome::Failed,
        })
    }

    async fn handshake(&self) -> Result<Option<TreeHandle>> {
        let approval = self.approver.request_folder().await.map_err(|e| match e {
            Error::PickFailed(msg) => Error::PickFailed(msg),
            other => Error::PickFailed(other.to_string()),
        })?;

        match approval {
            Approval::Selected(location) => {
                let grant = Grant::new(TreeHandle::generate(), location, Rights::read_write());
                self.store
                    .record(&grant)
                    .await
                    .map_err(|e| Error::PickFailed(format!("failed to persist grant: {}", e)))?;
                let handle_str = grant.handle.to_string();
                let location_str = grant.location.display().to_string();
                info!("Granted {handle} for {location}", handle: handle_str, location: location_str);
                Ok(Some(grant.handle))
            }
            Approval::Declined => {
                info!("Folder request declined");
                Ok(None)
            }
        }
    }
}
