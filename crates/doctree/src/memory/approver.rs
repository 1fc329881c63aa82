// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::acquire::{Approval, Approver};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

enum Scripted {
    Answer(Approval),
    Fail(String),
}

/// Approver that replays scripted answers in order.
///
/// A gated approver waits for one `notify_one()` on its gate before each
/// answer, which keeps a handshake pending for as long as a test needs.
#[derive(Default)]
pub struct MemoryApprover {
    script: Mutex<VecDeque<Scripted>>,
    gate: Option<Arc<Notify>>,
}

impl MemoryApprover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                script: Mutex::default(),
                gate: Some(gate.clone()),
            },
            gate,
        )
    }

    pub fn approve<P: Into<PathBuf>>(&self, location: P) {
        self.push(Scripted::Answer(Approval::Selected(location.into())));
    }

    pub fn decline(&self) {
        self.push(Scripted::Answer(Approval::Declined));
    }

    pub fn fail<S: Into<String>>(&self, reason: S) {
        self.push(Scripted::Fail(reason.into()));
    }

    fn push(&self, answer: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }
}

#[async_trait]
impl Approver for MemoryApprover {
    async fn request_folder(&self) -> Result<Approval> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(Scripted::Answer(approval)) => Ok(approval),
            Some(Scripted::Fail(reason)) => Err(Error::PickFailed(reason)),
            None => Err(Error::PickFailed("no scripted answer left".to_string())),
        }
    }
}
