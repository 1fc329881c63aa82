// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Runs requests off the control thread.
//!
//! The control thread submits a request and gets a `Ticket` back at once;
//! the work runs as a task on the tokio runtime and its reply is delivered
//! through the ticket exactly once. Independent requests run concurrently
//! and may complete in any order. Nothing is cancelled: a request runs to
//! completion even if its ticket is dropped.

use crate::error::{Error, Failure};
use crate::request::{MethodCall, Request, Response};
use crate::service::StorageService;
use diagnostics::debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// What the control thread receives for one request
pub type Reply = std::result::Result<Response, Failure>;

pub struct Dispatcher {
    service: Arc<StorageService>,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(service: Arc<StorageService>, runtime: Handle) -> Self {
        Self { service, runtime }
    }

    #[must_use]
    pub fn service(&self) -> &StorageService {
        &self.service
    }

    pub fn submit(&self, request: Request) -> Ticket {
        let (tx, rx) = oneshot::channel();
        let service = self.service.clone();
        let method = request.method();
        debug!("Dispatching {method}", method: method);

        let _task = self.runtime.spawn(async move {
            let reply = service.execute(request).await.map_err(Failure::from);
            // The caller may have stopped waiting; the work still counts.
            let _ = tx.send(reply);
        });
        Ticket { rx }
    }

    /// Decode and submit a raw method call. A call that does not decode is
    /// answered immediately without touching the runtime.
    pub fn submit_call(&self, call: MethodCall) -> Ticket {
        match call.decode() {
            Ok(request) => self.submit(request),
            Err(e) => Ticket::ready(Err(Failure::from(e))),
        }
    }
}

/// The pending reply to one submitted request.
///
/// Await it from async code or call `wait` from the control thread.
pub struct Ticket {
    rx: oneshot::Receiver<Reply>,
}

fn aborted() -> Failure {
    Failure::from(Error::Aborted)
}

impl Ticket {
    fn ready(reply: Reply) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(reply);
        Self { rx }
    }

    /// Block the current thread until the reply arrives.
    ///
    /// Must not be called from inside the runtime's own worker threads.
    pub fn wait(self) -> Reply {
        self.rx.blocking_recv().unwrap_or_else(|_| Err(aborted()))
    }
}

impl Future for Ticket {
    type Output = Reply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Reply> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(aborted())))
    }
}
