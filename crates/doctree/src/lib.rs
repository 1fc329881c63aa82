// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! doctree - path-based file operations over a granted document tree
//!
//! A caller obtains a root handle through a human-approved grant, then
//! lists, creates, reads and writes below that root by name segments. No
//! host paths cross the boundary.
//!
//! Set DOCTREE_LOG to control logging (see the `diagnostics` crate).

// Error types
pub mod error;

// Paths, nodes and the tree interface
pub mod handle;
pub mod node;
pub mod path;
pub mod tree;

// Operations
pub mod io;
pub mod list;
pub mod mkdir;
pub mod resolve;

// Grants and the approval handshake
pub mod acquire;
pub mod grant;

// Request channel
pub mod dispatch;
pub mod request;
pub mod service;

pub mod config;

// Backends
pub mod hostmount;
pub mod memory;

#[cfg(test)]
mod tests;

pub use acquire::{Approval, Approver, GrantAcquirer, HandshakeOutcome, HandshakeState};
pub use config::Config;
pub use dispatch::{Dispatcher, Reply, Ticket};
pub use error::{Error, Failure, Result};
pub use grant::{Grant, GrantStore, JsonGrantStore, MemoryGrantStore, Rights};
pub use handle::TreeHandle;
pub use hostmount::{HostTree, HostTreeProvider};
pub use node::{DocumentNode, EntryType, NodeId};
pub use path::PathSpecifier;
pub use request::{MethodCall, Request, Response};
pub use service::StorageService;
pub use tree::{DocumentTree, TreeProvider};
