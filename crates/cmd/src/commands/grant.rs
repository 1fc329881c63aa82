// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use doctree::{Request, Response};

use crate::common::HostContext;

/// Grant command - runs the approval handshake and reports the new handle
///
/// The context's approver decides which directory is granted. A declined
/// handshake reports `cancelled` and is not an error.
pub fn grant_command<F>(context: &HostContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    match context.submit(Request::AcquireRoot)? {
        Response::Handle(Some(handle)) => handler(&handle),
        Response::Handle(None) => handler("cancelled"),
        other => return Err(anyhow!("unexpected reply to grant: {:?}", other)),
    }
    Ok(())
}
