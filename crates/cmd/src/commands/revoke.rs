// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use diagnostics::info;
use doctree::{Error, Failure};

use crate::common::{HostContext, parse_handle};

/// Revoke command - forget a grant; its handle stops working at once
pub fn revoke_command<F>(context: &HostContext, handle: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let handle = parse_handle(handle)?;
    if !context.block_on(context.store().revoke(&handle))? {
        let failure = Failure::from(Error::InvalidRoot(handle.to_string()));
        return Err(anyhow::Error::new(failure));
    }
    let handle_str = handle.to_string();
    info!("Revoked {handle}", handle: handle_str);
    handler(&format!("revoked {}", handle));
    Ok(())
}
