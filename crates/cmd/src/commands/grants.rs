// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;

use crate::common::HostContext;

/// Grants command - one line per recorded grant, oldest first
pub fn grants_command<F>(context: &HostContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let grants = context.block_on(context.store().list())?;
    for grant in grants {
        handler(&format!(
            "{} {} {} {}",
            grant.handle,
            grant.rights,
            grant.granted_at.format("%Y-%m-%d %H:%M:%S"),
            grant.location.display()
        ));
    }
    Ok(())
}
