// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use doctree::{PathSpecifier, Request, Response};

use crate::common::{HostContext, parse_handle};

/// List command - names of the directories (or files) directly under a path
pub fn list_command<F>(
    context: &HostContext,
    handle: &str,
    path: &str,
    files: bool,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let root = parse_handle(handle)?;
    let path = PathSpecifier::parse(path);
    let request = if files {
        Request::ListFile { root, path }
    } else {
        Request::ListDir { root, path }
    };

    match context.submit(request)? {
        Response::Names(mut names) => {
            // Hosts yield entries in any order; keep output stable.
            names.sort();
            for name in names {
                handler(&name);
            }
            Ok(())
        }
        other => Err(anyhow!("unexpected reply to list: {:?}", other)),
    }
}
