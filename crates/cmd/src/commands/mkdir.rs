// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use doctree::{PathSpecifier, Request, Response};

use crate::common::{HostContext, parse_handle};

/// Mkdir command - create every missing directory along a path and report
/// the handle of the deepest one
pub fn mkdir_command<F>(context: &HostContext, handle: &str, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let request = Request::Mkdir {
        root: parse_handle(handle)?,
        path: PathSpecifier::parse(path),
    };
    match context.submit(request)? {
        Response::Handle(Some(uri)) => {
            handler(&uri);
            Ok(())
        }
        other => Err(anyhow!("unexpected reply to mkdir: {:?}", other)),
    }
}
