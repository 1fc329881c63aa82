// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use doctree::{PathSpecifier, Request, Response};

use crate::common::{HostContext, parse_handle};

/// Write command - replace a file's content, creating the file if needed
///
/// The parent directory must already exist; use `mkdir` first.
pub fn write_command<F>(
    context: &HostContext,
    handle: &str,
    path: &str,
    data: Vec<u8>,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let size = data.len();
    let path = PathSpecifier::parse(path);
    let request = Request::WriteFile {
        root: parse_handle(handle)?,
        path: path.clone(),
        data,
    };
    match context.submit(request)? {
        Response::Unit => {
            handler(&format!("wrote {} bytes to {}", size, path));
            Ok(())
        }
        other => Err(anyhow!("unexpected reply to write: {:?}", other)),
    }
}
