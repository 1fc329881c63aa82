// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use doctree::{Error, Failure, PathSpecifier, Request, Response};

use crate::common::{HostContext, parse_handle};

/// Cat command - the whole content of one file
///
/// A path that is missing or names a directory fails with `NOT_FOUND`.
pub fn cat_command<F>(context: &HostContext, handle: &str, path: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&[u8]),
{
    let path = PathSpecifier::parse(path);
    let request = Request::ReadFile {
        root: parse_handle(handle)?,
        path: path.clone(),
    };
    match context.submit(request)? {
        Response::Bytes(Some(content)) => {
            handler(&content);
            Ok(())
        }
        Response::Bytes(None) => Err(anyhow::Error::new(Failure::from(Error::not_found(&path)))),
        other => Err(anyhow!("unexpected reply to cat: {:?}", other)),
    }
}
