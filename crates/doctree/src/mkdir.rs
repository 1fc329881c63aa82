// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::node::DocumentNode;
use crate::path::PathSpecifier;
use crate::tree::DocumentTree;
use diagnostics::debug;

/// Make sure every directory along `path` exists, creating the missing
/// ones, and return the deepest.
///
/// Existing directories are reused, so repeating the call changes nothing.
/// A segment held by a file fails with `CreateFailed`. Directories created
/// before a failing segment are left in place.
pub async fn mkdir(tree: &dyn DocumentTree, path: &PathSpecifier) -> Result<DocumentNode> {
    let wrap = |e: Error| e.or_else_wrap(|detail| Error::create_failed(path, detail));

    let mut current = tree.root().await.map_err(wrap)?;
    for (depth, name) in path.segments().iter().enumerate() {
        let here = path.prefix(depth + 1);
        current = match tree.child_by_name(&current, name).await.map_err(wrap)? {
            Some(child) if child.is_directory() => child,
            Some(_) => {
                return Err(Error::create_failed(&here, "a file with that name exists"));
            }
            None => {
                let created = tree
                    .create_directory(&current, name)
                    .await
                    .map_err(|e| e.or_else_wrap(|detail| Error::create_failed(&here, detail)))?;
                let here_str = here.to_string();
                debug!("Created directory {path}", path: here_str);
                created
            }
        };
    }
    Ok(current)
}
