// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::node::DocumentNode;
use crate::path::PathSpecifier;
use crate::tree::DocumentTree;

/// Constraint on the final segment of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    /// The leaf may be a file or a directory
    Any,
    /// The leaf must be a directory
    Directory,
}

/// Walk `path` from the root of `tree`.
///
/// Every segment but the last must name a directory child. The last
/// segment is matched by name alone unless `leaf` is `Leaf::Directory`.
/// Matching takes the first child with exactly that name. The empty path
/// yields the root. Nothing is ever created.
pub async fn resolve(
    tree: &dyn DocumentTree,
    path: &PathSpecifier,
    leaf: Leaf,
) -> Result<DocumentNode> {
    let root = tree.root().await?;
    let Some((parents, last)) = path.split_leaf() else {
        return Ok(root);
    };

    let mut current = root;
    for name in parents.segments() {
        current = match tree.child_by_name(&current, name).await? {
            Some(child) if child.is_directory() => child,
            _ => return Err(Error::not_found(path)),
        };
    }

    match tree.child_by_name(&current, last).await? {
        Some(child) if leaf == Leaf::Any || child.is_directory() => Ok(child),
        _ => Err(Error::not_found(path)),
    }
}
