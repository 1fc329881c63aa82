// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::path::PathSpecifier;
use serde::{Deserialize, Serialize};
use url::Url;

pub const HANDLE_SCHEME: &str = "doctree";
const HANDLE_HOST: &str = "tree";

/// Opaque token naming a granted root.
///
/// Handles have the form `doctree://tree/<id>`. Callers store them verbatim
/// and present them unmodified; only the grant store gives them meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TreeHandle(String);

impl TreeHandle {
    /// Mint a new handle for a fresh grant.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{}://{}/{}", HANDLE_SCHEME, HANDLE_HOST, uuid7::uuid7()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let url = Url::parse(s)
            .map_err(|e| Error::invalid_argument(format!("malformed root handle '{}': {}", s, e)))?;
        if url.scheme() != HANDLE_SCHEME || url.host_str() != Some(HANDLE_HOST) {
            return Err(Error::invalid_argument(format!(
                "not a {} root handle: '{}'",
                HANDLE_SCHEME, s
            )));
        }
        let id = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .unwrap_or_default();
        if id.is_empty() || url.path().len() != id.len() + 1 {
            return Err(Error::invalid_argument(format!(
                "root handle has no grant id: '{}'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// String handle of the node reached through `path`: the root handle
    /// itself for the empty path, otherwise the handle extended with the
    /// percent-encoded segments.
    #[must_use]
    pub fn node_uri(&self, path: &PathSpecifier) -> String {
        if path.is_empty() {
            return self.0.clone();
        }
        match Url::parse(&self.0) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.extend(path.segments());
                }
                url.to_string()
            }
            Err(_) => format!("{}{}", self.0, path),
        }
    }
}

impl TryFrom<String> for TreeHandle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<TreeHandle> for String {
    fn from(handle: TreeHandle) -> String {
        handle.0
    }
}

impl std::fmt::Display for TreeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
