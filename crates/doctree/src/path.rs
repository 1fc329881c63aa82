// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Ordered name segments identifying a node relative to a granted root.
///
/// The empty specifier denotes the root itself. Segments are compared
/// byte-for-byte against child names; no normalization takes place, so
/// `.` and `..` are ordinary (and never matching) names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSpecifier(Vec<String>);

impl PathSpecifier {
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Split a slash-separated string into segments, dropping empty
    /// components. `"/"`, `""` and `"//"` all yield the root.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self(
            s.split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Separate the final segment from its parent prefix.
    #[must_use]
    pub fn split_leaf(&self) -> Option<(PathSpecifier, &str)> {
        let (leaf, parent) = self.0.split_last()?;
        Some((PathSpecifier(parent.to_vec()), leaf.as_str()))
    }

    /// The prefix made of the first `n` segments.
    #[must_use]
    pub fn prefix(&self, n: usize) -> PathSpecifier {
        PathSpecifier(self.0[..n.min(self.0.len())].to_vec())
    }

    #[must_use]
    pub fn join(&self, name: &str) -> PathSpecifier {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        PathSpecifier(segments)
    }
}

impl From<Vec<String>> for PathSpecifier {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for PathSpecifier {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathSpecifier {
    fn from(segments: [&str; N]) -> Self {
        Self::from(&segments[..])
    }
}

impl std::fmt::Display for PathSpecifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
