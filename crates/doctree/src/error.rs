// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::PathSpecifier;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur in document tree operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Path must contain a file name")]
    InvalidPath,

    #[error("Root is not a valid granted directory: {0}")]
    InvalidRoot(String),

    #[error("Path not found: {0}")]
    NotFound(PathSpecifier),

    #[error("Not a directory: {0}")]
    NotADirectory(PathSpecifier),

    #[error("Not a file: {0}")]
    NotAFile(PathSpecifier),

    #[error("The parent directory does not exist: {0}")]
    ParentNotFound(PathSpecifier),

    #[error("Failed to create {path}")]
    CreateFailed { path: PathSpecifier, detail: String },

    #[error("Failed to list directory {path}")]
    ListFailed { path: PathSpecifier, detail: String },

    #[error("Failed to read file {path}")]
    ReadFailed { path: PathSpecifier, detail: String },

    #[error("Failed to write file {path}")]
    WriteFailed { path: PathSpecifier, detail: String },

    #[error("A folder selection is already pending")]
    Busy,

    #[error("Folder selection failed: {0}")]
    PickFailed(String),

    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rejected by tree: {0}")]
    Rejected(String),

    #[error("Operation ended without a result")]
    Aborted,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn not_found(path: &PathSpecifier) -> Self {
        Error::NotFound(path.clone())
    }

    pub fn not_a_directory(path: &PathSpecifier) -> Self {
        Error::NotADirectory(path.clone())
    }

    pub fn not_a_file(path: &PathSpecifier) -> Self {
        Error::NotAFile(path.clone())
    }

    pub fn parent_not_found(path: &PathSpecifier) -> Self {
        Error::ParentNotFound(path.clone())
    }

    pub fn create_failed<S: Into<String>>(path: &PathSpecifier, detail: S) -> Self {
        Error::CreateFailed {
            path: path.clone(),
            detail: detail.into(),
        }
    }

    pub fn rejected<S: Into<String>>(reason: S) -> Self {
        Error::Rejected(reason.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Stable code delivered to callers alongside the message.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::InvalidPath => "INVALID_PATH",
            Error::InvalidRoot(_) => "INVALID_ROOT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::NotADirectory(_) => "NOT_A_DIRECTORY",
            Error::NotAFile(_) => "NOT_A_FILE",
            Error::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Error::CreateFailed { .. } => "CREATE_FAILED",
            Error::ListFailed { .. } => "LIST_FAILED",
            Error::ReadFailed { .. } => "READ_FAILED",
            Error::WriteFailed { .. } => "WRITE_FAILED",
            Error::Busy => "BUSY",
            Error::PickFailed(_) => "PICK_FAILED",
            Error::NotImplemented(_) => "NOT_IMPLEMENTED",
            Error::Io(_) => "IO_ERROR",
            Error::Rejected(_) => "REJECTED",
            Error::Aborted => "ABORTED",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Error::CreateFailed { detail, .. }
            | Error::ListFailed { detail, .. }
            | Error::ReadFailed { detail, .. }
            | Error::WriteFailed { detail, .. } => Some(detail.clone()),
            Error::Io(err) => Some(format!("{:?}", err.kind())),
            _ => None,
        }
    }

    /// True for errors raised by a tree backend rather than by path logic.
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Rejected(_))
    }

    /// Wraps a backend error into an operation-level failure, leaving
    /// domain errors untouched.
    pub(crate) fn or_else_wrap<F>(self, wrap: F) -> Self
    where
        F: FnOnce(String) -> Error,
    {
        if self.is_backend() {
            wrap(self.to_string())
        } else {
            self
        }
    }
}

/// The failure record delivered across the request/response boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Failure {
            code: err.code().to_string(),
            message: err.to_string(),
            detail: err.detail(),
        }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::from(&err)
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_are_wrapped() {
        let path = PathSpecifier::from(vec!["docs".to_string()]);
        let wrapped = Error::rejected("read-only")
            .or_else_wrap(|detail| Error::create_failed(&path, detail));
        assert_eq!(wrapped.code(), "CREATE_FAILED");
        assert_eq!(wrapped.detail().as_deref(), Some("Rejected by tree: read-only"));

        let untouched = Error::not_found(&path).or_else_wrap(|detail| Error::create_failed(&path, detail));
        assert_eq!(untouched.code(), "NOT_FOUND");
    }

    #[test]
    fn test_failure_record() {
        let failure = Failure::from(Error::Busy);
        assert_eq!(failure.code, "BUSY");
        assert_eq!(failure.detail, None);
        assert_eq!(failure.to_string(), "BUSY: A folder selection is already pending");
    }

    #[test]
    fn test_host_side_codes() {
        assert_eq!(Failure::from(Error::Aborted).code, "ABORTED");
        let failure = Failure::from(Error::Config("worker_threads must be greater than 0".into()));
        assert_eq!(failure.code, "CONFIG_ERROR");
        assert_eq!(
            failure.message,
            "Configuration error: worker_threads must be greater than 0"
        );
    }
}
