// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Requests and replies as they cross the method channel.
//!
//! A `MethodCall` is a method name plus a JSON argument map using the keys
//! `rootUri`, `path` and `data`. It decodes into a typed `Request`; the
//! service answers with a `Response` that renders back to JSON.

use crate::error::{Error, Result};
use crate::handle::TreeHandle;
use crate::path::PathSpecifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACQUIRE_ROOT: &str = "acquireRoot";
pub const LIST_DIR: &str = "listDir";
pub const LIST_FILE: &str = "listFile";
pub const MKDIR: &str = "mkdir";
pub const READ_FILE: &str = "readFile";
pub const WRITE_FILE: &str = "writeFile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AcquireRoot,
    ListDir {
        root: TreeHandle,
        path: PathSpecifier,
    },
    ListFile {
        root: TreeHandle,
        path: PathSpecifier,
    },
    Mkdir {
        root: TreeHandle,
        path: PathSpecifier,
    },
    ReadFile {
        root: TreeHandle,
        path: PathSpecifier,
    },
    WriteFile {
        root: TreeHandle,
        path: PathSpecifier,
        data: Vec<u8>,
    },
}

impl Request {
    /// Method name this request travels under.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Request::AcquireRoot => ACQUIRE_ROOT,
            Request::ListDir { .. } => LIST_DIR,
            Request::ListFile { .. } => LIST_FILE,
            Request::Mkdir { .. } => MKDIR,
            Request::ReadFile { .. } => READ_FILE,
            Request::WriteFile { .. } => WRITE_FILE,
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&TreeHandle> {
        match self {
            Request::AcquireRoot => None,
            Request::ListDir { root, .. }
            | Request::ListFile { root, .. }
            | Request::Mkdir { root, .. }
            | Request::ReadFile { root, .. }
            | Request::WriteFile { root, .. } => Some(root),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&PathSpecifier> {
        match self {
            Request::AcquireRoot => None,
            Request::ListDir { path, .. }
            | Request::ListFile { path, .. }
            | Request::Mkdir { path, .. }
            | Request::ReadFile { path, .. }
            | Request::WriteFile { path, .. } => Some(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A root or directory handle; `None` when the handshake was cancelled.
    Handle(Option<String>),
    Names(Vec<String>),
    /// File content; `None` when the path is absent or not a file.
    Bytes(Option<Vec<u8>>),
    Unit,
}

impl Response {
    /// The reply payload as sent back over the channel.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Response::Handle(handle) => handle.map_or(Value::Null, Value::String),
            Response::Names(names) => Value::from(names),
            Response::Bytes(bytes) => bytes.map_or(Value::Null, Value::from),
            Response::Unit => Value::Null,
        }
    }
}

/// A raw method invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Default, Deserialize)]
struct Arguments {
    #[serde(rename = "rootUri")]
    root_uri: Option<String>,
    path: Option<Vec<String>>,
    data: Option<Vec<u8>>,
}

impl MethodCall {
    pub fn new<S: Into<String>>(method: S, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Decode the call into a typed request.
    ///
    /// Unknown methods are `NotImplemented`. A missing `rootUri`, or
    /// missing `data` for `writeFile`, is `InvalidArgument`; a missing or
    /// null `path` means the root.
    pub fn decode(self) -> Result<Request> {
        let method = self.method.as_str();
        if !matches!(
            method,
            ACQUIRE_ROOT | LIST_DIR | LIST_FILE | MKDIR | READ_FILE | WRITE_FILE
        ) {
            return Err(Error::NotImplemented(self.method));
        }
        if method == ACQUIRE_ROOT {
            return Ok(Request::AcquireRoot);
        }

        let args: Arguments = match self.arguments {
            Value::Null => Arguments::default(),
            value @ Value::Object(_) => serde_json::from_value(value).map_err(|e| {
                Error::invalid_argument(format!("bad arguments for {}: {}", method, e))
            })?,
            other => {
                return Err(Error::invalid_argument(format!(
                    "arguments for {} must be a map, got {}",
                    method, other
                )));
            }
        };

        let root = match args.root_uri {
            Some(uri) => TreeHandle::parse(&uri)?,
            None => return Err(Error::invalid_argument("rootUri is required")),
        };
        let path = PathSpecifier::from(args.path.unwrap_or_default());

        Ok(match method {
            LIST_DIR => Request::ListDir { root, path },
            LIST_FILE => Request::ListFile { root, path },
            MKDIR => Request::Mkdir { root, path },
            READ_FILE => Request::ReadFile { root, path },
            _ => Request::WriteFile {
                root,
                path,
                data: args
                    .data
                    .ok_or_else(|| Error::invalid_argument("data is required"))?,
            },
        })
    }
}

impl TryFrom<MethodCall> for Request {
    type Error = Error;

    fn try_from(call: MethodCall) -> Result<Self> {
        call.decode()
    }
}
