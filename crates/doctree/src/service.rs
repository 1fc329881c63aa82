// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::acquire::GrantAcquirer;
use crate::error::Result;
use crate::io;
use crate::list::list;
use crate::mkdir::mkdir;
use crate::node::EntryType;
use crate::request::{Request, Response};
use crate::tree::{DEFAULT_CONTENT_TYPE, TreeProvider};
use diagnostics::{debug, warn};
use std::sync::Arc;

/// Executes requests against granted trees.
///
/// Every request re-opens its tree through the provider and re-walks its
/// path from the root; nothing is cached between requests.
pub struct StorageService {
    provider: Arc<dyn TreeProvider>,
    acquirer: GrantAcquirer,
    content_type: String,
}

impl StorageService {
    pub fn new(provider: Arc<dyn TreeProvider>, acquirer: GrantAcquirer) -> Self {
        Self {
            provider,
            acquirer,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Content type given to files the writer creates.
    #[must_use]
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn acquirer(&self) -> &GrantAcquirer {
        &self.acquirer
    }

    /// Run one request to completion.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method();
        let path_str = request.path().map(ToString::to_string).unwrap_or_default();
        debug!("Executing {method} {path}", method: method, path: path_str);

        let result = self.run(request).await;
        match &result {
            Ok(_) => debug!("Completed {method} {path}", method: method, path: path_str),
            Err(e) => {
                let code = e.code();
                let message = e.to_string();
                warn!("{method} {path} failed with {code}: {message}", method: method, path: path_str, code: code, message: message);
            }
        }
        result
    }

    async fn run(&self, request: Request) -> Result<Response> {
        match request {
            Request::AcquireRoot => {
                let handle = self.acquirer.acquire_root().await?;
                Ok(Response::Handle(handle.map(String::from)))
            }
            Request::ListDir { root, path } => {
                let tree = self.provider.open(&root).await?;
                let names = list(tree.as_ref(), &path, EntryType::Directory).await?;
                Ok(Response::Names(names))
            }
            Request::ListFile { root, path } => {
                let tree = self.provider.open(&root).await?;
                let names = list(tree.as_ref(), &path, EntryType::File).await?;
                Ok(Response::Names(names))
            }
            Request::Mkdir { root, path } => {
                let tree = self.provider.open(&root).await?;
                mkdir(tree.as_ref(), &path).await?;
                Ok(Response::Handle(Some(root.node_uri(&path))))
            }
            Request::ReadFile { root, path } => {
                let tree = self.provider.open(&root).await?;
                let content = io::read(tree.as_ref(), &path).await?;
                Ok(Response::Bytes(content))
            }
            Request::WriteFile { root, path, data } => {
                let tree = self.provider.open(&root).await?;
                io::write(tree.as_ref(), &path, &data, &self.content_type).await?;
                Ok(Response::Unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::MemoryGrantStore;
    use crate::handle::TreeHandle;
    use crate::memory::{MemoryApprover, MemoryTree, MemoryTreeProvider};
    use crate::path::PathSpecifier;
    use crate::resolve::{Leaf, resolve};

    fn service(tree: MemoryTree) -> (StorageService, TreeHandle) {
        let provider = MemoryTreeProvider::new();
        let handle = provider.mount(tree);
        let acquirer = GrantAcquirer::new(
            Arc::new(MemoryApprover::new()),
            Arc::new(MemoryGrantStore::new()),
        );
        (StorageService::new(Arc::new(provider), acquirer), handle)
    }

    #[tokio::test]
    async fn test_mkdir_returns_directory_handle() {
        let tree = MemoryTree::new();
        let (service, root) = service(tree.clone());
        let response = service
            .execute(Request::Mkdir {
                root: root.clone(),
                path: PathSpecifier::from(["docs", "2024"]),
            })
            .await
            .unwrap();
        assert_eq!(
            response,
            Response::Handle(Some(format!("{}/docs/2024", root)))
        );
        let created = resolve(&tree, &PathSpecifier::from(["docs", "2024"]), Leaf::Directory)
            .await
            .unwrap();
        assert_eq!(created.name, "2024");

        let response = service
            .execute(Request::Mkdir {
                root: root.clone(),
                path: PathSpecifier::root(),
            })
            .await
            .unwrap();
        assert_eq!(response, Response::Handle(Some(root.to_string())));
    }

    #[tokio::test]
    async fn test_configured_content_type() {
        let tree = MemoryTree::new();
        let (service, root) = service(tree.clone());
        let service = service.with_content_type("text/plain");
        service
            .execute(Request::WriteFile {
                root,
                path: PathSpecifier::from(["notes.txt"]),
                data: b"hello".to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(tree.content_type(&["notes.txt"]).as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_unknown_root_is_invalid() {
        let (service, _root) = service(MemoryTree::new());
        let err = service
            .execute(Request::ReadFile {
                root: TreeHandle::generate(),
                path: PathSpecifier::from(["a"]),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_ROOT");
    }
}
