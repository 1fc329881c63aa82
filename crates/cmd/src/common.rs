// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use diagnostics::debug;
use doctree::{
    Approval, Approver, Config, Dispatcher, Error, GrantAcquirer, GrantStore, HostTreeProvider,
    JsonGrantStore, MethodCall, Reply, Request, Response, StorageService, TreeHandle,
};

/// Environment variable naming the state directory
pub const HOME_ENV: &str = "DOCTREE_HOME";

/// Get the home directory with an optional override, falling back to DOCTREE_HOME
pub fn get_home_with_override(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    env::var(HOME_ENV)
        .map(PathBuf::from)
        .map_err(|_| anyhow!("{} environment variable not set", HOME_ENV))
}

/// Whether a prompt answer approves the request
#[must_use]
pub fn is_approval(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Folder approval on the controlling terminal.
///
/// With a location the human is asked to confirm it; without one they are
/// asked to type a directory, and an empty answer declines. `assume_yes`
/// approves the given location without asking.
pub struct TerminalApprover {
    location: Option<PathBuf>,
    assume_yes: bool,
}

impl TerminalApprover {
    #[must_use]
    pub fn new(location: Option<PathBuf>, assume_yes: bool) -> Self {
        Self {
            location,
            assume_yes,
        }
    }

    fn ask(question: &str) -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", question)?;
        stderr.flush()?;
        let mut answer = String::new();
        let _ = std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }

    fn decide(location: Option<PathBuf>, assume_yes: bool) -> std::io::Result<Approval> {
        let location = match location {
            Some(location) => location,
            None => {
                let typed = Self::ask("Directory to grant (empty to cancel): ")?;
                if typed.is_empty() {
                    return Ok(Approval::Declined);
                }
                PathBuf::from(typed)
            }
        };
        let location = std::fs::canonicalize(&location)?;
        if !location.is_dir() {
            return Err(std::io::Error::other(format!(
                "{} is not a directory",
                location.display()
            )));
        }
        if assume_yes {
            return Ok(Approval::Selected(location));
        }
        let answer = Self::ask(&format!(
            "Grant read/write access to {}? [y/N] ",
            location.display()
        ))?;
        Ok(if is_approval(&answer) {
            Approval::Selected(location)
        } else {
            Approval::Declined
        })
    }
}

#[async_trait]
impl Approver for TerminalApprover {
    async fn request_folder(&self) -> doctree::Result<Approval> {
        let location = self.location.clone();
        let assume_yes = self.assume_yes;
        tokio::task::spawn_blocking(move || Self::decide(location, assume_yes))
            .await
            .map_err(|e| Error::PickFailed(e.to_string()))?
            .map_err(|e| Error::PickFailed(e.to_string()))
    }
}

/// Everything a command needs: the home directory, its configuration and
/// a dispatcher running on a runtime owned by this context.
///
/// The thread that creates the context is the control thread. Commands
/// submit requests and block on their tickets; the work itself runs on the
/// runtime's workers.
pub struct HostContext {
    home: PathBuf,
    config: Config,
    store: Arc<JsonGrantStore>,
    dispatcher: Dispatcher,
    // Declared last so the dispatcher's handle is dropped first.
    runtime: tokio::runtime::Runtime,
}

impl HostContext {
    pub fn new(home: PathBuf, approver: Arc<dyn Approver>) -> Result<Self> {
        std::fs::create_dir_all(&home)
            .with_context(|| format!("Failed to create home directory {}", home.display()))?;
        let config = Config::load(&home)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name("doctree-worker")
            .enable_all()
            .build()
            .context("Failed to start runtime")?;

        let store = Arc::new(JsonGrantStore::new(config.grant_store_path(&home)));
        let acquirer = GrantAcquirer::new(approver, store.clone());
        let provider = HostTreeProvider::new(store.clone());
        let service = StorageService::new(Arc::new(provider), acquirer)
            .with_content_type(config.content_type.clone());
        let dispatcher = Dispatcher::new(Arc::new(service), runtime.handle().clone());

        let home_str = home.display().to_string();
        let workers = config.worker_threads;
        debug!("Opened doctree home {home} with {workers} workers", home: home_str, workers: workers);

        Ok(Self {
            home,
            config,
            store,
            dispatcher,
            runtime,
        })
    }

    /// A context whose approval step always answers with a terminal prompt
    /// for a typed directory.
    pub fn interactive(home: PathBuf) -> Result<Self> {
        Self::new(home, Arc::new(TerminalApprover::new(None, false)))
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &dyn GrantStore {
        self.store.as_ref()
    }

    /// Run a grant store call to completion from the control thread.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Submit a request and wait for its reply.
    pub fn submit(&self, request: Request) -> Result<Response> {
        Self::finish(self.dispatcher.submit(request).wait())
    }

    /// Submit a raw method call and wait for its reply.
    pub fn call(&self, call: MethodCall) -> Result<Response> {
        Self::finish(self.dispatcher.submit_call(call).wait())
    }

    fn finish(reply: Reply) -> Result<Response> {
        reply.map_err(anyhow::Error::new)
    }
}

/// Parse a handle given on the command line.
pub fn parse_handle(s: &str) -> Result<TreeHandle> {
    TreeHandle::parse(s).map_err(|e| anyhow::Error::new(doctree::Failure::from(e)))
}
