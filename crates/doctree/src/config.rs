// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::tree::DEFAULT_CONTENT_TYPE;
use diagnostics::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the home directory
pub const CONFIG_FILE: &str = "doctree.yaml";

/// Host configuration, read from `doctree.yaml` in the home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Worker threads for the dispatcher's runtime
    pub worker_threads: usize,
    /// Grant store file; relative paths are taken from the home directory
    pub grant_store: PathBuf,
    /// Content type for files created by writes
    pub content_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            grant_store: PathBuf::from("grants.json"),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

impl Config {
    /// Load the configuration for `home`. A missing file yields the
    /// defaults.
    pub fn load<P: AsRef<Path>>(home: P) -> Result<Self> {
        let path = home.as_ref().join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let path_str = path.display().to_string();
                debug!("No configuration at {path}, using defaults", path: path_str);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Self::from_yaml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means all defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml_ng::from_str(content)
            .map_err(|e| Error::Config(format!("could not parse yaml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::Config(
                "worker_threads must be greater than 0".to_string(),
            ));
        }
        if self.grant_store.as_os_str().is_empty() {
            return Err(Error::Config("grant_store cannot be empty".to_string()));
        }
        if self.content_type.trim().is_empty() {
            return Err(Error::Config("content_type cannot be empty".to_string()));
        }
        Ok(())
    }

    /// The grant store location, resolved against `home`.
    #[must_use]
    pub fn grant_store_path<P: AsRef<Path>>(&self, home: P) -> PathBuf {
        if self.grant_store.is_absolute() {
            self.grant_store.clone()
        } else {
            home.as_ref().join(&self.grant_store)
        }
    }
}
