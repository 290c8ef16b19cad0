//! Acquiring the upstream source tree.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{Result, RulesetError};
use crate::source::SourceConfig;

/// Root directory the configured documents are resolved against.
///
/// A [`SourceTree::Checkout`] owns a temporary directory that is removed
/// when the value is dropped, whether or not generation succeeded.
#[derive(Debug)]
pub enum SourceTree {
    Checkout(TempDir),
    Local(PathBuf),
}

impl SourceTree {
    /// Shallow-clone `source.revision` of `source.repository` into a fresh
    /// temporary directory.
    pub fn clone_shallow(source: &SourceConfig) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("ruleset-source-")
            .tempdir()
            .map_err(|err| RulesetError::io(std::env::temp_dir(), err))?;

        info!(
            repository = %source.repository,
            revision = %source.revision,
            "cloning"
        );
        let output = Command::new("git")
            .args(["clone", "--quiet", "--depth", "1", "--branch"])
            .arg(&source.revision)
            .arg("--")
            .arg(&source.repository)
            .arg(dir.path())
            .output()
            .map_err(|err| checkout_error(source, format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(checkout_error(source, stderr.trim().to_string()));
        }
        debug!(dir = %dir.path().display(), "checkout ready");
        Ok(Self::Checkout(dir))
    }

    /// Use an existing checkout. The directory is never deleted.
    pub fn local(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(RulesetError::SourceNotFound { path: dir });
        }
        Ok(Self::Local(dir))
    }

    pub fn root(&self) -> &Path {
        match self {
            Self::Checkout(dir) => dir.path(),
            Self::Local(dir) => dir,
        }
    }

    /// Absolute paths of the configured documents, in configured order.
    pub fn documents(&self, source: &SourceConfig) -> Vec<PathBuf> {
        source
            .documents
            .iter()
            .map(|document| self.root().join(document))
            .collect()
    }
}

fn checkout_error(source: &SourceConfig, message: String) -> RulesetError {
    RulesetError::Checkout {
        repository: source.repository.clone(),
        revision: source.revision.clone(),
        message,
    }
}
