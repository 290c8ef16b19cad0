//! Generator configuration: where the category documents come from and
//! where the ruleset goes.
//!
//! ```toml
//! [source]
//! repository = "https://github.com/pmd/pmd.git"
//! revision = "pmd_releases/6.42.0"
//! documents = [
//!     "pmd-java/src/main/resources/category/java/design.xml",
//! ]
//!
//! [output]
//! path = "ruleset.xml"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesetError};

pub const DEFAULT_REPOSITORY: &str = "https://github.com/pmd/pmd.git";
pub const DEFAULT_REVISION: &str = "pmd_releases/6.42.0";
pub const DEFAULT_OUTPUT: &str = "ruleset.xml";

/// Java categories of the default revision, in output order.
pub const DEFAULT_DOCUMENTS: &[&str] = &[
    "pmd-java/src/main/resources/category/java/design.xml",
    "pmd-java/src/main/resources/category/java/multithreading.xml",
    "pmd-java/src/main/resources/category/java/bestpractices.xml",
    "pmd-java/src/main/resources/category/java/documentation.xml",
    "pmd-java/src/main/resources/category/java/errorprone.xml",
    "pmd-java/src/main/resources/category/java/codestyle.xml",
    "pmd-java/src/main/resources/category/java/performance.xml",
    "pmd-java/src/main/resources/category/java/security.xml",
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream repository, pinned revision and the documents to read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub repository: String,
    pub revision: String,
    /// Paths relative to the checkout root, in output order.
    pub documents: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            documents: DEFAULT_DOCUMENTS.iter().map(|doc| (*doc).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Relative paths resolve against the working directory.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| RulesetError::io(path, err))?;
        let config: Self = toml::from_str(&text).map_err(|source| RulesetError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let source = &self.source;
        if source.repository.trim().is_empty() {
            return Err(invalid("source.repository is empty"));
        }
        if source.revision.trim().is_empty() {
            return Err(invalid("source.revision is empty"));
        }
        if source.documents.is_empty() {
            return Err(invalid("source.documents is empty"));
        }
        if let Some(document) = source
            .documents
            .iter()
            .find(|document| Path::new(document).is_absolute() || document.starts_with('/'))
        {
            return Err(invalid(format!(
                "document path must be relative to the checkout: {document}"
            )));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(invalid("output.path is empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> RulesetError {
    RulesetError::InvalidConfig {
        message: message.into(),
    }
}
