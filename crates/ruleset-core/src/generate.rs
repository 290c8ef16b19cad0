//! End-to-end generation: assemble, indent, serialize, commit.

use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, info_span};

use crate::assemble::{AssembledRuleset, CategorySummary, assemble};
use crate::checkout::SourceTree;
use crate::error::{Result, RulesetError};
use crate::source::GeneratorConfig;

/// Indentation step of the written ruleset.
pub const INDENT: &str = "    ";

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub namespace: String,
    pub categories: Vec<CategorySummary>,
}

impl GenerateReport {
    pub fn total_rules(&self) -> usize {
        self.categories.iter().map(|category| category.rule_count).sum()
    }
}

/// Generate the ruleset for the configured documents of `tree`.
pub fn generate(tree: &SourceTree, config: &GeneratorConfig) -> Result<GenerateReport> {
    let span = info_span!("generate", source = %tree.root().display());
    let _guard = span.enter();
    let documents = tree.documents(&config.source);
    generate_from_paths(&documents, &config.output.path)
}

/// Generate the ruleset for `documents`, in order, and write it to `output`.
///
/// Nothing is written unless every document was read successfully.
pub fn generate_from_paths(documents: &[PathBuf], output: &Path) -> Result<GenerateReport> {
    let mut ruleset = assemble(documents)?;
    let bytes = render(&mut ruleset)?;

    info!(output = %output.display(), "writing ruleset");
    write_atomic(output, &bytes)?;
    info!(
        categories = ruleset.categories.len(),
        excluded = ruleset.total_rules(),
        "done"
    );
    Ok(GenerateReport {
        output: output.to_path_buf(),
        namespace: ruleset.namespace,
        categories: ruleset.categories,
    })
}

/// Indent the tree and serialize it with its namespace as the default.
pub fn render(ruleset: &mut AssembledRuleset) -> Result<Vec<u8>> {
    ruleset.document.indent(INDENT);
    ruleset_xml::to_bytes(&ruleset.document, &ruleset.namespace).map_err(RulesetError::Serialize)
}

/// Replace `path` with `bytes` through a temporary file in the same
/// directory, so the target is either fully written or left as it was.
///
/// The result keeps the permissions of the file it replaces. A new file is
/// created `rw-r--r--` on Unix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|err| RulesetError::io(dir, err))?;
    if let Err(err) = file.write_all(bytes).and_then(|()| file.flush()) {
        return Err(RulesetError::io(file.path(), err));
    }
    if let Some(permissions) = output_permissions(path)
        && let Err(err) = file.as_file().set_permissions(permissions)
    {
        return Err(RulesetError::io(file.path(), err));
    }
    file.persist(path)
        .map_err(|err| RulesetError::io(path, err.error))?;
    Ok(())
}

fn output_permissions(path: &Path) -> Option<Permissions> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruleset.xml");
        fs::write(&path, "old content that is longer than the new one").unwrap();

        write_atomic(&path, b"<ruleset/>\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<ruleset/>\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/ruleset.xml");
        let err = write_atomic(&path, b"<ruleset/>").unwrap_err();
        assert!(matches!(err, RulesetError::Io { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruleset.xml");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o664)).unwrap();

        write_atomic(&path, b"<ruleset/>\n").unwrap();
        assert_eq!(mode(&path), 0o664);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_is_world_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruleset.xml");

        write_atomic(&path, b"<ruleset/>\n").unwrap();
        assert_eq!(mode(&path), 0o644);
    }
}
