//! Reading rule-category documents.

use std::path::{Path, PathBuf};

use ruleset_xml::{Document, QName, namespace_uri, parse_file};
use tracing::debug;

use crate::error::{Result, RulesetError};

/// Local name of a rule definition (and of a category reference in the output).
pub const RULE_TAG: &str = "rule";

/// Attribute holding a rule's name.
pub const NAME_ATTR: &str = "name";

/// One parsed category document.
#[derive(Debug, Clone)]
pub struct CategoryDocument {
    path: PathBuf,
    namespace: String,
    document: Document,
    rule_names: Vec<String>,
}

impl CategoryDocument {
    /// Parse the document at `path` and collect its rule names.
    pub fn load(path: &Path) -> Result<Self> {
        let document = parse_file(path).map_err(|err| RulesetError::from_xml(path, err))?;
        let namespace = namespace_uri(&document.root_tag()).to_string();
        let rule_names = collect_rule_names(&document, &namespace, path)?;
        debug!(
            path = %path.display(),
            namespace = %namespace,
            rules = rule_names.len(),
            "read category"
        );
        Ok(Self {
            path: path.to_path_buf(),
            namespace,
            document,
            rule_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Namespace of the root element, empty when unqualified.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Names of the root's `rule` children, in document order.
    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }

    pub(crate) fn into_tree(self) -> (String, Document) {
        (self.namespace, self.document)
    }
}

/// Read the rule names defined by the category document at `path`.
pub fn read_rule_names(path: &Path) -> Result<Vec<String>> {
    Ok(CategoryDocument::load(path)?.rule_names)
}

fn collect_rule_names(document: &Document, namespace: &str, path: &Path) -> Result<Vec<String>> {
    let rule = QName::new(namespace, RULE_TAG);
    let name = QName::unqualified(NAME_ATTR);
    document
        .child_elements_named(document.root(), &rule)
        .enumerate()
        .map(|(index, id)| {
            document
                .attribute(id, &name)
                .map(str::to_string)
                .ok_or_else(|| RulesetError::MalformedInput {
                    path: path.to_path_buf(),
                    message: format!("rule #{} has no '{NAME_ATTR}' attribute", index + 1),
                })
        })
        .collect()
}
