//! The output skeleton: the first category document without its rules.

use std::path::Path;

use ruleset_xml::{Document, NodeId, QName};
use tracing::debug;

use crate::category::{CategoryDocument, RULE_TAG};
use crate::error::Result;

/// The pruned first document. Its root, namespace declaration and non-rule
/// children (description, metadata) seed the generated ruleset.
#[derive(Debug, Clone)]
pub struct RulesetTemplate {
    namespace: String,
    document: Document,
}

impl RulesetTemplate {
    /// Parse `path` and strip its rule definitions.
    pub fn build(path: &Path) -> Result<Self> {
        Ok(Self::from_category(CategoryDocument::load(path)?))
    }

    /// Strip rule definitions from an already parsed document.
    ///
    /// Only direct children of the root named `rule` in the root's namespace
    /// are removed; the file on disk is untouched.
    pub fn from_category(category: CategoryDocument) -> Self {
        let (namespace, mut document) = category.into_tree();
        let rule = QName::new(&namespace, RULE_TAG);
        let rules: Vec<NodeId> = document
            .child_elements_named(document.root(), &rule)
            .collect();
        for &id in &rules {
            document.detach(id);
        }
        debug!(removed = rules.len(), "pruned template rules");
        Self {
            namespace,
            document,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn into_parts(self) -> (String, Document) {
        (self.namespace, self.document)
    }
}
