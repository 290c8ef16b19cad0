//! Building the disabled-by-default ruleset.
//!
//! Every input document becomes one category reference appended to the
//! template's root:
//!
//! ```xml
//! <rule ref="category/java/design.xml">
//!     <exclude name="AbstractClassWithoutAnyMethod"/>
//!     ...
//! </rule>
//! ```
//!
//! References follow the input order and exclusions follow the order in
//! which rules are declared in each document.

use std::path::{Path, PathBuf};

use ruleset_xml::{Document, NodeId, QName};
use tracing::{debug, info};

use crate::category::{CategoryDocument, NAME_ATTR, RULE_TAG, read_rule_names};
use crate::error::{Result, RulesetError};
use crate::template::RulesetTemplate;

/// Path segment a category reference starts at.
pub const CATEGORY_SEGMENT: &str = "category";

/// Attribute of a category reference holding the category path.
pub const REF_ATTR: &str = "ref";

/// Local name of an exclusion entry.
pub const EXCLUDE_TAG: &str = "exclude";

/// Derive the `ref` value of a category document from its path.
///
/// The result is the slash-separated tail of the path starting at the first
/// `category` segment, e.g. `/tmp/x/pmd-java/src/main/resources/category/java/design.xml`
/// gives `category/java/design.xml`. Backslashes count as separators.
pub fn category_ref(path: &Path) -> Result<String> {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let segments: Vec<&str> = normalized
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    match segments
        .iter()
        .position(|segment| *segment == CATEGORY_SEGMENT)
    {
        Some(start) if start + 1 < segments.len() => Ok(segments[start..].join("/")),
        _ => Err(RulesetError::PathPatternMismatch {
            path: path.to_path_buf(),
        }),
    }
}

/// What was added for one category document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub path: PathBuf,
    pub reference: String,
    pub rule_count: usize,
}

/// Owns the output tree while category references are appended.
#[derive(Debug)]
pub struct RulesetAssembler {
    namespace: String,
    document: Document,
    categories: Vec<CategorySummary>,
}

impl RulesetAssembler {
    pub fn new(template: RulesetTemplate) -> Self {
        let (namespace, document) = template.into_parts();
        Self {
            namespace,
            document,
            categories: Vec::new(),
        }
    }

    /// Append a category reference with one exclusion per rule name.
    pub fn append_category(
        &mut self,
        path: &Path,
        reference: String,
        rule_names: &[String],
    ) -> NodeId {
        let root = self.document.root();
        let element = self
            .document
            .append_child(root, QName::new(&self.namespace, RULE_TAG));
        self.document
            .set_attribute(element, QName::unqualified(REF_ATTR), reference.as_str());

        for name in rule_names {
            let exclude = self
                .document
                .append_child(element, QName::new(&self.namespace, EXCLUDE_TAG));
            self.document
                .set_attribute(exclude, QName::unqualified(NAME_ATTR), name.as_str());
        }

        debug!(reference = %reference, excluded = rule_names.len(), "added category reference");
        self.categories.push(CategorySummary {
            path: path.to_path_buf(),
            reference,
            rule_count: rule_names.len(),
        });
        element
    }

    pub fn finish(self) -> AssembledRuleset {
        AssembledRuleset {
            namespace: self.namespace,
            document: self.document,
            categories: self.categories,
        }
    }
}

/// The complete output tree, not yet indented or written.
#[derive(Debug)]
pub struct AssembledRuleset {
    pub namespace: String,
    pub document: Document,
    pub categories: Vec<CategorySummary>,
}

impl AssembledRuleset {
    pub fn total_rules(&self) -> usize {
        self.categories.iter().map(|category| category.rule_count).sum()
    }
}

/// Build the ruleset from category documents in the given order.
///
/// The first document is also the template. Every path's reference is
/// derived before any document is parsed, so a path without a `category`
/// segment fails the run up front.
pub fn assemble(paths: &[PathBuf]) -> Result<AssembledRuleset> {
    let Some(first) = paths.first() else {
        return Err(RulesetError::NoDocuments);
    };
    let references = paths
        .iter()
        .map(|path| category_ref(path))
        .collect::<Result<Vec<_>>>()?;

    info!(path = %first.display(), "creating template");
    let first = CategoryDocument::load(first)?;
    let mut first_rules = first.rule_names().to_vec();
    let mut assembler = RulesetAssembler::new(RulesetTemplate::from_category(first));

    info!(categories = paths.len(), "adding rules and exclusions");
    for (index, (path, reference)) in paths.iter().zip(references).enumerate() {
        let rule_names = if index == 0 {
            std::mem::take(&mut first_rules)
        } else {
            read_rule_names(path)?
        };
        assembler.append_category(path, reference, &rule_names);
    }
    Ok(assembler.finish())
}
