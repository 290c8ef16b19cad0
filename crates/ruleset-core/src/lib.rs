//! Disabled-by-default ruleset generation.
//!
//! Reads lint rule-category documents (PMD `category/<lang>/<name>.xml`) and
//! writes one ruleset that references every category and excludes each of
//! its rules by name, ready for selective re-enabling.

#![deny(unsafe_code)]

pub mod assemble;
pub mod category;
pub mod checkout;
pub mod error;
pub mod generate;
pub mod source;
pub mod template;

pub use crate::assemble::{AssembledRuleset, CategorySummary, RulesetAssembler, assemble, category_ref};
pub use crate::category::{CategoryDocument, read_rule_names};
pub use crate::checkout::SourceTree;
pub use crate::error::{Result, RulesetError};
pub use crate::generate::{GenerateReport, generate, generate_from_paths, render, write_atomic};
pub use crate::source::{GeneratorConfig, OutputConfig, SourceConfig};
pub use crate::template::RulesetTemplate;
