//! Owned XML element tree used by the ruleset generator.
//!
//! Documents are parsed with `roxmltree` into a mutable arena ([`Document`])
//! whose elements keep non-owning parent back-references, edited in place,
//! and written back out with `quick-xml`:
//!
//! - [`namespace`]: qualified names in `{uri}local` notation
//! - [`parse`]: text or file to [`Document`]
//! - [`tree`]: the arena, child removal and indentation
//! - [`write`]: deterministic serialization with a default namespace

#![deny(unsafe_code)]

pub mod error;
pub mod namespace;
pub mod parse;
pub mod tree;
pub mod write;

pub use error::{Result, XmlError};
pub use namespace::{QName, XML_NS, namespace_uri};
pub use parse::{parse_file, parse_str};
pub use tree::{Attribute, Document, Element, NodeId};
pub use write::to_bytes;
