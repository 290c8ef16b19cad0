//! Parsing into an owned [`Document`].

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::namespace::{QName, XML_NS};
use crate::tree::{Document, NamespaceDecl, NodeId};

/// Parse XML text into an owned, editable document.
pub fn parse_str(text: &str) -> Result<Document> {
    let source = roxmltree::Document::parse(text)?;
    let root = source.root_element();
    let mut doc = Document::new(element_name(&root));
    let id = doc.root();
    copy_element(&mut doc, id, &root);
    Ok(doc)
}

/// Read and parse an XML file. The file is closed before parsing starts.
pub fn parse_file(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

fn element_name(node: &roxmltree::Node<'_, '_>) -> QName {
    let tag = node.tag_name();
    QName::new(tag.namespace().unwrap_or(""), tag.name())
}

fn copy_element(doc: &mut Document, id: NodeId, source: &roxmltree::Node<'_, '_>) {
    for ns in source.namespaces() {
        if ns.uri() == XML_NS || ns.uri().is_empty() {
            continue;
        }
        doc.add_declaration(NamespaceDecl {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        });
    }
    for attr in source.attributes() {
        doc.set_attribute(
            id,
            QName::new(attr.namespace().unwrap_or(""), attr.name()),
            attr.value(),
        );
    }

    let mut last_child: Option<NodeId> = None;
    for child in source.children() {
        if child.is_element() {
            let child_id = doc.append_child(id, element_name(&child));
            copy_element(doc, child_id, &child);
            last_child = Some(child_id);
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            let target = match last_child {
                Some(previous) => &mut doc.element_mut(previous).tail,
                None => &mut doc.element_mut(id).text,
            };
            target.get_or_insert_with(String::new).push_str(text);
        }
    }
}
