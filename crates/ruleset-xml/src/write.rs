//! Deterministic serialization of a [`Document`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName as RawName;

use crate::error::Result;
use crate::namespace::{QName, XML_NS};
use crate::tree::{Document, NodeId};

/// Serialize `doc` with `default_namespace` bound to the empty prefix.
///
/// Elements in the default namespace are written without a prefix. An
/// unqualified element below one of them undeclares it with `xmlns=""`.
/// Every other namespace in use is declared on the root, after the default
/// declaration and sorted by prefix. Prefixes come from the source document
/// when it declared one, otherwise `ns0`, `ns1`, ... are generated.
pub fn to_bytes(doc: &Document, default_namespace: &str) -> Result<Vec<u8>> {
    let prefixes = PrefixMap::build(doc, default_namespace);
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Text(BytesText::new("\n")))?;
    write_element(&mut xml, doc, doc.root(), &prefixes, None)?;
    xml.write_event(Event::Text(BytesText::new("\n")))?;
    Ok(xml.into_inner())
}

struct PrefixMap {
    default: Option<String>,
    /// uri -> prefix
    named: BTreeMap<String, String>,
}

impl PrefixMap {
    fn build(doc: &Document, default_namespace: &str) -> Self {
        let mut map = Self {
            default: (!default_namespace.is_empty()).then(|| default_namespace.to_string()),
            named: BTreeMap::new(),
        };
        for id in doc.descendants() {
            let element = doc.element(id);
            if let Some(uri) = element.name.namespace()
                && Some(uri) != map.default.as_deref()
            {
                map.bind(doc, uri);
            }
            for attr in &element.attributes {
                if let Some(uri) = attr.name.namespace()
                    && uri != XML_NS
                {
                    map.bind(doc, uri);
                }
            }
        }
        map
    }

    fn bind(&mut self, doc: &Document, uri: &str) {
        if self.named.contains_key(uri) {
            return;
        }
        let declared = doc
            .declarations()
            .iter()
            .filter(|decl| decl.uri == uri)
            .filter_map(|decl| decl.prefix.as_deref())
            .find(|prefix| !self.is_taken(prefix))
            .map(str::to_string);
        let prefix = declared.unwrap_or_else(|| {
            (0..)
                .map(|n| format!("ns{n}"))
                .find(|candidate| !self.is_taken(candidate) && !is_declared(doc, candidate))
                .unwrap_or_default()
        });
        self.named.insert(uri.to_string(), prefix);
    }

    fn is_taken(&self, prefix: &str) -> bool {
        prefix == "xml" || self.named.values().any(|existing| existing == prefix)
    }

    fn is_default(&self, uri: &str) -> bool {
        self.default.as_deref() == Some(uri)
    }

    fn element_name(&self, name: &QName) -> String {
        match name.namespace() {
            Some(uri) if self.is_default(uri) => name.local_name().to_string(),
            Some(uri) => self.prefixed(uri, name.local_name()),
            None => name.local_name().to_string(),
        }
    }

    fn attribute_name(&self, name: &QName) -> String {
        match name.namespace() {
            Some(XML_NS) => format!("xml:{}", name.local_name()),
            Some(uri) => self.prefixed(uri, name.local_name()),
            None => name.local_name().to_string(),
        }
    }

    fn prefixed(&self, uri: &str, local: &str) -> String {
        match self.named.get(uri) {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }

    /// Prefixed `xmlns:*` declarations for the root, sorted by prefix.
    fn declarations(&self) -> Vec<(String, &str)> {
        let mut named: Vec<_> = self.named.iter().collect();
        named.sort_by(|a, b| a.1.cmp(b.1));
        named
            .into_iter()
            .map(|(uri, prefix)| (format!("xmlns:{prefix}"), uri.as_str()))
            .collect()
    }
}

fn is_declared(doc: &Document, prefix: &str) -> bool {
    doc.declarations()
        .iter()
        .any(|decl| decl.prefix.as_deref() == Some(prefix))
}

/// `scope` is the default namespace in effect at the parent, `None` at the
/// root or below an `xmlns=""`.
fn write_element<W: Write>(
    xml: &mut Writer<W>,
    doc: &Document,
    id: NodeId,
    prefixes: &PrefixMap,
    scope: Option<&str>,
) -> Result<()> {
    let is_root = id == doc.root();
    let element = doc.element(id);
    let own_scope = match element.name.namespace() {
        Some(uri) if prefixes.is_default(uri) => Some(uri),
        Some(_) => scope,
        None => None,
    };

    let name = prefixes.element_name(&element.name);
    let mut start = BytesStart::new(name.as_str());
    if own_scope != scope {
        push_attribute(&mut start, "xmlns", own_scope.unwrap_or(""));
    }
    if is_root {
        for (key, uri) in prefixes.declarations() {
            push_attribute(&mut start, &key, uri);
        }
    }
    for attr in &element.attributes {
        push_attribute(&mut start, &prefixes.attribute_name(&attr.name), &attr.value);
    }

    let text = element.text.as_deref().filter(|text| !text.is_empty());
    let children = doc.children(id);
    if text.is_none() && children.is_empty() {
        xml.write_event(Event::Empty(start))?;
    } else {
        xml.write_event(Event::Start(start))?;
        if let Some(text) = text {
            write_text(xml, text)?;
        }
        for &child in children {
            write_element(xml, doc, child, prefixes, own_scope)?;
        }
        xml.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }

    if !is_root
        && let Some(tail) = element.tail.as_deref().filter(|tail| !tail.is_empty())
    {
        write_text(xml, tail)?;
    }
    Ok(())
}

fn push_attribute(start: &mut BytesStart<'_>, key: &str, value: &str) {
    start.push_attribute(Attribute {
        key: RawName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    });
}

/// Values are double-quoted, so apostrophes stay literal. Whitespace
/// controls become character references to survive attribute normalization.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in partial_escape(value).chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            other => out.push(other),
        }
    }
    out
}

/// Character data keeps quotes verbatim; only markup characters are escaped.
fn write_text<W: Write>(xml: &mut Writer<W>, text: &str) -> Result<()> {
    xml.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_str;

    const NS: &str = "urn:example:ruleset";

    fn render(doc: &Document, default_namespace: &str) -> String {
        String::from_utf8(to_bytes(doc, default_namespace).unwrap()).unwrap()
    }

    #[test]
    fn test_default_namespace_has_no_prefix() {
        let mut doc = Document::new(QName::new(NS, "ruleset"));
        let root = doc.root();
        let rule = doc.append_child(root, QName::new(NS, "rule"));
        doc.set_attribute(rule, QName::unqualified("ref"), "category/java/design.xml");

        assert_eq!(
            render(&doc, NS),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ruleset xmlns=\"urn:example:ruleset\">\
             <rule ref=\"category/java/design.xml\"/></ruleset>\n"
        );
    }

    #[test]
    fn test_foreign_namespace_uses_source_prefix() {
        let doc = parse_str(
            r#"<ruleset xmlns="urn:example:ruleset" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="a b" name="Design"/>"#,
        )
        .unwrap();
        let out = render(&doc, NS);
        assert!(out.contains(
            "<ruleset xmlns=\"urn:example:ruleset\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"a b\" name=\"Design\"/>"
        ));
    }

    #[test]
    fn test_generated_prefix_without_declaration() {
        let mut doc = Document::new(QName::new(NS, "ruleset"));
        let root = doc.root();
        doc.set_attribute(root, QName::new("urn:other", "flag"), "yes");
        let out = render(&doc, NS);
        assert!(out.contains("xmlns:ns0=\"urn:other\""));
        assert!(out.contains("ns0:flag=\"yes\""));
    }

    #[test]
    fn test_unqualified_element_undeclares_default() {
        let doc = parse_str(
            r#"<ruleset xmlns="urn:example:ruleset"><plain xmlns=""><inner/></plain><rule/></ruleset>"#,
        )
        .unwrap();
        assert_eq!(
            render(&doc, NS),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ruleset xmlns=\"urn:example:ruleset\">\
             <plain xmlns=\"\"><inner/></plain><rule/></ruleset>\n"
        );
    }

    #[test]
    fn test_default_redeclared_below_undeclared_scope() {
        let mut doc = Document::new(QName::new(NS, "ruleset"));
        let root = doc.root();
        let plain = doc.append_child(root, QName::unqualified("plain"));
        doc.append_child(plain, QName::new(NS, "rule"));
        let out = render(&doc, NS);
        assert!(out.contains("<plain xmlns=\"\"><rule xmlns=\"urn:example:ruleset\"/></plain>"));

        let reparsed = parse_str(&out).unwrap();
        let plain = reparsed.children(reparsed.root())[0];
        let rule = reparsed.children(plain)[0];
        assert_eq!(reparsed.element(plain).name, QName::unqualified("plain"));
        assert_eq!(reparsed.element(rule).name, QName::new(NS, "rule"));
    }

    #[test]
    fn test_attribute_apostrophe_kept_literal() {
        let mut doc = Document::new(QName::new(NS, "ruleset"));
        let root = doc.root();
        let exclude = doc.append_child(root, QName::new(NS, "exclude"));
        doc.set_attribute(exclude, QName::unqualified("name"), "A'B");
        doc.set_attribute(exclude, QName::unqualified("note"), "x<y\n");
        let out = render(&doc, NS);
        assert!(out.contains("<exclude name=\"A'B\" note=\"x&lt;y&#10;\"/>"));
    }

    #[test]
    fn test_no_namespace_document() {
        let doc = parse_str("<ruleset><rule name=\"A\"/></ruleset>").unwrap();
        assert_eq!(
            render(&doc, ""),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ruleset><rule name=\"A\"/></ruleset>\n"
        );
    }

    #[test]
    fn test_text_and_attributes_escaped() {
        let mut doc = Document::new(QName::unqualified("ruleset"));
        let root = doc.root();
        let description = doc.append_child(root, QName::unqualified("description"));
        doc.element_mut(description).text = Some("a < b & c".to_string());
        doc.set_attribute(description, QName::unqualified("title"), "\"quoted\"");
        let out = render(&doc, "");
        assert!(out.contains("a &lt; b &amp; c"));
        assert!(out.contains("title=\"&quot;quoted&quot;\""));
    }

    #[test]
    fn test_indented_output() {
        let mut doc = parse_str(
            "<ruleset xmlns=\"urn:example:ruleset\">\n  <description>Keep</description>\n</ruleset>",
        )
        .unwrap();
        let root = doc.root();
        let rule = doc.append_child(root, QName::new(NS, "rule"));
        let exclude = doc.append_child(rule, QName::new(NS, "exclude"));
        doc.set_attribute(exclude, QName::unqualified("name"), "A");
        doc.indent("    ");

        assert_eq!(
            render(&doc, NS),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ruleset xmlns=\"urn:example:ruleset\">\n    \
             <description>Keep</description>\n    \
             <rule>\n        \
             <exclude name=\"A\"/>\n    \
             </rule>\n\
             </ruleset>\n"
        );
    }
}
