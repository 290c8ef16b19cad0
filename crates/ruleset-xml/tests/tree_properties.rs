//! Property tests for element removal, indentation and serialization.

use proptest::prelude::*;

use ruleset_xml::{Document, QName, parse_str, to_bytes};

const NS: &str = "urn:example:ruleset";

/// Build a root with children named `rule` (true) or `description` (false).
fn build(kinds: &[bool]) -> Document {
    let mut doc = Document::new(QName::new(NS, "ruleset"));
    let root = doc.root();
    for (index, &is_rule) in kinds.iter().enumerate() {
        let local = if is_rule { "rule" } else { "description" };
        let child = doc.append_child(root, QName::new(NS, local));
        doc.set_attribute(child, QName::unqualified("name"), format!("N{index}"));
    }
    doc
}

proptest! {
    #[test]
    fn detaching_rules_keeps_other_children_in_order(kinds in prop::collection::vec(any::<bool>(), 0..24)) {
        let mut doc = build(&kinds);
        let root = doc.root();
        let rule = QName::new(NS, "rule");
        let rules: Vec<_> = doc.child_elements_named(root, &rule).collect();
        for id in rules {
            prop_assert!(doc.detach(id));
        }

        prop_assert_eq!(doc.child_elements_named(root, &rule).count(), 0);
        let expected: Vec<String> = kinds
            .iter()
            .enumerate()
            .filter(|(_, is_rule)| !**is_rule)
            .map(|(index, _)| format!("N{index}"))
            .collect();
        let name = QName::unqualified("name");
        let remaining: Vec<String> = doc
            .children(root)
            .iter()
            .map(|&id| doc.attribute(id, &name).unwrap_or_default().to_string())
            .collect();
        prop_assert_eq!(remaining, expected);
    }

    #[test]
    fn indentation_only_touches_whitespace(kinds in prop::collection::vec(any::<bool>(), 1..12)) {
        let mut doc = build(&kinds);
        let before = to_bytes(&doc, NS).unwrap();
        doc.indent("    ");
        let after = to_bytes(&doc, NS).unwrap();

        let strip = |bytes: &[u8]| -> String {
            String::from_utf8_lossy(bytes)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect()
        };
        prop_assert_eq!(strip(&before), strip(&after));
    }

    #[test]
    fn serialized_output_parses_back(kinds in prop::collection::vec(any::<bool>(), 0..12)) {
        let mut doc = build(&kinds);
        doc.indent("    ");
        let bytes = to_bytes(&doc, NS).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let reparsed = parse_str(&text).unwrap();

        prop_assert_eq!(reparsed.root_tag(), doc.root_tag());
        prop_assert_eq!(reparsed.children(reparsed.root()).len(), kinds.len());
    }
}
