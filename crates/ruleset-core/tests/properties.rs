//! Properties of category reading, reference derivation and assembly.

use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use ruleset_core::{assemble, category_ref, read_rule_names, render};
use ruleset_xml::{QName, parse_str};

const PMD_NS: &str = "http://pmd.sourceforge.net/ruleset/2.0.0";

fn rule_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9]{0,16}"
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,8}".prop_filter("not the category segment", |s| s != "category")
}

fn write_category(dir: &Path, file: &str, names: &[String]) -> PathBuf {
    let path = dir.join("pmd-java/src/main/resources/category/java").join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut body = String::new();
    for name in names {
        body.push_str(&format!(
            "    <rule name=\"{name}\" since=\"1.0\">\n        <priority>3</priority>\n    </rule>\n"
        ));
    }
    fs::write(
        &path,
        format!(
            "<?xml version=\"1.0\"?>\n<ruleset name=\"{file}\" xmlns=\"{PMD_NS}\">\n    <description>Generated</description>\n{body}</ruleset>\n"
        ),
    )
    .unwrap();
    path
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exclusions_mirror_rule_names(
        categories in prop::collection::vec(prop::collection::vec(rule_name(), 0..12), 1..5)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = categories
            .iter()
            .enumerate()
            .map(|(index, names)| write_category(dir.path(), &format!("c{index}.xml"), names))
            .collect();

        for (path, names) in paths.iter().zip(&categories) {
            prop_assert_eq!(&read_rule_names(path).unwrap(), names);
        }

        let mut ruleset = assemble(&paths).unwrap();
        let text = String::from_utf8(render(&mut ruleset).unwrap()).unwrap();
        let doc = parse_str(&text).unwrap();
        let root = doc.root();
        let rule = QName::new(PMD_NS, "rule");
        let exclude = QName::new(PMD_NS, "exclude");
        let name = QName::unqualified("name");
        let reference = QName::unqualified("ref");

        let references: Vec<_> = doc.child_elements_named(root, &rule).collect();
        prop_assert_eq!(references.len(), categories.len());
        for (index, (&id, names)) in references.iter().zip(&categories).enumerate() {
            let expected = format!("category/java/c{index}.xml");
            prop_assert_eq!(doc.attribute(id, &reference), Some(expected.as_str()));
            // Only references remain under the root, never rule definitions.
            prop_assert!(doc.attribute(id, &name).is_none());
            let excluded: Vec<String> = doc
                .child_elements_named(id, &exclude)
                .map(|child| doc.attribute(child, &name).unwrap().to_string())
                .collect();
            prop_assert_eq!(&excluded, names);
        }
    }

    #[test]
    fn reference_starts_at_category_segment(
        prefix in prop::collection::vec(segment(), 0..6),
        suffix in prop::collection::vec(segment(), 1..4),
    ) {
        let path = format!("/{}/category/{}", prefix.join("/"), suffix.join("/"));
        let reference = category_ref(Path::new(&path)).unwrap();
        prop_assert_eq!(reference, format!("category/{}", suffix.join("/")));
    }

    #[test]
    fn paths_without_category_segment_fail(segments in prop::collection::vec(segment(), 1..8)) {
        let path = format!("/{}", segments.join("/"));
        prop_assert!(category_ref(Path::new(&path)).is_err());
    }
}
