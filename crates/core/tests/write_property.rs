//! Property tests for the writer.
//!
//! Any document either fails to serialize with a `WriteError` or parses
//! back to an equal document.

use indexmap::IndexMap;
use proptest::prelude::*;
use rck_core::parser::parse;
use rck_core::writer::to_string;
use rck_protocol::value_models::{Document, Section, Value};

/// Characters the grammar gives a meaning to, plus a few ordinary ones.
const SPECIAL: &[char] = &[
    'a', 'e', '1', '.', '-', ' ', '\t', ',', '#', '=', ':', '\'', '"', '[', ']', '(', ')', '{',
    '}', '\n', '\r', '\u{feff}',
];

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z_]{1,6}",
        3 => prop::collection::vec(prop::sample::select(SPECIAL), 0..8)
            .prop_map(|chars| chars.into_iter().collect::<String>()),
        1 => ".{0,6}",
    ]
}

fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_map(Value::Float),
        text().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec((text(), inner), 0..4)
                .prop_map(|pairs| Value::Table(pairs.into_iter().collect::<IndexMap<_, _>>())),
        ]
    })
}

/// Section shape before names and depths are assigned.
#[derive(Debug, Clone)]
struct Node {
    entries: Vec<(String, Value)>,
    children: Vec<(String, Node)>,
}

fn node() -> impl Strategy<Value = Node> {
    let entries = || prop::collection::vec((text(), value()), 0..4);
    let leaf = entries().prop_map(|entries| Node {
        entries,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 12, 3, move |inner| {
        (entries(), prop::collection::vec((text(), inner), 0..3))
            .prop_map(|(entries, children)| Node { entries, children })
    })
}

fn build(name: &str, depth: usize, node: Node) -> Section {
    let mut section = Section::new(name, depth);
    for (key, value) in node.entries {
        section.entries.insert(key, value);
    }
    for (child_name, child) in node.children {
        let child = build(&child_name, depth + 1, child);
        section.sections.insert(child_name, child);
    }
    section
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn test_written_documents_parse_back_equal(node in node()) {
        let doc = Document { root: build("", 0, node) };
        if let Ok(text) = to_string(&doc) {
            let parsed = parse(&text);
            prop_assert_eq!(parsed.as_ref().ok(), Some(&doc), "written text:\n{}", text);
        }
    }

    #[test]
    fn test_written_strings_parse_back_equal(s in text()) {
        let top = Value::String(s.clone());
        let nested = Value::List(vec![Value::String(s)]);
        for value in [top, nested] {
            let mut doc = Document::new();
            doc.root.entries.insert("k".to_string(), value);
            if let Ok(text) = to_string(&doc) {
                prop_assert_eq!(parse(&text).ok(), Some(doc), "written text:\n{}", text);
            }
        }
    }
}
