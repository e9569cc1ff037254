//! Integration tests for the parser and writer working together.
//!
//! These tests verify that:
//! - Writing a parsed document and parsing it again gives the same tree
//! - Nesting depth survives the round trip
//! - Bracket and parenthesis lists mean the same thing
//! - Comments never change the values next to them

mod common;

use common::*;
use rck_core::parser::{parse, parse_with, DuplicatePolicy, ParseErrorKind, ParseOptions};
use rck_core::writer::{to_string, to_string_with, WriteOptions};
use rck_protocol::value_models::Value;

#[test]
fn test_fixture_round_trip() {
    let doc = parse(&project_ini()).expect("fixture should parse");
    let text = to_string(&doc).expect("fixture should serialize");
    let again = parse(&text).expect("written fixture should parse");

    assert_eq!(again, doc);
    // Order is part of the document even though map equality ignores it.
    let names: Vec<_> = again.root.sections.keys().collect();
    let expected: Vec<_> = doc.root.sections.keys().collect();
    assert_eq!(names, expected);
}

#[test]
fn test_minimal_round_trip() {
    let doc = parse(&minimal_ini()).expect("minimal should parse");
    let text = to_string_with(
        &doc,
        &WriteOptions {
            indent: "\t".to_string(),
        },
    )
    .expect("minimal should serialize");
    assert!(text.contains("\n\t[[pv]]\n"));
    assert_eq!(parse(&text).expect("written minimal should parse"), doc);
}

#[test]
fn test_depth_is_preserved() {
    let doc = parse(&project_ini()).unwrap();
    assert_eq!(doc.max_depth(), 4);

    let layer = doc
        .section_at("technologies.pv.exclusions.ri_padus")
        .expect("depth 4 section should exist");
    assert_eq!(layer.depth, 4);
    assert_eq!(
        layer.get("exclude_values"),
        Some(&Value::List(vec![1i64.into(), 2i64.into(), 3i64.into()]))
    );

    let again = parse(&to_string(&doc).unwrap()).unwrap();
    assert_eq!(again.max_depth(), 4);
    assert_eq!(
        again.section_at("technologies.pv.exclusions.ri_padus").map(|s| s.depth),
        Some(4)
    );
}

#[test]
fn test_bracket_and_paren_lists_are_equivalent() {
    let brackets = parse("[a]\nr = [None, 5]\nv = [1]\nn = [[1, 2], [3, 4]]\n").unwrap();
    let parens = parse("[a]\nr = (None, 5)\nv = (1,)\nn = ((1, 2), (3, 4))\n").unwrap();
    assert_eq!(brackets, parens);
}

#[test]
fn test_comments_do_not_touch_values() {
    let plain = parse("[a]\nx = 1\ny = abc\nz = [1, 2]\n").unwrap();
    let commented = parse(
        "# header\n[a] # section\n# between\nx = 1 # one\ny = abc # text\nz = [1, # first\n     2] # second\n",
    )
    .unwrap();
    assert_eq!(plain, commented);

    let quoted = parse("[a]\ncolor = \"#ff0000\" # red\n").unwrap();
    assert_eq!(quoted.lookup("a.color"), Some(&Value::from("#ff0000")));
}

#[test]
fn test_duplicate_sections() {
    let src = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n";

    let err = parse(src).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DuplicateSection);
    assert_eq!(err.line, 5);

    let options = ParseOptions {
        duplicate_sections: DuplicatePolicy::Merge,
    };
    let doc = parse_with(src, &options).unwrap();
    let a = doc.section("a").unwrap();
    assert_eq!(a.entries.keys().collect::<Vec<_>>(), vec!["x", "z"]);
    assert_eq!(doc.root.sections.get_index_of("a"), Some(0));
}

#[test]
fn test_error_positions() {
    let err = parse("[a]\nok = 1\nbroken line\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidLine);
    assert_eq!((err.line, err.column), (3, 1));

    let err = parse("[a]\n  bins = [[1, 2],\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedList);
    assert_eq!(err.line, 2);
}
