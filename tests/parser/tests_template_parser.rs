//! Parser tests over whole templates.

use crate::helpers::*;
use helm_ls::parser::{SyntaxKind, parse_template, tokenize};
use rstest::rstest;

#[test]
fn test_fixture_parses_without_errors() {
    let parse = parse_template(TEMPLATE);
    assert!(parse.ok(), "{:?}", parse.errors);
}

#[rstest]
#[case::fixture(TEMPLATE)]
#[case::shadowing(SHADOWING_TEMPLATE)]
#[case::context(CONTEXT_TEMPLATE)]
#[case::unterminated("{{ range .Values.list }}{{ .")]
#[case::stray_delimiters("}} {{ {{ ) ( | := }}")]
#[case::trim_markers("a {{- .Values.x -}} b {{-3}}")]
#[case::comments("{{/* a comment */}}{{- /* trimmed */ -}}")]
#[case::non_ascii("ü {{ \"😀\" | quote }} {{ ∑ }}")]
fn test_lossless(#[case] input: &str) {
    let parse = parse_template(input);
    assert_eq!(parse.syntax().text().to_string(), input);
}

#[rstest]
#[case::fixture(TEMPLATE)]
#[case::broken("{{ if .a }}{{ else if }}{{ range $x := }}")]
fn test_tokens_cover_input(#[case] input: &str) {
    let joined: String = tokenize(input).iter().map(|t| t.text).collect();
    assert_eq!(joined, input);
}

#[test]
fn test_fixture_block_structure() {
    let parse = parse_template(TEMPLATE);
    let blocks: Vec<_> = parse
        .syntax()
        .children()
        .map(|node| node.kind())
        .filter(|kind| kind.is_block())
        .collect();
    assert_eq!(blocks, vec![SyntaxKind::RANGE_BLOCK, SyntaxKind::RANGE_BLOCK]);
}

#[test]
fn test_broken_template_reports_errors_but_keeps_tree() {
    let parse = parse_template("{{ if .a }}{{ else if }}{{ range $x := }}");
    assert!(!parse.ok());
    assert!(
        parse
            .syntax()
            .descendants()
            .any(|node| node.kind() == SyntaxKind::IF_BLOCK)
    );
}
