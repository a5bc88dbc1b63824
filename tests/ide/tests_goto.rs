//! Go-to-definition tests against the fixture chart.

use crate::helpers::*;
use helm_ls::base::{TextRange, TextSize};
use helm_ls::ide::definition_at;
use helm_ls::parser::{SyntaxElement, SyntaxKind};
use helm_ls::syntax::TreeNode;
use helm_ls::{DefinitionError, GotoResult, Location, Position, PositionError, goto_definition};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

fn template_location(line: u32, character: u32) -> Location {
    Location::point(TEMPLATE_URI, Position::new(line, character))
}

fn values_location(line: u32, character: u32) -> Location {
    Location::point(VALUES_URI, Position::new(line, character))
}

// =============================================================================
// VARIABLES
// =============================================================================

#[rstest]
#[case::reference(2, 8, 1, 3)]
#[case::reference_after_other_binding(5, 3, 1, 3)]
#[case::declaration_itself(1, 3, 1, 3)]
#[case::range_element(7, 60, 7, 17)]
#[case::range_index(7, 45, 7, 9)]
fn test_variable_definition(
    #[case] line: u32,
    #[case] character: u32,
    #[case] expected_line: u32,
    #[case] expected_character: u32,
) {
    let result = goto_at(&main_values(), TEMPLATE, line, character);
    assert_eq!(result.error, None);
    assert_eq!(
        result.locations,
        vec![template_location(expected_line, expected_character)]
    );
}

#[test]
fn test_variable_ranges_are_zero_width() {
    let result = goto_at(&main_values(), TEMPLATE, 2, 8);
    assert!(result.locations.iter().all(|l| l.range.is_empty()));
}

#[test]
fn test_shadowing_inside_range() {
    let inner = position_of(SHADOWING_TEMPLATE, "$x", 2);
    let result = goto_at(&main_values(), SHADOWING_TEMPLATE, inner.line, inner.character);
    assert_eq!(result.locations, vec![template_location(2, 5)]);
}

#[test]
fn test_outer_binding_after_range_end() {
    let after = position_of(SHADOWING_TEMPLATE, "$x", 3);
    let result = goto_at(&main_values(), SHADOWING_TEMPLATE, after.line, after.character);
    assert_eq!(result.locations, vec![template_location(0, 3)]);
}

#[test]
fn test_undefined_variable() {
    let result = goto_at(&main_values(), "{{ $missing }}", 0, 5);
    assert!(result.is_empty());
    assert_eq!(
        result.error.map(|e| e.to_string()).as_deref(),
        Some("Could not find definition for $missing. Variable definition not found")
    );
}

#[test]
fn test_reassigned_variable_goes_to_declaration() {
    let result = goto_at(&main_values(), "{{ $x := 1 }}{{ $x = 2 }}", 0, 17);
    assert_eq!(result.error, None);
    assert_eq!(result.locations, vec![template_location(0, 3)]);
}

#[test]
fn test_block_body_does_not_see_outer_variables() {
    let text = "{{ $x := 1 }}{{ block \"n\" . }}{{ $x }}{{ end }}";
    let reference = position_of(text, "$x", 1);
    let result = goto_at(&main_values(), text, reference.line, reference.character);
    assert!(result.is_empty());
    assert_eq!(
        result.error,
        Some(DefinitionError::VariableNotDefined("$x".into()))
    );
}

// =============================================================================
// VALUES
// =============================================================================

#[rstest]
#[case::field_on_last_segment(8, 13, 1, 0)]
#[case::field_on_namespace(8, 7, 1, 0)]
#[case::nested_field(9, 26, 3, 2)]
#[case::current_value_in_range(12, 3, 5, 4)]
fn test_values_definition(
    #[case] line: u32,
    #[case] character: u32,
    #[case] expected_line: u32,
    #[case] expected_character: u32,
) {
    let result = goto_at(&main_values(), TEMPLATE, line, character);
    assert_eq!(result.error, None);
    assert_eq!(
        result.locations,
        vec![values_location(expected_line, expected_character)]
    );
}

#[test]
fn test_list_resolves_to_first_element() {
    let header = position_of(TEMPLATE, ".list", 0);
    let result = goto_at(&main_values(), TEMPLATE, header.line, header.character + 1);
    assert_eq!(result.locations, vec![values_location(5, 4)]);
}

#[test]
fn test_every_values_file_is_reported_in_order() {
    let result = goto_at(&main_and_other_values(), TEMPLATE, 8, 13);
    assert_eq!(result.error, None);
    assert_eq!(
        result.locations,
        vec![
            Location::point(VALUES_URI, Position::new(1, 0)),
            Location::point(OTHER_VALUES_URI, Position::new(1, 0)),
        ]
    );
}

#[test]
fn test_partial_miss_across_values_files() {
    let values = helm_ls::ValuesFiles::with_additional(
        values_file(VALUES_URI, "foo: 1\n"),
        [
            std::sync::Arc::new(values_file("file:///values.a.yaml", "bar: 1\n")),
            std::sync::Arc::new(values_file("file:///values.b.yaml", "\nfoo: 2\n")),
        ],
    );
    let result = goto_at(&values, "{{ .Values.foo }}", 0, 12);
    assert_eq!(
        result.locations,
        vec![
            Location::point(VALUES_URI, Position::new(0, 0)),
            Location::point("file:///values.b.yaml", Position::new(1, 0)),
        ]
    );
}

#[rstest]
#[case::with_block(".nested", 0, 3, 2)]
#[case::root_inside_with(".foo", 0, 1, 0)]
#[case::through_variable(".nested", 1, 3, 2)]
#[case::with_header(".something", 0, 2, 0)]
fn test_values_through_context(
    #[case] needle: &str,
    #[case] nth: usize,
    #[case] expected_line: u32,
    #[case] expected_character: u32,
) {
    let at = position_of(CONTEXT_TEMPLATE, needle, nth);
    let result = goto_at(&main_values(), CONTEXT_TEMPLATE, at.line, at.character + 1);
    assert_eq!(result.error, None);
    assert_eq!(
        result.locations,
        vec![values_location(expected_line, expected_character)]
    );
}

#[rstest]
#[case::other_namespace(".Name")]
#[case::missing_field(".missing")]
fn test_values_without_definition(#[case] needle: &str) {
    let at = position_of(CONTEXT_TEMPLATE, needle, 0);
    let result = goto_at(&main_values(), CONTEXT_TEMPLATE, at.line, at.character + 1);
    assert_eq!(result, GotoResult::empty());
}

// =============================================================================
// UNSUPPORTED NODES
// =============================================================================

#[rstest]
#[case::left_delimiter(1, 1, "{{")]
#[case::right_delimiter(1, 24, "}}")]
#[case::keyword(7, 4, "range")]
#[case::string(1, 18, "string")]
#[case::text(1, 30, "text")]
#[case::identifier(7, 31, "identifier")]
fn test_unsupported_node(#[case] line: u32, #[case] character: u32, #[case] kind: &str) {
    let result = goto_at(&main_values(), TEMPLATE, line, character);
    assert!(result.locations.is_empty());
    assert_eq!(
        result.error.map(|e| e.to_string()),
        Some(format!("Definition not implemented for node type {kind}"))
    );
}

// =============================================================================
// POSITIONS, CANCELLATION, DETERMINISM
// =============================================================================

#[test]
fn test_position_past_last_line() {
    let result = goto_at(&main_values(), TEMPLATE, 40, 0);
    assert!(result.locations.is_empty());
    assert!(matches!(
        result.error,
        Some(DefinitionError::Position(PositionError::LineOutOfBounds { .. }))
    ));
}

#[test]
fn test_position_past_line_end() {
    let result = goto_at(&main_values(), TEMPLATE, 2, 200);
    assert!(matches!(
        result.error,
        Some(DefinitionError::Position(PositionError::CharacterOutOfBounds { .. }))
    ));
}

#[test]
fn test_utf16_columns() {
    let text = "ü 😀 {{ .Values.foo }}";
    let at = position_of(text, ".foo", 0);
    assert_eq!(at, Position::new(0, 15));
    let result = goto_at(&main_values(), text, at.line, at.character + 1);
    assert_eq!(result.locations, vec![values_location(1, 0)]);
}

#[test]
fn test_cancelled_request_returns_no_locations() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = goto_definition(
        &main_and_other_values(),
        &template(TEMPLATE),
        Position::new(8, 13),
        &cancel,
    );
    assert_eq!(result, GotoResult::error(DefinitionError::Cancelled));
}

#[test]
fn test_repeated_requests_are_identical() {
    let values = main_and_other_values();
    let document = template(TEMPLATE);
    let cancel = CancellationToken::new();
    for (line, character) in [(2, 8), (8, 13), (12, 3), (1, 1)] {
        let position = Position::new(line, character);
        assert_eq!(
            goto_definition(&values, &document, position, &cancel),
            goto_definition(&values, &document, position, &cancel)
        );
    }
}

// =============================================================================
// OTHER TREE PROVIDERS
// =============================================================================

/// A tree that only exposes the capability interface.
#[derive(Clone, PartialEq)]
struct Opaque(SyntaxElement);

impl TreeNode for Opaque {
    fn kind(&self) -> SyntaxKind {
        TreeNode::kind(&self.0)
    }

    fn range(&self) -> TextRange {
        TreeNode::range(&self.0)
    }

    fn parent(&self) -> Option<Self> {
        TreeNode::parent(&self.0).map(Opaque)
    }

    fn children(&self) -> Vec<Self> {
        TreeNode::children(&self.0).into_iter().map(Opaque).collect()
    }

    fn text(&self) -> String {
        TreeNode::text(&self.0)
    }
}

#[test]
fn test_definition_through_another_tree_type() {
    let document = template(TEMPLATE);
    let root = Opaque(document.root());
    let cancel = CancellationToken::new();
    let values = main_values();
    let at = |line, character| {
        let offset: TextSize = document
            .line_index()
            .offset(Position::new(line, character))
            .unwrap();
        definition_at(&values, document.uri(), &root, document.line_index(), offset, &cancel)
    };

    assert_eq!(at(7, 60).locations, vec![template_location(7, 17)]);
    assert_eq!(at(12, 3).locations, vec![values_location(5, 4)]);
}
