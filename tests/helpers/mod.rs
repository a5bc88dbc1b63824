//! Shared fixtures and builders for integration tests.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use helm_ls::{GotoResult, Position, TemplateDocument, ValuesFile, ValuesFiles, goto_definition};
use tokio_util::sync::CancellationToken;

pub use fixtures::*;

pub fn values_file(uri: &str, yaml: &str) -> ValuesFile {
    ValuesFile::from_yaml(uri, yaml).expect("fixture values should parse")
}

/// The fixture values document as the only values file.
pub fn main_values() -> ValuesFiles {
    ValuesFiles::new(values_file(VALUES_URI, VALUES))
}

/// The fixture values document loaded twice, under two URIs.
pub fn main_and_other_values() -> ValuesFiles {
    ValuesFiles::with_additional(
        values_file(VALUES_URI, VALUES),
        [Arc::new(values_file(OTHER_VALUES_URI, VALUES))],
    )
}

pub fn template(text: &str) -> TemplateDocument {
    TemplateDocument::parse(TEMPLATE_URI, text)
}

/// Resolve at `(line, character)` with a fresh cancellation token.
pub fn goto_at(values: &ValuesFiles, text: &str, line: u32, character: u32) -> GotoResult {
    goto_definition(
        values,
        &template(text),
        Position::new(line, character),
        &CancellationToken::new(),
    )
}

/// Position of the `nth` occurrence of `needle` in `text`.
pub fn position_of(text: &str, needle: &str, nth: usize) -> Position {
    let offset = text
        .match_indices(needle)
        .nth(nth)
        .unwrap_or_else(|| panic!("{needle:?} occurs fewer than {} times", nth + 1))
        .0;
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position::new(line, text[line_start..offset].encode_utf16().count() as u32)
}
