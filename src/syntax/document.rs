//! Template documents handed to IDE features.
//!
//! A [`TemplateDocument`] is an immutable snapshot of one template file: its
//! URI, text, line index and syntax tree. Edits produce a new document;
//! readers that hold an older one keep a consistent view.

use std::sync::Arc;

use rowan::NodeOrToken;

use crate::base::{LineIndex, PositionEncoding};
use crate::parser::{Parse, SyntaxElement, SyntaxError, SyntaxNode, parse_template};

#[derive(Debug, Clone)]
pub struct TemplateDocument {
    uri: Arc<str>,
    line_index: LineIndex,
    parse: Parse,
}

impl TemplateDocument {
    /// Parse `text` into a new document using the default (UTF-16) encoding.
    pub fn parse(uri: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
        Self::parse_with_encoding(uri, text, PositionEncoding::default())
    }

    pub fn parse_with_encoding(
        uri: impl Into<Arc<str>>,
        text: impl Into<Arc<str>>,
        encoding: PositionEncoding,
    ) -> Self {
        let text = text.into();
        let parse = parse_template(&text);
        Self {
            uri: uri.into(),
            line_index: LineIndex::with_encoding(text, encoding),
            parse,
        }
    }

    pub fn uri(&self) -> &Arc<str> {
        &self.uri
    }

    pub fn text(&self) -> &str {
        self.line_index.text()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// Root of the tree as a [`TreeNode`](super::TreeNode).
    pub fn root(&self) -> SyntaxElement {
        NodeOrToken::Node(self.syntax())
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.parse.errors
    }
}
