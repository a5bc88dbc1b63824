//! Capability interface over template syntax trees.
//!
//! Definition lookup only needs to classify nodes and walk them, so it is
//! written against [`TreeNode`] rather than a concrete tree library. The
//! rowan CST produced by [`crate::parser`] implements it through
//! [`SyntaxElement`]; any other provider that maps its node types onto
//! [`SyntaxKind`] can be substituted.

use rowan::NodeOrToken;
use text_size::{TextRange, TextSize};

use crate::parser::{SyntaxElement, SyntaxKind};

/// A read-only node (or token) of a template syntax tree.
pub trait TreeNode: Clone + PartialEq + Sized {
    fn kind(&self) -> SyntaxKind;

    /// Byte range covered by the node.
    fn range(&self) -> TextRange;

    fn parent(&self) -> Option<Self>;

    /// Child nodes and tokens in document order.
    fn children(&self) -> Vec<Self>;

    /// Source text covered by the node.
    fn text(&self) -> String;

    /// Parent, grandparent, … up to the root.
    fn ancestors(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    fn child_of_kind(&self, kind: SyntaxKind) -> Option<Self> {
        self.children().into_iter().find(|child| child.kind() == kind)
    }

    fn children_of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = Self> {
        self.children()
            .into_iter()
            .filter(move |child| child.kind() == kind)
    }

    /// The smallest element whose range covers the character starting at `offset`.
    fn element_at(&self, offset: TextSize) -> Option<Self> {
        if !covers(self.range(), offset) {
            return None;
        }
        let mut current = self.clone();
        'descend: loop {
            for child in current.children() {
                if covers(child.range(), offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }
}

fn covers(range: TextRange, offset: TextSize) -> bool {
    range.start() <= offset && offset < range.end()
}

impl TreeNode for SyntaxElement {
    fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    fn range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    fn parent(&self) -> Option<Self> {
        let parent = match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => token.parent(),
        };
        parent.map(NodeOrToken::Node)
    }

    fn children(&self) -> Vec<Self> {
        match self {
            NodeOrToken::Node(node) => node.children_with_tokens().collect(),
            NodeOrToken::Token(_) => Vec::new(),
        }
    }

    fn text(&self) -> String {
        match self {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }
}
