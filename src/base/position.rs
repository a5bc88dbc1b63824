/// Position tracking for editor requests and definition results
///
/// Positions are 0-indexed like the LSP. The `character` unit depends on the
/// [`PositionEncoding`](super::PositionEncoding) of the [`LineIndex`](super::LineIndex)
/// that produced or consumes them.
use std::fmt;
use std::sync::Arc;

/// A position in a document (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// A range between two positions (end exclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A range inside a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: Arc<str>,
    pub range: Range,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `position`.
    pub const fn empty(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if a position falls within this range
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

impl Location {
    pub fn new(uri: impl Into<Arc<str>>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }

    /// A zero-width location pointing at `position`.
    pub fn point(uri: impl Into<Arc<str>>, position: Position) -> Self {
        Self::new(uri, Range::empty(position))
    }
}
