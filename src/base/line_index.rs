//! Conversion between editor positions and byte offsets.
//!
//! Editors address text as `(line, character)` where `character` counts code
//! units of the negotiated [`PositionEncoding`]. Syntax trees address text as
//! byte offsets. [`LineIndex`] converts in both directions and reports
//! out-of-range input as a [`PositionError`] instead of clamping it.

use std::sync::Arc;

use text_size::{TextRange, TextSize};
use thiserror::Error;

use super::Position;

/// Code unit used to count the `character` of a [`Position`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PositionEncoding {
    Utf8,
    /// The LSP default.
    #[default]
    Utf16,
    Utf32,
}

impl PositionEncoding {
    #[inline]
    fn units(self, c: char) -> u32 {
        match self {
            Self::Utf8 => c.len_utf8() as u32,
            Self::Utf16 => c.len_utf16() as u32,
            Self::Utf32 => 1,
        }
    }
}

/// A position or offset that does not address the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("line {line} is out of bounds (document has {line_count} lines)")]
    LineOutOfBounds { line: u32, line_count: u32 },

    #[error("character {character} is out of bounds on line {line} (line length {length})")]
    CharacterOutOfBounds {
        line: u32,
        character: u32,
        length: u32,
    },

    #[error("character {character} on line {line} falls inside a multi-unit character")]
    InsideCharacter { line: u32, character: u32 },

    #[error("offset {offset} does not address a character boundary (document length {length})")]
    OffsetOutOfBounds { offset: u32, length: u32 },
}

/// Line-start table over an immutable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    text: Arc<str>,
    line_starts: Vec<TextSize>,
    encoding: PositionEncoding,
}

impl LineIndex {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self::with_encoding(text, PositionEncoding::default())
    }

    pub fn with_encoding(text: impl Into<Arc<str>>, encoding: PositionEncoding) -> Self {
        let text = text.into();
        let mut line_starts = vec![TextSize::new(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(i, _)| TextSize::new(i as u32 + 1)),
        );
        Self {
            text,
            line_starts,
            encoding,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> PositionEncoding {
        self.encoding
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }

    /// Byte range of a line's content, line terminator excluded.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => *next - TextSize::new(1),
            None => self.len(),
        };
        if end > start && self.text.as_bytes()[usize::from(end) - 1] == b'\r' {
            end -= TextSize::new(1);
        }
        Some(TextRange::new(start, end))
    }

    /// Convert an editor position into a byte offset.
    pub fn offset(&self, position: Position) -> Result<TextSize, PositionError> {
        let range =
            self.line_range(position.line)
                .ok_or(PositionError::LineOutOfBounds {
                    line: position.line,
                    line_count: self.line_count(),
                })?;

        let mut units = 0u32;
        for (byte, c) in self.text[range].char_indices() {
            if units == position.character {
                return Ok(range.start() + TextSize::new(byte as u32));
            }
            let next = units + self.encoding.units(c);
            if position.character < next {
                return Err(PositionError::InsideCharacter {
                    line: position.line,
                    character: position.character,
                });
            }
            units = next;
        }

        if units == position.character {
            Ok(range.end())
        } else {
            Err(PositionError::CharacterOutOfBounds {
                line: position.line,
                character: position.character,
                length: units,
            })
        }
    }

    /// Convert a byte offset into an editor position.
    pub fn position(&self, offset: TextSize) -> Result<Position, PositionError> {
        let byte = usize::from(offset);
        if offset > self.len() || !self.text.is_char_boundary(byte) {
            return Err(PositionError::OffsetOutOfBounds {
                offset: offset.into(),
                length: self.len().into(),
            });
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = usize::from(self.line_starts[line]);
        let character = self.text[line_start..byte]
            .chars()
            .map(|c| self.encoding.units(c))
            .sum();

        Ok(Position::new(line as u32, character))
    }
}
