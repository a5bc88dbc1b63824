//! Foundation types for the helm-ls toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Range`], [`Location`] - Editor coordinates and results
//! - [`LineIndex`], [`PositionEncoding`] - Position/offset conversion
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//!
//! This module has NO dependencies on other helm-ls modules.

mod line_index;
mod position;

pub use line_index::{LineIndex, PositionEncoding, PositionError};
pub use position::{Location, Position, Range};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
