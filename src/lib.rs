//! # helm-ls-base
//!
//! Go-to-definition for Helm chart templates: Go template actions embedded
//! in YAML, resolved against the chart's values documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → goto-definition, AnalysisHost snapshots
//!   ↓
//! semantic  → variable scopes, current-value (`.`) paths
//!   ↓
//! values    → YAML values documents, path lookup
//!   ↓
//! syntax    → TemplateDocument, TreeNode capability trait
//!   ↓
//! parser    → text/action lexer, recursive-descent parser, rowan CST
//!   ↓
//! base      → Position/Range/Location, LineIndex
//! ```
//!
//! `project` holds client configuration and sits beside the stack.

// ============================================================================
// MODULES (dependency order: base → parser → syntax → values → semantic → ide)
// ============================================================================

/// Foundation types: positions, locations, line index
pub mod base;

/// Parser: lexer, recursive-descent parser, syntax kinds
pub mod parser;

/// Syntax: template documents and the tree interface
pub mod syntax;

/// Values documents and path lookup
pub mod values;

/// Variable scopes and value paths
pub mod semantic;

/// IDE features: goto-definition, analysis snapshots
pub mod ide;

/// Client configuration
pub mod project;

// Re-export foundation types
pub use base::{LineIndex, Location, Position, PositionEncoding, PositionError, Range};

// Re-export the main entry points
pub use ide::{Analysis, AnalysisHost, DefinitionError, GotoResult, goto_definition};
pub use syntax::TemplateDocument;
pub use values::{ValuesFile, ValuesFiles};
