//! Template semantics needed for go-to-definition.
//!
//! - [`scope`]: which declaration a `$variable` refers to
//! - [`context`]: which values path an expression denotes, including the
//!   implicit current value `.` inside `range`/`with` blocks
//!
//! Both work on any tree implementing [`TreeNode`](crate::syntax::TreeNode)
//! and keep no state between calls.

pub mod context;
pub mod scope;

pub use context::{current_value, field_chain_path, values_path, variable_path};
pub use scope::{Binding, BindingKind, find_binding, variable_name};

/// Field of the chart root object that holds the values documents.
pub const VALUES_NAMESPACE: &str = "Values";

/// How many variable-to-variable hops are followed before a path is
/// considered unknown.
pub const MAX_BINDING_DEPTH: usize = 32;
