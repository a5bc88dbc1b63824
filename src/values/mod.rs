//! Values documents: YAML files that supply the data templates read through
//! `.Values`.
//!
//! ```text
//! YAML text ──load_yaml──▶ ValueNode tree ──lookup(ValuePath)──▶ Position
//! ```

mod files;
mod loader;
mod lookup;
mod node;

pub use files::{ValuesFile, ValuesFiles};
pub use loader::{ValuesError, load_yaml};
pub use lookup::{Cancelled, Segment, ValuePath, lookup, lookup_all};
pub use node::{MappingEntry, ValueKind, ValueNode};
