//! Position-annotated tree over a values document.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use crate::base::Position;

/// A node of a values document with the position it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Scalar(String),
    /// Field name → entry, in document order. Field names are unique.
    Mapping(IndexMap<SmolStr, MappingEntry>),
    Sequence(Vec<ValueNode>),
}

/// A field of a mapping. The key position is where the field is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub key_position: Position,
    pub value: ValueNode,
}

impl ValueNode {
    pub fn scalar(value: impl Into<String>, position: Position) -> Self {
        Self {
            kind: ValueKind::Scalar(value.into()),
            position,
        }
    }

    pub fn mapping(position: Position) -> Self {
        Self {
            kind: ValueKind::Mapping(IndexMap::new()),
            position,
        }
    }

    pub fn sequence(items: Vec<ValueNode>, position: Position) -> Self {
        Self {
            kind: ValueKind::Sequence(items),
            position,
        }
    }

    /// Add a field to a mapping node.
    ///
    /// A repeated field replaces the earlier value but keeps the first key
    /// position. Has no effect on scalars and sequences.
    pub fn insert(&mut self, key: impl Into<SmolStr>, key_position: Position, value: ValueNode) {
        if let ValueKind::Mapping(entries) = &mut self.kind {
            match entries.entry(key.into()) {
                Entry::Occupied(mut entry) => entry.get_mut().value = value,
                Entry::Vacant(entry) => {
                    entry.insert(MappingEntry {
                        key_position,
                        value,
                    });
                }
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_field(
        mut self,
        key: impl Into<SmolStr>,
        key_position: Position,
        value: ValueNode,
    ) -> Self {
        self.insert(key, key_position, value);
        self
    }

    /// Append an item to a sequence node. Has no effect on other kinds.
    pub fn push(&mut self, item: ValueNode) {
        if let ValueKind::Sequence(items) = &mut self.kind {
            items.push(item);
        }
    }

    pub fn get(&self, key: &str) -> Option<&MappingEntry> {
        match &self.kind {
            ValueKind::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn first_item(&self) -> Option<&ValueNode> {
        match &self.kind {
            ValueKind::Sequence(items) => items.first(),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, ValueKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, ValueKind::Sequence(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Scalar(value) => Some(value),
            _ => None,
        }
    }
}
