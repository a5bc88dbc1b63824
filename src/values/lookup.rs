//! Resolving value paths against values documents.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::files::ValuesFiles;
use super::node::{ValueKind, ValueNode};
use crate::base::{Location, Position};

/// One step of a [`ValuePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named field of a mapping.
    Field(SmolStr),
    /// "Any element" of a sequence. Resolves to the first element.
    Element,
}

/// A path from the root of a values document, e.g. `list[].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<Segment>);

impl ValuePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SmolStr>,
    {
        Self(fields.into_iter().map(|f| Segment::Field(f.into())).collect())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_field(&mut self, name: impl Into<SmolStr>) {
        self.0.push(Segment::Field(name.into()));
    }

    pub fn push_element(&mut self) {
        self.0.push(Segment::Element);
    }

    pub fn extend(&mut self, other: &ValuePath) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn joined(mut self, other: &ValuePath) -> Self {
        self.extend(other);
        self
    }
}

impl FromIterator<Segment> for ValuePath {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Element => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

/// The request was cancelled before the lookup finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lookup cancelled")]
pub struct Cancelled;

/// Find where `path` is defined inside the tree rooted at `root`.
///
/// Every segment but the last selects a child: a field by name, an element
/// as the first item of a sequence. The last segment decides what is
/// reported:
/// - a field holding a scalar or mapping: the field's key
/// - a field holding a sequence: the sequence's first element
/// - an element: the first item of the sequence
///
/// An empty path is the document itself. `Ok(None)` means the path does not
/// exist in this document.
pub fn lookup(
    root: &ValueNode,
    path: &[Segment],
    cancel: &CancellationToken,
) -> Result<Option<Position>, Cancelled> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(Some(root.position));
    };

    let mut node = root;
    for segment in parents {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        node = match descend(node, segment) {
            Some(child) => child,
            None => return Ok(None),
        };
    }
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }

    Ok(match last {
        Segment::Field(name) => node.get(name).and_then(|entry| match &entry.value.kind {
            ValueKind::Sequence(items) => items.first().map(|item| item.position),
            _ => Some(entry.key_position),
        }),
        Segment::Element => node.first_item().map(|item| item.position),
    })
}

fn descend<'a>(node: &'a ValueNode, segment: &Segment) -> Option<&'a ValueNode> {
    match segment {
        Segment::Field(name) => node.get(name).map(|entry| &entry.value),
        Segment::Element => node.first_item(),
    }
}

/// Look `path` up in every document, main first.
///
/// Documents that do not define the path are left out of the result.
pub fn lookup_all(
    files: &ValuesFiles,
    path: &ValuePath,
    cancel: &CancellationToken,
) -> Result<Vec<Location>, Cancelled> {
    let mut locations = Vec::new();
    for file in files.iter() {
        match lookup(file.root(), path.segments(), cancel)? {
            Some(position) => locations.push(Location::point(file.uri().clone(), position)),
            None => tracing::trace!(uri = %file.uri(), %path, "path not defined"),
        }
    }
    Ok(locations)
}
