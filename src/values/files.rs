//! Values documents and the aggregate a chart renders with.

use std::sync::Arc;

use super::loader::{ValuesError, load_yaml};
use super::node::ValueNode;
use crate::base::{LineIndex, PositionEncoding};

/// One parsed values document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesFile {
    uri: Arc<str>,
    root: ValueNode,
}

impl ValuesFile {
    pub fn new(uri: impl Into<Arc<str>>, root: ValueNode) -> Self {
        Self {
            uri: uri.into(),
            root,
        }
    }

    /// Parse YAML text, reporting columns in UTF-16 code units.
    pub fn from_yaml(uri: impl Into<Arc<str>>, text: &str) -> Result<Self, ValuesError> {
        Self::from_yaml_with_encoding(uri, text, PositionEncoding::default())
    }

    pub fn from_yaml_with_encoding(
        uri: impl Into<Arc<str>>,
        text: &str,
        encoding: PositionEncoding,
    ) -> Result<Self, ValuesError> {
        let index = LineIndex::with_encoding(text, encoding);
        Ok(Self::new(uri, load_yaml(&index)?))
    }

    pub fn uri(&self) -> &Arc<str> {
        &self.uri
    }

    pub fn root(&self) -> &ValueNode {
        &self.root
    }
}

/// The main values document plus any additional ones.
///
/// Iteration order is the order definition results are reported in: the
/// main document first, then the additional ones as given.
#[derive(Debug, Clone)]
pub struct ValuesFiles {
    main: Arc<ValuesFile>,
    additional: Vec<Arc<ValuesFile>>,
}

impl ValuesFiles {
    pub fn new(main: impl Into<Arc<ValuesFile>>) -> Self {
        Self {
            main: main.into(),
            additional: Vec::new(),
        }
    }

    pub fn with_additional(
        main: impl Into<Arc<ValuesFile>>,
        additional: impl IntoIterator<Item = Arc<ValuesFile>>,
    ) -> Self {
        Self {
            main: main.into(),
            additional: additional.into_iter().collect(),
        }
    }

    pub fn main(&self) -> &ValuesFile {
        &self.main
    }

    pub fn additional(&self) -> impl Iterator<Item = &ValuesFile> {
        self.additional.iter().map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValuesFile> {
        std::iter::once(self.main.as_ref()).chain(self.additional())
    }

    pub fn len(&self) -> usize {
        1 + self.additional.len()
    }

    /// Always false: there is at least the main document.
    pub fn is_empty(&self) -> bool {
        false
    }
}
