//! Go-to-definition implementation.
//!
//! Classifies the token under the cursor and dispatches:
//!
//! | token                  | resolved by                                  |
//! |------------------------|----------------------------------------------|
//! | `$name`                | scope search in the same template            |
//! | `.field` in a chain    | path lookup in every values document         |
//! | `.`                    | current value path, then path lookup         |
//! | anything else          | [`DefinitionError::Unsupported`]             |

use std::sync::Arc;

use text_size::TextSize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::base::{LineIndex, Location, Position, PositionError};
use crate::parser::SyntaxKind;
use crate::semantic::{self, find_binding, variable_name};
use crate::syntax::{TemplateDocument, TreeNode};
use crate::values::{Cancelled, ValuePath, ValuesFiles, lookup_all};

/// Why no (or no complete) definition could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The cursor is on something that has no definition.
    #[error("Definition not implemented for node type {0}")]
    Unsupported(String),

    /// No declaration of the variable is visible at the reference.
    #[error("Could not find definition for {0}. Variable definition not found")]
    VariableNotDefined(String),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("definition request cancelled")]
    Cancelled,
}

impl From<Cancelled> for DefinitionError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Result of a go-to-definition request.
///
/// Both fields are always meaningful: an empty list without an error is a
/// plain "nothing defines this".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GotoResult {
    pub locations: Vec<Location>,
    pub error: Option<DefinitionError>,
}

impl GotoResult {
    /// No locations, no error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(location: Location) -> Self {
        Self::multiple(vec![location])
    }

    pub fn multiple(locations: Vec<Location>) -> Self {
        Self {
            locations,
            error: None,
        }
    }

    pub fn error(error: DefinitionError) -> Self {
        Self {
            locations: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<Location>, DefinitionError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.locations),
        }
    }
}

/// Find the definition of the symbol at `position` in `document`.
///
/// Values paths are looked up in `values` in precedence order, one location
/// per document that defines the path.
pub fn goto_definition(
    values: &ValuesFiles,
    document: &TemplateDocument,
    position: Position,
    cancel: &CancellationToken,
) -> GotoResult {
    let offset = match document.line_index().offset(position) {
        Ok(offset) => offset,
        Err(err) => {
            tracing::debug!(uri = %document.uri(), %position, error = %err, "position out of bounds");
            return GotoResult::error(err.into());
        }
    };
    definition_at(
        values,
        document.uri(),
        &document.root(),
        document.line_index(),
        offset,
        cancel,
    )
}

/// Tree-level entry point: works on any [`TreeNode`] implementation.
///
/// `index` must describe the text `root` was built from.
pub fn definition_at<N: TreeNode>(
    values: &ValuesFiles,
    uri: &Arc<str>,
    root: &N,
    index: &LineIndex,
    offset: TextSize,
    cancel: &CancellationToken,
) -> GotoResult {
    let Some(token) = token_at(root, offset) else {
        return GotoResult::error(DefinitionError::Unsupported(root.kind().name().to_string()));
    };

    let result = match token.kind() {
        SyntaxKind::VAR => variable_definition(uri, &token, index, cancel),
        SyntaxKind::FIELD => match token.parent() {
            Some(chain) if chain.kind() == SyntaxKind::FIELD_CHAIN => {
                semantic::field_chain_path(&chain, cancel)
                    .map_err(DefinitionError::from)
                    .and_then(|path| values_definition(values, path, cancel))
            }
            _ => Err(unsupported(&token)),
        },
        SyntaxKind::DOT => semantic::current_value(&token, cancel)
            .map_err(DefinitionError::from)
            .and_then(|path| values_definition(values, path, cancel)),
        _ => Err(unsupported(&token)),
    };

    match result {
        Ok(locations) => {
            tracing::debug!(%uri, count = locations.len(), "definition resolved");
            GotoResult::multiple(locations)
        }
        Err(error) => {
            tracing::debug!(%uri, %error, "definition not resolved");
            GotoResult::error(error)
        }
    }
}

/// The token covering `offset`; at the very end of the text, the last one.
fn token_at<N: TreeNode>(root: &N, offset: TextSize) -> Option<N> {
    root.element_at(offset).or_else(|| {
        (offset == root.range().end() && offset > TextSize::new(0))
            .then(|| root.element_at(offset - TextSize::new(1)))
            .flatten()
    })
}

fn unsupported<N: TreeNode>(token: &N) -> DefinitionError {
    let kind = token.kind();
    let text = if kind.is_punct() || kind.is_keyword() {
        token.text()
    } else {
        kind.name().to_string()
    };
    DefinitionError::Unsupported(text)
}

fn variable_definition<N: TreeNode>(
    uri: &Arc<str>,
    token: &N,
    index: &LineIndex,
    cancel: &CancellationToken,
) -> Result<Vec<Location>, DefinitionError> {
    let name = variable_name(token);
    // `$` is predefined, it has no declaration to jump to.
    if name.as_str() == "$" {
        return Ok(Vec::new());
    }
    let binding = find_binding(token, cancel)?
        .ok_or_else(|| DefinitionError::VariableNotDefined(name.to_string()))?;
    let position = index.position(binding.variable.range().start())?;
    Ok(vec![Location::point(uri.clone(), position)])
}

fn values_definition(
    values: &ValuesFiles,
    path: Option<ValuePath>,
    cancel: &CancellationToken,
) -> Result<Vec<Location>, DefinitionError> {
    let Some(path) = path else {
        tracing::debug!("expression has no static path");
        return Ok(Vec::new());
    };
    let Some(values_path) = semantic::values_path(&path) else {
        tracing::debug!(%path, "path is outside of .Values");
        return Ok(Vec::new());
    };
    lookup_all(values, &values_path, cancel).map_err(DefinitionError::from)
}
