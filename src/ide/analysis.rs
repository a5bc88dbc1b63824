//! AnalysisHost and Analysis: workspace state and consistent snapshots.
//!
//! The host never mutates state that a snapshot can see. Every change builds
//! a new [`WorkspaceState`] and swaps it in, so a request keeps working on
//! the documents it started with while edits and file reloads land.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::new();
//! host.set_values_file("file:///chart/values.yaml", "foo: bar\n")?;
//! host.set_template("file:///chart/templates/a.yaml", "{{ .Values.foo }}");
//!
//! let analysis = host.analysis();
//! let result = analysis.goto_definition(uri, position, &cancel);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::goto::{GotoResult, goto_definition};
use crate::base::{Position, PositionEncoding};
use crate::project::{ValuesFileRole, ValuesFilesConfig};
use crate::syntax::TemplateDocument;
use crate::values::{ValuesError, ValuesFile, ValuesFiles};

/// Immutable view of every open template and known values document.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
    templates: FxHashMap<Arc<str>, Arc<TemplateDocument>>,
    main_values: Option<Arc<ValuesFile>>,
    /// Ordered by URI so precedence does not depend on load order.
    additional_values: BTreeMap<Arc<str>, Arc<ValuesFile>>,
    /// Built from the two fields above whenever either changes.
    values: Option<ValuesFiles>,
}

impl WorkspaceState {
    pub fn template(&self, uri: &str) -> Option<&Arc<TemplateDocument>> {
        self.templates.get(uri)
    }

    pub fn values(&self) -> Option<&ValuesFiles> {
        self.values.as_ref()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    fn rebuild_values(&mut self) {
        self.values = self.main_values.clone().map(|main| {
            ValuesFiles::with_additional(main, self.additional_values.values().cloned())
        });
    }
}

/// Owns the current workspace state.
///
/// Apply changes via the `set_*`/`remove_*` methods, then take a snapshot
/// via `analysis()`. All methods take `&self`; the host can be shared.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    state: RwLock<Arc<WorkspaceState>>,
    config: RwLock<ValuesFilesConfig>,
    encoding: PositionEncoding,
}

impl AnalysisHost {
    /// Create a host with default configuration and UTF-16 positions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: PositionEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }

    pub fn encoding(&self) -> PositionEncoding {
        self.encoding
    }

    /// Replace the values-file naming rules. Already loaded files keep the
    /// role they were loaded with.
    pub fn set_config(&self, config: ValuesFilesConfig) {
        *self.config.write() = config;
    }

    /// Get a consistent snapshot for queries.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            state: Arc::clone(&self.state.read()),
        }
    }

    /// Parse and store (or replace) a template document.
    pub fn set_template(&self, uri: impl Into<Arc<str>>, text: impl Into<Arc<str>>) {
        let document = TemplateDocument::parse_with_encoding(uri, text, self.encoding);
        tracing::debug!(
            uri = %document.uri(),
            errors = document.errors().len(),
            "template updated"
        );
        self.update(|state| {
            state
                .templates
                .insert(document.uri().clone(), Arc::new(document));
        });
    }

    pub fn remove_template(&self, uri: &str) {
        self.update(|state| {
            state.templates.remove(uri);
        });
    }

    /// Parse and store a values document, its role taken from the file name.
    ///
    /// Returns `Ok(None)` without touching the state when the file is not a
    /// values document. A file that fails to parse leaves the previous
    /// version in place.
    pub fn set_values_file(
        &self,
        uri: impl Into<Arc<str>>,
        text: &str,
    ) -> Result<Option<ValuesFileRole>, ValuesError> {
        let uri = uri.into();
        let Some(role) = self.config.read().role_of_uri(&uri) else {
            return Ok(None);
        };
        let file = ValuesFile::from_yaml_with_encoding(uri, text, self.encoding)?;
        self.insert_values_file(file, role);
        Ok(Some(role))
    }

    /// Store an already-built values document under an explicit role.
    pub fn insert_values_file(&self, file: ValuesFile, role: ValuesFileRole) {
        tracing::debug!(uri = %file.uri(), ?role, "values file updated");
        let file = Arc::new(file);
        self.update(|state| {
            match role {
                ValuesFileRole::Main => {
                    state.additional_values.remove(file.uri());
                    state.main_values = Some(file);
                }
                ValuesFileRole::Additional => {
                    if state
                        .main_values
                        .as_ref()
                        .is_some_and(|main| main.uri() == file.uri())
                    {
                        state.main_values = None;
                    }
                    state.additional_values.insert(file.uri().clone(), file);
                }
            }
            state.rebuild_values();
        });
    }

    pub fn remove_values_file(&self, uri: &str) {
        self.update(|state| {
            if state
                .main_values
                .as_ref()
                .is_some_and(|main| main.uri().as_ref() == uri)
            {
                state.main_values = None;
            }
            state.additional_values.remove(uri);
            state.rebuild_values();
        });
    }

    /// Copy the current state, apply `change`, publish the copy.
    fn update(&self, change: impl FnOnce(&mut WorkspaceState)) {
        let mut state = self.state.write();
        let mut next = WorkspaceState::clone(&state);
        change(&mut next);
        *state = Arc::new(next);
    }
}

/// A read-only snapshot for running queries.
///
/// Unaffected by changes made to the host after it was taken.
#[derive(Debug, Clone)]
pub struct Analysis {
    state: Arc<WorkspaceState>,
}

impl Analysis {
    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Go to definition of the symbol at `position` in template `uri`.
    ///
    /// `None` when the template is not open or no main values file is known.
    pub fn goto_definition(
        &self,
        uri: &str,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<GotoResult> {
        let document = self.state.template(uri)?;
        let values = self.state.values()?;
        Some(goto_definition(values, document, position, cancel))
    }
}
