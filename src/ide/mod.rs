//! IDE features: high-level APIs for LSP handlers.
//!
//! Pure functions over immutable documents, plus an [`AnalysisHost`] that
//! publishes snapshots of the workspace. No LSP types are used here; the
//! protocol layer converts at its boundary.
//!
//! ## Usage
//!
//! ```ignore
//! use helm_ls::ide::AnalysisHost;
//!
//! let host = AnalysisHost::new();
//! host.set_values_file("file:///chart/values.yaml", "image: nginx\n")?;
//! host.set_template("file:///chart/templates/pod.yaml", "{{ .Values.image }}");
//!
//! let result = host
//!     .analysis()
//!     .goto_definition("file:///chart/templates/pod.yaml", position, &cancel);
//! ```

mod analysis;
mod goto;

pub use analysis::{Analysis, AnalysisHost, WorkspaceState};
pub use goto::{DefinitionError, GotoResult, definition_at, goto_definition};
