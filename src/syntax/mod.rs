//! Template documents and the tree interface definition lookup works on.

mod document;
mod tree;

pub use document::TemplateDocument;
pub use tree::TreeNode;
