//! Lexical scope search for template variables.
//!
//! Bindings are never stored. To resolve `$name` the search walks outward
//! from the reference and, at every level, looks at the siblings that end
//! before the current node, nearest first. Closed blocks are skipped: a
//! variable declared inside `{{ if }}…{{ end }}` is gone after the `end`.

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::parser::SyntaxKind;
use crate::syntax::TreeNode;
use crate::values::Cancelled;

/// How a variable got its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `$x := pipeline`, including declarations in `if`/`with` headers.
    Declared,
    /// The first of two variables in a `range` header.
    RangeIndex,
    /// The only or second variable in a `range` header.
    RangeElement,
}

/// A variable definition site.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<N> {
    pub name: SmolStr,
    /// The `VARIABLE` node on the left-hand side of the declaration.
    pub variable: N,
    pub kind: BindingKind,
}

impl<N: TreeNode> Binding<N> {
    /// The `DECLARATION` node the binding belongs to.
    pub fn declaration(&self) -> Option<N> {
        self.variable.parent()
    }

    /// The `PIPELINE` whose value the binding receives.
    pub fn pipeline(&self) -> Option<N> {
        self.declaration()?.parent()
    }
}

/// Name of a `VARIABLE` node or `VAR` token, sigil included.
pub fn variable_name<N: TreeNode>(variable: &N) -> SmolStr {
    SmolStr::new(variable.text().trim())
}

/// Find the binding a variable reference refers to.
///
/// `reference` is a `VARIABLE` node or its `VAR` token. A variable on the
/// left-hand side of a `:=` declaration is its own binding; one assigned
/// with `=` refers to an earlier declaration. `Ok(None)` means no visible
/// declaration exists.
pub fn find_binding<N: TreeNode>(
    reference: &N,
    cancel: &CancellationToken,
) -> Result<Option<Binding<N>>, Cancelled> {
    let variable = if reference.kind() == SyntaxKind::VAR {
        match reference.parent() {
            Some(parent) => parent,
            None => return Ok(None),
        }
    } else {
        reference.clone()
    };
    let name = variable_name(&variable);

    // `$x = …` reassigns, so it falls through to the search for `$x`.
    if let Some(binding) = binding_for(&variable, name.clone()) {
        return Ok(Some(binding));
    }

    let mut child = variable.clone();
    for ancestor in variable.ancestors() {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        // `define` and `block` bodies are templates of their own.
        let own_template = match ancestor.kind() {
            SyntaxKind::DEFINE_BLOCK => true,
            SyntaxKind::NAMED_BLOCK => child.kind() == SyntaxKind::LIST,
            _ => false,
        };
        if own_template {
            break;
        }

        let start = child.range().start();
        let preceding = ancestor
            .children()
            .into_iter()
            .rev()
            .filter(|sibling| sibling.range().end() <= start);
        for sibling in preceding {
            let declaration = match sibling.kind() {
                SyntaxKind::ACTION => sibling
                    .child_of_kind(SyntaxKind::PIPELINE)
                    .and_then(|pipeline| pipeline.child_of_kind(SyntaxKind::DECLARATION)),
                // Block and else headers; a pipeline's own declaration is
                // not yet in scope inside that pipeline.
                SyntaxKind::PIPELINE if ancestor.kind() != SyntaxKind::PIPELINE => {
                    sibling.child_of_kind(SyntaxKind::DECLARATION)
                }
                _ => None,
            };
            if let Some(binding) = declaration.and_then(|d| declared_in(&d, &name)) {
                tracing::trace!(%name, kind = ?binding.kind, "variable binding found");
                return Ok(Some(binding));
            }
        }
        child = ancestor;
    }

    tracing::trace!(%name, "no variable binding in scope");
    Ok(None)
}

fn declared_in<N: TreeNode>(declaration: &N, name: &str) -> Option<Binding<N>> {
    let variables: Vec<_> = declaration
        .children_of_kind(SyntaxKind::VARIABLE)
        .collect();
    variables
        .iter()
        .rev()
        .find(|variable| variable_name(*variable).as_str() == name)
        .and_then(|variable| binding_for(variable, SmolStr::new(name)))
}

fn binding_for<N: TreeNode>(variable: &N, name: SmolStr) -> Option<Binding<N>> {
    let declaration = variable.parent()?;
    if declaration.kind() != SyntaxKind::DECLARATION {
        return None;
    }
    let in_range_header = declaration
        .parent()
        .and_then(|pipeline| pipeline.parent())
        .is_some_and(|owner| owner.kind() == SyntaxKind::RANGE_BLOCK);
    // `=` assigns to an existing variable without declaring one.
    let declares = declaration
        .child_of_kind(SyntaxKind::COLON_EQ)
        .is_some();

    let kind = if in_range_header {
        let variables: Vec<_> = declaration
            .children_of_kind(SyntaxKind::VARIABLE)
            .collect();
        if variables.len() == 2 && variables[0] == *variable {
            BindingKind::RangeIndex
        } else {
            BindingKind::RangeElement
        }
    } else if declares {
        BindingKind::Declared
    } else {
        return None;
    };

    Some(Binding {
        name,
        variable: variable.clone(),
        kind,
    })
}
