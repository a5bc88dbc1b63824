//! What a template expression points at, as a path from the chart root.
//!
//! The chart root object is what `$` and the top-level `.` denote; its
//! `Values` field is the merged values documents. Paths are rebuilt from the
//! tree on every call:
//!
//! ```text
//! {{ range .Values.list }}      . = Values.list[]
//!   {{ with .config }}          . = Values.list[].config
//!     {{ .name }}               → Values.list[].config.name
//! ```
//!
//! `None` means the expression has no statically known path (function
//! results, `define` bodies, range indexes, …).

use tokio_util::sync::CancellationToken;

use super::scope::{BindingKind, find_binding, variable_name};
use super::{MAX_BINDING_DEPTH, VALUES_NAMESPACE};
use crate::parser::SyntaxKind;
use crate::syntax::TreeNode;
use crate::values::{Cancelled, Segment, ValuePath};

type PathResult = Result<Option<ValuePath>, Cancelled>;

/// Path of the current value (`.`) at `node`.
pub fn current_value<N: TreeNode>(node: &N, cancel: &CancellationToken) -> PathResult {
    current_value_at_depth(node, 0, cancel)
}

/// Path a field chain such as `.a.b`, `$.a.b` or `$x.a.b` refers to.
pub fn field_chain_path<N: TreeNode>(chain: &N, cancel: &CancellationToken) -> PathResult {
    chain_path(chain, 0, cancel)
}

/// Path of the value a variable holds.
pub fn variable_path<N: TreeNode>(variable: &N, cancel: &CancellationToken) -> PathResult {
    variable_target(variable, 0, cancel)
}

/// The part of a chart-root path inside the values documents.
///
/// `Values.a.b` becomes `a.b`. Paths into other namespaces (`Chart`,
/// `Release`, …) have no values counterpart.
pub fn values_path(path: &ValuePath) -> Option<ValuePath> {
    match path.segments().split_first() {
        Some((Segment::Field(name), rest)) if name == VALUES_NAMESPACE => {
            Some(rest.iter().cloned().collect())
        }
        _ => None,
    }
}

fn current_value_at_depth<N: TreeNode>(
    node: &N,
    depth: usize,
    cancel: &CancellationToken,
) -> PathResult {
    let mut child = node.clone();
    for ancestor in node.ancestors() {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        let in_body = child.kind() == SyntaxKind::LIST;
        match ancestor.kind() {
            SyntaxKind::DEFINE_BLOCK => return Ok(None),
            SyntaxKind::RANGE_BLOCK if in_body => {
                let target = header_target(&ancestor, depth, cancel)?;
                return Ok(target.map(|mut path| {
                    path.push_element();
                    path
                }));
            }
            SyntaxKind::WITH_BLOCK | SyntaxKind::NAMED_BLOCK if in_body => {
                return header_target(&ancestor, depth, cancel);
            }
            SyntaxKind::ELSE_CLAUSE
                if in_body && ancestor.child_of_kind(SyntaxKind::WITH_KW).is_some() =>
            {
                return header_target(&ancestor, depth, cancel);
            }
            _ => {}
        }
        child = ancestor;
    }
    Ok(Some(ValuePath::new()))
}

/// Target of the header pipeline of a block or `else with` clause.
fn header_target<N: TreeNode>(owner: &N, depth: usize, cancel: &CancellationToken) -> PathResult {
    match owner.child_of_kind(SyntaxKind::PIPELINE) {
        Some(pipeline) => pipeline_target(&pipeline, depth, cancel),
        None => Ok(None),
    }
}

/// A pipeline has a known target only when it is a single bare operand.
fn pipeline_target<N: TreeNode>(pipeline: &N, depth: usize, cancel: &CancellationToken) -> PathResult {
    let mut commands = pipeline.children_of_kind(SyntaxKind::COMMAND);
    let (Some(command), None) = (commands.next(), commands.next()) else {
        return Ok(None);
    };
    let mut operands = command
        .children()
        .into_iter()
        .filter(|operand| !operand.kind().is_trivia());
    match (operands.next(), operands.next()) {
        (Some(operand), None) => operand_target(&operand, depth, cancel),
        _ => Ok(None),
    }
}

fn operand_target<N: TreeNode>(operand: &N, depth: usize, cancel: &CancellationToken) -> PathResult {
    match operand.kind() {
        SyntaxKind::DOT => current_value_at_depth(operand, depth, cancel),
        SyntaxKind::FIELD_CHAIN => chain_path(operand, depth, cancel),
        SyntaxKind::VARIABLE => variable_target(operand, depth, cancel),
        SyntaxKind::PAREN_PIPELINE => match operand.child_of_kind(SyntaxKind::PIPELINE) {
            Some(pipeline) => pipeline_target(&pipeline, depth, cancel),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

fn chain_path<N: TreeNode>(chain: &N, depth: usize, cancel: &CancellationToken) -> PathResult {
    let parts: Vec<_> = chain
        .children()
        .into_iter()
        .filter(|part| !part.kind().is_trivia())
        .collect();
    let Some(head) = parts.first() else {
        return Ok(None);
    };

    let (base, fields) = if head.kind() == SyntaxKind::FIELD {
        (current_value_at_depth(chain, depth, cancel)?, &parts[..])
    } else {
        (operand_target(head, depth, cancel)?, &parts[1..])
    };
    let Some(mut path) = base else {
        return Ok(None);
    };
    for field in fields {
        if field.kind() != SyntaxKind::FIELD {
            return Ok(None);
        }
        let text = field.text();
        path.push_field(text.trim_start_matches('.'));
    }
    Ok(Some(path))
}

fn variable_target<N: TreeNode>(variable: &N, depth: usize, cancel: &CancellationToken) -> PathResult {
    if variable_name(variable).as_str() == "$" {
        return Ok(Some(ValuePath::new()));
    }
    if depth >= MAX_BINDING_DEPTH {
        tracing::debug!(name = %variable_name(variable), "binding chain too deep");
        return Ok(None);
    }
    let Some(binding) = find_binding(variable, cancel)? else {
        return Ok(None);
    };
    let Some(pipeline) = binding.pipeline() else {
        return Ok(None);
    };
    let target = pipeline_target(&pipeline, depth + 1, cancel)?;
    Ok(match binding.kind {
        BindingKind::Declared => target,
        BindingKind::RangeIndex => None,
        BindingKind::RangeElement => target.map(|mut path| {
            path.push_element();
            path
        }),
    })
}
