//! YAML → [`ValueNode`] loader.
//!
//! Builds the tree from the marked event stream of `yaml-rust2`, so every
//! node keeps the position it was read from. Markers count lines from 1 and
//! columns in characters; both are converted to editor positions through a
//! [`LineIndex`] over the same text.

use rowan::TextSize;
use smol_str::SmolStr;
use thiserror::Error;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use super::node::{ValueKind, ValueNode};
use crate::base::{LineIndex, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuesError {
    #[error("invalid YAML at {position}: {message}")]
    Yaml { message: String, position: Position },
}

/// Parse a YAML document into a position-annotated tree.
///
/// Only the first document of a multi-document stream is kept. An empty
/// stream yields an empty mapping.
pub fn load_yaml(index: &LineIndex) -> Result<ValueNode, ValuesError> {
    let mut builder = TreeBuilder {
        index,
        stack: Vec::new(),
        root: None,
    };
    let mut parser = Parser::new(index.text().chars());
    parser
        .load(&mut builder, false)
        .map_err(|err| ValuesError::Yaml {
            message: err.info().to_string(),
            position: marker_position(index, err.marker()),
        })?;

    Ok(builder
        .root
        .unwrap_or_else(|| ValueNode::mapping(Position::default())))
}

fn marker_position(index: &LineIndex, mark: &Marker) -> Position {
    let line = mark.line().saturating_sub(1) as u32;
    let fallback = Position::new(line, mark.col() as u32);
    let Some(range) = index.line_range(line) else {
        return fallback;
    };
    let line_text = &index.text()[range];
    let byte = line_text
        .char_indices()
        .nth(mark.col())
        .map_or(line_text.len(), |(byte, _)| byte);
    index
        .position(range.start() + TextSize::new(byte as u32))
        .unwrap_or(fallback)
}

enum Frame {
    Mapping {
        node: ValueNode,
        pending_key: Option<(SmolStr, Position)>,
    },
    Sequence(ValueNode),
}

impl Frame {
    fn into_node(self) -> ValueNode {
        match self {
            Self::Mapping { node, .. } | Self::Sequence(node) => node,
        }
    }
}

struct TreeBuilder<'a> {
    index: &'a LineIndex,
    stack: Vec<Frame>,
    root: Option<ValueNode>,
}

impl TreeBuilder<'_> {
    fn push_value(&mut self, value: ValueNode) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
            Some(Frame::Sequence(node)) => node.push(value),
            Some(Frame::Mapping { node, pending_key }) => match pending_key.take() {
                Some((key, key_position)) => node.insert(key, key_position, value),
                None => {
                    // Complex keys have no name a template could refer to.
                    let key = match &value.kind {
                        ValueKind::Scalar(text) => SmolStr::new(text),
                        _ => SmolStr::default(),
                    };
                    *pending_key = Some((key, value.position));
                }
            },
        }
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        let position = marker_position(self.index, &mark);
        match event {
            Event::Scalar(value, ..) => self.push_value(ValueNode::scalar(value, position)),
            Event::Alias(..) => self.push_value(ValueNode::scalar("", position)),
            Event::SequenceStart(..) => self
                .stack
                .push(Frame::Sequence(ValueNode::sequence(Vec::new(), position))),
            Event::MappingStart(..) => self.stack.push(Frame::Mapping {
                node: ValueNode::mapping(position),
                pending_key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                if let Some(frame) = self.stack.pop() {
                    self.push_value(frame.into_node());
                }
            }
            _ => {}
        }
    }
}
