// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The textual input format.
//!
//! The stream starts with a node-count line, followed by that many node
//! definitions, followed by commands:
//!
//! ```text
//! 2
//! 0,W,1
//! 1,T,2,hello
//! 2,world
//! refresh
//! end
//! ```
//!
//! Definitions are `parent,type,id[,content]` with `type` one of `W`
//! (widget) or `T` (text, `content` required). Commands are `print`,
//! `refresh`, `end`, or `id,args...` updates. Fields are comma-separated
//! with no quoting or escaping; an update argument may therefore not
//! contain a comma.

use repaint_scene::{NodeId, NodeKind};
use thiserror::Error;

/// A malformed input line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line had no content.
    #[error("empty line")]
    Empty,
    /// A field that should be an unsigned integer was not.
    #[error("`{0}` is not a node id")]
    BadId(String),
    /// A definition line used an unknown type letter.
    #[error("unknown node type `{0}` (expected W or T)")]
    UnknownKind(String),
    /// A definition line was missing a required field.
    #[error("definition needs parent,type,id[,content]")]
    MissingField,
    /// A text definition had no content field.
    #[error("text node {0} defined without content")]
    MissingContent(NodeId),
}

/// A parsed node-definition line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDef {
    /// The parent to attach under.
    pub parent: NodeId,
    /// The new node's id.
    pub id: NodeId,
    /// The variant (never `View`).
    pub kind: NodeKind,
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Dump the tree.
    Print,
    /// Run a frame.
    Refresh,
    /// Terminate.
    End,
    /// Update one node with positional arguments.
    Update {
        /// The target node.
        id: NodeId,
        /// Variant-specific arguments (`Text` reads the first).
        args: Vec<String>,
    },
}

fn parse_id(field: &str) -> Result<NodeId, ProtocolError> {
    field
        .trim()
        .parse::<u32>()
        .map(NodeId::new)
        .map_err(|_| ProtocolError::BadId(field.trim().to_owned()))
}

/// Parses a `parent,type,id[,content]` definition line.
///
/// # Errors
///
/// [`ProtocolError`] describing the first malformed field.
pub fn parse_node_def(line: &str) -> Result<NodeDef, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }
    let mut fields = line.splitn(4, ',');
    let parent = parse_id(fields.next().ok_or(ProtocolError::MissingField)?)?;
    let kind_letter = fields.next().ok_or(ProtocolError::MissingField)?.trim();
    let id = parse_id(fields.next().ok_or(ProtocolError::MissingField)?)?;

    let kind = match kind_letter {
        "W" => NodeKind::Widget,
        "T" => {
            let content = fields.next().ok_or(ProtocolError::MissingContent(id))?;
            NodeKind::text(content)
        }
        other => return Err(ProtocolError::UnknownKind(other.to_owned())),
    };
    Ok(NodeDef { parent, id, kind })
}

/// Parses a command line.
///
/// # Errors
///
/// [`ProtocolError`] when the line is neither a keyword nor a well-formed
/// update.
pub fn parse_command(line: &str) -> Result<Command, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }
    match line.trim() {
        "print" => return Ok(Command::Print),
        "refresh" => return Ok(Command::Refresh),
        "end" => return Ok(Command::End),
        _ => {}
    }
    let mut fields = line.split(',');
    let id = parse_id(fields.next().ok_or(ProtocolError::Empty)?)?;
    let args: Vec<String> = fields.map(str::to_owned).collect();
    Ok(Command::Update { id, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_widget_and_text_definitions() {
        assert_eq!(
            parse_node_def("0,W,1").unwrap(),
            NodeDef {
                parent: NodeId::ROOT,
                id: NodeId::new(1),
                kind: NodeKind::Widget,
            }
        );
        assert_eq!(
            parse_node_def("1,T,2,hello").unwrap(),
            NodeDef {
                parent: NodeId::new(1),
                id: NodeId::new(2),
                kind: NodeKind::text("hello"),
            }
        );
    }

    #[test]
    fn text_content_keeps_embedded_commas_out_of_earlier_fields() {
        // splitn(4) leaves the final field untouched.
        let def = parse_node_def("1,T,2,a,b,c").unwrap();
        assert_eq!(def.kind, NodeKind::text("a,b,c"));
    }

    #[test]
    fn definition_errors() {
        assert_eq!(parse_node_def(""), Err(ProtocolError::Empty));
        assert_eq!(parse_node_def("0,W"), Err(ProtocolError::MissingField));
        assert_eq!(
            parse_node_def("0,X,5"),
            Err(ProtocolError::UnknownKind("X".to_owned()))
        );
        assert_eq!(
            parse_node_def("0,T,5"),
            Err(ProtocolError::MissingContent(NodeId::new(5)))
        );
        assert_eq!(
            parse_node_def("zero,W,1"),
            Err(ProtocolError::BadId("zero".to_owned()))
        );
    }

    #[test]
    fn parses_keywords_and_updates() {
        assert_eq!(parse_command("print").unwrap(), Command::Print);
        assert_eq!(parse_command("refresh\n").unwrap(), Command::Refresh);
        assert_eq!(parse_command("end").unwrap(), Command::End);
        assert_eq!(
            parse_command("7,new text").unwrap(),
            Command::Update {
                id: NodeId::new(7),
                args: vec!["new text".to_owned()],
            }
        );
        assert_eq!(
            parse_command("7").unwrap(),
            Command::Update {
                id: NodeId::new(7),
                args: vec![],
            }
        );
    }

    #[test]
    fn command_errors() {
        assert_eq!(parse_command("  "), Err(ProtocolError::Empty));
        assert_eq!(
            parse_command("frobnicate"),
            Err(ProtocolError::BadId("frobnicate".to_owned()))
        );
    }
}
