//! HTML serializer for settled render trees.
//!
//! # Rules
//!
//! 1. Scalars are written as escaped text
//! 2. Fragments, providers and components write only their children
//! 3. Raw markup writes its single child verbatim
//! 4. Tags write `<name attrs>children</name>`; void elements get no end tag
//!
//! Attribute values follow the usual conventions: `Null` and `false` drop
//! the attribute, `true` writes it bare, and `class` takes a string, a list
//! or a conditional map and is normalized to a sorted, deduplicated list.

use std::collections::BTreeSet;
use std::io::Write;

use crate::engine::{Node, NodeId, NodeKind, Tree};
use crate::error::{RenderError, Result};
use crate::pipeline::RenderTree;
use crate::types::{Value, CHILDREN};

use super::output::OutputBuffer;

/// Serializes a [`RenderTree`] to an HTML string.
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the whole tree. On error nothing is returned.
    pub fn serialize(&self, tree: &RenderTree) -> Result<String> {
        Ok(self.buffer(tree)?.into_string())
    }

    /// Serialize the whole tree and flush it to `writer` in one write.
    ///
    /// Nothing reaches `writer` unless serialization succeeds.
    pub fn write_to<W: Write>(&self, tree: &RenderTree, writer: &mut W) -> Result<()> {
        self.buffer(tree)?.flush_to(writer)?;
        Ok(())
    }

    fn buffer(&self, tree: &RenderTree) -> Result<OutputBuffer> {
        let mut out = OutputBuffer::new();
        if let Some(root) = tree.root() {
            self.write_node(tree.tree(), root, &mut out)?;
        }
        Ok(out)
    }

    fn write_node(&self, tree: &Tree, id: NodeId, out: &mut OutputBuffer) -> Result<()> {
        let Some(node) = tree.get(id) else {
            return Ok(());
        };

        match node.kind() {
            NodeKind::Scalar => {
                if let Some(text) = node.props().get("value").and_then(Value::to_text) {
                    out.write_escaped(&text);
                }
                Ok(())
            }
            NodeKind::RawHtml => {
                let markup = node
                    .props()
                    .get(CHILDREN)
                    .and_then(Value::as_list)
                    .and_then(<[Value]>::first)
                    .and_then(Value::to_text);
                if let Some(markup) = markup {
                    out.write_str(&markup);
                }
                Ok(())
            }
            NodeKind::Fragment | NodeKind::Provider | NodeKind::Component => {
                self.write_children(tree, node, out)
            }
            NodeKind::Tag => self.write_tag(tree, node, out),
        }
    }

    fn write_children(&self, tree: &Tree, node: &Node, out: &mut OutputBuffer) -> Result<()> {
        for &child in node.children() {
            self.write_node(tree, child, out)?;
        }
        Ok(())
    }

    fn write_tag(&self, tree: &Tree, node: &Node, out: &mut OutputBuffer) -> Result<()> {
        let name = node.tag_name().unwrap_or_default();
        if name.is_empty() || is_unsafe_name(name) {
            return Err(RenderError::InvalidTagName(name.to_string()));
        }

        let is_void = node.is_void_element();
        if is_void && !node.children().is_empty() {
            return Err(RenderError::VoidElementChildren(name.to_string()));
        }

        out.write_char('<');
        out.write_str(name);
        for (attr, value) in node.props().iter() {
            if attr == CHILDREN {
                continue;
            }
            write_attribute(attr, value, out)?;
        }
        out.write_char('>');

        if is_void {
            return Ok(());
        }

        self.write_children(tree, node, out)?;
        out.write_str("</");
        out.write_str(name);
        out.write_char('>');
        Ok(())
    }
}

// =============================================================================
// Attributes
// =============================================================================

fn is_unsafe_name(name: &str) -> bool {
    name.chars().any(|c| {
        c.is_whitespace() || matches!(c, '/' | '\\' | '=' | '\'' | '"' | '\0' | '<' | '>')
    })
}

fn write_attribute(name: &str, value: &Value, out: &mut OutputBuffer) -> Result<()> {
    if is_unsafe_name(name) {
        return Err(RenderError::InvalidAttributeName(name.to_string()));
    }

    let text = match value {
        Value::Null | Value::Bool(false) => return Ok(()),
        Value::Bool(true) => None,
        _ if name == "class" => {
            let classes = class_list(value)?;
            if classes.is_empty() {
                return Ok(());
            }
            Some(classes)
        }
        Value::Int(_) | Value::Float(_) | Value::Str(_) => value.to_text(),
        other => {
            return Err(RenderError::StructuralViolation(format!(
                "attribute `{name}` cannot hold a {}",
                other.type_name()
            )));
        }
    };

    out.write_char(' ');
    out.write_escaped(name);
    if let Some(text) = text {
        out.write_str("=\"");
        out.write_escaped(&text);
        out.write_char('"');
    }
    Ok(())
}

/// Normalize a `class` value into a sorted, space-separated list.
fn class_list(value: &Value) -> Result<String> {
    let mut classes = BTreeSet::new();
    collect_classes(value, &mut classes)?;
    Ok(classes.into_iter().collect::<Vec<_>>().join(" "))
}

fn collect_classes(value: &Value, classes: &mut BTreeSet<String>) -> Result<()> {
    match value {
        Value::Null | Value::Bool(_) => {}
        Value::Int(_) | Value::Float(_) | Value::Str(_) => {
            if let Some(text) = value.to_text() {
                classes.extend(text.split_whitespace().map(str::to_string));
            }
        }
        Value::List(items) => {
            for item in items {
                collect_classes(item, classes)?;
            }
        }
        Value::Map(map) => {
            for (names, enabled) in map.iter() {
                if enabled.is_truthy() {
                    classes.extend(names.split_whitespace().map(str::to_string));
                }
            }
        }
        Value::Element(_) => {
            return Err(RenderError::StructuralViolation(
                "`class` cannot hold an element".into(),
            ));
        }
    }
    Ok(())
}
