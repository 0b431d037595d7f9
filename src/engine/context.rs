//! Context resolution - nearest-provider lookup.
//!
//! A provider publishes every prop except `children`. Lookup walks from the
//! asking node up through its ancestors and returns the first published value
//! for the key. Nothing is cached: each `use_context` call walks again.

use crate::engine::node::{NodeId, NodeKind, Tree};
use crate::error::{RenderError, Result};
use crate::types::{Value, CHILDREN};

/// Find `key` on the nearest provider at or above `from`.
///
/// A provider whose value for `key` is `Null` does not count as providing it,
/// so the walk continues past it.
pub(crate) fn resolve(tree: &Tree, from: NodeId, key: &str) -> Result<Value> {
    if key == CHILDREN {
        return Err(RenderError::ContextNotFound(key.to_string()));
    }

    tree.ancestors(from)
        .filter(|node| node.kind == NodeKind::Provider)
        .find_map(|node| match node.props.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value.clone()),
        })
        .ok_or_else(|| {
            tracing::trace!(key, node = ?from, "context lookup failed");
            RenderError::ContextNotFound(key.to_string())
        })
}
