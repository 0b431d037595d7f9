//! Rerender Queue - dirty component nodes waiting to be re-rendered.
//!
//! The queue belongs to one render pass. Setters push their owning node onto
//! it; once the initial tree is built the reconciler drains it, always taking
//! the deepest node first so a parent re-render (which re-renders its whole
//! subtree anyway) comes after its dirty descendants have settled.

use crate::engine::node::NodeId;

/// Deduplicated list of dirty nodes, kept in insertion order.
#[derive(Debug, Default)]
pub struct RerenderQueue {
    entries: Vec<(NodeId, usize)>,
}

impl RerenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `node` at `depth`. Returns `false` if it was already queued.
    pub fn enqueue(&mut self, node: NodeId, depth: usize) -> bool {
        if self.contains(node) {
            return false;
        }
        self.entries.push((node, depth));
        true
    }

    /// Drop `node` from the queue, if present.
    pub fn remove(&mut self, node: NodeId) {
        self.entries.retain(|(id, _)| *id != node);
    }

    /// Remove and return the first entry with the greatest depth.
    pub fn pop_deepest(&mut self) -> Option<NodeId> {
        let mut best: Option<(usize, usize)> = None;
        for (index, (_, depth)) in self.entries.iter().enumerate() {
            if best.is_none_or(|(_, deepest)| *depth > deepest) {
                best = Some((index, *depth));
            }
        }
        best.map(|(index, _)| self.entries.remove(index).0)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|(id, _)| *id == node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
