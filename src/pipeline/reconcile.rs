//! Reconciler - builds and settles the node tree for one render pass.
//!
//! # Example
//!
//! ```ignore
//! use spark_html::{el, Renderer};
//!
//! let tree = Renderer::new().render(el("p").child("Hello"))?;
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! A pass runs in two phases:
//!
//! ```text
//! reconcile(root) ── depth-first walk, components invoked, effects drained
//!        │
//!        ▼
//! drain queue ────── deepest dirty node re-rendered in place, until empty
//! ```

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::engine::classify::{classify, Blueprint};
use crate::engine::effects;
use crate::engine::{Hooks, Node, NodeFlags, NodeId, NodeKind, RerenderQueue, Tree};
use crate::error::{RenderError, Result};
use crate::renderer::HtmlSerializer;
use crate::types::{flatten, Value};

use super::config::RenderConfig;

// =============================================================================
// Render Tree
// =============================================================================

/// The settled result of a render pass.
#[derive(Debug)]
pub struct RenderTree {
    tree: Tree,
    root: Option<NodeId>,
}

impl RenderTree {
    /// Root node, or `None` when the description rendered nothing.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    /// Children of `id`, empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.get(id).map(Node::children).unwrap_or_default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Entry point: description in, settled [`RenderTree`] (or HTML) out.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build the node tree for `description` and settle every state update
    /// made during the pass.
    pub fn render(&self, description: impl Into<Value>) -> Result<RenderTree> {
        let description = description.into();
        tracing::debug!(kind = description.type_name(), "render pass started");

        let mut pass = Pass::new(&self.config);
        let root = pass.reconcile(&description, None, None)?;
        pass.drain_queue()?;

        tracing::debug!(
            nodes = pass.tree.len(),
            rerenders = pass.rerenders,
            "render pass finished"
        );
        Ok(RenderTree {
            tree: pass.tree,
            root,
        })
    }

    /// Render and serialize to HTML.
    pub fn render_to_string(&self, description: impl Into<Value>) -> Result<String> {
        let tree = self.render(description)?;
        HtmlSerializer::new().serialize(&tree)
    }

    /// Render and write the HTML to `writer`. A failed render writes nothing.
    pub fn render_to<W: Write>(
        &self,
        description: impl Into<Value>,
        writer: &mut W,
    ) -> Result<()> {
        let tree = self.render(description)?;
        HtmlSerializer::new().write_to(&tree, writer)
    }
}

/// Render with the default configuration.
pub fn render(description: impl Into<Value>) -> Result<RenderTree> {
    Renderer::new().render(description)
}

/// Render with the default configuration and serialize to HTML.
pub fn render_to_string(description: impl Into<Value>) -> Result<String> {
    Renderer::new().render_to_string(description)
}

/// Render with the default configuration and write the HTML to `writer`.
pub fn render_to<W: Write>(description: impl Into<Value>, writer: &mut W) -> Result<()> {
    Renderer::new().render_to(description, writer)
}

// =============================================================================
// Render Pass
// =============================================================================

/// State owned by one top-level render call.
struct Pass<'c> {
    tree: Tree,
    queue: Rc<RefCell<RerenderQueue>>,
    config: &'c RenderConfig,
    rerenders: usize,
}

impl<'c> Pass<'c> {
    fn new(config: &'c RenderConfig) -> Self {
        Self {
            tree: Tree::new(),
            queue: Rc::new(RefCell::new(RerenderQueue::new())),
            config,
            rerenders: 0,
        }
    }

    /// Reconcile one description against the node previously at its position.
    fn reconcile(
        &mut self,
        description: &Value,
        parent: Option<NodeId>,
        previous: Option<NodeId>,
    ) -> Result<Option<NodeId>> {
        let Some(blueprint) = classify(description)? else {
            if let Some(previous) = previous {
                self.unmount(previous);
            }
            return Ok(None);
        };

        let id = match previous {
            Some(previous) if self.tree[previous].key == blueprint.key => {
                tracing::trace!(node = ?previous, key = ?blueprint.key, "reuse");
                self.tree[previous].props = blueprint.props;
                previous
            }
            Some(previous) => {
                self.unmount(previous);
                self.mount(blueprint, parent)
            }
            None => self.mount(blueprint, parent),
        };

        self.render_node(id)?;
        Ok(Some(id))
    }

    fn mount(&mut self, blueprint: Blueprint, parent: Option<NodeId>) -> NodeId {
        let Blueprint {
            kind,
            key,
            props,
            flags,
            component,
        } = blueprint;

        let invocable = component.as_ref().map(|c| c.resolve());
        let id = self.tree.insert(kind, key, props, flags, invocable, parent);
        tracing::trace!(node = ?id, ?kind, ?parent, "mount");
        id
    }

    /// Produce the node's child description and reconcile its children.
    fn render_node(&mut self, id: NodeId) -> Result<()> {
        let description = match self.tree[id].kind {
            NodeKind::Component => self.invoke(id)?,
            NodeKind::Fragment | NodeKind::Provider | NodeKind::Tag => {
                self.tree[id].props.children()
            }
            NodeKind::Scalar | NodeKind::RawHtml => Value::Null,
        };

        let descriptions = flatten(description);
        let previous = std::mem::take(&mut self.tree[id].children);

        let mut children = Vec::with_capacity(descriptions.len());
        for (index, child) in descriptions.iter().enumerate() {
            let old = previous.get(index).copied();
            if let Some(child) = self.reconcile(child, Some(id), old)? {
                children.push(child);
            }
        }
        for &surplus in previous.iter().skip(descriptions.len()) {
            self.unmount(surplus);
        }

        self.tree[id].children = children;
        Ok(())
    }

    /// Call a component body, then run the effects it scheduled.
    ///
    /// Hook slots are appended until the node carries `INVOKED`, and replayed
    /// after that.
    fn invoke(&mut self, id: NodeId) -> Result<Value> {
        let node = &self.tree[id];
        let Some(invocable) = node.invocable.clone() else {
            return Err(RenderError::InvocationContext);
        };
        let props = node.props.clone();

        loop {
            let first = !self.tree[id].flags.contains(NodeFlags::INVOKED);
            let mut hooks = Hooks::new(&mut self.tree, id, first, &self.queue);
            let output = invocable.call(&props, &mut hooks)?;
            let used = hooks.cursor();

            let node = &mut self.tree[id];
            node.flags |= NodeFlags::INVOKED;
            let ran = effects::drain(node);
            if ran > 0 {
                tracing::trace!(node = ?id, effects = ran, "effects drained");
            }

            if used != node.hooks.len() {
                return Err(RenderError::OrderingViolation(format!(
                    "{used} hooks called, previous render called {}",
                    node.hooks.len()
                )));
            }
            if node.pending_effects.is_empty() {
                return Ok(output);
            }
        }
    }

    /// Unmount `id` and its subtree: children first, then the node's own
    /// effect cleanups in slot order.
    fn unmount(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        for child in node.children.clone() {
            self.unmount(child);
        }

        if let Some(mut node) = self.tree.remove(id) {
            tracing::trace!(node = ?id, kind = ?node.kind, "unmount");
            for cleanup in effects::take_cleanups(&mut node) {
                cleanup();
            }
        }
        self.queue.borrow_mut().remove(id);
    }

    /// Re-render dirty nodes, deepest first, until none are left.
    fn drain_queue(&mut self) -> Result<()> {
        loop {
            let next = self.queue.borrow_mut().pop_deepest();
            let Some(id) = next else {
                return Ok(());
            };
            if !self.tree.contains(id) {
                continue;
            }

            self.rerenders += 1;
            if let Some(limit) = self.config.max_rerenders() {
                if self.rerenders > limit {
                    return Err(RenderError::RerenderLimitExceeded(limit));
                }
            }

            tracing::trace!(node = ?id, depth = self.tree[id].depth, "rerender");
            self.render_node(id)?;
        }
    }
}
