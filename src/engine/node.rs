//! Node model - the persistent tree of rendered instances.
//!
//! Nodes live in a [`Tree`] arena and refer to each other through [`NodeId`]
//! handles: a parent owns its children through the arena, and the parent link
//! is a plain handle, so the tree has no reference cycles.
//!
//! Ids are assigned monotonically starting at 1 and are never reused within a
//! tree. A stale id (one whose node was unmounted) simply stops resolving.

use std::collections::VecDeque;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::engine::component::{ComponentKey, Invocable};
use crate::engine::effects::PendingEffect;
use crate::engine::hooks::Hook;
use crate::types::Props;

// =============================================================================
// Identity
// =============================================================================

/// Handle to a node in a [`Tree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The raw id value (1-based).
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    fn slot(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a node is. Fixed for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A text leaf; its value lives in `props["value"]`.
    Scalar,
    /// Renders only its children.
    Fragment,
    /// Publishes its non-`children` props to descendants.
    Provider,
    /// Tag-like leaf with one child emitted without escaping.
    RawHtml,
    /// A user component.
    Component,
    /// An HTML tag.
    Tag,
}

/// The type identity compared when deciding reuse-vs-replace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Scalar,
    Fragment,
    Provider,
    RawHtml,
    Tag(String),
    Component(ComponentKey),
}

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// The component body has run at least once.
        const INVOKED = 1 << 0;
        /// The tag is a void element and must not have children.
        const VOID = 1 << 1;
    }
}

// =============================================================================
// Node
// =============================================================================

/// One rendered position in the tree.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) key: TypeKey,
    pub(crate) props: Props,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
    pub(crate) invocable: Option<Invocable>,
    pub(crate) hooks: Vec<Hook>,
    pub(crate) pending_effects: VecDeque<PendingEffect>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.key
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Number of hook slots recorded on this node.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Tag name for `Tag` nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.key {
            TypeKey::Tag(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is a void-element tag.
    pub fn is_void_element(&self) -> bool {
        self.flags.contains(NodeFlags::VOID)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("depth", &self.depth)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("hooks", &self.hooks)
            .field("pending_effects", &self.pending_effects.len())
            .finish()
    }
}

// =============================================================================
// Tree arena
// =============================================================================

/// Arena owning every live node of one render pass.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    live: usize,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node under `parent`, assigning the next id and the depth.
    pub(crate) fn insert(
        &mut self,
        kind: NodeKind,
        key: TypeKey,
        props: Props,
        flags: NodeFlags,
        invocable: Option<Invocable>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.slots.len() as u32 + 1);
        let depth = parent.and_then(|p| self.get(p)).map_or(0, |p| p.depth + 1);

        self.slots.push(Some(Node {
            id,
            kind,
            key,
            props,
            parent,
            depth,
            children: Vec::new(),
            flags,
            invocable,
            hooks: Vec::new(),
            pending_effects: VecDeque::new(),
        }));
        self.live += 1;
        id
    }

    /// Detach a node from the arena. Children are left in place.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.slot())?.take();
        if node.is_some() {
            self.live -= 1;
        }
        node
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.slot())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.slot())?.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Ancestors of `id`, nearest first, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.get(id), |node| node.parent.and_then(|p| self.get(p)))
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{id:?} is not mounted"),
        }
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("{id:?} is not mounted"),
        }
    }
}
