//! Engine - nodes, components, hooks and the per-pass scheduling state.
//!
//! The engine owns the data the reconciler works on:
//! - Node: the [`Tree`] arena of rendered instances and their [`NodeId`]s
//! - Classify: description → node blueprint
//! - Component: user components and their identity
//! - Hooks: slot-based component memory
//! - Effects: pending side effects and cleanups
//! - Queue: dirty nodes waiting to be re-rendered
//! - Context: nearest-provider lookup
//!
//! # Architecture
//!
//! Nodes are NOT linked objects. They are entries in one arena, addressed by
//! id, with the parent stored as a plain handle:
//!
//! ```text
//! NodeId(1): Component (parent=None,    depth=0, hooks=[state, effect])
//! NodeId(2): Tag "div" (parent=Some(1), depth=1, children=[3, 4])
//! NodeId(3): Scalar    (parent=Some(2), depth=2, value="Hello")
//! NodeId(4): Component (parent=Some(2), depth=2, hooks=[context])
//! ```
//!
//! Component bodies only ever see a [`Hooks`] handle, which borrows the tree
//! for the duration of one call.

pub(crate) mod classify;
mod component;
pub(crate) mod context;
pub(crate) mod effects;
mod hooks;
mod node;
mod queue;

pub use classify::{is_void_element, VOID_ELEMENTS};
pub use component::{Component, ComponentKey, MethodFn, Render, RenderClosure, RenderFn};
pub use effects::{Cleanup, EffectOutput};
pub use hooks::{Hooks, Setter, EVERY_RENDER, ONCE};
pub use node::{Node, NodeFlags, NodeId, NodeKind, Tree, TypeKey};
pub use queue::RerenderQueue;
