//! Hook Engine - per-invocation, position-indexed component memory.
//!
//! A [`Hooks`] handle is the invocation context of one component body call.
//! The reconciler builds it right before calling the body and drops it right
//! after, so hooks can only be reached while a component is rendering.
//!
//! Every hook call advances a cursor into the node's hook slots:
//!
//! ```text
//! first invocation:   use_state  use_effect  use_context("theme")   → append
//! later invocations:  use_state  use_effect  use_context("theme")   → replay
//!                        [0]        [1]           [2]
//! ```
//!
//! On replay the requested kind (and, for state and memo, the Rust value
//! type; for context, the key) must match the slot at the cursor. Anything
//! else is an ordering violation. The reconciler also checks that the body
//! consumed exactly as many slots as the node holds.
//!
//! # Example
//!
//! ```ignore
//! fn counter(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
//!     let (count, set_count) = hooks.use_state(0i64)?;
//!     hooks.use_effect(ONCE, move || set_count.set(1))?;
//!     Ok(el("span").child(count).into())
//! }
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::engine::context;
use crate::engine::effects::{Cleanup, EffectOutput, PendingEffect};
use crate::engine::node::{NodeId, NodeKind, Tree};
use crate::engine::queue::RerenderQueue;
use crate::error::{RenderError, Result};
use crate::types::Value;

/// Dependency list that never changes: the effect or memo runs once.
pub const ONCE: Option<()> = Some(());

/// No dependency list: the effect or memo runs on every render.
pub const EVERY_RENDER: Option<()> = None;

// =============================================================================
// Hook slots
// =============================================================================

/// One slot of per-component persistent state.
pub(crate) enum Hook {
    /// Holds a `Setter<T>`, which owns the value cell.
    State(Box<dyn Any>),
    Effect {
        deps: Option<Box<dyn Any>>,
        cleanup: Option<Cleanup>,
    },
    Memo {
        deps: Option<Box<dyn Any>>,
        value: Box<dyn Any>,
    },
    Context {
        key: String,
    },
}

impl Hook {
    fn kind_name(&self) -> &'static str {
        match self {
            Hook::State(_) => "state",
            Hook::Effect { .. } => "effect",
            Hook::Memo { .. } => "memo",
            Hook::Context { .. } => "context",
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Context { key } => write!(f, "context({key})"),
            other => f.write_str(other.kind_name()),
        }
    }
}

/// Whether a dependency list calls for a re-run.
fn deps_changed<D: PartialEq + 'static>(stored: Option<&dyn Any>, next: Option<&D>) -> bool {
    match (stored, next) {
        (_, None) => true,
        (None, Some(_)) => true,
        (Some(stored), Some(next)) => stored.downcast_ref::<D>() != Some(next),
    }
}

// =============================================================================
// Setter
// =============================================================================

/// Writes a state slot and marks the owning node dirty.
///
/// Setters may be called at any time during the render pass that created
/// them, including from effects. Once that pass has finished, setting still
/// updates the value but no longer schedules anything.
pub struct Setter<T> {
    value: Rc<RefCell<T>>,
    node: NodeId,
    depth: usize,
    queue: Weak<RefCell<RerenderQueue>>,
}

impl<T> Setter<T> {
    /// Replace the value and enqueue the owning node for re-render.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.mark_dirty();
    }

    /// The node this state belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    fn mark_dirty(&self) {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().enqueue(self.node, self.depth);
            }
            None => tracing::trace!(node = ?self.node, "state set after render pass finished"),
        }
    }
}

impl<T: Clone> Setter<T> {
    /// Current value of the slot.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Apply `f` to a copy of the value, store the result and enqueue the
    /// owning node for re-render.
    ///
    /// No borrow is held while `f` runs, so it may read or set the same slot;
    /// the value `f` leaves behind is the one stored.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            node: self.node,
            depth: self.depth,
            queue: self.queue.clone(),
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("node", &self.node).finish()
    }
}

// =============================================================================
// Hooks (invocation context)
// =============================================================================

/// The hook API handed to a component body.
pub struct Hooks<'a> {
    tree: &'a mut Tree,
    node: NodeId,
    cursor: usize,
    first: bool,
    queue: &'a Rc<RefCell<RerenderQueue>>,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        tree: &'a mut Tree,
        node: NodeId,
        first: bool,
        queue: &'a Rc<RefCell<RerenderQueue>>,
    ) -> Self {
        Self {
            tree,
            node,
            cursor: 0,
            first,
            queue,
        }
    }

    /// The node being rendered.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether this is the node's first invocation.
    pub fn is_first_render(&self) -> bool {
        self.first
    }

    /// Number of hook slots consumed so far.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hold a value across renders.
    ///
    /// Returns the current value and a [`Setter`]. The initial value is only
    /// used on the first invocation.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> Result<(T, Setter<T>)> {
        self.use_state_with(move || initial)
    }

    /// Like [`use_state`](Self::use_state), with a lazily computed initial
    /// value.
    pub fn use_state_with<T, F>(&mut self, init: F) -> Result<(T, Setter<T>)>
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let slot = self.begin("state")?;

        if self.first {
            let depth = self.tree[self.node].depth;
            let setter = Setter {
                value: Rc::new(RefCell::new(init())),
                node: self.node,
                depth,
                queue: Rc::downgrade(self.queue),
            };
            self.tree[self.node].hooks.push(Hook::State(Box::new(setter)));
        }

        let setter = match &self.tree[self.node].hooks[slot] {
            Hook::State(state) => state.downcast_ref::<Setter<T>>().cloned(),
            _ => None,
        };
        let setter = setter.ok_or_else(|| self.violation(slot, "state"))?;
        self.cursor += 1;
        Ok((setter.get(), setter))
    }

    /// Register a side effect.
    ///
    /// The effect runs after the component body returns and before its
    /// children are rendered. It runs on the first invocation, and on later
    /// invocations whenever `deps` is `None` or differs from the previous
    /// list. Whatever it returns replaces the slot's cleanup, which runs when
    /// the node is unmounted.
    pub fn use_effect<D, F, R>(&mut self, deps: Option<D>, effect: F) -> Result<()>
    where
        D: PartialEq + 'static,
        F: FnOnce() -> R + 'static,
        R: EffectOutput,
    {
        let slot = self.begin("effect")?;

        let schedule = if self.first {
            self.tree[self.node].hooks.push(Hook::Effect {
                deps: None,
                cleanup: None,
            });
            true
        } else {
            match &self.tree[self.node].hooks[slot] {
                Hook::Effect { deps: stored, .. } => deps_changed(stored.as_deref(), deps.as_ref()),
                _ => return Err(self.violation(slot, "effect")),
            }
        };

        if schedule {
            let node = &mut self.tree[self.node];
            if let Hook::Effect { deps: stored, .. } = &mut node.hooks[slot] {
                *stored = deps.map(|d| Box::new(d) as Box<dyn Any>);
            }
            node.pending_effects
                .push_back(PendingEffect::new(slot, move || effect().into_cleanup()));
        }

        self.cursor += 1;
        Ok(())
    }

    /// Memoize a computed value.
    ///
    /// Same dependency policy as [`use_effect`](Self::use_effect), but the
    /// value is recomputed synchronously and returned on every call.
    pub fn use_memo<T, D, F>(&mut self, deps: Option<D>, compute: F) -> Result<T>
    where
        T: Clone + 'static,
        D: PartialEq + 'static,
        F: FnOnce() -> T,
    {
        let slot = self.begin("memo")?;

        if self.first {
            let value = compute();
            self.tree[self.node].hooks.push(Hook::Memo {
                deps: deps.map(|d| Box::new(d) as Box<dyn Any>),
                value: Box::new(value),
            });
        } else {
            let recompute = match &self.tree[self.node].hooks[slot] {
                Hook::Memo { deps: stored, value } if value.is::<T>() => {
                    deps_changed(stored.as_deref(), deps.as_ref())
                }
                _ => return Err(self.violation(slot, "memo")),
            };
            if recompute {
                self.tree[self.node].hooks[slot] = Hook::Memo {
                    deps: deps.map(|d| Box::new(d) as Box<dyn Any>),
                    value: Box::new(compute()),
                };
            }
        }

        let value = match &self.tree[self.node].hooks[slot] {
            Hook::Memo { value, .. } => value.downcast_ref::<T>().cloned(),
            _ => None,
        };
        let value = value.ok_or_else(|| self.violation(slot, "memo"))?;
        self.cursor += 1;
        Ok(value)
    }

    /// Read a value published by the nearest ancestor provider.
    ///
    /// The value is looked up on every call; the slot only records the key so
    /// context reads take part in the ordering checks.
    pub fn use_context(&mut self, key: &str) -> Result<Value> {
        let slot = self.begin("context")?;

        if self.first {
            self.tree[self.node].hooks.push(Hook::Context {
                key: key.to_string(),
            });
        } else {
            match &self.tree[self.node].hooks[slot] {
                Hook::Context { key: stored } if stored == key => {}
                _ => return Err(self.violation(slot, "context")),
            }
        }

        self.cursor += 1;
        context::resolve(self.tree, self.node, key)
    }

    /// Validate that a hook may run here and return its slot index.
    fn begin(&self, requested: &str) -> Result<usize> {
        let node = self.tree.get(self.node).ok_or(RenderError::InvocationContext)?;
        if node.kind != NodeKind::Component {
            return Err(RenderError::InvocationContext);
        }

        let slot = self.cursor;
        if self.first {
            if slot != node.hooks.len() {
                return Err(self.violation(slot, requested));
            }
        } else if slot >= node.hooks.len() {
            return Err(RenderError::OrderingViolation(format!(
                "{requested} hook #{slot} was not called on the previous render"
            )));
        }
        Ok(slot)
    }

    fn violation(&self, slot: usize, requested: &str) -> RenderError {
        let found = self
            .tree
            .get(self.node)
            .and_then(|node| node.hooks.get(slot))
            .map_or("nothing", Hook::kind_name);
        RenderError::OrderingViolation(format!(
            "hook #{slot} requested {requested}, previous render had {found}"
        ))
    }
}

impl fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("node", &self.node)
            .field("cursor", &self.cursor)
            .field("first", &self.first)
            .finish()
    }
}
