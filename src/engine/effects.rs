//! Effects - deferred side effects and their cleanups.
//!
//! `use_effect` does not run anything. It pushes a [`PendingEffect`] onto the
//! node, and the reconciler drains that queue after the component body has
//! returned and before the node's children are reconciled. The value an
//! effect returns becomes the cleanup stored in its hook slot, and cleanups
//! run when the node is unmounted.

use crate::engine::hooks::Hook;
use crate::engine::node::Node;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by effects.
///
/// Runs once, when the owning component is unmounted.
pub type Cleanup = Box<dyn FnOnce()>;

/// Values an effect callback may return.
///
/// `()` means no cleanup. A [`Cleanup`] (or `Some(cleanup)`) is stored in the
/// effect's slot, replacing whatever was there.
pub trait EffectOutput {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl EffectOutput for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl EffectOutput for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl EffectOutput for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Pending effects
// =============================================================================

/// An effect waiting to run, tagged with the hook slot it belongs to.
pub(crate) struct PendingEffect {
    slot: usize,
    run: Box<dyn FnOnce() -> Option<Cleanup>>,
}

impl PendingEffect {
    pub(crate) fn new(slot: usize, run: impl FnOnce() -> Option<Cleanup> + 'static) -> Self {
        Self {
            slot,
            run: Box::new(run),
        }
    }
}

/// Run every queued effect on `node` in registration order.
///
/// A returned cleanup overwrites the slot's previous cleanup. The previous
/// one is dropped without being called.
pub(crate) fn drain(node: &mut Node) -> usize {
    let mut ran = 0;
    while let Some(PendingEffect { slot, run }) = node.pending_effects.pop_front() {
        let cleanup = run();
        if let Some(Hook::Effect { cleanup: stored, .. }) = node.hooks.get_mut(slot) {
            *stored = cleanup;
        }
        ran += 1;
    }
    ran
}

/// Take every stored cleanup from `node`, in slot order.
pub(crate) fn take_cleanups(node: &mut Node) -> Vec<Cleanup> {
    node.pending_effects.clear();
    node.hooks
        .iter_mut()
        .filter_map(|hook| match hook {
            Hook::Effect { cleanup, .. } => cleanup.take(),
            _ => None,
        })
        .collect()
}
