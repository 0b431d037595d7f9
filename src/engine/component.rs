//! Components - the invocable targets behind component nodes.
//!
//! A [`Component`] is what calling code puts in a description. It comes in
//! six shapes:
//!
//! - a plain function pointer ([`Component::from_fn`])
//! - a shared closure ([`Component::from_closure`])
//! - a bound object rendered through [`Render::render`] ([`Component::object`])
//! - a bound object with a named method ([`Component::method`])
//! - a class: a `Render + Default` type built fresh for each mounted node
//!   ([`Component::class`])
//! - a class with a named method ([`Component::class_method`])
//!
//! When a component node is first mounted its `Component` is resolved once
//! into an [`Invocable`], which is memoized on the node. Reuse-vs-replace
//! decisions compare [`ComponentKey`]s, which are computed without resolving,
//! so a class is not instantiated just to find out it matches.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use crate::engine::Hooks;
use crate::error::Result;
use crate::types::{Props, Value};

/// Plain component function.
pub type RenderFn = fn(&Props, &mut Hooks<'_>) -> Result<Value>;

/// Shared component closure.
pub type RenderClosure = Rc<dyn Fn(&Props, &mut Hooks<'_>) -> Result<Value>>;

/// Named method on a component object.
pub type MethodFn<T> = fn(&T, &Props, &mut Hooks<'_>) -> Result<Value>;

/// Objects with a canonical rendering method.
pub trait Render {
    /// Render this component for the given props.
    fn render(&self, props: &Props, hooks: &mut Hooks<'_>) -> Result<Value>;
}

// =============================================================================
// Identity
// =============================================================================

/// Identity of a component, used to tell "same component" from "different
/// component" at one tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    /// Address of a function pointer.
    Function(usize),
    /// Address of a shared closure or bound object allocation.
    Shared(usize),
    /// Bound object address plus method address.
    Bound(usize, usize),
    /// A class using its `render` method.
    Class(TypeId),
    /// A class plus method address.
    ClassMethod(TypeId, usize),
}

fn rc_addr<T: ?Sized>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc).cast::<()>() as usize
}

// =============================================================================
// Component (unresolved)
// =============================================================================

/// A component as it appears in a description.
#[derive(Clone)]
pub struct Component {
    key: ComponentKey,
    source: Source,
}

#[derive(Clone)]
enum Source {
    Function(RenderFn),
    Closure(RenderClosure),
    Object(Rc<dyn Render>),
    Method(RenderClosure),
    Class(Rc<dyn Fn() -> Invocable>),
}

impl Component {
    /// A plain function component. Identity is the function address.
    pub fn from_fn(f: RenderFn) -> Self {
        Self {
            key: ComponentKey::Function(f as usize),
            source: Source::Function(f),
        }
    }

    /// A closure component. Identity is the allocation, so clones of the
    /// returned `Component` match each other but a freshly wrapped closure
    /// does not.
    pub fn from_closure<F>(f: F) -> Self
    where
        F: Fn(&Props, &mut Hooks<'_>) -> Result<Value> + 'static,
    {
        let closure: RenderClosure = Rc::new(f);
        Self {
            key: ComponentKey::Shared(rc_addr(&closure)),
            source: Source::Closure(closure),
        }
    }

    /// A bound object rendered through [`Render::render`].
    pub fn object<T: Render + 'static>(object: Rc<T>) -> Self {
        let object: Rc<dyn Render> = object;
        Self {
            key: ComponentKey::Shared(rc_addr(&object)),
            source: Source::Object(object),
        }
    }

    /// A bound object rendered through a named method.
    pub fn method<T: 'static>(object: Rc<T>, method: MethodFn<T>) -> Self {
        let key = ComponentKey::Bound(rc_addr(&object), method as usize);
        let call: RenderClosure =
            Rc::new(move |props: &Props, hooks: &mut Hooks<'_>| method(&object, props, hooks));
        Self {
            key,
            source: Source::Method(call),
        }
    }

    /// A class component: a fresh `T::default()` is built for every mounted
    /// node and kept for the node's lifetime.
    pub fn class<T: Render + Default + 'static>() -> Self {
        Self {
            key: ComponentKey::Class(TypeId::of::<T>()),
            source: Source::Class(Rc::new(|| {
                Invocable::Object(Rc::new(T::default()))
            })),
        }
    }

    /// A class component rendered through a named method.
    pub fn class_method<T: Default + 'static>(method: MethodFn<T>) -> Self {
        Self {
            key: ComponentKey::ClassMethod(TypeId::of::<T>(), method as usize),
            source: Source::Class(Rc::new(move || {
                let instance = T::default();
                Invocable::Method(Rc::new(move |props: &Props, hooks: &mut Hooks<'_>| {
                    method(&instance, props, hooks)
                }))
            })),
        }
    }

    pub fn key(&self) -> ComponentKey {
        self.key
    }

    /// Resolve into the callable stored on a mounted node.
    pub(crate) fn resolve(&self) -> Invocable {
        match &self.source {
            Source::Function(f) => Invocable::Function(*f),
            Source::Closure(c) => Invocable::Closure(c.clone()),
            Source::Object(o) => Invocable::Object(o.clone()),
            Source::Method(m) => Invocable::Method(m.clone()),
            Source::Class(construct) => construct(),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.key)
    }
}

impl From<RenderFn> for Component {
    fn from(f: RenderFn) -> Self {
        Component::from_fn(f)
    }
}

// =============================================================================
// Invocable (resolved)
// =============================================================================

/// The resolved callable behind a component node.
#[derive(Clone)]
pub(crate) enum Invocable {
    Function(RenderFn),
    Closure(RenderClosure),
    Object(Rc<dyn Render>),
    Method(RenderClosure),
}

impl Invocable {
    pub(crate) fn call(&self, props: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        match self {
            Invocable::Function(f) => f(props, hooks),
            Invocable::Closure(c) | Invocable::Method(c) => c(props, hooks),
            Invocable::Object(o) => o.render(props, hooks),
        }
    }
}
