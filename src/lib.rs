//! # spark-html
//!
//! Server-side HTML rendering with components, hooks and context.
//!
//! ## Architecture
//!
//! spark-html keeps rendered instances in an arena of nodes addressed by
//! [`NodeId`] rather than in linked objects. A render pass builds that tree
//! from a description, lets components keep state in positional hook slots,
//! and settles any state changes before the tree is handed back:
//! ```text
//! Value → classify → reconcile → effects → rerender queue → RenderTree → HTML
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use spark_html::*;
//!
//! fn greeting(props: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
//!     let theme = hooks.use_context("theme")?;
//!     Ok(el("p").prop("class", theme).child(props.children()).into())
//! }
//!
//! let page = provider()
//!     .prop("theme", "dark")
//!     .child(el(Component::from_fn(greeting)).child("Hello"));
//!
//! assert_eq!(render_to_string(page)?, r#"<p class="dark">Hello</p>"#);
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Descriptions (Value, Props, Element)
//! - [`engine`] - Nodes, components, hooks, effects, rerender queue, context
//! - [`pipeline`] - Reconciler and render configuration
//! - [`renderer`] - HTML serializer and output buffer
//! - [`error`] - RenderError

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{RenderError, Result};

pub use engine::{
    Cleanup, Component, ComponentKey, EffectOutput, Hooks, MethodFn, Node, NodeFlags, NodeId,
    NodeKind, Render, RenderFn, Setter, Tree, TypeKey, EVERY_RENDER, ONCE,
};

pub use pipeline::{render, render_to, render_to_string, RenderConfig, RenderTree, Renderer};

pub use renderer::{escape, HtmlSerializer, OutputBuffer};
