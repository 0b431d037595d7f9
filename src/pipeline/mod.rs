//! Render Pipeline
//!
//! This module connects descriptions to the node tree and, optionally, to
//! HTML output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Value → classify → reconcile (invoke + effects) → rerender queue → RenderTree → HtmlSerializer
//! ```
//!
//! ## Data Flow
//!
//! 1. **reconcile** - Depth-first walk, reusing nodes whose type key matches
//! 2. **invoke** - Component bodies run with a `Hooks` handle, effects drain
//! 3. **drain queue** - Dirty components re-render deepest first
//! 4. **serialize** - The settled tree is written out as HTML
//!
//! ## Key Design Principles
//!
//! - **One pass, one tree**: nothing survives the top-level render call
//! - **Fail whole**: any error aborts the pass and no output is produced

pub mod config;
pub mod reconcile;

// Re-exports
pub use config::RenderConfig;
pub use reconcile::{render, render_to, render_to_string, RenderTree, Renderer};
