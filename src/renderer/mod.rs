//! HTML renderer - the "blind" output layer.
//!
//! The renderer knows only about settled nodes. It doesn't run components,
//! hooks or effects. It simply takes a finished [`RenderTree`](crate::RenderTree)
//! and writes escaped markup into an [`OutputBuffer`].

pub mod html;
pub mod output;

// Re-exports for convenience
pub use html::HtmlSerializer;
pub use output::{escape, OutputBuffer};
