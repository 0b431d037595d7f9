//! Render configuration.

/// Settings for one [`Renderer`](super::Renderer).
///
/// ```ignore
/// let renderer = Renderer::with_config(RenderConfig::new().rerender_limit(Some(1_000)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderConfig {
    rerender_limit: Option<usize>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of queued re-renders processed in one pass.
    ///
    /// `None` (the default) drains the queue until it is empty, however long
    /// that takes. With `Some(n)`, the render fails with
    /// [`RerenderLimitExceeded`](crate::RenderError::RerenderLimitExceeded)
    /// once more than `n` re-renders have been processed.
    pub fn rerender_limit(mut self, limit: Option<usize>) -> Self {
        self.rerender_limit = limit;
        self
    }

    pub fn max_rerenders(&self) -> Option<usize> {
        self.rerender_limit
    }
}
