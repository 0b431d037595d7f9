//! Render errors.
//!
//! Every error is fatal to the render that raised it. Nothing inside the
//! crate catches a [`RenderError`]: it travels up through `?` and aborts the
//! whole top-level render, so callers never see partially produced output.

/// Result alias used throughout the crate.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// Everything that can abort a render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A description does not match any known node kind.
    #[error("unsupported element: {0}")]
    Classification(String),

    /// A fragment, provider or raw-markup element carries disallowed props,
    /// or raw markup does not carry exactly one child.
    #[error("{0}")]
    StructuralViolation(String),

    /// Hooks were called in a different order or count than on the previous
    /// invocation of the same component.
    #[error("hooks must be called in the exact same order on every render ({0})")]
    OrderingViolation(String),

    /// No ancestor provider publishes the requested key.
    #[error("context `{0}` has not been provided")]
    ContextNotFound(String),

    /// A hook was called with no component invocation active.
    #[error("cannot call hooks outside of component render")]
    InvocationContext,

    /// An element was constructed with conflicting arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A tag name contains characters that cannot appear in HTML.
    #[error("`{0}` is not a valid HTML tag name")]
    InvalidTagName(String),

    /// An attribute name contains characters that cannot appear in HTML.
    #[error("`{0}` is not a valid attribute name")]
    InvalidAttributeName(String),

    /// A void element (`<img>`, `<br>`, ...) was given children.
    #[error("<{0}> is a void element, and cannot have children")]
    VoidElementChildren(String),

    /// The rerender queue did not settle within the configured bound.
    #[error("rerender queue did not settle after {0} passes")]
    RerenderLimitExceeded(usize),

    /// A component body reported its own failure.
    #[error("component failed: {0}")]
    Component(String),

    /// Finished markup could not be written to the caller's writer.
    #[error("failed to write output: {0}")]
    Io(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl RenderError {
    /// Build a [`RenderError::Component`] from any displayable message.
    ///
    /// Component bodies use this to bail out of a render:
    ///
    /// ```ignore
    /// let Some(title) = props.get("title") else {
    ///     return Err(RenderError::component("missing `title` prop"));
    /// };
    /// ```
    pub fn component(message: impl std::fmt::Display) -> Self {
        Self::Component(message.to_string())
    }

    /// Whether this error came from hook misuse (ordering or context).
    pub fn is_hook_error(&self) -> bool {
        matches!(self, Self::OrderingViolation(_) | Self::InvocationContext)
    }
}
