//! # UI Error Types
//!
//! Only invariant violations and configuration failures surface as errors.
//! Degenerate layout input, ring-buffer exhaustion and missing assets are
//! recovered locally and reported on the `tracing` channel instead.

use thiserror::Error;

use crate::element::ElementId;

/// Errors that can escape the UI core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// Attaching the child would make it its own ancestor.
    #[error("cycle detected: element {child} is an ancestor of {parent}")]
    CycleDetected {
        /// The element that was asked to adopt the child.
        parent: ElementId,
        /// The element being attached.
        child: ElementId,
    },

    /// An element was asked to adopt itself.
    #[error("element {0} cannot be its own child")]
    SelfParent(ElementId),

    /// The element is not a direct child of the given parent.
    #[error("element {child} is not a child of {parent}")]
    NotAChild {
        /// The supposed parent.
        parent: ElementId,
        /// The element that was not found.
        child: ElementId,
    },

    /// No factory is registered under this type name.
    #[error("unknown element type: {0:?}")]
    UnknownElementType(String),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {message}")]
    ConfigIo {
        /// File that was requested.
        path: String,
        /// Underlying I/O message.
        message: String,
    },
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
