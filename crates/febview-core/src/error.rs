//! Error types for febview.

use thiserror::Error;

/// The main error type for febview operations.
///
/// Geometric queries (picking, hit-testing, plane cuts) never fail; they
/// resolve degenerate input to "no hit" or an empty result. Errors are
/// reserved for building and validating model data and settings.
#[derive(Error, Debug)]
pub enum FebviewError {
    /// An element was given the wrong number of nodes for its type.
    #[error("element of type {element_type} expects {expected} nodes, got {actual}")]
    NodeCountMismatch {
        element_type: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A node index referenced by an element, face or edge is out of range.
    #[error("node index {index} out of range (mesh has {count} nodes)")]
    NodeIndexOutOfRange { index: usize, count: usize },

    /// An element index referenced by a face is out of range.
    #[error("element index {index} out of range (mesh has {count} elements)")]
    ElementIndexOutOfRange { index: usize, count: usize },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An object with the given index was not found.
    #[error("object {0} not found")]
    ObjectNotFound(usize),

    /// A color map with the given name was not found.
    #[error("color map '{0}' not found")]
    ColorMapNotFound(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for febview operations.
pub type Result<T> = std::result::Result<T, FebviewError>;
