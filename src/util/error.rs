//! Error types for the lightmap baker.

use thiserror::Error;

/// Main error type for baking operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Bake settings are inconsistent (resolution, mip chain, offsets)
    #[error("Invalid bake settings: {0}")]
    InvalidSettings(String),

    /// A subset index points past the end of the vertex array
    #[error("Subset {subset}: vertex index {index} out of bounds (count: {count})")]
    IndexOutOfBounds { subset: usize, index: u32, count: usize },

    /// A per-vertex attribute array does not match the position count
    #[error("Attribute '{attribute}' has {actual} elements, expected {expected}")]
    AttributeMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Scene description cannot be turned into bakeable geometry
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (settings or scene) parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid settings error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    /// Create an invalid scene error.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }
}

/// Result type alias for baking operations.
pub type Result<T> = std::result::Result<T, Error>;
