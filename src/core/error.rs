//! Error types for butterfly-extract
//!
//! Every error is fatal: the extraction is a deterministic batch transform and
//! nothing is retried. Policy outcomes (unknown road class, unknown sidewalk
//! value, a contraction blocked by mismatched flags) are not errors.

use thiserror::Error;

use crate::core::graph::NodeId;

/// Main error type for butterfly-extract operations
#[derive(Error, Debug)]
pub enum Error {
    /// The ingestion adapter could not read or decode a record
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// A road references a node whose coordinates were never resolved
    #[error("Missing node {0}: referenced by a road but never defined in the input")]
    MissingNode(NodeId),

    /// The input document is neither a road graph nor a supported GeoJSON layout
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for butterfly-extract operations
pub type Result<T> = std::result::Result<T, Error>;
