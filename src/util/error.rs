//! Error types for the SVF decoder.

use thiserror::Error;

use crate::resolver::ResolveError;

/// Main error type for package decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest header or asset table cannot be parsed
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// A required asset role is absent from the catalog
    #[error("Asset not found in manifest: {role}")]
    AssetNotFound { role: String },

    /// The resolver could not deliver the bytes for a URI
    #[error("Failed to resolve '{uri}': {source}")]
    Transport {
        uri: String,
        #[source]
        source: ResolveError,
    },

    /// Version of a header or record is outside the supported range
    #[error("Unsupported {what} version: {version}")]
    UnsupportedVersion { what: &'static str, version: i64 },

    /// Declared sizes exceed the buffer
    #[error("Truncated {what}: need {needed} bytes at offset {offset}, buffer has {len}")]
    TruncatedBuffer {
        what: &'static str,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// Record content is structurally invalid
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Property database buffers fail their schema or cross-buffer checks
    #[error("Invalid property database: {0}")]
    InvalidPropertyDatabase(String),

    /// Object id outside [1, count]
    #[error("Object {id} not found (count: {count})")]
    ObjectNotFound { id: u32, count: u32 },

    /// Attribute index out of bounds
    #[error("Attribute index {index} out of bounds (count: {count})")]
    AttributeNotFound { index: usize, count: usize },

    /// Inflating a compressed asset failed
    #[error("Decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    /// A configured decode limit was hit
    #[error("{what} exceeds limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    /// JSON asset could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed manifest error.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::MalformedManifest(msg.into())
    }

    /// Create an invalid record error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create an invalid property database error.
    pub fn propdb(msg: impl Into<String>) -> Self {
        Self::InvalidPropertyDatabase(msg.into())
    }

    /// Create an asset-not-found error for a role.
    pub fn missing(role: impl Into<String>) -> Self {
        Self::AssetNotFound { role: role.into() }
    }

    /// Whether the caller can reasonably continue with other operations.
    ///
    /// Structural errors are fatal for the decode call that raised them;
    /// lookups and transport failures are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. }
                | Self::Transport { .. }
                | Self::ObjectNotFound { .. }
                | Self::AttributeNotFound { .. }
        )
    }
}

/// Result type alias for SVF operations.
pub type Result<T> = std::result::Result<T, Error>;
