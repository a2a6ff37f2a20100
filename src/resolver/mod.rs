//! Byte transport for package assets.
//!
//! The decoder never reads files or sockets itself. Asset URIs from the
//! manifest are handed to a [`ByteResolver`], which returns the stored
//! (possibly compressed) bytes.

mod local;
mod memory;
#[cfg(feature = "remote")]
mod remote;

pub use local::LocalResolver;
pub use memory::MemoryResolver;
#[cfg(feature = "remote")]
pub use remote::RemoteResolver;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Failure reported by a resolver.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("not found: {0}")]
    NotFound(String),

    /// URI rejected before any I/O
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

/// Capability that maps an asset URI to its bytes.
#[async_trait]
pub trait ByteResolver: Send + Sync {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError>;
}

#[async_trait]
impl<R: ByteResolver + ?Sized> ByteResolver for std::sync::Arc<R> {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError> {
        (**self).resolve(uri).await
    }
}
