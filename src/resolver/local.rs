//! Filesystem resolver.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use super::{ByteResolver, ResolveError};

/// Resolver reading assets relative to a root directory.
///
/// URIs come from untrusted manifests: absolute paths and `..` components
/// are rejected with [`ResolveError::Forbidden`].
#[derive(Clone, Debug)]
pub struct LocalResolver {
    root: PathBuf,
}

impl LocalResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URI to a path under the root.
    pub fn path_for(&self, uri: &str) -> Result<PathBuf, ResolveError> {
        // Manifests use forward slashes; a query or fragment is never part of the file name.
        let clean = uri.split(['?', '#']).next().unwrap_or_default();
        if clean.is_empty() {
            return Err(ResolveError::Forbidden(uri.to_string()));
        }
        let rel = Path::new(clean);
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(ResolveError::Forbidden(uri.to_string())),
            }
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ByteResolver for LocalResolver {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError> {
        let path = self.path_for(uri)?;
        trace!(uri, path = %path.display(), "reading asset");
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ResolveError::NotFound(uri.to_string())),
            Err(e) => Err(ResolveError::Io(e)),
        }
    }
}
