//! In-memory resolver.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{ByteResolver, ResolveError};

/// Resolver over a URI → bytes map.
///
/// Useful for packages that were downloaded as a bundle, and for tests.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    assets: RwLock<HashMap<String, Bytes>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn insert(&self, uri: impl Into<String>, data: impl Into<Bytes>) {
        self.assets.write().insert(uri.into(), data.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(self, uri: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(uri, data);
        self
    }

    pub fn remove(&self, uri: &str) -> Option<Bytes> {
        self.assets.write().remove(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.assets.read().contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

impl<S: Into<String>, B: Into<Bytes>> FromIterator<(S, B)> for MemoryResolver {
    fn from_iter<I: IntoIterator<Item = (S, B)>>(iter: I) -> Self {
        let map = iter.into_iter().map(|(u, b)| (u.into(), b.into())).collect();
        Self { assets: RwLock::new(map) }
    }
}

#[async_trait]
impl ByteResolver for MemoryResolver {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError> {
        self.assets
            .read()
            .get(uri)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve() {
        let r = MemoryResolver::new().with("0.pf", vec![1u8, 2, 3]);
        assert_eq!(r.resolve("0.pf").await.unwrap().as_ref(), &[1, 2, 3]);
        assert!(matches!(r.resolve("1.pf").await, Err(ResolveError::NotFound(u)) if u == "1.pf"));
    }

    #[tokio::test]
    async fn test_replace_and_remove() {
        let r: MemoryResolver = [("a", Bytes::from_static(b"x"))].into_iter().collect();
        r.insert("a", Bytes::from_static(b"y"));
        assert_eq!(r.len(), 1);
        assert_eq!(r.resolve("a").await.unwrap(), Bytes::from_static(b"y"));
        assert!(r.remove("a").is_some());
        assert!(r.is_empty());
    }
}
