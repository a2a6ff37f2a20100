//! HTTP resolver.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{ByteResolver, ResolveError};

/// Resolver fetching assets relative to a base URL.
#[derive(Clone, Debug)]
pub struct RemoteResolver {
    client: Client,
    base_url: String,
}

impl RemoteResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client (headers, timeouts, proxies).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    pub fn url_for(&self, uri: &str) -> Result<String, ResolveError> {
        if uri.contains("://") || uri.starts_with('/') {
            return Err(ResolveError::Forbidden(uri.to_string()));
        }
        if uri.split('/').any(|seg| seg == "..") {
            return Err(ResolveError::Forbidden(uri.to_string()));
        }
        Ok(format!("{}{}", self.base_url, uri))
    }
}

#[async_trait]
impl ByteResolver for RemoteResolver {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError> {
        let url = self.url_for(uri)?;
        debug!(%url, "fetching asset");
        let response = self.client.get(&url).send().await.map_err(http_error)?;

        match response.status() {
            s if s.is_success() => response.bytes().await.map_err(http_error),
            StatusCode::NOT_FOUND => Err(ResolveError::NotFound(uri.to_string())),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Err(ResolveError::Forbidden(uri.to_string())),
            s => Err(ResolveError::Http {
                status: s.as_u16(),
                message: s.canonical_reason().unwrap_or("request failed").to_string(),
            }),
        }
    }
}

fn http_error(e: reqwest::Error) -> ResolveError {
    ResolveError::Http {
        status: e.status().map(|s| s.as_u16()).unwrap_or(0),
        message: e.to_string(),
    }
}
