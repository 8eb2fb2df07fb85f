//! Ordered pool of redundant RPC connections.
//!
//! # Responsibilities
//! - Parse the configured endpoint URLs
//! - Build one HTTP connection per endpoint, preserving configured order
//! - Hand out the endpoints read-only to every operation on the session

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::sync::Arc;
use url::Url;

use crate::blockchain::types::{ClientError, ClientResult};

/// A single RPC node: its locator and its connection.
#[derive(Clone)]
pub struct Endpoint {
    url: Url,
    provider: DynProvider,
}

impl Endpoint {
    /// Connect to an RPC node over HTTP.
    pub fn connect(url: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        Self { url, provider }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("url", &self.url.as_str()).finish()
    }
}

/// Immutable, ordered set of endpoints created once per session.
#[derive(Clone, Debug)]
pub struct ProviderPool {
    endpoints: Arc<[Endpoint]>,
}

impl ProviderPool {
    /// Build a pool from RPC URLs in configuration order.
    ///
    /// An empty list or any unparsable URL is a configuration error; no
    /// endpoint is silently dropped.
    pub fn connect<S: AsRef<str>>(urls: &[S]) -> ClientResult<Self> {
        if urls.is_empty() {
            return Err(ClientError::Configuration(
                "no RPC endpoints provided".to_string(),
            ));
        }

        let mut endpoints = Vec::with_capacity(urls.len());
        for raw in urls {
            let raw = raw.as_ref();
            let url: Url = raw.parse().map_err(|e| {
                ClientError::Configuration(format!("Invalid RPC URL '{}': {}", raw, e))
            })?;
            endpoints.push(Endpoint::connect(url));
        }

        tracing::debug!(endpoints = endpoints.len(), "Provider pool created");
        Ok(Self {
            endpoints: endpoints.into(),
        })
    }

    /// Endpoints in configured order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
