//! Cached endpoint access
//!
//! `ApiClient` ties the retrying fetcher to a shared response cache and a base
//! URL. `EndpointClient<T>` binds one endpoint to the type its body decodes to.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{Endpoint, FetchError, RetryingFetcher};
use crate::cache::ResponseCache;
use crate::config::ClientConfig;

/// Fetcher, cache and base URL shared by every endpoint
///
/// Cloning is cheap: the HTTP client and the cache are both reference counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    fetcher: RetryingFetcher,
    cache: Arc<ResponseCache>,
}

impl ApiClient {
    /// Build a client from configuration, using `cache` for every endpoint
    pub fn new(config: &ClientConfig, cache: Arc<ResponseCache>) -> Self {
        Self::with_fetcher(
            config.base_url.clone(),
            RetryingFetcher::new(config.fetch.clone()),
            cache,
        )
    }

    /// Build a client around an existing fetcher
    pub fn with_fetcher(
        base_url: impl Into<String>,
        fetcher: RetryingFetcher,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            fetcher,
            cache,
        }
    }

    /// Full URL of an endpoint
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetcher(&self) -> &RetryingFetcher {
        &self.fetcher
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Typed client for one endpoint
    pub fn endpoint<T>(&self, endpoint: Endpoint) -> EndpointClient<T> {
        EndpointClient {
            endpoint,
            api: self.clone(),
            _data: PhantomData,
        }
    }
}

/// Loads one endpoint, serving from cache while the entry is fresh
#[derive(Debug, Clone)]
pub struct EndpointClient<T> {
    endpoint: Endpoint,
    api: ApiClient,
    _data: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> EndpointClient<T> {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Load the endpoint's data
    ///
    /// Unless `force_refresh` is set, a fresh cache entry is returned without
    /// touching the network. Otherwise the body is fetched, decoded into `T`
    /// and, if it decodes, stored in the cache exactly as the backend sent it.
    /// Fetch failures are returned unchanged; a body that is valid JSON but
    /// does not fit `T` is a `FetchError::Parse`.
    pub async fn load(&self, force_refresh: bool) -> Result<T, FetchError> {
        let key = self.endpoint.cache_key();

        if !force_refresh {
            if let Some(cached) = self.api.cache.get(&key) {
                match serde_json::from_value::<T>(cached) {
                    Ok(data) => {
                        debug!(endpoint = %self.endpoint, "cache hit");
                        return Ok(data);
                    }
                    Err(e) => {
                        warn!(endpoint = %self.endpoint, error = %e, "discarding undecodable cache entry");
                    }
                }
            }
        }

        debug!(endpoint = %self.endpoint, force_refresh, "fetching from backend");
        let body: serde_json::Value = self.api.fetcher.fetch(&self.api.url_for(self.endpoint)).await?;
        let data: T = serde::Deserialize::deserialize(&body).map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "response does not match expected shape");
            FetchError::Parse(e.to_string())
        })?;

        self.api.cache.set(key, body);
        Ok(data)
    }
}
