//! Client configuration
//!
//! Gathers the backend location, retry policy and cache lifetime in one
//! struct so the session root can build every component from it.

use std::time::Duration;

use crate::api::FetchConfig;
use crate::cache::DEFAULT_TTL;

/// Base URL of the traffic analytics backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Settings for talking to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL; endpoint paths are appended to it
    pub base_url: String,
    /// Retry and timeout policy for every request
    pub fetch: FetchConfig,
    /// How long a successful response is served from cache
    pub cache_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch: FetchConfig::default(),
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at a different backend
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}
