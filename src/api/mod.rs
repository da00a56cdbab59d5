//! Backend access layer
//!
//! This module contains the retrying HTTP fetcher, the catalogue of backend
//! endpoints and the cached per-endpoint clients built on top of them.

mod client;
mod endpoint;
mod fetcher;

pub use client::{ApiClient, EndpointClient};
pub use endpoint::Endpoint;
pub use fetcher::{
    FetchConfig, FetchError, RetryingFetcher, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY,
    DEFAULT_TIMEOUT,
};
