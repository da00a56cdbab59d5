//! Traffic Dashboard Library
//!
//! Cached, retrying, fan-out access to the traffic analytics backend. The
//! CLI binary and the integration tests both build on these modules.

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod probe;
pub mod refresh;

pub use api::{ApiClient, Endpoint, EndpointClient, FetchConfig, FetchError, RetryingFetcher};
pub use cache::{ResponseCache, TimedCache};
pub use config::ClientConfig;
pub use dashboard::DashboardLoader;
pub use data::DashboardData;
