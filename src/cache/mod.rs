//! Cache module for holding backend responses in memory
//!
//! This module provides a time-based cache that keeps API responses for the
//! lifetime of the session. Entries expire after a configurable TTL and are
//! evicted lazily when read.

mod timed;

pub use timed::{TimedCache, DEFAULT_TTL};

/// Cache shared by every endpoint client, holding raw JSON response bodies
pub type ResponseCache = TimedCache<serde_json::Value>;
