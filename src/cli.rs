//! Command-line interface parsing for the traffic dashboard
//!
//! This module handles parsing of CLI arguments using clap and turns the
//! global flags into a validated [`ClientConfig`].

use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use crate::api::{Endpoint, FetchConfig};
use crate::config::{ClientConfig, DEFAULT_BASE_URL};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified endpoint name is not recognized
    #[error("Invalid endpoint: '{0}'. Valid endpoints: {valid}", valid = valid_endpoint_names())]
    InvalidEndpoint(String),

    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// A duration or count flag was zero
    #[error("Invalid value for --{0}: must be greater than zero")]
    ZeroValue(&'static str),
}

fn valid_endpoint_names() -> String {
    Endpoint::ALL
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Traffic Dashboard - view traffic analytics from the detections backend
#[derive(Parser, Debug)]
#[command(name = "traffic-dash")]
#[command(about = "Traffic analytics dashboard for the detections backend")]
#[command(version)]
pub struct Cli {
    /// API base URL; endpoint paths are appended to it
    #[arg(long, env = "TRAFFIC_API_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Timeout for a single request attempt, in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Number of attempts per request, including the first
    #[arg(long, default_value_t = 3, global = true)]
    pub retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 2000, global = true)]
    pub retry_delay_ms: u64,

    /// How long responses are served from cache, in seconds
    #[arg(long, default_value_t = 300, global = true)]
    pub cache_ttl_secs: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once configured
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load every dashboard section and print a summary (default)
    Dashboard {
        /// Print the full view-model as JSON
        #[arg(long)]
        json: bool,
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Print the backend's data-structure snapshot
    Structures {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the raw JSON of one endpoint
    Endpoint {
        /// Endpoint name, e.g. volume-total or speed-by-lane
        name: String,
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Check every endpoint once and report backend health
    Probe,
    /// Reload the dashboard periodically until interrupted
    Watch {
        /// Seconds between reloads
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

/// Parses an endpoint name argument into an Endpoint.
///
/// # Returns
/// * `Ok(Endpoint)` if the name matches a known endpoint
/// * `Err(CliError::InvalidEndpoint)` otherwise
pub fn parse_endpoint_arg(s: &str) -> Result<Endpoint, CliError> {
    Endpoint::from_name(s).ok_or_else(|| CliError::InvalidEndpoint(s.to_string()))
}

impl Cli {
    /// The requested command, defaulting to the dashboard summary
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard {
            json: false,
            refresh: false,
        })
    }

    /// Builds the client configuration from the global flags.
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` with the requested settings
    /// * `Err(CliError)` if the base URL is not http(s) or a value is zero
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(CliError::ZeroValue("timeout-secs"));
        }
        if self.retries == 0 {
            return Err(CliError::ZeroValue("retries"));
        }
        if self.cache_ttl_secs == 0 {
            return Err(CliError::ZeroValue("cache-ttl-secs"));
        }
        if let Some(Command::Watch { interval_secs: 0 }) = self.command {
            return Err(CliError::ZeroValue("interval-secs"));
        }

        Ok(ClientConfig {
            base_url: base_url.to_string(),
            fetch: FetchConfig {
                max_attempts: self.retries,
                timeout: Duration::from_secs(self.timeout_secs),
                retry_delay: Duration::from_millis(self.retry_delay_ms),
            },
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        })
    }

    /// Log level selected by the -v flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
