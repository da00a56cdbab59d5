//! Application state for a dashboard session
//!
//! Owns the loader and the most recent view-model, and tracks whether the
//! backend returned anything worth showing.

use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::warn;

use crate::api::ApiClient;
use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::dashboard::DashboardLoader;
use crate::data::DashboardData;

/// Application state enum representing what the dashboard can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Nothing loaded yet
    Loading,
    /// At least one headline section has data
    Ready,
    /// The last reload came back empty
    NoData,
}

/// Dashboard session: one cache, one loader, the latest data
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Most recent dashboard that had data
    pub dashboard: DashboardData,
    /// When `dashboard` was loaded
    pub last_refresh: Option<DateTime<Local>>,
    /// Empty reloads since the last one with data
    pub connection_attempts: u32,
    loader: DashboardLoader,
}

impl App {
    /// Creates a session with a fresh cache for the given backend settings
    pub fn new(config: &ClientConfig) -> Self {
        let cache = Arc::new(ResponseCache::with_ttl(config.cache_ttl));
        let api = ApiClient::new(config, cache);
        Self::with_loader(DashboardLoader::new(api))
    }

    /// Creates a session around an existing loader
    pub fn with_loader(loader: DashboardLoader) -> Self {
        Self {
            state: AppState::Loading,
            dashboard: DashboardData::default(),
            last_refresh: None,
            connection_attempts: 0,
            loader,
        }
    }

    pub fn loader(&self) -> &DashboardLoader {
        &self.loader
    }

    /// Loads the dashboard, serving fresh cache entries where possible
    pub async fn load(&mut self) {
        let data = self.loader.load_all(false).await;
        self.apply(data);
    }

    /// Reloads the dashboard bypassing the cache (manual retry)
    pub async fn retry(&mut self) {
        let data = self.loader.load_all(true).await;
        self.apply(data);
    }

    /// Takes the result of a reload
    ///
    /// A dashboard with data replaces the current one. An empty one only
    /// switches to `NoData` and counts the attempt; the last good dashboard
    /// and its refresh time are kept.
    pub fn apply(&mut self, data: DashboardData) {
        if data.has_data() {
            self.state = AppState::Ready;
            self.dashboard = data;
            self.last_refresh = Some(Local::now());
            self.connection_attempts = 0;
        } else {
            self.state = AppState::NoData;
            self.connection_attempts += 1;
            warn!(
                attempts = self.connection_attempts,
                "reload returned no data, keeping previous dashboard"
            );
        }
    }

    /// Plain-text summary of the current dashboard
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let data = &self.dashboard;

        match self.state {
            AppState::Loading => {
                out.push_str("Loading traffic data...\n");
                return out;
            }
            AppState::NoData => {
                let _ = writeln!(out, "No data available");
                let _ = writeln!(
                    out,
                    "The backend did not return any data to show (attempt {}).",
                    self.connection_attempts
                );
                let _ = writeln!(
                    out,
                    "Check the connection to {} and retry with --refresh.",
                    self.loader.api().base_url()
                );
                if !data.has_data() {
                    return out;
                }
                let _ = writeln!(out, "\nShowing the last data received.");
            }
            AppState::Ready => {}
        }

        if let Some(at) = self.last_refresh {
            let _ = writeln!(out, "Last refresh: {}", at.format("%Y-%m-%d %H:%M:%S"));
        }

        if !data.total_volume.total.is_empty() {
            let _ = writeln!(
                out,
                "\nTotal volume: {} vehicles",
                data.total_volume.total_vehicles()
            );
            for (vehicle, count) in &data.total_volume.total {
                let _ = writeln!(out, "  {vehicle:<12} {count:>8}");
            }
        }

        if !data.volume_by_lane.is_empty() {
            let _ = writeln!(out, "\nVolume by lane:");
            for (lane, counts) in &data.volume_by_lane {
                let lane_total: u64 = counts.values().sum();
                let _ = writeln!(out, "  {lane:<12} {lane_total:>8}");
            }
        }

        if let Some((hour, count)) = data.hourly_patterns.iter().max_by_key(|(_, c)| **c) {
            let _ = writeln!(out, "\nPeak hour: {hour} ({count} vehicles)");
        }

        if !data.avg_speed_by_lane.is_empty() {
            let _ = writeln!(out, "\nAverage speed by lane:");
            for (lane, speed) in &data.avg_speed_by_lane {
                let _ = writeln!(out, "  {lane:<12} {speed:>8.2} km/h");
            }
        }

        if !data.bottlenecks.is_empty() {
            let _ = writeln!(out, "\nBottlenecks:");
            for item in &data.bottlenecks {
                let _ = writeln!(
                    out,
                    "  {:<12} {:>8.2} km/h, {} vehicles",
                    item.lane, item.avg_speed, item.total_vehicles
                );
            }
        }

        if !data.vehicle_type_dominance.is_empty() {
            let _ = writeln!(out, "\nVehicle type share:");
            for (vehicle, share) in &data.vehicle_type_dominance {
                let _ = writeln!(out, "  {vehicle:<12} {share:>7.2}%");
            }
        }

        out
    }
}
