//! Background dashboard refresh
//!
//! Periodically reloads the dashboard in the background, bypassing the cache,
//! and sends each result to the foreground over a tokio channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dashboard::DashboardLoader;
use crate::data::DashboardData;

/// Messages sent from the background refresh to the foreground
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// Refresh started
    RefreshStarted,
    /// A freshly loaded dashboard
    DashboardUpdated(Box<DashboardData>),
    /// Refresh completed
    RefreshCompleted,
}

/// Configuration for the refresh interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between two background reloads
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Requests an out-of-schedule refresh
    trigger_tx: mpsc::Sender<()>,
    /// Signals shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates a RefreshHandle and spawns the background refresh task
    ///
    /// The first reload happens one interval after spawning. Every reload is a
    /// forced refresh, so the cache is bypassed and then repopulated.
    pub fn spawn(loader: DashboardLoader, config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {}
                        Some(()) = trigger_rx.recv() => {
                            debug!("manual refresh requested");
                            interval.reset();
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }

                    if msg_tx.send(RefreshMessage::RefreshStarted).await.is_err() {
                        break;
                    }

                    let data = loader.load_all(true).await;
                    info!(has_data = data.has_data(), "dashboard refreshed");

                    if msg_tx
                        .send(RefreshMessage::DashboardUpdated(Box::new(data)))
                        .await
                        .is_err()
                    {
                        break;
                    }
                    let _ = msg_tx.send(RefreshMessage::RefreshCompleted).await;
                }

                debug!("refresh task stopped");
            });
        }

        Self {
            receiver: msg_rx,
            trigger_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh
    ///
    /// Does nothing if a requested refresh is already pending or the task is
    /// not running.
    pub fn request_refresh(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Checks for a pending refresh message without blocking
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
