//! Traffic Dashboard CLI - view traffic analytics from the detections backend
//!
//! Loads volume, lane, hourly, speed and vehicle-type data from the backend
//! and prints it as a summary or as JSON.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use traffic_dash::app::App;
use traffic_dash::cli::{parse_endpoint_arg, Cli, Command};
use traffic_dash::probe::{probe_endpoints, DEFAULT_PROBE_PAUSE};
use traffic_dash::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use traffic_dash::Endpoint;

/// Installs the log subscriber; `RUST_LOG` overrides the -v level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("traffic_dash={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let config = match cli.client_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };

    let mut app = App::new(&config);

    match cli.command() {
        Command::Dashboard { json, refresh } => {
            if refresh {
                app.retry().await;
            } else {
                app.load().await;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&app.dashboard)?);
            } else {
                print!("{}", app.render_summary());
            }
        }
        Command::Structures { json } => {
            let structures = app.loader().load_structures(false).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&structures)?);
            } else {
                println!("Array: {} items", structures.array_data.len());
                println!("Stack: {} items", structures.stack_data.len());
                println!("Queue: {} items", structures.queue_data.len());
                println!("Tree:  {} top-level children", structures.tree_data.children.len());
            }
        }
        Command::Endpoint { name, refresh } => {
            let endpoint = match parse_endpoint_arg(&name) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(ExitCode::from(2));
                }
            };

            match app.loader().raw(endpoint, refresh).await {
                Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
                Err(e) => {
                    error!(%endpoint, error = %e, "endpoint request failed");
                    eprintln!("error: {endpoint}: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Probe => {
            let report = probe_endpoints(app.loader().api(), &Endpoint::PROBED, DEFAULT_PROBE_PAUSE).await;

            for result in &report.results {
                let outcome = match (&result.status, &result.error) {
                    (Some(status), _) if result.success => format!("{status} OK"),
                    (Some(status), _) => format!(
                        "{status} {}",
                        result.status_text.as_deref().unwrap_or_default()
                    ),
                    (None, Some(error)) => error.clone(),
                    (None, None) => "no response".to_string(),
                };
                let data = if result.has_data { "data" } else { "empty" };
                println!(
                    "{:<18} {:<40} {:>6}ms  {}",
                    result.endpoint.name(),
                    outcome,
                    result.response_time.as_millis(),
                    if result.success { data } else { "-" }
                );
                if let Some(preview) = &result.preview {
                    println!("{:<18} {preview}", "");
                }
            }
            println!(
                "\nOverall: {} ({}/{} endpoints OK)",
                report.overall_status().label(),
                report.successes(),
                report.results.len()
            );
        }
        Command::Watch { interval_secs } => {
            app.load().await;
            print!("{}", app.render_summary());

            let mut handle = RefreshHandle::spawn(
                app.loader().clone(),
                RefreshConfig {
                    interval: Duration::from_secs(interval_secs),
                    enabled: true,
                },
            );

            loop {
                tokio::select! {
                    message = handle.receiver.recv() => match message {
                        Some(RefreshMessage::DashboardUpdated(data)) => {
                            app.apply(*data);
                            println!("\n----");
                            print!("{}", app.render_summary());
                        }
                        Some(_) => {}
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            handle.shutdown().await;
        }
    }

    Ok(ExitCode::SUCCESS)
}
