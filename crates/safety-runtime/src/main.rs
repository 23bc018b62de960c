//! # Tourist Safety Runtime
//!
//! Reads one JSON command per line from stdin and writes one JSON reply per
//! line to stdout. Alerts are echoed as `{"reply":"alert",...}` lines as they
//! are delivered.
//!
//! ## Environment
//!
//! - `TS_CONFIG`: config file path (default `./safety.toml`)
//! - `TS_RPC_URL`, `TS_CONTRACT_ADDRESS`, `TS_LEDGER_ENABLED`: ledger overrides
//! - `TS_BACKEND_URL`: tracking backend override
//! - `TS_WALLET_ADDRESS`: tourist wallet identity
//! - `TS_LOG_LEVEL`, `TS_JSON_LOGS`, `RUST_LOG`: logging

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use safety_runtime::{SafetyConfig, SafetyRuntime};
use safety_telemetry::{init_telemetry, TelemetryConfig};
use shared_bus::EventFilter;

fn emit(line: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(line).context("Failed to encode reply")?);
    Ok(())
}

/// Echo delivered alerts of the configured categories until shutdown.
fn spawn_alert_printer(runtime: &SafetyRuntime) {
    let categories = runtime.container().config.notifications.echo_categories.clone();
    let mut alerts = runtime.subscribe_alerts(EventFilter::categories(categories));
    let mut shutdown = runtime.shutdown_signal();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                alert = alerts.recv() => match alert {
                    Some(alert) => {
                        let line = serde_json::json!({ "reply": "alert", "alert": alert });
                        if let Err(e) = emit(&line) {
                            tracing::warn!(error = %e, "Failed to print alert");
                        }
                    }
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::for_component("runtime"))
        .context("Failed to initialize telemetry")?;

    let config = SafetyConfig::load().context("Failed to load configuration")?;

    let runtime = SafetyRuntime::from_config(config)?;
    runtime.start().await?;
    spawn_alert_printer(&runtime);

    info!("Runtime is running. Send JSON commands on stdin, Ctrl+C to stop.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => emit(&runtime.handle_line(&line).await)?,
                    None => {
                        info!("Input closed; waiting for Ctrl+C");
                        stdin_open = false;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}
