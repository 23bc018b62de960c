//! # Safety Runtime
//!
//! Owns the subsystem container, the chain-feed task and the shutdown
//! channel.
//!
//! ## Startup Sequence
//!
//! 1. Start geofence monitoring (permissions, region registration)
//! 2. Spawn the alert feed loops (command channel, contract logs if enabled)
//! 3. Start background tracking if configured
//!
//! ## Shutdown Sequence
//!
//! 1. Signal shutdown to spawned loops
//! 2. Stop geofence monitoring (cancels every periodic alert)
//! 3. Stop background tracking
//! 4. Wait for the feed loops, bounded

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use shared_bus::{EventFilter, Subscription};
use ts_01_geofence_monitor::GeofenceMonitorApi;
use ts_03_alert_feed::{
    event_channel, ChainEventSource, ChannelEventSource, JsonRpcLogSource,
};

use crate::container::{SafetyConfig, SubsystemContainer};
use crate::handlers::{Command, CommandHandler, Reply};

/// Capacity of the chain event channel.
const CHAIN_EVENT_CAPACITY: usize = 64;

/// Upper bound on waiting for spawned loops at shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct SafetyRuntime {
    container: Arc<SubsystemContainer>,
    commands: CommandHandler,
    feed_source: Mutex<Option<ChannelEventSource>>,
    feed_tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SafetyRuntime {
    pub fn new(container: SubsystemContainer) -> Self {
        let container = Arc::new(container);
        let (chain_tx, chain_rx) = event_channel(CHAIN_EVENT_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            commands: CommandHandler::new(Arc::clone(&container), chain_tx),
            container,
            feed_source: Mutex::new(Some(chain_rx)),
            feed_tasks: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Build the container with network adapters from `config`.
    pub fn from_config(config: SafetyConfig) -> Result<Self> {
        Ok(Self::new(SubsystemContainer::new(config)?))
    }

    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Tourist Safety Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let c = &self.container;
        c.monitor
            .start(c.config.regions())
            .await
            .context("Failed to start geofence monitoring")?;

        self.spawn_feed();

        if c.config.tracking.autostart {
            if let Err(e) = c.tracking.start_background_tracking().await {
                warn!(error = %e, "[ts-04] Background tracking not started");
            }
        }

        info!(
            regions = c.config.geofence.regions.len(),
            ledger = c.config.ledger.enabled,
            backend = %c.config.backend.url,
            "All subsystems running"
        );
        Ok(())
    }

    fn spawn_feed(&self) {
        let Some(commands) = self.feed_source.lock().take() else {
            warn!("[ts-03] Alert feed already started");
            return;
        };
        self.spawn_feed_loop("commands", commands);

        if let Some(config) = self.container.chain_logs.clone() {
            match JsonRpcLogSource::new(config) {
                Ok(logs) => self.spawn_feed_loop("contract logs", logs),
                Err(e) => warn!(error = %e, "[ts-03] Contract log source not started"),
            }
        }
    }

    fn spawn_feed_loop<S>(&self, name: &'static str, source: S)
    where
        S: ChainEventSource + 'static,
    {
        let feed = Arc::clone(&self.container.feed);
        let shutdown = self.shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            match feed.run(source, shutdown).await {
                Ok(handled) => info!(source = name, handled, "[ts-03] Alert feed stopped"),
                Err(e) => error!(source = name, error = %e, "[ts-03] Alert feed ended"),
            }
        });
        self.feed_tasks.lock().push(handle);
    }

    pub async fn handle(&self, command: Command) -> Reply {
        self.commands.handle(command).await
    }

    pub async fn handle_line(&self, line: &str) -> Reply {
        self.commands.handle_line(line).await
    }

    /// Alerts matching `filter` delivered from now on.
    pub fn subscribe_alerts(&self, filter: EventFilter) -> Subscription {
        self.container.bus.subscribe(filter)
    }

    /// Receiver that flips to `true` when shutdown begins.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }

    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        if !self.container.monitor.stop().await {
            warn!("[ts-01] Provider did not confirm stop");
        }
        if let Err(e) = self.container.tracking.stop_background_tracking().await {
            warn!(error = %e, "[ts-04] Failed to stop background tracking");
        }

        let feed_tasks: Vec<JoinHandle<()>> = self.feed_tasks.lock().drain(..).collect();
        for handle in feed_tasks {
            if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
                warn!("[ts-03] Alert feed did not stop in time");
            }
        }

        info!("Shutdown complete");
    }
}
