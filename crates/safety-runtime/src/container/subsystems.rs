//! # Subsystem Container
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: alert bus, identity, ledger client, backend client, contract log settings
//! Level 1: ts-02 alert dispatcher + emergency alerter
//! Level 2: ts-01 geofence monitor, ts-03 alert feed (both deliver via ts-02)
//! Level 3: ts-04 location tracking
//! ```
//!
//! All subsystems are held in `Arc` and internally synchronized.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use shared_bus::AlertBus;
use shared_types::{IdentityProvider, StaticIdentity};
use ts_01_geofence_monitor::GeofenceMonitor;
use ts_02_alert_sink::{AlertDispatcher, EmergencyAlerter, JsonRpcLedgerClient, LedgerClient};
use ts_03_alert_feed::{AlertFeed, LogPollConfig};
use ts_04_location_tracking::{HttpIngestClient, IngestClient, TrackingService};

use crate::adapters::{FeedForwarder, MonitorAlertSink, SimulatedLocation};
use crate::container::config::SafetyConfig;

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: SafetyConfig,

    // =========================================================================
    // SHARED INFRASTRUCTURE
    // =========================================================================
    pub bus: Arc<AlertBus>,
    pub identity: Arc<StaticIdentity>,
    /// OS location stand-in shared by ts-01 and ts-04.
    pub location: Arc<SimulatedLocation>,
    /// Contract log polling for the alert feed. `None` leaves the feed to
    /// `chain` commands only.
    pub chain_logs: Option<LogPollConfig>,

    // =========================================================================
    // SUBSYSTEMS
    // =========================================================================
    /// Alert Sink (ts-02)
    pub dispatcher: Arc<AlertDispatcher>,
    /// SOS (ts-02)
    pub emergency: Arc<EmergencyAlerter>,
    /// Geofence Monitor (ts-01)
    pub monitor: Arc<GeofenceMonitor>,
    /// Alert Feed (ts-03)
    pub feed: Arc<AlertFeed>,
    /// Location Tracking (ts-04)
    pub tracking: Arc<TrackingService>,
}

impl SubsystemContainer {
    /// Build with the network adapters the configuration describes.
    pub fn new(config: SafetyConfig) -> Result<Self> {
        let ledger = match config
            .json_rpc_config()
            .context("Invalid ledger configuration")?
        {
            Some(rpc) => {
                info!(rpc_url = %rpc.rpc_url, contract = %rpc.contract_address, "Ledger writes enabled");
                let client = JsonRpcLedgerClient::new(rpc).context("Failed to create ledger client")?;
                Some(Arc::new(client) as Arc<dyn LedgerClient>)
            }
            None => {
                warn!("Ledger disabled; alerts are stored locally only");
                None
            }
        };
        let chain_logs = config
            .chain_log_config()
            .context("Invalid ledger configuration")?;
        let backend = HttpIngestClient::new(config.backend_config())
            .context("Failed to create backend client")?;

        let mut container = Self::with_adapters(config, ledger, Arc::new(backend))?;
        container.chain_logs = chain_logs;
        Ok(container)
    }

    /// Build with caller-supplied ledger and backend clients. Contract log
    /// polling stays off.
    pub fn with_adapters(
        config: SafetyConfig,
        ledger: Option<Arc<dyn LedgerClient>>,
        backend: Arc<dyn IngestClient>,
    ) -> Result<Self> {
        info!("Initializing subsystems");

        // Level 0
        let bus = Arc::new(AlertBus::new());
        let identity = Arc::new(match config.wallet().context("Invalid wallet address")? {
            Some(address) => StaticIdentity::new(address),
            None => {
                warn!("No wallet address configured; ledger writes will be skipped");
                StaticIdentity::anonymous()
            }
        });
        let identity_port: Arc<dyn IdentityProvider> = identity.clone();
        let location = Arc::new(SimulatedLocation::new());
        let encoding = config.coordinate_encoding();

        // Level 1
        let dispatcher = Arc::new(AlertDispatcher::new(
            config.notifications.capacity,
            bus.clone(),
            ledger.clone(),
            identity_port.clone(),
            encoding,
        ));
        let emergency = Arc::new(EmergencyAlerter::new(ledger, identity_port.clone(), encoding));

        // Level 2
        let monitor = Arc::new(GeofenceMonitor::new(
            config.monitor_config(),
            location.clone(),
            Arc::new(MonitorAlertSink::new(dispatcher.clone())),
        ));
        let feed = Arc::new(AlertFeed::new(Arc::new(FeedForwarder::new(dispatcher.clone()))));

        // Level 3
        let tracking = Arc::new(TrackingService::new(
            location.clone(),
            backend,
            identity_port,
            config.tracking_options(),
        ));

        info!(
            regions = config.geofence.regions.len(),
            alert_interval_secs = config.geofence.alert_interval_secs,
            "Subsystems initialized"
        );

        Ok(Self {
            config,
            bus,
            identity,
            location,
            chain_logs: None,
            dispatcher,
            emergency,
            monitor,
            feed,
            tracking,
        })
    }
}
