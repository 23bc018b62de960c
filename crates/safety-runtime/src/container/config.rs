//! # Runtime Configuration
//!
//! One TOML file with a section per subsystem. Every key has a default, so an
//! absent file or an empty section is valid.
//!
//! ```toml
//! wallet_address = "0x..."
//!
//! [geofence]
//! alert_interval_secs = 60
//!
//! [[geofence.regions]]
//! id = "square-geofence"
//! latitude = 23.1535719
//! longitude = 72.8864717
//! radius_m = 1000.0
//!
//! [ledger]
//! enabled = true
//! rpc_url = "http://localhost:8545"
//! watch_events = true
//!
//! [notifications]
//! echo_categories = ["zone", "user"]
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use shared_types::{
    validate_regions, AlertCategory, Coordinates, GeofenceRegion, ValidationError, WalletAddress,
};
use ts_01_geofence_monitor::MonitorConfig;
use ts_02_alert_sink::{CoordinateEncoding, JsonRpcConfig};
use ts_03_alert_feed::LogPollConfig;
use ts_04_location_tracking::{BackendConfig, TrackingOptions};

/// Default config path when `TS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./safety.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Wallet identity of the tourist. Without it ledger writes are skipped.
    pub wallet_address: Option<String>,
    pub geofence: GeofenceSection,
    pub ledger: LedgerSection,
    pub backend: BackendSection,
    pub tracking: TrackingSection,
    pub notifications: NotificationSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeofenceSection {
    pub alert_interval_secs: u64,
    pub regions: Vec<RegionEntry>,
}

impl Default for GeofenceSection {
    fn default() -> Self {
        Self {
            alert_interval_secs: 60,
            regions: vec![RegionEntry {
                id: "square-geofence".to_string(),
                latitude: 23.1535719,
                longitude: 72.8864717,
                radius_m: 1000.0,
            }],
        }
    }
}

/// One `[[geofence.regions]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

impl From<&RegionEntry> for GeofenceRegion {
    fn from(entry: &RegionEntry) -> Self {
        GeofenceRegion::new(
            entry.id.as_str(),
            Coordinates::new(entry.latitude, entry.longitude),
            entry.radius_m,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub enabled: bool,
    pub rpc_url: String,
    pub contract_address: String,
    /// Multiplier applied to degrees before truncation.
    pub coordinate_scale: u32,
    pub request_timeout_ms: u64,
    pub receipt_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
    /// Poll the contract's alert events into the feed.
    pub watch_events: bool,
    pub event_poll_interval_ms: u64,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            enabled: false,
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: "0xa18fc87e627d90c470cb6c155f5da0964a1370f6".to_string(),
            coordinate_scale: 1,
            request_timeout_ms: 10_000,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 2000,
            watch_events: true,
            event_poll_interval_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub url: String,
    pub request_timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
            retry_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSection {
    /// Start background tracking together with the monitor.
    pub autostart: bool,
    pub time_interval_secs: u64,
    pub distance_interval_m: f64,
}

impl Default for TrackingSection {
    fn default() -> Self {
        Self {
            autostart: false,
            time_interval_secs: 600,
            distance_interval_m: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSection {
    pub capacity: usize,
    /// Alert categories echoed on stdout. Empty echoes every category.
    pub echo_categories: Vec<AlertCategory>,
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self {
            capacity: shared_types::DEFAULT_NOTIFICATION_CAPACITY,
            echo_categories: Vec::new(),
        }
    }
}

impl SafetyConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                info!(path = %path.display(), "Loaded configuration file");
                Self::from_toml_str(&raw)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from `TS_CONFIG` (or the default path), apply environment
    /// overrides and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("TS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `TS_*` overrides. `lookup` abstracts the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TS_RPC_URL") {
            self.ledger.rpc_url = url;
        }
        if let Some(address) = lookup("TS_CONTRACT_ADDRESS") {
            self.ledger.contract_address = address;
        }
        if let Some(url) = lookup("TS_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(address) = lookup("TS_WALLET_ADDRESS") {
            self.wallet_address = Some(address);
        }
        if let Some(flag) = lookup("TS_LEDGER_ENABLED") {
            match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.ledger.enabled = true,
                "0" | "false" | "no" => self.ledger.enabled = false,
                other => warn!(value = other, "TS_LEDGER_ENABLED must be true or false, ignoring"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geofence.alert_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "geofence.alert_interval_secs must be > 0".to_string(),
            ));
        }
        if self.notifications.capacity == 0 {
            return Err(ConfigError::Invalid(
                "notifications.capacity must be > 0".to_string(),
            ));
        }
        if self.ledger.watch_events && self.ledger.event_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "ledger.event_poll_interval_ms must be > 0".to_string(),
            ));
        }
        if self.tracking.time_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "tracking.time_interval_secs must be > 0".to_string(),
            ));
        }
        validate_regions(&self.regions())?;
        self.wallet()?;
        if self.ledger.enabled {
            self.contract_address()?;
        }
        Ok(())
    }

    pub fn regions(&self) -> Vec<GeofenceRegion> {
        self.geofence.regions.iter().map(GeofenceRegion::from).collect()
    }

    pub fn wallet(&self) -> Result<Option<WalletAddress>, ValidationError> {
        self.wallet_address
            .as_deref()
            .map(str::parse::<WalletAddress>)
            .transpose()
    }

    pub fn contract_address(&self) -> Result<WalletAddress, ValidationError> {
        self.ledger.contract_address.parse()
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            alert_interval: Duration::from_secs(self.geofence.alert_interval_secs),
            ..MonitorConfig::default()
        }
    }

    pub fn coordinate_encoding(&self) -> CoordinateEncoding {
        CoordinateEncoding::new(self.ledger.coordinate_scale)
    }

    /// JSON-RPC settings, or `None` when the ledger is disabled.
    pub fn json_rpc_config(&self) -> Result<Option<JsonRpcConfig>, ValidationError> {
        if !self.ledger.enabled {
            return Ok(None);
        }
        let mut rpc = JsonRpcConfig::new(self.ledger.rpc_url.clone(), self.contract_address()?);
        rpc.request_timeout = Duration::from_millis(self.ledger.request_timeout_ms);
        rpc.receipt_timeout = Duration::from_secs(self.ledger.receipt_timeout_secs);
        rpc.receipt_poll_interval = Duration::from_millis(self.ledger.receipt_poll_interval_ms);
        Ok(Some(rpc))
    }

    /// Contract log polling, or `None` when the ledger or event watching is off.
    pub fn chain_log_config(&self) -> Result<Option<LogPollConfig>, ValidationError> {
        if !self.ledger.enabled || !self.ledger.watch_events {
            return Ok(None);
        }
        let mut logs = LogPollConfig::new(self.ledger.rpc_url.clone(), self.contract_address()?);
        logs.request_timeout = Duration::from_millis(self.ledger.request_timeout_ms);
        logs.poll_interval = Duration::from_millis(self.ledger.event_poll_interval_ms);
        Ok(Some(logs))
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            url: self.backend.url.clone(),
            request_timeout: Duration::from_millis(self.backend.request_timeout_ms),
            retry_attempts: self.backend.retry_attempts,
            retry_backoff: Duration::from_millis(self.backend.retry_backoff_ms),
        }
    }

    pub fn tracking_options(&self) -> TrackingOptions {
        TrackingOptions {
            time_interval: Duration::from_secs(self.tracking.time_interval_secs),
            distance_interval_m: self.tracking.distance_interval_m,
            ..TrackingOptions::default()
        }
    }
}
