//! JSON-lines command protocol.
//!
//! ```text
//! {"cmd":"signal","region_id":"square-geofence","signal":"enter"}
//! {"cmd":"fix","latitude":23.15,"longitude":72.88}
//! {"cmd":"chain","event":{"event":"ZoneAlert","args":{...}}}
//! {"cmd":"sos"}
//! {"cmd":"status"}
//! {"cmd":"regions"}
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shared_types::{Coordinates, IdentityProvider, RegionId, DEFAULT_OUTLINE_SEGMENTS};
use ts_01_geofence_monitor::{GeofenceMonitorApi, GeofenceSignal, RegionStatus, Transition};
use ts_02_alert_sink::{AlertSinkApi, EmergencyApi, Notification, SinkError};
use ts_03_alert_feed::{ChainEvent, ChainEventSender};
use ts_04_location_tracking::{IngestResponse, LocationFix};

use crate::container::SubsystemContainer;

/// One input line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// OS geofence callback.
    Signal {
        region_id: String,
        signal: GeofenceSignal,
    },
    /// Position fix from the OS.
    Fix { latitude: f64, longitude: f64 },
    /// Decoded contract event for the alert feed.
    Chain { event: ChainEvent },
    /// Emergency SOS at the last known position.
    Sos,
    /// (Re)start geofence monitoring with the configured regions.
    Start,
    /// Stop geofence monitoring.
    Stop,
    TrackStart,
    TrackStop,
    /// Ask the backend for recent alerts.
    BackendAlerts {
        #[serde(default = "default_only_alerts")]
        only_alerts: bool,
    },
    Status,
    /// Configured regions with their boundary polygons for map drawing.
    Regions,
    Notifications,
    MarkRead,
    Clear,
    /// Prometheus text exposition.
    Metrics,
}

fn default_only_alerts() -> bool {
    true
}

/// Response to one command.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Ok,
    Signal {
        region_id: String,
        /// `None` when the region is not monitored.
        transition: Option<Transition>,
    },
    Fix {
        tracked: bool,
        sent: usize,
        failed: usize,
        alerts: Vec<IngestResponse>,
    },
    Sos {
        tx_hash: String,
    },
    Status {
        monitoring: bool,
        tracking: bool,
        authenticated: bool,
        unread: usize,
        regions: Vec<RegionStatus>,
    },
    Regions {
        regions: Vec<RegionOutline>,
    },
    Notifications {
        unread: usize,
        items: Vec<Notification>,
    },
    BackendAlerts {
        alerts: Vec<serde_json::Value>,
    },
    Metrics {
        text: String,
    },
    Error {
        /// Machine-readable error label.
        kind: String,
        message: String,
    },
}

/// A configured region and its closed boundary polygon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionOutline {
    pub region_id: RegionId,
    pub center: Coordinates,
    pub radius_m: f64,
    pub outline: Vec<Coordinates>,
}

impl Reply {
    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Applies commands to the subsystems.
pub struct CommandHandler {
    container: Arc<SubsystemContainer>,
    chain_events: ChainEventSender,
}

impl CommandHandler {
    pub fn new(container: Arc<SubsystemContainer>, chain_events: ChainEventSender) -> Self {
        Self {
            container,
            chain_events,
        }
    }

    /// Parse and handle one line. Malformed input yields an error reply.
    pub async fn handle_line(&self, line: &str) -> Reply {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => {
                warn!(error = %e, "Rejected malformed command");
                Reply::error("parse", e.to_string())
            }
        }
    }

    pub async fn handle(&self, command: Command) -> Reply {
        debug!(?command, "Handling command");
        let c = &self.container;
        match command {
            Command::Signal { region_id, signal } => {
                let outcome = c.monitor.on_raw_signal(&RegionId::new(region_id.as_str()), signal);
                Reply::Signal {
                    region_id,
                    transition: outcome.transition(),
                }
            }
            Command::Fix {
                latitude,
                longitude,
            } => self.on_fix(Coordinates::new(latitude, longitude)).await,
            Command::Chain { event } => match self.chain_events.send(event).await {
                Ok(()) => Reply::Ok,
                Err(_) => Reply::error("feed_closed", "alert feed is not running"),
            },
            Command::Sos => {
                let position = c.monitor.last_fix();
                match c.emergency.send_sos(position).await {
                    Ok(receipt) => Reply::Sos {
                        tx_hash: receipt.tx_hash,
                    },
                    Err(e) => Reply::error(sos_error_kind(&e), e.user_message()),
                }
            }
            Command::Start => match c.monitor.start(c.config.regions()).await {
                Ok(()) => Reply::Ok,
                Err(e) => Reply::error("monitor", e.to_string()),
            },
            Command::Stop => {
                if c.monitor.stop().await {
                    Reply::Ok
                } else {
                    Reply::error("monitor", "provider failed to stop monitoring")
                }
            }
            Command::TrackStart => match c.tracking.start_background_tracking().await {
                Ok(()) => Reply::Ok,
                Err(e) => Reply::error("tracking", e.to_string()),
            },
            Command::TrackStop => match c.tracking.stop_background_tracking().await {
                Ok(()) => Reply::Ok,
                Err(e) => Reply::error("tracking", e.to_string()),
            },
            Command::BackendAlerts { only_alerts } => Reply::BackendAlerts {
                alerts: c.tracking.fetch_alerts(only_alerts).await,
            },
            Command::Status => Reply::Status {
                monitoring: c.monitor.is_active(),
                tracking: c.tracking.is_tracking(),
                authenticated: c.identity.wallet_address().is_some(),
                unread: c.dispatcher.unread_count(),
                regions: c.monitor.region_status(),
            },
            Command::Regions => Reply::Regions {
                regions: c
                    .config
                    .regions()
                    .into_iter()
                    .map(|region| RegionOutline {
                        outline: region.outline(DEFAULT_OUTLINE_SEGMENTS),
                        region_id: region.id,
                        center: region.center,
                        radius_m: region.radius_m,
                    })
                    .collect(),
            },
            Command::Notifications => Reply::Notifications {
                unread: c.dispatcher.unread_count(),
                items: c.dispatcher.notifications(),
            },
            Command::MarkRead => {
                c.dispatcher.mark_all_read();
                Reply::Ok
            }
            Command::Clear => {
                c.dispatcher.clear();
                Reply::Ok
            }
            Command::Metrics => match safety_telemetry::encode_metrics() {
                Ok(text) => Reply::Metrics { text },
                Err(e) => Reply::error("metrics", e.to_string()),
            },
        }
    }

    /// Feed the monitor and, while tracking, post the fix to the backend.
    async fn on_fix(&self, coordinates: Coordinates) -> Reply {
        if let Err(e) = coordinates.validate() {
            return Reply::error("validation", e.to_string());
        }
        let c = &self.container;
        let fix: LocationFix = c.location.set_position(coordinates, Utc::now());
        c.monitor.on_position_fix(coordinates);

        if !c.tracking.is_tracking() {
            return Reply::Fix {
                tracked: false,
                sent: 0,
                failed: 0,
                alerts: Vec::new(),
            };
        }
        let report = c.tracking.process_fixes(&[fix]).await;
        Reply::Fix {
            tracked: true,
            sent: report.sent,
            failed: report.failed,
            alerts: report.alerts,
        }
    }
}

fn sos_error_kind(error: &SinkError) -> &'static str {
    match error {
        SinkError::LocationUnavailable => "location_unavailable",
        SinkError::Ledger(e) => e.category(),
    }
}
