//! Alert wording for geofence transitions.

use serde::{Deserialize, Serialize};
use shared_types::{AlertCategory, AlertEvent, Coordinates, RegionId};

/// What caused a geofence alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertTrigger {
    Enter,
    Periodic,
    Exit,
}

impl AlertTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Periodic => "periodic",
            Self::Exit => "exit",
        }
    }
}

/// Titles and messages for local alerts and remote ledger entries.
///
/// Enter and periodic reminders share the same wording.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertTemplates {
    pub entry_title: String,
    pub entry_message: String,
    pub entry_remote: String,
    pub exit_title: String,
    pub exit_message: String,
    pub exit_remote: String,
}

impl Default for AlertTemplates {
    fn default() -> Self {
        Self {
            entry_title: "Restricted Area".to_string(),
            entry_message: "You are in the Restricted Area. Do not enter!".to_string(),
            entry_remote: "User entered restricted geofence area".to_string(),
            exit_title: "Exit Restricted Area".to_string(),
            exit_message: "You have exited the restricted area.".to_string(),
            exit_remote: "User exited restricted geofence area".to_string(),
        }
    }
}

impl AlertTemplates {
    /// Build the local alert for a trigger.
    pub fn local_alert(
        &self,
        trigger: AlertTrigger,
        region_id: &RegionId,
        last_fix: Option<Coordinates>,
    ) -> AlertEvent {
        let (title, message) = match trigger {
            AlertTrigger::Enter | AlertTrigger::Periodic => (&self.entry_title, &self.entry_message),
            AlertTrigger::Exit => (&self.exit_title, &self.exit_message),
        };

        let mut alert = AlertEvent::new(AlertCategory::Geofence, title.as_str(), message.as_str())
            .with_meta("region_id", region_id.as_str())
            .with_meta("trigger", trigger.as_str());
        if let Some(fix) = last_fix {
            alert = alert
                .with_meta("latitude", fix.latitude)
                .with_meta("longitude", fix.longitude);
        }
        alert
    }

    /// Message recorded on the ledger for a trigger.
    pub fn remote_message(&self, trigger: AlertTrigger) -> &str {
        match trigger {
            AlertTrigger::Enter | AlertTrigger::Periodic => &self.entry_remote,
            AlertTrigger::Exit => &self.exit_remote,
        }
    }
}
