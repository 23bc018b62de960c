//! Per-region monitor state.
//!
//! Holds the membership flag together with the periodic reminder so both
//! change in one place: a timer exists exactly when the device is inside.

use chrono::{DateTime, Utc};
use shared_types::GeofenceRegion;

use super::periodic::PeriodicTask;
use super::transition::{GeofenceSignal, Transition};

/// Monotonic id of a periodic timer within one region.
///
/// A tick carries the epoch it was started with and is dropped when the
/// region has since moved on to a newer epoch.
pub type TimerEpoch = u64;

/// Membership and timer state for one monitored region.
#[derive(Debug)]
pub struct MonitorState {
    region: GeofenceRegion,
    inside_region: bool,
    last_transition_at: Option<DateTime<Utc>>,
    periodic_alert: Option<PeriodicTask>,
    epoch: TimerEpoch,
}

impl MonitorState {
    pub fn new(region: GeofenceRegion) -> Self {
        Self {
            region,
            inside_region: false,
            last_transition_at: None,
            periodic_alert: None,
            epoch: 0,
        }
    }

    /// Apply a raw signal.
    ///
    /// On `Entered` a new timer is created through `start_timer` with a fresh
    /// epoch. On `Exited` the running timer is dropped, which aborts it.
    /// Duplicates leave the state untouched.
    pub fn apply<F>(&mut self, signal: GeofenceSignal, now: DateTime<Utc>, start_timer: F) -> Transition
    where
        F: FnOnce(TimerEpoch) -> PeriodicTask,
    {
        let transition = Transition::next(self.inside_region, signal);
        match transition {
            Transition::Entered => {
                self.epoch += 1;
                self.periodic_alert = Some(start_timer(self.epoch));
                self.inside_region = true;
                self.last_transition_at = Some(now);
            }
            Transition::Exited => {
                self.periodic_alert = None;
                self.inside_region = false;
                self.last_transition_at = Some(now);
            }
            Transition::DuplicateEnter | Transition::DuplicateExit => {}
        }
        transition
    }

    /// Whether a tick started at `epoch` may still emit.
    pub fn accepts_tick(&self, epoch: TimerEpoch) -> bool {
        self.inside_region && self.periodic_alert.is_some() && self.epoch == epoch
    }

    pub fn region(&self) -> &GeofenceRegion {
        &self.region
    }

    pub fn is_inside(&self) -> bool {
        self.inside_region
    }

    pub fn has_periodic_alert(&self) -> bool {
        self.periodic_alert.is_some()
    }

    pub fn last_transition_at(&self) -> Option<DateTime<Utc>> {
        self.last_transition_at
    }

    pub fn epoch(&self) -> TimerEpoch {
        self.epoch
    }
}
