//! Scoped repeating timer.
//!
//! A [`PeriodicTask`] owns the spawned tokio task that drives it. Dropping the
//! handle aborts the task, so a timer can never outlive the state that
//! started it.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a repeating timer task. Aborts on drop.
#[derive(Debug)]
pub struct PeriodicTask {
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn a timer whose first tick fires one full `period` from now.
    ///
    /// `on_tick` returning [`ControlFlow::Break`] ends the task. The task runs
    /// on `runtime`, so the caller does not need to be inside it.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // A suspended process should not wake up to a burst of alerts.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
