//! Periodic tick scheduling for the playback clock
//!
//! The clock owns exactly one scheduler. Every schedule is tagged with a
//! generation so that a tick already in flight when the schedule is cancelled
//! can be recognised and dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Source of periodic ticks for the playback clock
pub(crate) trait TickScheduler {
    /// Begin emitting ticks tagged with `generation` every `period`,
    /// replacing any schedule that is already running
    fn schedule(&mut self, period: Duration, generation: u64);

    /// Stop emitting ticks. Must be idempotent.
    fn cancel(&mut self);
}

/// Callback invoked for every tick with the schedule's generation
pub(crate) type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Tokio-backed scheduler that runs an interval on a spawned task
pub(crate) struct TokioTicker {
    on_tick: TickCallback,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub(crate) fn new(on_tick: TickCallback) -> Self {
        Self {
            on_tick,
            task: None,
        }
    }

    /// Check if a schedule is currently active
    #[cfg(test)]
    pub(crate) fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, period: Duration, generation: u64) {
        self.cancel();

        let on_tick = Arc::clone(&self.on_tick);
        self.task = Some(tokio::spawn(async move {
            // First tick lands one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                on_tick(generation);
            }
        }));
        debug!("Scheduled ticks every {:?} (generation {})", period, generation);
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Cancelled tick schedule");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler that records requests instead of running a timer
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    pub(crate) active: Option<(Duration, u64)>,
    pub(crate) scheduled: usize,
    pub(crate) cancelled: usize,
}

#[cfg(test)]
impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration, generation: u64) {
        self.active = Some((period, generation));
        self.scheduled += 1;
    }

    fn cancel(&mut self) {
        if self.active.take().is_some() {
            self.cancelled += 1;
        }
    }
}
