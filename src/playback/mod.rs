//! Playback clock
//!
//! A logical clock that adds a fixed step to the elapsed time on every tick,
//! independent of how late the scheduler actually delivers the tick. Reaching
//! the end of the transcript resets the clock automatically.

pub(crate) mod ticker;

use std::time::Duration;
use tracing::{debug, info};

use ticker::TickScheduler;

/// Default logical step per tick in milliseconds
pub(crate) const DEFAULT_STEP_MS: u64 = 50;

/// Default real period between ticks in milliseconds
pub(crate) const DEFAULT_PERIOD_MS: u64 = 50;

/// Elapsed playback position and whether it is advancing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlaybackState {
    pub elapsed_ms: u64,
    pub running: bool,
}

/// Tick step and period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockSettings {
    pub step_ms: u64,
    pub period: Duration,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            period: Duration::from_millis(DEFAULT_PERIOD_MS),
        }
    }
}

/// Result of delivering one tick to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Tick belonged to a cancelled schedule and was ignored
    Stale,
    /// Elapsed time advanced to the contained value
    Advanced(u64),
    /// Playback ran past the end and the clock reset itself
    Finished,
}

/// Owner of the playback state and its tick schedule
pub(crate) struct PlaybackClock<S: TickScheduler> {
    state: PlaybackState,
    settings: ClockSettings,
    end_ms: u64,
    scheduler: S,
    /// Generation of the live schedule, `None` while stopped
    live_generation: Option<u64>,
    next_generation: u64,
}

impl<S: TickScheduler> PlaybackClock<S> {
    /// Create a stopped clock that auto-resets once elapsed time passes `end_ms`
    pub(crate) fn new(settings: ClockSettings, end_ms: u64, scheduler: S) -> Self {
        Self {
            state: PlaybackState::default(),
            settings,
            end_ms,
            scheduler,
            live_generation: None,
            next_generation: 0,
        }
    }

    pub(crate) fn state(&self) -> PlaybackState {
        self.state
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state.running
    }

    /// Start advancing. No-op if already running.
    pub(crate) fn start(&mut self) {
        if self.state.running {
            return;
        }

        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.live_generation = Some(generation);
        self.state.running = true;
        self.scheduler.schedule(self.settings.period, generation);
        info!("Playback started at {}ms", self.state.elapsed_ms);
    }

    /// Stop advancing, keeping the elapsed time
    pub(crate) fn stop(&mut self) {
        self.scheduler.cancel();
        self.live_generation = None;
        if self.state.running {
            self.state.running = false;
            info!("Playback stopped at {}ms", self.state.elapsed_ms);
        }
    }

    /// Stop and rewind to zero
    pub(crate) fn reset(&mut self) {
        self.stop();
        if self.state.elapsed_ms != 0 {
            info!("Playback reset");
        }
        self.state.elapsed_ms = 0;
    }

    /// Deliver one tick from the schedule tagged `generation`
    pub(crate) fn tick(&mut self, generation: u64) -> TickOutcome {
        if !self.state.running || self.live_generation != Some(generation) {
            debug!("Ignoring stale tick (generation {})", generation);
            return TickOutcome::Stale;
        }

        self.state.elapsed_ms = self.state.elapsed_ms.saturating_add(self.settings.step_ms);

        if self.state.elapsed_ms > self.end_ms {
            info!("Reached end of transcript, resetting playback");
            self.reset();
            return TickOutcome::Finished;
        }

        TickOutcome::Advanced(self.state.elapsed_ms)
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

/// Format elapsed milliseconds as `<seconds>.<tenths>s`
///
/// Whole seconds are floored; the remainder is rounded to the nearest tenth,
/// carrying into the seconds when it rounds up to a full second.
pub(crate) fn format_elapsed(elapsed_ms: u64) -> String {
    let tenths = (elapsed_ms / 100) + u64::from(elapsed_ms % 100 >= 50);
    format!("{}.{}s", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::ticker::ManualScheduler;
    use super::*;

    fn clock(end_ms: u64) -> PlaybackClock<ManualScheduler> {
        PlaybackClock::new(ClockSettings::default(), end_ms, ManualScheduler::default())
    }

    fn live_generation(clock: &PlaybackClock<ManualScheduler>) -> u64 {
        clock.scheduler().active.expect("schedule active").1
    }

    #[test]
    fn test_start_schedules_ticks() {
        let mut clock = clock(1000);
        clock.start();

        assert!(clock.is_running());
        let (period, _) = clock.scheduler().active.unwrap();
        assert_eq!(period, Duration::from_millis(50));
    }

    #[test]
    fn test_start_when_running_is_noop() {
        let mut clock = clock(1000);
        clock.start();
        let generation = live_generation(&clock);
        clock.start();

        assert_eq!(clock.scheduler().scheduled, 1);
        assert_eq!(live_generation(&clock), generation);
    }

    #[test]
    fn test_tick_adds_fixed_step() {
        let mut clock = clock(1000);
        clock.start();
        let generation = live_generation(&clock);

        assert_eq!(clock.tick(generation), TickOutcome::Advanced(50));
        assert_eq!(clock.tick(generation), TickOutcome::Advanced(100));
        assert_eq!(clock.state().elapsed_ms, 100);
    }

    #[test]
    fn test_stop_keeps_elapsed_and_cancels() {
        let mut clock = clock(1000);
        clock.start();
        let generation = live_generation(&clock);
        clock.tick(generation);
        clock.stop();

        assert_eq!(
            clock.state(),
            PlaybackState {
                elapsed_ms: 50,
                running: false
            }
        );
        assert!(clock.scheduler().active.is_none());
        assert_eq!(clock.scheduler().cancelled, 1);
    }

    #[test]
    fn test_tick_after_stop_is_stale() {
        let mut clock = clock(1000);
        clock.start();
        let old = live_generation(&clock);
        clock.stop();

        assert_eq!(clock.tick(old), TickOutcome::Stale);
        assert_eq!(clock.state().elapsed_ms, 0);

        // A restarted schedule does not accept the retired generation
        clock.start();
        assert_ne!(live_generation(&clock), old);
        assert_eq!(clock.tick(old), TickOutcome::Stale);
        assert_eq!(clock.state().elapsed_ms, 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut clock = clock(1000);
        clock.start();
        let generation = live_generation(&clock);
        clock.tick(generation);

        clock.reset();
        let once = clock.state();
        clock.reset();

        assert_eq!(once, PlaybackState::default());
        assert_eq!(clock.state(), once);
    }

    #[test]
    fn test_runs_past_end_then_auto_resets() {
        let mut clock = clock(1000);
        clock.start();
        let generation = live_generation(&clock);

        for _ in 0..19 {
            assert!(matches!(clock.tick(generation), TickOutcome::Advanced(_)));
        }
        // Exactly at the end boundary playback continues
        assert_eq!(clock.tick(generation), TickOutcome::Advanced(1000));
        assert!(clock.is_running());

        assert_eq!(clock.tick(generation), TickOutcome::Finished);
        assert_eq!(clock.state(), PlaybackState::default());
        assert!(clock.scheduler().active.is_none());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0.0s");
        assert_eq!(format_elapsed(1234), "1.2s");
        assert_eq!(format_elapsed(1250), "1.3s");
        assert_eq!(format_elapsed(500), "0.5s");
        assert_eq!(format_elapsed(12_049), "12.0s");
        assert_eq!(format_elapsed(950), "1.0s");
        assert_eq!(format_elapsed(1999), "2.0s");
    }
}
