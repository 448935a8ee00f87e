//! The game clock: one per game session, owns pause, speed and the
//! simulated-day accumulator.
//!
//! ORDERING RULES (every mutating operation follows them):
//!   1. Read the real-time source once; the whole operation uses that reading.
//!   2. Flush pending real time into the accumulator at the OLD pause/speed state.
//!   3. Apply the transition.
//!   4. Move the sync point to the reading from step 1.
//!   5. Publish events, only now that the clock is consistent.
//!
//! The clock never ticks on its own. It advances when something reads it.

use crate::{
    calendar::{Calendar, GameDate},
    command::ClockCommand,
    config::ClockConfig,
    error::ClockResult,
    event::{ClockEvent, EventBus},
    pause::{PauseAccumulator, Transition},
    prefs::{load_starting_speed, PlayerPrefs},
    real_time::{FrameTimer, RealTimeSource},
    snapshot::ClockSnapshot,
    speed::{GameSpeed, SpeedController},
    synchronizer::ClockSynchronizer,
    types::{Seconds, SessionId, SimDays},
};
use std::sync::Arc;

pub struct GameClock {
    session_id: SessionId,
    source:     Box<dyn RealTimeSource>,
    calendar:   Calendar,
    pause:      PauseAccumulator,
    speed:      SpeedController,
    sync:       ClockSynchronizer,
    frames:     FrameTimer,
    bus:        Arc<EventBus>,
    last_date:  GameDate,
    pending:    Vec<ClockEvent>,
    /// When set, events stay queued until `drain_events`.
    defer_events: bool,
}

impl GameClock {
    /// Start a fresh session at the configured epoch, running.
    pub fn new(
        config: &ClockConfig,
        source: impl RealTimeSource + 'static,
        bus: Arc<EventBus>,
    ) -> ClockResult<Self> {
        config.validate()?;
        let calendar = config.calendar()?;
        let now = source.now();
        let clock = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            source:     Box::new(source),
            calendar,
            pause:      PauseAccumulator::new(now),
            speed:      SpeedController::new(config.starting_speed),
            sync:       ClockSynchronizer::new(now, config.days_per_real_second),
            frames:     FrameTimer::new(),
            bus,
            last_date:  calendar.epoch(),
            pending:    Vec::new(),
            defer_events: false,
        };
        log::info!(
            "clock session {} started at {} ({} speed)",
            clock.session_id,
            clock.last_date,
            clock.speed.current()
        );
        Ok(clock)
    }

    /// Start a fresh session, taking the starting speed from player
    /// prefs when the player has saved one.
    pub fn from_prefs(
        config: &ClockConfig,
        prefs: &impl PlayerPrefs,
        source: impl RealTimeSource + 'static,
        bus: Arc<EventBus>,
    ) -> ClockResult<Self> {
        let config = match load_starting_speed(prefs)? {
            Some(speed) => config.clone().with_starting_speed(speed),
            None        => config.clone(),
        };
        Self::new(&config, source, bus)
    }

    /// Continue a session from a snapshot. Pause state and speed carry
    /// over; real-time bookkeeping starts fresh.
    pub fn restore(
        snapshot: &ClockSnapshot,
        config: &ClockConfig,
        source: impl RealTimeSource + 'static,
        bus: Arc<EventBus>,
    ) -> ClockResult<Self> {
        let mut clock = Self::new(&config.clone().with_starting_speed(snapshot.speed), source, bus)?;
        let now = clock.now();
        clock.session_id = snapshot.session_id.clone();
        clock.pause = PauseAccumulator::new(now);
        clock.sync = ClockSynchronizer::resume_from(
            snapshot.accumulated_days,
            now,
            config.days_per_real_second,
        );
        if snapshot.paused {
            clock.pause.pause(now);
        }
        clock.last_date = clock.calendar.date_at(clock.sync.accumulated_days());
        log::info!(
            "clock session {} restored at {}{}",
            clock.session_id,
            clock.last_date,
            if snapshot.paused { " (paused)" } else { "" }
        );
        Ok(clock)
    }

    // ── Identity ───────────────────────────────────────────────

    pub fn session_id(&self) -> &str { &self.session_id }

    pub fn calendar(&self) -> Calendar { self.calendar }

    pub fn bus(&self) -> &Arc<EventBus> { &self.bus }

    // ── Accumulation ───────────────────────────────────────────

    /// Flush real time elapsed since the last sync. A no-op while paused.
    /// Returns the simulated days credited.
    pub fn sync(&mut self) -> SimDays {
        let now = self.now();
        self.sync_at(now)
    }

    /// Simulated days since the epoch, freshly synced.
    pub fn accumulated_days(&mut self) -> SimDays {
        self.sync();
        self.sync.accumulated_days()
    }

    /// The current calendar date, freshly synced. Raises `DateChanged`
    /// when the date differs from the one last observed.
    pub fn date(&mut self) -> GameDate {
        let days = self.accumulated_days();
        let current = self.calendar.date_at(days);
        if current != self.last_date {
            self.pending.push(ClockEvent::DateChanged {
                previous: self.last_date,
                current,
            });
            self.last_date = current;
            self.publish();
        }
        current
    }

    // ── Pause ──────────────────────────────────────────────────

    pub fn is_paused(&self) -> bool { self.pause.is_paused() }

    pub fn pause(&mut self) -> Transition {
        if self.pause.is_paused() {
            log::debug!("pause ignored: clock already paused");
            return Transition::AlreadyPaused;
        }
        let now = self.now();
        self.sync_at(now);
        let outcome = self.pause.pause(now);
        log::debug!("clock paused at {now:.3}s ({:.3} days)", self.sync.accumulated_days());
        self.pending.push(ClockEvent::PauseChanged { paused: true });
        self.publish();
        outcome
    }

    pub fn resume(&mut self) -> Transition {
        let now = self.now();
        match self.pause.resume(now) {
            Ok(interval) => {
                self.sync.reset_sync_point(now);
                log::debug!("clock resumed at {now:.3}s after {interval:.3}s paused");
                self.pending.push(ClockEvent::PauseChanged { paused: false });
                self.publish();
                Transition::Applied
            }
            Err(outcome) => {
                log::debug!("resume ignored: clock not paused");
                outcome
            }
        }
    }

    pub fn toggle_pause(&mut self) -> Transition {
        if self.is_paused() { self.resume() } else { self.pause() }
    }

    // ── Speed ──────────────────────────────────────────────────

    pub fn speed(&self) -> GameSpeed { self.speed.current() }

    pub fn multiplier(&self) -> f64 { self.speed.current_multiplier() }

    /// Switch speed. Time elapsed so far is credited at the old speed.
    /// Returns false if `speed` was already active.
    pub fn set_speed(&mut self, speed: GameSpeed) -> bool {
        if speed == self.speed.current() {
            return false;
        }
        let now = self.now();
        self.sync_at(now);
        let Some(previous) = self.speed.swap(speed) else {
            return false;
        };
        self.sync.reset_sync_point(now);
        log::debug!("speed {previous} -> {speed} at {now:.3}s");
        self.pending.push(ClockEvent::SpeedChanged { previous, current: speed });
        self.publish();
        true
    }

    /// Switch speed from an untrusted name or ordinal. An unrecognized
    /// value is rejected and the clock keeps its current speed.
    pub fn try_set_speed(&mut self, raw: &str) -> ClockResult<bool> {
        match raw.parse::<GameSpeed>() {
            Ok(speed) => Ok(self.set_speed(speed)),
            Err(e) => {
                log::warn!("speed change rejected, staying at {}: {e}", self.speed.current());
                Err(e)
            }
        }
    }

    pub fn speed_up(&mut self) -> bool {
        let next = self.speed.step_up();
        self.set_speed(next)
    }

    pub fn slow_down(&mut self) -> bool {
        let next = self.speed.step_down();
        self.set_speed(next)
    }

    // ── Commands ───────────────────────────────────────────────

    /// Route a player command. Returns true if clock state changed.
    pub fn apply(&mut self, command: ClockCommand) -> bool {
        log::debug!("applying command {}", command.name());
        match command {
            ClockCommand::Pause              => self.pause().applied(),
            ClockCommand::Resume             => self.resume().applied(),
            ClockCommand::TogglePause        => self.toggle_pause().applied(),
            ClockCommand::SetSpeed { speed } => self.set_speed(speed),
            ClockCommand::SpeedUp            => self.speed_up(),
            ClockCommand::SlowDown           => self.slow_down(),
        }
    }

    // ── Frame time ─────────────────────────────────────────────

    /// Mark a frame boundary. Returns the live delta.
    pub fn begin_frame(&mut self) -> Seconds {
        let now = self.now();
        self.frames.mark(now)
    }

    /// Real seconds in the last frame, paused or not.
    pub fn delta_time(&self) -> Seconds {
        self.frames.delta()
    }

    /// Real seconds in the last frame, or 0 while paused.
    pub fn delta_time_or_paused(&self) -> Seconds {
        if self.is_paused() { 0.0 } else { self.frames.delta() }
    }

    /// Diagnostic: real time since session start with pauses removed.
    pub fn real_time_less_time_paused(&self) -> Seconds {
        self.pause.real_time_less_time_paused(self.now())
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn snapshot(&mut self) -> ClockSnapshot {
        let date = self.date();
        ClockSnapshot {
            session_id:       self.session_id.clone(),
            accumulated_days: self.sync.accumulated_days(),
            speed:            self.speed.current(),
            paused:           self.is_paused(),
            date,
        }
    }

    // ── Event delivery ─────────────────────────────────────────

    /// Hold events until `drain_events` instead of raising them inline.
    pub(crate) fn defer_events(&mut self) {
        self.defer_events = true;
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ClockEvent> {
        std::mem::take(&mut self.pending)
    }

    fn publish(&mut self) {
        if self.defer_events {
            return;
        }
        let events = self.drain_events();
        self.bus.raise_all(&events);
    }

    fn now(&self) -> Seconds {
        self.source.now()
    }

    fn sync_at(&mut self, now: Seconds) -> SimDays {
        let multiplier = self.speed.current_multiplier();
        self.sync.sync(now, multiplier, self.pause.is_paused())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real_time::ManualTimeSource;

    fn clock_at(speed: GameSpeed) -> (GameClock, ManualTimeSource) {
        let time = ManualTimeSource::new(0.0);
        let config = ClockConfig::default().with_starting_speed(speed);
        let clock = GameClock::new(&config, time.clone(), Arc::new(EventBus::new())).unwrap();
        (clock, time)
    }

    #[test]
    fn starts_running_at_epoch() {
        let (mut clock, _) = clock_at(GameSpeed::Normal);
        assert!(!clock.is_paused());
        assert_eq!(clock.date(), GameDate::new(2700, 1));
        assert_eq!(clock.accumulated_days(), 0.0);
    }

    #[test]
    fn speed_change_credits_old_speed_first() {
        let (mut clock, time) = clock_at(GameSpeed::Normal);
        time.advance(3.0);
        assert!(clock.set_speed(GameSpeed::Fastest));
        time.advance(1.0);
        assert_eq!(clock.accumulated_days(), 3.0 + 4.0);
    }

    #[test]
    fn same_speed_is_not_a_change() {
        let (mut clock, time) = clock_at(GameSpeed::Fast);
        time.advance(2.0);
        assert!(!clock.set_speed(GameSpeed::Fast));
        assert_eq!(clock.accumulated_days(), 4.0);
    }

    #[test]
    fn invalid_speed_keeps_current() {
        let (mut clock, _) = clock_at(GameSpeed::Slow);
        assert!(clock.try_set_speed("plaid").is_err());
        assert_eq!(clock.speed(), GameSpeed::Slow);
        assert!(clock.try_set_speed("fast").unwrap());
        assert_eq!(clock.speed(), GameSpeed::Fast);
    }

    #[test]
    fn delta_time_or_paused_freezes() {
        let (mut clock, time) = clock_at(GameSpeed::Normal);
        clock.begin_frame();
        time.advance(0.5);
        clock.begin_frame();
        assert_eq!(clock.delta_time_or_paused(), 0.5);

        clock.pause();
        time.advance(0.25);
        clock.begin_frame();
        assert_eq!(clock.delta_time(), 0.25);
        assert_eq!(clock.delta_time_or_paused(), 0.0);
    }

    #[test]
    fn toggle_flips_between_states() {
        let (mut clock, _) = clock_at(GameSpeed::Normal);
        assert_eq!(clock.toggle_pause(), Transition::Applied);
        assert!(clock.is_paused());
        assert_eq!(clock.toggle_pause(), Transition::Applied);
        assert!(!clock.is_paused());
    }

    #[test]
    fn deferred_events_wait_for_drain() {
        let (mut clock, _) = clock_at(GameSpeed::Normal);
        clock.defer_events();
        clock.pause();
        clock.set_speed(GameSpeed::Fast);
        assert_eq!(
            clock.drain_events(),
            vec![
                ClockEvent::PauseChanged { paused: true },
                ClockEvent::SpeedChanged { previous: GameSpeed::Normal, current: GameSpeed::Fast },
            ]
        );
        assert!(clock.drain_events().is_empty());
    }
}
