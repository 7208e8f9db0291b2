use crate::clock::{Clock, SystemClock};
use std::time::{Duration, SystemTime};

/// Lifecycle of one timed freewriting session.
///
/// Expired is terminal until the user explicitly continues (fresh
/// full-length deadline) or stops (back to Idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Expired,
}

/// What a periodic tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing to do
    Ignored,
    Running { remaining_secs: u64 },
    /// This tick crossed the deadline. Reported exactly once per
    /// Running stint; the phase is Expired afterwards.
    Expired,
}

/// Session timer state machine.
///
/// Owns phase transitions and elapsed/remaining arithmetic. All time is
/// read through the injected [`Clock`] so tests drive it with a fake.
/// Paused intervals are excluded from elapsed time by accumulating them
/// on resume.
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    clock: C,
    phase: Phase,
    length_secs: u64,
    started_at: Option<SystemTime>,
    paused_at: Option<SystemTime>,
    accumulated_pause: Duration,
}

impl<C: Clock> Session<C> {
    /// `length_secs` must already be validated at the config boundary.
    pub fn new(clock: C, length_secs: u64) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            length_secs,
            started_at: None,
            paused_at: None,
            accumulated_pause: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn length_secs(&self) -> u64 {
        self.length_secs
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Idle -> Running, anchored to now. No-op in any other phase.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.started_at = Some(self.clock.now());
        self.paused_at = None;
        self.accumulated_pause = Duration::ZERO;
    }

    /// Periodic tick handler. Checks phase itself, so the caller may
    /// keep ticking unconditionally; while Paused or Idle the tick
    /// no-ops rather than being cancelled.
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }
        let remaining = self.remaining_secs();
        if remaining == 0 {
            self.phase = Phase::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining_secs: remaining,
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Paused;
        self.paused_at = Some(self.clock.now());
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            let gap = self
                .clock
                .now()
                .duration_since(paused_at)
                .unwrap_or_default();
            self.accumulated_pause += gap;
        }
        self.phase = Phase::Running;
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Expired => {}
        }
    }

    /// Expired -> Running with a brand-new full-length deadline.
    pub fn continue_writing(&mut self) {
        if self.phase != Phase::Expired {
            return;
        }
        self.phase = Phase::Running;
        self.started_at = Some(self.clock.now());
        self.paused_at = None;
        self.accumulated_pause = Duration::ZERO;
    }

    /// Back to Idle, dropping all timing state. Used both for the
    /// "stop" decision after expiry and for starting a new session.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.started_at = None;
        self.paused_at = None;
        self.accumulated_pause = Duration::ZERO;
    }

    /// Change the configured length. While Running or Paused this
    /// re-anchors the deadline to now rather than preserving elapsed
    /// progress.
    pub fn set_length_secs(&mut self, length_secs: u64) {
        self.length_secs = length_secs;
        match self.phase {
            Phase::Running => {
                self.started_at = Some(self.clock.now());
                self.accumulated_pause = Duration::ZERO;
            }
            Phase::Paused => {
                let now = self.clock.now();
                self.started_at = Some(now);
                self.paused_at = Some(now);
                self.accumulated_pause = Duration::ZERO;
            }
            Phase::Idle | Phase::Expired => {}
        }
    }

    /// Writing time so far, excluding paused intervals. Frozen at the
    /// moment of pausing while Paused, and at the full length once
    /// Expired.
    pub fn elapsed(&self) -> Duration {
        let started_at = match self.started_at {
            Some(t) => t,
            None => return Duration::ZERO,
        };
        match self.phase {
            Phase::Idle => Duration::ZERO,
            Phase::Expired => Duration::from_secs(self.length_secs),
            Phase::Running => self
                .clock
                .now()
                .duration_since(started_at)
                .unwrap_or_default()
                .saturating_sub(self.accumulated_pause),
            Phase::Paused => self
                .paused_at
                .and_then(|p| p.duration_since(started_at).ok())
                .unwrap_or_default()
                .saturating_sub(self.accumulated_pause),
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        match self.phase {
            Phase::Idle => self.length_secs,
            Phase::Expired => 0,
            Phase::Running | Phase::Paused => {
                self.length_secs.saturating_sub(self.elapsed().as_secs())
            }
        }
    }

    /// Zero-padded `MM:SS` for the bottom bar
    pub fn display_remaining(&self) -> String {
        let remaining = self.remaining_secs();
        format!("{:02}:{:02}", remaining / 60, remaining % 60)
    }
}

/// Cadence tracker for periodic autosave.
///
/// Re-arms unconditionally whenever it fires, regardless of session
/// phase; whether the write actually happens is the caller's decision
/// (only while Running, only with non-empty content).
#[derive(Debug)]
pub struct AutosaveTimer {
    interval: Duration,
    last_fired: SystemTime,
}

impl AutosaveTimer {
    pub fn new(interval: Duration, now: SystemTime) -> Self {
        Self {
            interval,
            last_fired: now,
        }
    }

    /// True when a full interval has passed since the last fire (or
    /// re-arm). Firing resets the cadence.
    pub fn fire_if_due(&mut self, now: SystemTime) -> bool {
        let due = now
            .duration_since(self.last_fired)
            .map(|d| d >= self.interval)
            .unwrap_or(false);
        if due {
            self.last_fired = now;
        }
        due
    }

    /// Reset the cadence without firing. Used after the forced snapshot
    /// at expiry so the next periodic save is a full interval away.
    pub fn rearm(&mut self, now: SystemTime) {
        self.last_fired = now;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::FakeClock;
    use assert_matches::assert_matches;

    fn session(clock: &FakeClock, length_secs: u64) -> Session<&FakeClock> {
        Session::new(clock, length_secs)
    }

    #[test]
    fn starts_idle_with_full_remaining() {
        let clock = FakeClock::new();
        let s = session(&clock, 900);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.remaining_secs(), 900);
        assert_eq!(s.display_remaining(), "15:00");
    }

    #[test]
    fn remaining_equals_length_at_start_instant() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 300);
        s.start();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.remaining_secs(), 300);
        assert_eq!(s.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_is_monotone_between_ticks() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 600);
        s.start();
        let mut prev = s.elapsed();
        for _ in 0..10 {
            clock.advance_secs(1);
            s.on_tick();
            let cur = s.elapsed();
            assert!(cur >= prev);
            prev = cur;
        }
    }

    #[test]
    fn tick_counts_down_and_expires_once() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 3);
        s.start();
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Running { remaining_secs: 2 });
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Running { remaining_secs: 1 });
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Expired);
        assert_eq!(s.phase(), Phase::Expired);
        // expiry is reported exactly once; later ticks no-op
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn one_second_session_expires_at_first_tick() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 1);
        s.start();
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Expired);
    }

    #[test]
    fn pause_excludes_gap_from_elapsed() {
        // 15 min session, pause at elapsed=100s, resume after a real
        // 50s gap; remaining must be 800s, not 750s
        let clock = FakeClock::new();
        let mut s = session(&clock, 900);
        s.start();
        clock.advance_secs(100);
        s.pause();
        assert_eq!(s.phase(), Phase::Paused);
        let frozen = s.elapsed();
        assert_eq!(frozen.as_secs(), 100);
        clock.advance_secs(50);
        assert_eq!(s.elapsed(), frozen, "elapsed frozen while paused");
        s.resume();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.elapsed().as_secs(), 100);
        assert_eq!(s.remaining_secs(), 800);
    }

    #[test]
    fn pause_resume_pair_leaves_elapsed_unchanged() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 600);
        s.start();
        clock.advance_secs(42);
        let before = s.elapsed();
        s.pause();
        clock.advance_secs(1000);
        s.resume();
        assert_eq!(s.elapsed(), before);
    }

    #[test]
    fn repeated_pauses_accumulate() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 600);
        s.start();
        clock.advance_secs(10);
        s.pause();
        clock.advance_secs(30);
        s.resume();
        clock.advance_secs(10);
        s.pause();
        clock.advance_secs(70);
        s.resume();
        clock.advance_secs(10);
        assert_eq!(s.elapsed().as_secs(), 30);
    }

    #[test]
    fn ticks_noop_while_paused_and_idle() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 60);
        assert_matches!(s.on_tick(), TickOutcome::Ignored);
        s.start();
        s.pause();
        clock.advance_secs(5);
        assert_matches!(s.on_tick(), TickOutcome::Ignored);
    }

    #[test]
    fn continue_after_expiry_reanchors_full_length() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 2);
        s.start();
        clock.advance_secs(2);
        assert_matches!(s.on_tick(), TickOutcome::Expired);
        s.continue_writing();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.remaining_secs(), 2);
        clock.advance_secs(1);
        assert_matches!(s.on_tick(), TickOutcome::Running { remaining_secs: 1 });
    }

    #[test]
    fn reset_returns_to_idle_from_any_phase() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 60);
        s.start();
        clock.advance_secs(5);
        s.pause();
        s.reset();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.remaining_secs(), 60);
        assert_eq!(s.elapsed(), Duration::ZERO);
    }

    #[test]
    fn length_change_while_running_reanchors_to_now() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 900);
        s.start();
        clock.advance_secs(300);
        s.set_length_secs(600);
        // progress is deliberately discarded: the deadline re-anchors
        assert_eq!(s.remaining_secs(), 600);
        assert_eq!(s.elapsed(), Duration::ZERO);
        clock.advance_secs(60);
        assert_eq!(s.remaining_secs(), 540);
    }

    #[test]
    fn length_change_while_idle_keeps_idle() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 900);
        s.set_length_secs(300);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.display_remaining(), "05:00");
    }

    #[test]
    fn display_format_is_zero_padded() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 65);
        s.start();
        assert_eq!(s.display_remaining(), "01:05");
        clock.advance_secs(60);
        s.on_tick();
        assert_eq!(s.display_remaining(), "00:05");
    }

    #[test]
    fn start_is_noop_unless_idle() {
        let clock = FakeClock::new();
        let mut s = session(&clock, 60);
        s.start();
        clock.advance_secs(10);
        s.start();
        assert_eq!(s.elapsed().as_secs(), 10, "second start must not re-anchor");
    }

    #[test]
    fn autosave_timer_fires_on_cadence() {
        let clock = FakeClock::new();
        let mut timer = AutosaveTimer::new(Duration::from_secs(60), clock.now());
        clock.advance_secs(59);
        assert!(!timer.fire_if_due(clock.now()));
        clock.advance_secs(1);
        assert!(timer.fire_if_due(clock.now()));
        // firing re-arms
        assert!(!timer.fire_if_due(clock.now()));
        clock.advance_secs(60);
        assert!(timer.fire_if_due(clock.now()));
    }

    #[test]
    fn autosave_timer_rearm_delays_next_fire() {
        let clock = FakeClock::new();
        let mut timer = AutosaveTimer::new(Duration::from_secs(60), clock.now());
        clock.advance_secs(45);
        timer.rearm(clock.now());
        clock.advance_secs(59);
        assert!(!timer.fire_if_due(clock.now()));
        clock.advance_secs(1);
        assert!(timer.fire_if_due(clock.now()));
    }
}
