//! Session and per-question clocks.
//!
//! Neither clock reads the wall clock. Every call takes the current
//! `Instant`, so callers decide what "now" is and tests can step time by hand.

use std::time::{Duration, Instant};

/// Session-wide elapsed time that excludes every paused interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    started_at: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
    stopped_at: Option<Instant>,
}

impl GameClock {
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            paused_total: Duration::ZERO,
            stopped_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// No-op when already paused or stopped
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() && self.stopped_at.is_none() {
            self.paused_at = Some(now.max(self.started_at));
        }
    }

    /// No-op when not paused
    pub fn resume(&mut self, now: Instant) {
        if self.stopped_at.is_some() {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    /// Freezes the clock; an open pause stays excluded
    pub fn stop(&mut self, now: Instant) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now.max(self.started_at));
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let end = self.stopped_at.unwrap_or(now);
        let open_pause = self
            .paused_at
            .map(|p| end.saturating_duration_since(p))
            .unwrap_or(Duration::ZERO);

        end.saturating_duration_since(self.started_at)
            .saturating_sub(self.paused_total)
            .saturating_sub(open_pause)
    }
}

/// Per-question stopwatch with an optional countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionClock {
    started_at: Instant,
    limit: Option<Duration>,
    stopped_at: Option<Instant>,
    fired: bool,
}

impl QuestionClock {
    pub fn start(now: Instant, limit: Option<Duration>) -> Self {
        Self {
            started_at: now,
            limit,
            stopped_at: None,
            fired: false,
        }
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn stop(&mut self, now: Instant) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now.max(self.started_at));
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.stopped_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    /// Time left before the countdown expires; `None` when there is no limit
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.elapsed(now)))
    }

    /// Returns true exactly once, on the first poll at or after expiry.
    /// A stopped clock never fires.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        if self.fired || self.stopped_at.is_some() {
            return false;
        }
        match self.remaining(now) {
            Some(left) if left.is_zero() => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_game_clock_runs_from_start() {
        let t0 = Instant::now();
        let clock = GameClock::start(t0);
        assert_eq!(clock.elapsed(t0), Duration::ZERO);
        assert_eq!(clock.elapsed(t0 + ms(1500)), ms(1500));
    }

    #[test]
    fn test_game_clock_excludes_pauses() {
        let t0 = Instant::now();
        let mut clock = GameClock::start(t0);

        clock.pause(t0 + ms(1000));
        assert!(clock.is_paused());
        // open pause is excluded too
        assert_eq!(clock.elapsed(t0 + ms(4000)), ms(1000));

        clock.resume(t0 + ms(5000));
        assert_eq!(clock.elapsed(t0 + ms(6000)), ms(2000));

        clock.pause(t0 + ms(7000));
        clock.resume(t0 + ms(9000));
        assert_eq!(clock.elapsed(t0 + ms(10_000)), ms(4000));
    }

    #[test]
    fn test_game_clock_pause_and_resume_are_idempotent() {
        let t0 = Instant::now();
        let mut clock = GameClock::start(t0);
        clock.resume(t0 + ms(100));
        assert_eq!(clock.elapsed(t0 + ms(200)), ms(200));

        clock.pause(t0 + ms(200));
        clock.pause(t0 + ms(900));
        clock.resume(t0 + ms(1200));
        clock.resume(t0 + ms(1500));
        assert_eq!(clock.elapsed(t0 + ms(1300)), ms(300));
    }

    #[test]
    fn test_game_clock_never_decreases() {
        let t0 = Instant::now();
        let mut clock = GameClock::start(t0);
        let mut last = Duration::ZERO;
        for step in 1..=50u64 {
            let now = t0 + ms(step * 100);
            match step % 10 {
                3 => clock.pause(now),
                7 => clock.resume(now),
                _ => {}
            }
            let e = clock.elapsed(now);
            assert!(e >= last, "elapsed went backwards at step {step}");
            last = e;
        }
    }

    #[test]
    fn test_game_clock_stop_freezes_elapsed() {
        let t0 = Instant::now();
        let mut clock = GameClock::start(t0);
        clock.pause(t0 + ms(800));
        clock.stop(t0 + ms(2000));
        assert!(clock.is_stopped());
        assert_eq!(clock.elapsed(t0 + ms(60_000)), ms(800));

        clock.resume(t0 + ms(3000));
        assert_eq!(clock.elapsed(t0 + ms(90_000)), ms(800));
    }

    #[test]
    fn test_game_clock_before_start_is_zero() {
        let t0 = Instant::now() + ms(1000);
        let clock = GameClock::start(t0);
        assert_eq!(clock.elapsed(t0 - ms(500)), Duration::ZERO);
    }

    #[test]
    fn test_question_clock_without_limit_never_fires() {
        let t0 = Instant::now();
        let mut clock = QuestionClock::start(t0, None);
        assert_eq!(clock.remaining(t0 + ms(100)), None);
        assert!(!clock.poll_timeout(t0 + ms(3_600_000)));
        assert_eq!(clock.elapsed(t0 + ms(2500)), ms(2500));
    }

    #[test]
    fn test_question_clock_fires_once() {
        let t0 = Instant::now();
        let mut clock = QuestionClock::start(t0, Some(ms(1000)));
        assert_eq!(clock.remaining(t0 + ms(400)), Some(ms(600)));
        assert!(!clock.poll_timeout(t0 + ms(999)));
        assert!(clock.poll_timeout(t0 + ms(1000)));
        assert!(!clock.poll_timeout(t0 + ms(1100)));
        assert_eq!(clock.remaining(t0 + ms(5000)), Some(Duration::ZERO));
    }

    #[test]
    fn test_stopped_question_clock_does_not_fire() {
        let t0 = Instant::now();
        let mut clock = QuestionClock::start(t0, Some(ms(1000)));
        clock.stop(t0 + ms(700));
        assert!(!clock.poll_timeout(t0 + ms(2000)));
        assert_eq!(clock.elapsed(t0 + ms(2000)), ms(700));
        assert_eq!(clock.remaining(t0 + ms(2000)), Some(ms(300)));
    }
}
