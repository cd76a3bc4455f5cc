use std::time::{Duration, Instant};

use crate::session::{QuestionRecord, SessionState};
use crate::util::{mean, std_dev};

/// Qualitative bucket for a finished session's accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Tier {
    Outstanding,
    Excellent,
    Good,
    #[strum(to_string = "Needs Practice")]
    NeedsPractice,
}

impl Tier {
    /// Lower bounds are inclusive
    pub fn from_accuracy(accuracy_percent: u32) -> Self {
        if accuracy_percent >= 90 {
            Tier::Outstanding
        } else if accuracy_percent >= 80 {
            Tier::Excellent
        } else if accuracy_percent >= 60 {
            Tier::Good
        } else {
            Tier::NeedsPractice
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tier::Outstanding => "Outstanding!",
            Tier::Excellent => "Excellent!",
            Tier::Good => "Good Job!",
            Tier::NeedsPractice => "Keep Practicing!",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Tier::Outstanding => "You're a calendar master",
            Tier::Excellent => "Nearly flawless",
            Tier::Good => "Solid progress",
            Tier::NeedsPractice => "Every expert was once a beginner",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Outstanding => "Your mental calendar is razor sharp. Try a faster mode next.",
            Tier::Excellent => "Just a few slips. Another round should iron them out.",
            Tier::Good => "The method is sinking in. Keep drilling the anchor days.",
            Tier::NeedsPractice => "Review the century and month codes, then try again.",
        }
    }
}

/// Aggregate answer times across a session's history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    pub average_ms: f64,
    pub std_dev_ms: f64,
    pub fastest_ms: u64,
    pub slowest_ms: u64,
}

impl TimingStats {
    pub fn from_history(history: &[QuestionRecord]) -> Option<Self> {
        let times: Vec<f64> = history.iter().map(|r| r.time_spent_ms as f64).collect();
        Some(Self {
            average_ms: mean(&times)?,
            std_dev_ms: std_dev(&times)?,
            fastest_ms: history.iter().map(|r| r.time_spent_ms).min()?,
            slowest_ms: history.iter().map(|r| r.time_spent_ms).max()?,
        })
    }
}

/// Read-only report computed once when a session finishes
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub correct_count: u32,
    pub wrong_count: u32,
    pub accuracy_percent: u32,
    pub total_elapsed: Duration,
    pub tier: Tier,
    pub timed_out_count: u32,
    pub timing: Option<TimingStats>,
    pub history: Vec<QuestionRecord>,
}

impl SessionSummary {
    pub fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed.as_millis() as u64
    }

    pub fn answered(&self) -> u32 {
        self.correct_count + self.wrong_count
    }
}

/// Percentage over answered questions, rounded; 0 when nothing was answered
pub fn accuracy_percent(correct: u32, wrong: u32) -> u32 {
    let answered = correct + wrong;
    if answered == 0 {
        return 0;
    }
    ((correct as f64 / answered as f64) * 100.0).round() as u32
}

pub fn summarize(state: &SessionState, now: Instant) -> SessionSummary {
    let accuracy = accuracy_percent(state.correct_count(), state.wrong_count());
    let history = state.history().to_vec();

    SessionSummary {
        correct_count: state.correct_count(),
        wrong_count: state.wrong_count(),
        accuracy_percent: accuracy,
        total_elapsed: state.elapsed(now),
        tier: Tier::from_accuracy(accuracy),
        timed_out_count: history.iter().filter(|r| r.was_timed_out).count() as u32,
        timing: TimingStats::from_history(&history),
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarDate, Weekday};

    fn record(ordinal: u32, correct: bool, ms: u64, timed_out: bool) -> QuestionRecord {
        QuestionRecord {
            ordinal,
            date: CalendarDate::new(2000, 1, 1).unwrap(),
            correct_day: Weekday::Saturday,
            user_day: if timed_out {
                None
            } else if correct {
                Some(Weekday::Saturday)
            } else {
                Some(Weekday::Monday)
            },
            is_correct: correct,
            time_spent_ms: ms,
            was_timed_out: timed_out,
        }
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(3, 2), 60);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(1, 2), 33);
        assert_eq!(accuracy_percent(5, 0), 100);
        assert_eq!(accuracy_percent(0, 4), 0);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_accuracy(100), Tier::Outstanding);
        assert_eq!(Tier::from_accuracy(90), Tier::Outstanding);
        assert_eq!(Tier::from_accuracy(89), Tier::Excellent);
        assert_eq!(Tier::from_accuracy(80), Tier::Excellent);
        assert_eq!(Tier::from_accuracy(79), Tier::Good);
        assert_eq!(Tier::from_accuracy(60), Tier::Good);
        assert_eq!(Tier::from_accuracy(59), Tier::NeedsPractice);
        assert_eq!(Tier::from_accuracy(0), Tier::NeedsPractice);
    }

    #[test]
    fn test_tier_content_is_present() {
        for tier in [
            Tier::Outstanding,
            Tier::Excellent,
            Tier::Good,
            Tier::NeedsPractice,
        ] {
            assert!(!tier.title().is_empty());
            assert!(!tier.subtitle().is_empty());
            assert!(!tier.message().is_empty());
        }
        assert_eq!(Tier::NeedsPractice.to_string(), "Needs Practice");
    }

    #[test]
    fn test_timing_stats() {
        let history = vec![
            record(1, true, 1000, false),
            record(2, false, 3000, false),
            record(3, false, 5000, true),
        ];
        let timing = TimingStats::from_history(&history).unwrap();
        assert_eq!(timing.average_ms, 3000.0);
        assert_eq!(timing.fastest_ms, 1000);
        assert_eq!(timing.slowest_ms, 5000);
        assert!((timing.std_dev_ms - 1632.993161855452).abs() < 1e-6);
    }

    #[test]
    fn test_timing_stats_empty_history() {
        assert_eq!(TimingStats::from_history(&[]), None);
    }
}
