use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::calendar::{validate_date, CalendarDate, MAX_YEAR, MIN_YEAR};
use crate::error::{QuizError, QuizResult};

pub const QUICK_QUESTIONS: u32 = 5;
pub const STANDARD_QUESTIONS: u32 = 10;
pub const CHALLENGE_QUESTIONS: u32 = 20;
pub const LEAP_YEAR_QUESTIONS: u32 = 10;
pub const HISTORICAL_QUESTIONS: u32 = 10;
pub const DEFAULT_TIMED_QUESTIONS: u32 = 10;
pub const MIN_TIMED_QUESTIONS: u32 = 1;
pub const MAX_TIMED_QUESTIONS: u32 = 100;

pub const DEFAULT_SPEED_LIMIT: Duration = Duration::from_millis(15_000);
pub const DEFAULT_BLITZ_LIMIT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum TimedVariant {
    Speed,
    Blitz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Quick,
    Standard,
    Challenge,
    Endless,
    Timed(TimedVariant),
    CustomPractice,
    LeapYear,
    HistoricalEvents,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Quick => f.write_str("Quick"),
            GameMode::Standard => f.write_str("Standard"),
            GameMode::Challenge => f.write_str("Challenge"),
            GameMode::Endless => f.write_str("Endless"),
            GameMode::Timed(variant) => write!(f, "Timed ({variant})"),
            GameMode::CustomPractice => f.write_str("Custom Practice"),
            GameMode::LeapYear => f.write_str("Leap Year"),
            GameMode::HistoricalEvents => f.write_str("Historical Events"),
        }
    }
}

impl GameMode {
    /// Every selectable mode, in menu order
    pub const ALL: [GameMode; 9] = [
        GameMode::Quick,
        GameMode::Standard,
        GameMode::Challenge,
        GameMode::Endless,
        GameMode::Timed(TimedVariant::Speed),
        GameMode::Timed(TimedVariant::Blitz),
        GameMode::CustomPractice,
        GameMode::LeapYear,
        GameMode::HistoricalEvents,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionCount {
    Fixed(u32),
    Unbounded,
}

impl QuestionCount {
    pub fn is_reached_by(&self, completed: u32) -> bool {
        match self {
            QuestionCount::Fixed(n) => completed >= *n,
            QuestionCount::Unbounded => false,
        }
    }
}

/// Inclusive span of years, always with `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Builds a range from two endpoints, swapping them if given backwards
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// The hundred years starting at `start`, e.g. 1900..=1999
    pub fn century(start: i32) -> Self {
        Self::new(start, start.saturating_add(99)).clamp_within(Self::full())
    }

    pub fn full() -> Self {
        Self {
            min: MIN_YEAR,
            max: MAX_YEAR,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn clamp_within(self, bounds: YearRange) -> Self {
        Self::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::century(1900)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    RandomInRange(YearRange),
    FixedCustomDate(CalendarDate),
    LeapYearInRange(YearRange),
    HistoricalEventPool,
}

/// Raw y/m/d as typed by the user, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLimits {
    pub speed: Duration,
    pub blitz: Duration,
}

impl Default for TimeLimits {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED_LIMIT,
            blitz: DEFAULT_BLITZ_LIMIT,
        }
    }
}

impl TimeLimits {
    /// Blitz must be non-zero and strictly faster than Speed
    pub fn validate(&self) -> QuizResult<()> {
        if self.blitz.is_zero() {
            return Err(QuizError::Config("blitz limit must be above zero".to_string()));
        }
        if self.blitz >= self.speed {
            return Err(QuizError::Config(format!(
                "blitz limit {}ms must be below speed limit {}ms",
                self.blitz.as_millis(),
                self.speed.as_millis()
            )));
        }
        Ok(())
    }

    pub fn for_variant(&self, variant: TimedVariant) -> Duration {
        match variant {
            TimedVariant::Speed => self.speed,
            TimedVariant::Blitz => self.blitz,
        }
    }
}

/// Sub-options gathered from the setup screen, CLI and config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub bounds: YearRange,
    pub year_range: YearRange,
    pub custom_date: Option<DateFields>,
    pub speed_questions: u32,
    pub blitz_questions: u32,
    pub limits: TimeLimits,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            bounds: YearRange::default(),
            year_range: YearRange::default(),
            custom_date: None,
            speed_questions: DEFAULT_TIMED_QUESTIONS,
            blitz_questions: DEFAULT_TIMED_QUESTIONS,
            limits: TimeLimits::default(),
        }
    }
}

impl PlanOptions {
    fn effective_range(&self) -> YearRange {
        self.year_range
            .clamp_within(self.bounds.clamp_within(YearRange::full()))
    }

    fn timed_questions(&self, variant: TimedVariant) -> u32 {
        let requested = match variant {
            TimedVariant::Speed => self.speed_questions,
            TimedVariant::Blitz => self.blitz_questions,
        };
        requested.clamp(MIN_TIMED_QUESTIONS, MAX_TIMED_QUESTIONS)
    }
}

/// Immutable configuration of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    mode: GameMode,
    total_questions: QuestionCount,
    time_limit: Option<Duration>,
    date_source: DateSource,
}

impl RunPlan {
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn total_questions(&self) -> QuestionCount {
        self.total_questions
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn date_source(&self) -> &DateSource {
        &self.date_source
    }
}

/// Resolves a mode plus its sub-options into a concrete plan.
///
/// Only custom practice can fail, when the typed date does not validate.
pub fn build_plan(mode: GameMode, options: &PlanOptions) -> QuizResult<RunPlan> {
    let range = options.effective_range();

    let plan = match mode {
        GameMode::Quick => fixed(mode, QUICK_QUESTIONS, DateSource::RandomInRange(range)),
        GameMode::Standard => fixed(mode, STANDARD_QUESTIONS, DateSource::RandomInRange(range)),
        GameMode::Challenge => fixed(mode, CHALLENGE_QUESTIONS, DateSource::RandomInRange(range)),
        GameMode::Endless => RunPlan {
            mode,
            total_questions: QuestionCount::Unbounded,
            time_limit: None,
            date_source: DateSource::RandomInRange(range),
        },
        GameMode::Timed(variant) => {
            let limits = match options.limits.validate() {
                Ok(()) => options.limits,
                Err(e) => {
                    log::warn!("{}; using default time limits", e);
                    TimeLimits::default()
                }
            };
            RunPlan {
                mode,
                total_questions: QuestionCount::Fixed(options.timed_questions(variant)),
                time_limit: Some(limits.for_variant(variant)),
                date_source: DateSource::RandomInRange(range),
            }
        }
        GameMode::CustomPractice => {
            let fields = options.custom_date.unwrap_or(DateFields {
                year: 0,
                month: 0,
                day: 0,
            });
            let date = validate_date(fields.year, fields.month, fields.day)?;
            fixed(mode, 1, DateSource::FixedCustomDate(date))
        }
        GameMode::LeapYear => fixed(mode, LEAP_YEAR_QUESTIONS, DateSource::LeapYearInRange(range)),
        GameMode::HistoricalEvents => {
            fixed(mode, HISTORICAL_QUESTIONS, DateSource::HistoricalEventPool)
        }
    };

    log::debug!("built plan {:?}", plan);
    Ok(plan)
}

fn fixed(mode: GameMode, n: u32, date_source: DateSource) -> RunPlan {
    RunPlan {
        mode,
        total_questions: QuestionCount::Fixed(n),
        time_limit: None,
        date_source,
    }
}
