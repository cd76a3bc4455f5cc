use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::calendar::{days_in_month, leap_years_in_range, validate_date, CalendarDate};
use crate::events::HISTORICAL_EVENTS;
use crate::plan::{DateSource, RunPlan, YearRange};

/// Used when a leap-year range holds no leap years at all
pub const FALLBACK_LEAP_YEAR: i32 = 2000;

/// One posed date, with an optional caption such as a historical event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub date: CalendarDate,
    pub context_label: Option<String>,
}

impl Question {
    fn plain(date: CalendarDate) -> Self {
        Self {
            date,
            context_label: None,
        }
    }
}

/// Draws questions for a plan's date source
#[derive(Debug)]
pub struct QuestionSource<R: Rng = StdRng> {
    rng: R,
}

impl QuestionSource<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for QuestionSource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuestionSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn next_question(&mut self, plan: &RunPlan) -> Question {
        let question = match plan.date_source() {
            DateSource::RandomInRange(range) => Question::plain(self.random_date(*range)),
            DateSource::FixedCustomDate(date) => Question::plain(*date),
            DateSource::LeapYearInRange(range) => Question::plain(self.leap_day(*range)),
            DateSource::HistoricalEventPool => self.historical_event(),
        };
        log::debug!("drew {} ({:?})", question.date, question.context_label);
        question
    }

    fn uniform(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = (min.min(max), min.max(max));
        self.rng.gen_range(lo..=hi)
    }

    fn random_date(&mut self, range: YearRange) -> CalendarDate {
        let year = self.uniform(range.min(), range.max());
        let month = self.uniform(1, 12) as u32;
        let day = self.uniform(1, days_in_month(year, month) as i32) as u32;
        // range is always within 1..=9999, so the draw is a real date
        validate_date(year, month, day).unwrap_or_else(|_| fallback_leap_day())
    }

    fn leap_day(&mut self, range: YearRange) -> CalendarDate {
        let years = leap_years_in_range(range.min(), range.max());
        match years.choose(&mut self.rng) {
            Some(&year) => validate_date(year, 2, 29).unwrap_or_else(|_| fallback_leap_day()),
            None => {
                log::debug!("no leap years in {:?}, using fallback", range);
                fallback_leap_day()
            }
        }
    }

    fn historical_event(&mut self) -> Question {
        let Some(event) = HISTORICAL_EVENTS.choose(&mut self.rng) else {
            return Question::plain(fallback_leap_day());
        };
        match validate_date(event.year, event.month, event.day) {
            Ok(date) => Question {
                date,
                context_label: Some(event.description.to_string()),
            },
            Err(_) => Question::plain(fallback_leap_day()),
        }
    }
}

fn fallback_leap_day() -> CalendarDate {
    match validate_date(FALLBACK_LEAP_YEAR, 2, 29) {
        Ok(date) => date,
        Err(_) => unreachable!("2000-02-29 is a valid date"),
    }
}
