use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidDate;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day of the week, numbered from Sunday = 0 to Saturday = 6
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(w: chrono::Weekday) -> Self {
        Self::ALL[w.num_days_from_sunday() as usize]
    }
}

/// Which part of a y/m/d triple failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum DateField {
    Year,
    Month,
    Day,
}

/// A validated proleptic Gregorian date in the years 1..=9999
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, InvalidDate> {
        validate_date(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        day_of_week(self)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.0.month0() as usize]
    }
}

impl fmt::Display for CalendarDate {
    /// Renders as e.g. `July 4, 2024`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.month_name(), self.day(), self.year())
    }
}

pub fn day_of_week(date: &CalendarDate) -> Weekday {
    date.0.weekday().into()
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`; 0 for a month outside 1..=12
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn leap_years_in_range(min: i32, max: i32) -> Vec<i32> {
    (min..=max).filter(|&y| is_leap_year(y)).collect()
}

/// Checks every field on its own so callers can flag all bad inputs at once.
///
/// When the month is out of range the day is only checked against 1..=31.
pub fn validate_date(year: i32, month: u32, day: u32) -> Result<CalendarDate, InvalidDate> {
    let mut fields = Vec::new();

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        fields.push(DateField::Year);
    }

    let month_ok = (1..=12).contains(&month);
    if !month_ok {
        fields.push(DateField::Month);
    }

    let max_day = if month_ok {
        days_in_month(year, month)
    } else {
        31
    };
    if !(1..=max_day).contains(&day) {
        fields.push(DateField::Day);
    }

    if !fields.is_empty() {
        return Err(InvalidDate { fields });
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .map(CalendarDate)
        .ok_or(InvalidDate {
            fields: vec![DateField::Day],
        })
}
