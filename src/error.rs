//! Crate-wide error type.
//! Range inversions and late timeouts are recovered in place and never show up here.

use itertools::Itertools;
use thiserror::Error;

use crate::calendar::DateField;
use crate::session::{Action, Phase};

/// Every field of a y/m/d triple that failed validation, in Year, Month, Day order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {}", fields.iter().map(|f| f.to_string().to_lowercase()).join(", "))]
pub struct InvalidDate {
    pub fields: Vec<DateField>,
}

impl InvalidDate {
    pub fn has(&self, field: DateField) -> bool {
        self.fields.contains(&field)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] InvalidDate),

    #[error("Cannot {action} while the session is {phase}")]
    IllegalTransition { action: Action, phase: Phase },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type QuizResult<T> = Result<T, QuizError>;
