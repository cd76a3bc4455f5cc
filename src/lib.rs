// Library surface for the quiz engine; the terminal front end lives in main.rs.
pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod plan;
pub mod question;
pub mod report;
pub mod runtime;
pub mod session;
pub mod util;

pub use calendar::{CalendarDate, Weekday};
pub use error::{QuizError, QuizResult};
pub use plan::{build_plan, GameMode, PlanOptions, RunPlan, TimedVariant};
pub use session::{Phase, QuizSession};
