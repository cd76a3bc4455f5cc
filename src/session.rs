//! The quiz state machine.
//!
//! `QuizSession` owns the live `SessionState` and is the only thing that
//! mutates it. Phases run `Idle -> Answering <-> Resolved -> Finished`, and
//! `go_back` returns to `Idle` from anywhere.

use rand::rngs::StdRng;
use rand::Rng;
use std::time::{Duration, Instant};

use crate::calendar::{CalendarDate, Weekday};
use crate::clock::{GameClock, QuestionClock};
use crate::error::{QuizError, QuizResult};
use crate::plan::{GameMode, QuestionCount, RunPlan};
use crate::question::{Question, QuestionSource};
use crate::report::{summarize, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Answering,
    Resolved,
    Finished,
}

/// Engine operations that can be rejected for the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Action {
    #[strum(to_string = "start a session")]
    Start,
    #[strum(to_string = "submit an answer")]
    SubmitAnswer,
    #[strum(to_string = "request the next question")]
    RequestNext,
}

/// Permanent log entry for one answered or timed-out question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub ordinal: u32,
    pub date: CalendarDate,
    pub correct_day: Weekday,
    /// `None` when the question timed out
    pub user_day: Option<Weekday>,
    pub is_correct: bool,
    pub time_spent_ms: u64,
    pub was_timed_out: bool,
}

impl QuestionRecord {
    pub fn feedback(&self) -> String {
        if self.was_timed_out {
            format!("⏱ Time's up! It was {}", self.correct_day)
        } else if self.is_correct {
            format!("✓ Correct! It was {}", self.correct_day)
        } else {
            format!("✗ Wrong! The correct answer was {}", self.correct_day)
        }
    }
}

/// Live state of one session
#[derive(Debug, Clone)]
pub struct SessionState {
    plan: RunPlan,
    history: Vec<QuestionRecord>,
    current_question: Question,
    question_index: u32,
    correct_count: u32,
    wrong_count: u32,
    game_clock: GameClock,
    question_clock: QuestionClock,
}

impl SessionState {
    fn new(plan: RunPlan, first: Question, now: Instant) -> Self {
        let question_clock = QuestionClock::start(now, plan.time_limit());
        Self {
            plan,
            history: Vec::new(),
            current_question: first,
            question_index: 0,
            correct_count: 0,
            wrong_count: 0,
            game_clock: GameClock::start(now),
            question_clock,
        }
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }

    pub fn current_question(&self) -> &Question {
        &self.current_question
    }

    /// Number of completed questions
    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.game_clock.elapsed(now)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.question_clock.remaining(now)
    }

    pub fn question_elapsed(&self, now: Instant) -> Duration {
        self.question_clock.elapsed(now)
    }

    fn begin_question(&mut self, question: Question, now: Instant) {
        self.current_question = question;
        self.game_clock.resume(now);
        self.question_clock = QuestionClock::start(now, self.plan.time_limit());
    }

    fn record(&mut self, answer: Option<Weekday>, now: Instant) -> QuestionRecord {
        let date = self.current_question.date;
        let correct_day = date.weekday();
        let was_timed_out = answer.is_none();
        let is_correct = answer == Some(correct_day);

        let mut spent = self.question_clock.elapsed(now);
        if let Some(limit) = self.question_clock.limit() {
            spent = spent.min(limit);
        }

        self.question_clock.stop(now);
        self.game_clock.pause(now);

        if is_correct {
            self.correct_count += 1;
        } else {
            self.wrong_count += 1;
        }
        self.question_index += 1;

        let record = QuestionRecord {
            ordinal: self.question_index,
            date,
            correct_day,
            user_day: answer,
            is_correct,
            time_spent_ms: spent.as_millis() as u64,
            was_timed_out,
        };
        self.history.push(record.clone());
        record
    }

    fn stop_clocks(&mut self, now: Instant) {
        self.question_clock.stop(now);
        self.game_clock.stop(now);
    }
}

/// Whether the session is over after `completed` questions
pub fn should_terminate(plan: &RunPlan, completed: u32) -> bool {
    match plan.mode() {
        GameMode::CustomPractice => true,
        GameMode::Endless => false,
        _ => plan.total_questions().is_reached_by(completed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: QuestionCount,
}

impl Progress {
    /// e.g. `Question 3 of 10`, or `Question 3` for an unbounded run
    pub fn label(&self, phase: Phase) -> String {
        let shown = match phase {
            Phase::Answering => self.completed + 1,
            _ => self.completed,
        };
        match self.total {
            QuestionCount::Fixed(n) => format!("Question {} of {}", shown, n),
            QuestionCount::Unbounded => format!("Question {}", shown),
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub generation: u64,
    pub mode: Option<GameMode>,
    pub question: Option<Question>,
    pub progress: Option<Progress>,
    pub elapsed: Duration,
    pub remaining: Option<Duration>,
    pub last_record: Option<QuestionRecord>,
    pub correct_count: u32,
    pub wrong_count: u32,
}

#[derive(Debug)]
pub struct QuizSession<R: Rng = StdRng> {
    source: QuestionSource<R>,
    phase: Phase,
    state: Option<SessionState>,
    summary: Option<SessionSummary>,
    generation: u64,
}

impl QuizSession<StdRng> {
    pub fn new() -> Self {
        Self::with_source(QuestionSource::new())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_source(QuestionSource::seeded(seed))
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_source(source: QuestionSource<R>) -> Self {
        Self {
            source,
            phase: Phase::Idle,
            state: None,
            summary: None,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Answering | Phase::Resolved)
    }

    /// Bumped whenever a session starts or is abandoned
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn last_record(&self) -> Option<&QuestionRecord> {
        self.state.as_ref().and_then(|s| s.history.last())
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Answering | Phase::Resolved => self.state.as_ref().map(|s| &s.current_question),
            _ => None,
        }
    }

    /// Starts a fresh session and poses its first question.
    ///
    /// Allowed from `Idle`, and from `Finished`, which first drops back to `Idle`.
    pub fn start(&mut self, plan: RunPlan, now: Instant) -> QuizResult<&Question> {
        match self.phase {
            Phase::Idle => {}
            Phase::Finished => self.reset(),
            Phase::Answering | Phase::Resolved => return Err(self.illegal(Action::Start)),
        }

        log::info!("starting {} session", plan.mode());
        let first = self.source.next_question(&plan);
        self.generation += 1;
        self.phase = Phase::Answering;
        let state = self.state.insert(SessionState::new(plan, first, now));
        Ok(&state.current_question)
    }

    pub fn submit_answer(&mut self, day: Weekday, now: Instant) -> QuizResult<QuestionRecord> {
        if self.phase != Phase::Answering {
            return Err(self.illegal(Action::SubmitAnswer));
        }
        self.resolve(Some(day), now)
            .ok_or(QuizError::IllegalTransition {
                action: Action::SubmitAnswer,
                phase: self.phase,
            })
    }

    /// Forces the current question to time out.
    ///
    /// Anything other than `Answering` makes this a no-op returning `None`,
    /// so a timeout that loses a race with an answer is harmless.
    /// Questions without a time limit never time out.
    pub fn timeout(&mut self, now: Instant) -> Option<QuestionRecord> {
        if self.phase != Phase::Answering {
            log::debug!("ignoring timeout while {}", self.phase);
            return None;
        }
        let untimed = self
            .state
            .as_ref()
            .is_some_and(|s| s.question_clock.limit().is_none());
        if untimed {
            log::debug!("ignoring timeout for a question with no time limit");
            return None;
        }
        self.resolve(None, now)
    }

    /// `timeout`, but only for the session that was live at `generation`
    pub fn timeout_for(&mut self, generation: u64, now: Instant) -> Option<QuestionRecord> {
        if generation != self.generation {
            log::debug!(
                "ignoring stale timeout from generation {} (now {})",
                generation,
                self.generation
            );
            return None;
        }
        self.timeout(now)
    }

    /// Feeds the scheduler tick into the question countdown.
    /// Returns the record when this tick expired the current question.
    pub fn tick(&mut self, now: Instant) -> Option<QuestionRecord> {
        if self.phase != Phase::Answering {
            return None;
        }
        let expired = self
            .state
            .as_mut()
            .is_some_and(|s| s.question_clock.poll_timeout(now));
        if expired {
            self.resolve(None, now)
        } else {
            None
        }
    }

    pub fn request_next(&mut self, now: Instant) -> QuizResult<&Question> {
        if self.phase != Phase::Resolved {
            return Err(self.illegal(Action::RequestNext));
        }
        let Some(state) = self.state.as_mut() else {
            return Err(QuizError::IllegalTransition {
                action: Action::RequestNext,
                phase: self.phase,
            });
        };

        let question = self.source.next_question(&state.plan);
        state.begin_question(question, now);
        self.phase = Phase::Answering;
        Ok(&state.current_question)
    }

    /// Abandons whatever is in flight. Safe to call in any phase, any number of times.
    pub fn go_back(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        log::info!("leaving session from {}", self.phase);
        self.reset();
        self.generation += 1;
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        let state = self.state.as_ref();
        SessionSnapshot {
            phase: self.phase,
            generation: self.generation,
            mode: state.map(|s| s.plan.mode()),
            question: self.current_question().cloned(),
            progress: state.map(|s| Progress {
                completed: s.question_index,
                total: s.plan.total_questions(),
            }),
            elapsed: state.map(|s| s.elapsed(now)).unwrap_or_default(),
            remaining: match self.phase {
                Phase::Answering | Phase::Resolved => state.and_then(|s| s.remaining(now)),
                _ => None,
            },
            last_record: self.last_record().cloned(),
            correct_count: state.map(|s| s.correct_count).unwrap_or(0),
            wrong_count: state.map(|s| s.wrong_count).unwrap_or(0),
        }
    }

    fn resolve(&mut self, answer: Option<Weekday>, now: Instant) -> Option<QuestionRecord> {
        let state = self.state.as_mut()?;
        let record = state.record(answer, now);
        log::debug!("recorded {:?}", record);
        self.phase = Phase::Resolved;

        if should_terminate(&state.plan, state.question_index) {
            self.finish(now);
        }
        Some(record)
    }

    fn finish(&mut self, now: Instant) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.stop_clocks(now);
        let summary = summarize(state, now);
        log::info!(
            "session finished: {}/{} correct ({}%)",
            summary.correct_count,
            summary.answered(),
            summary.accuracy_percent
        );
        self.summary = Some(summary);
        self.phase = Phase::Finished;
    }

    // Both clocks live inside the state, so dropping it stops them for good.
    fn reset(&mut self) {
        self.state = None;
        self.summary = None;
        self.phase = Phase::Idle;
    }

    fn illegal(&self, action: Action) -> QuizError {
        log::warn!("rejected: cannot {} while {}", action, self.phase);
        QuizError::IllegalTransition {
            action,
            phase: self.phase,
        }
    }
}
