use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dowquiz::{
    build_plan,
    plan::PlanOptions,
    runtime::{FixedTicker, QuizEvent, Runner, TestEventSource},
    GameMode, Phase, QuizSession, TimedVariant, Weekday,
};

fn digit_for(day: Weekday) -> KeyEvent {
    let c = char::from_digit(day.index() as u32 + 1, 10).unwrap();
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

// Headless integration using the internal runtime + session without a TTY.
// Each key answers the current question and immediately asks for the next one.
#[test]
fn headless_quick_round_finishes() {
    let mut session = QuizSession::seeded(7);
    let plan = build_plan(GameMode::Quick, &PlanOptions::default()).unwrap();
    let first = session.start(plan, Instant::now()).unwrap().date.weekday();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(QuizEvent::Key(digit_for(first))).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            QuizEvent::Tick(now) => {
                session.tick(now);
            }
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                let KeyCode::Char(c) = key.code else { continue };
                let day = Weekday::from_index(c.to_digit(10).unwrap() as u8 - 1).unwrap();
                session.submit_answer(day, Instant::now()).unwrap();
                if session.phase() == Phase::Finished {
                    break;
                }
                let next = session.request_next(Instant::now()).unwrap();
                tx.send(QuizEvent::Key(digit_for(next.date.weekday())))
                    .unwrap();
            }
        }
    }

    assert_eq!(session.phase(), Phase::Finished);
    let summary = session.summary().unwrap();
    assert_eq!(summary.correct_count, 5);
    assert_eq!(summary.accuracy_percent, 100);
    assert_eq!(summary.history.len(), 5);
}

#[test]
fn headless_ticks_expire_a_timed_question() {
    let options = PlanOptions {
        blitz_questions: 1,
        limits: dowquiz::plan::TimeLimits {
            speed: Duration::from_millis(200),
            blitz: Duration::from_millis(20),
        },
        ..Default::default()
    };
    let mut session = QuizSession::seeded(1);
    let plan = build_plan(GameMode::Timed(TimedVariant::Blitz), &options).unwrap();
    session.start(plan, Instant::now()).unwrap();

    let (_tx, rx) = mpsc::channel::<QuizEvent>();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let mut expired = None;
    for _ in 0..200u32 {
        if let QuizEvent::Tick(now) = runner.step() {
            if let Some(record) = session.tick(now) {
                expired = Some(record);
                break;
            }
        }
    }

    let record = expired.expect("blitz question should time out");
    assert!(record.was_timed_out);
    assert!(!record.is_correct);
    assert_eq!(record.time_spent_ms, 20);
    assert_eq!(session.phase(), Phase::Finished);
}
