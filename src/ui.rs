pub mod charting;

use dowquiz::{
    plan::GameMode,
    report::SessionSummary,
    session::{Phase, QuestionRecord},
    util::{format_millis, format_secs},
    Weekday,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppScreen};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Gap between weekday buttons on the answer row
const DAY_GAP: &str = "  ";

fn blurb(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Quick => "5 random dates",
        GameMode::Standard => "10 random dates",
        GameMode::Challenge => "20 random dates",
        GameMode::Endless => "keep going until you stop",
        GameMode::Timed(_) => "race the clock on every question",
        GameMode::CustomPractice => "check one date of your choice",
        GameMode::LeapYear => "February 29th in leap years",
        GameMode::HistoricalEvents => "dates that made history",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            AppScreen::Setup => render_setup(self, area, buf),
            AppScreen::Quiz => render_quiz(self, area, buf),
            AppScreen::Results => render_results(self, area, buf),
        }
    }
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let selected_style = Style::default().patch(bold_style).fg(Color::Yellow);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),                            // title
                Constraint::Length(GameMode::ALL.len() as u16 + 1), // modes
                Constraint::Length(2),                            // years
                Constraint::Min(1),                               // status
                Constraint::Length(1),                            // legend
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled("What day of the week was it?", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let modes: Vec<Line> = GameMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            if i == app.selected {
                Line::from(vec![
                    Span::styled(format!("> {mode}"), selected_style),
                    Span::styled(format!("  {}", blurb(*mode)), dim_style),
                ])
            } else {
                Line::from(Span::raw(format!("  {mode}")))
            }
        })
        .collect();
    Paragraph::new(modes).render(chunks[1], buf);

    let range = app.options.year_range;
    Paragraph::new(Span::styled(
        format!("Years {} to {}", range.min(), range.max()),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);
    }

    Paragraph::new(Span::styled(
        "(↑/↓) choose / (enter) start / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let snapshot = app.session.snapshot(app.now);
    let Some(question) = snapshot.question.as_ref() else {
        return;
    };

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // header
                Constraint::Length(1), // countdown
                Constraint::Min(1),
                Constraint::Length(2), // context
                Constraint::Length(2), // date
                Constraint::Length(2), // days
                Constraint::Length(2), // feedback
                Constraint::Min(1),
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let progress = snapshot
        .progress
        .map(|p| p.label(snapshot.phase))
        .unwrap_or_default();
    Paragraph::new(Line::from(vec![
        Span::styled(progress, bold_style),
        Span::raw(format!(
            "   {} ✓ {} ✗   {}s",
            snapshot.correct_count,
            snapshot.wrong_count,
            format_secs(snapshot.elapsed)
        )),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if let Some(remaining) = snapshot.remaining {
        Paragraph::new(Span::styled(format_secs(remaining), magenta_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }

    if let Some(label) = &question.context_label {
        Paragraph::new(Span::styled(
            label.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);
    }

    Paragraph::new(Span::styled(question.date.to_string(), bold_style))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    let resolved = snapshot
        .last_record
        .as_ref()
        .filter(|_| snapshot.phase == Phase::Resolved);

    Paragraph::new(day_row(chunks[5].width, resolved))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    if let Some(record) = resolved {
        let style = if record.is_correct {
            Style::default().patch(bold_style).fg(Color::Green)
        } else {
            Style::default().patch(bold_style).fg(Color::Red)
        };
        Paragraph::new(Span::styled(record.feedback(), style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    let legend = match snapshot.phase {
        Phase::Resolved => "(enter) next / (esc) back",
        _ => "(1-7) answer / (esc) back",
    };
    Paragraph::new(Span::styled(legend, dim_style))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

/// Numbered weekday buttons, falling back to short names when full ones don't fit
fn day_row(width: u16, resolved: Option<&QuestionRecord>) -> Line<'static> {
    let full: Vec<String> = Weekday::ALL
        .iter()
        .map(|d| format!("{} {}", d.index() + 1, d))
        .collect();
    let full_width =
        full.iter().map(|s| s.width()).sum::<usize>() + DAY_GAP.width() * (full.len() - 1);

    let labels: Vec<String> = if full_width <= width as usize {
        full
    } else {
        Weekday::ALL
            .iter()
            .map(|d| format!("{} {}", d.index() + 1, d.short_name()))
            .collect()
    };

    let mut spans = Vec::with_capacity(labels.len() * 2);
    for (day, label) in Weekday::ALL.iter().zip(labels) {
        if !spans.is_empty() {
            spans.push(Span::raw(DAY_GAP));
        }
        let style = match resolved {
            Some(r) if r.correct_day == *day => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Some(r) if r.user_day == Some(*day) => Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::CROSSED_OUT),
            Some(_) => Style::default().add_modifier(Modifier::DIM),
            None => Style::default(),
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.session.summary() else {
        return;
    };
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(3), // tier
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // timing
                Constraint::Length(1), // message
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            summary.tier.title(),
            Style::default().patch(bold_style).fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            summary.tier.subtitle(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    render_chart(app, summary, chunks[1], buf);

    let mut stats = format!(
        "{}/{} correct   {}% acc   {}s total",
        summary.correct_count,
        summary.answered(),
        summary.accuracy_percent,
        format_millis(summary.total_elapsed_ms())
    );
    if summary.timed_out_count > 0 {
        stats.push_str(&format!("   {} timed out", summary.timed_out_count));
    }
    Paragraph::new(Span::styled(stats, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(timing) = &summary.timing {
        Paragraph::new(Span::styled(
            format!(
                "{}s avg   {}s fastest   {}s slowest   {:.2} sd",
                format_millis(timing.average_ms.round() as u64),
                format_millis(timing.fastest_ms),
                format_millis(timing.slowest_ms),
                timing.std_dev_ms / 1000.0
            ),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    Paragraph::new(Span::raw(summary.tier.message()))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (n)ew / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

fn render_chart(app: &App, summary: &SessionSummary, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let limit_secs = app
        .session
        .state()
        .and_then(|s| s.plan().time_limit())
        .map(|d| d.as_secs_f64());

    let points = charting::answer_time_points(&summary.history);
    let (last_question, slowest) = charting::compute_chart_params(&points, limit_secs);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("question")
                .bounds([1.0, last_question])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(last_question), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, slowest])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(slowest), bold_style),
                ]),
        )
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dowquiz::plan::{DateFields, PlanOptions, TimedVariant};
    use std::time::{Duration, Instant};

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn custom_options() -> PlanOptions {
        PlanOptions {
            custom_date: Some(DateFields {
                year: 2024,
                month: 7,
                day: 4,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_setup_lists_modes() {
        let app = App::new(PlanOptions::default(), Instant::now());
        let content = rendered(&app, 80, 24);
        assert!(content.contains("> Quick"));
        assert!(content.contains("Timed (Blitz)"));
        assert!(content.contains("Historical Events"));
        assert!(content.contains("Years 1900 to 1999"));
    }

    #[test]
    fn test_setup_shows_status() {
        let mut app = App::new(PlanOptions::default(), Instant::now());
        app.status = Some("Invalid date: invalid day".to_string());
        assert!(rendered(&app, 80, 24).contains("Invalid date: invalid day"));
    }

    #[test]
    fn test_quiz_shows_date_and_days() {
        let now = Instant::now();
        let mut app = App::new(custom_options(), now);
        app.select_mode(GameMode::CustomPractice);
        app.start(now);

        let content = rendered(&app, 100, 24);
        assert!(content.contains("July 4, 2024"));
        assert!(content.contains("Question 1 of 1"));
        assert!(content.contains("5 Thursday"));
    }

    #[test]
    fn test_narrow_quiz_uses_short_day_names() {
        let now = Instant::now();
        let mut app = App::new(custom_options(), now);
        app.select_mode(GameMode::CustomPractice);
        app.start(now);

        let content = rendered(&app, 60, 24);
        assert!(content.contains("5 Thu"));
        assert!(!content.contains("Thursday"));
    }

    #[test]
    fn test_timed_quiz_shows_countdown() {
        let now = Instant::now();
        let mut app = App::new(PlanOptions::default(), now);
        app.select_mode(GameMode::Timed(TimedVariant::Speed));
        app.start(now);
        app.now = now + Duration::from_millis(1_250);

        assert!(rendered(&app, 100, 24).contains("13.7"));
    }

    #[test]
    fn test_resolved_question_shows_feedback() {
        let now = Instant::now();
        let mut app = App::new(PlanOptions::default(), now);
        app.select_mode(GameMode::Quick);
        app.start(now);
        let day = app.session.current_question().unwrap().date.weekday();
        app.answer(day, now);

        let content = rendered(&app, 100, 24);
        assert!(content.contains("✓ Correct! It was"));
        assert!(content.contains("(enter) next"));
    }

    #[test]
    fn test_results_screen() {
        let now = Instant::now();
        let mut app = App::new(PlanOptions::default(), now);
        app.select_mode(GameMode::Quick);
        app.start(now);
        for i in 0..5 {
            let at = now + Duration::from_secs(i * 2 + 1);
            if i > 0 {
                app.next(at);
            }
            let day = app.session.current_question().unwrap().date.weekday();
            app.answer(day, at);
        }
        assert_eq!(app.screen, AppScreen::Results);

        let content = rendered(&app, 80, 30);
        assert!(content.contains("Outstanding"));
        assert!(content.contains("5/5 correct"));
        assert!(content.contains("100% acc"));
        assert!(content.contains("(r)etry / (n)ew / (esc)ape"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = App::new(PlanOptions::default(), Instant::now());
        rendered(&app, 10, 5);
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 2);
    }
}
