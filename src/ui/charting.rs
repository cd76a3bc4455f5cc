use dowquiz::session::QuestionRecord;

/// One point per answered question: (question number, seconds spent)
pub fn answer_time_points(history: &[QuestionRecord]) -> Vec<(f64, f64)> {
    history
        .iter()
        .map(|r| (r.ordinal as f64, r.time_spent_ms as f64 / 1000.0))
        .collect()
}

/// Compute X (question number) and Y (seconds) bounds for the results chart
pub fn compute_chart_params(points: &[(f64, f64)], limit_secs: Option<f64>) -> (f64, f64) {
    let mut slowest = limit_secs.unwrap_or(0.0);
    for &(_, secs) in points {
        if secs > slowest {
            slowest = secs;
        }
    }

    let last_question = match points.last() {
        Some(x) => x.0,
        None => 1.0,
    }
    .max(1.0);

    (last_question, slowest.ceil().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
