use std::time::Duration;

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Seconds with one decimal, truncated so a countdown never shows time it doesn't have
pub fn format_secs(d: Duration) -> String {
    let tenths = d.as_millis() / 100;
    format!("{}.{}", tenths / 10, tenths % 10)
}

pub fn format_millis(ms: u64) -> String {
    format_secs(Duration::from_millis(ms))
}
