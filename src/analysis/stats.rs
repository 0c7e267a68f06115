use chrono::{DateTime, Duration, Utc};

pub fn median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.total_cmp(b));
    let mid = finite.len() / 2;
    if finite.len() % 2 == 1 {
        Some(finite[mid])
    } else {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    }
}

/// Linear-interpolation quantile over the finite values, `q` in `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.total_cmp(b));
    if finite.len() == 1 {
        return Some(finite[0]);
    }
    let pos = q * (finite.len() as f64 - 1.0);
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;
    let a = finite[idx];
    let b = finite[(idx + 1).min(finite.len() - 1)];
    Some(a + (b - a) * frac)
}

/// Median gap between consecutive timestamps of a time-ordered sequence.
/// `None` when fewer than two timestamps exist.
pub fn median_interval(timestamps: &[DateTime<Utc>]) -> Option<Duration> {
    if timestamps.len() < 2 {
        return None;
    }
    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .collect();
    let med = median(&gaps)?;
    Some(Duration::seconds(med.round() as i64))
}
