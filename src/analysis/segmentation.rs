use crate::analysis::stats;
use crate::analysis::thresholds::{self, EntityThresholds};
use crate::config::SeverityCutPoints;
use crate::model::{DegradationPeriod, DegradationSeverity, KpiSample};
use chrono::Duration;

/// Assumed duration of a trailing reading when no later sample bounds it.
const DEFAULT_READING_DURATION_HOURS: i64 = 1;

/// Scans one entity's time-sorted samples, groups maximal runs of
/// consecutive degraded readings and scores each run. Runs shorter than
/// `min_duration` are discarded.
///
/// Adjacency is positional in the sorted sequence: a run ends only at an
/// intervening non-degraded sample or end of sequence, never at a time gap.
pub fn segment(
    entity_id: &str,
    samples: &[KpiSample],
    entity_thresholds: &EntityThresholds,
    min_duration: Duration,
    cut_points: &SeverityCutPoints,
) -> Vec<DegradationPeriod> {
    if samples.is_empty() {
        return Vec::new();
    }

    let timestamps: Vec<_> = samples.iter().map(|s| s.timestamp).collect();
    let typical_interval = stats::median_interval(&timestamps)
        .unwrap_or_else(|| Duration::hours(DEFAULT_READING_DURATION_HOURS));

    let degraded: Vec<bool> = samples
        .iter()
        .map(|s| thresholds::is_degraded(s.value, entity_thresholds))
        .collect();

    let mut periods = Vec::new();
    let mut index = 0;
    while index < samples.len() {
        if !degraded[index] {
            index += 1;
            continue;
        }
        let run_start = index;
        while index < samples.len() && degraded[index] {
            index += 1;
        }
        let run_end = index - 1;

        let start = samples[run_start].timestamp;
        let end = samples[run_end].timestamp;
        let min_value = samples[run_start..=run_end]
            .iter()
            .map(|s| s.value)
            .fold(f64::INFINITY, f64::min);
        let sample_count = run_end - run_start + 1;

        let duration = if sample_count == 1 {
            // A lone degraded reading lasts until the next reading, or the
            // default when it is the last reading overall.
            match samples.get(run_end + 1) {
                Some(next) => next.timestamp - start,
                None => Duration::hours(DEFAULT_READING_DURATION_HOURS),
            }
        } else {
            // The span plus the typical interval to account for the last
            // reading's own duration.
            (end - start) + typical_interval
        };

        if duration < min_duration {
            tracing::debug!(
                entity = %entity_id,
                start = %start,
                duration_seconds = duration.num_seconds(),
                "discarding degraded run below minimum duration"
            );
            continue;
        }

        let deviation_pct = deviation_percent(entity_thresholds.baseline, min_value);
        periods.push(DegradationPeriod {
            entity_id: entity_id.to_string(),
            start,
            end,
            min_value,
            baseline: entity_thresholds.baseline,
            deviation_pct,
            duration,
            severity: severity_for(deviation_pct, cut_points),
            sample_count,
        });
    }

    periods
}

/// Percent the worst reading sits below the baseline, clamped to >= 0 to
/// absorb floating-point noise.
fn deviation_percent(baseline: f64, min_value: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    (((baseline - min_value) / baseline) * 100.0).max(0.0)
}

/// Highest tier first; comparison is strict, so a deviation exactly at a cut
/// point falls to the lower tier.
pub(crate) fn severity_for(
    deviation_pct: f64,
    cut_points: &SeverityCutPoints,
) -> DegradationSeverity {
    if deviation_pct > cut_points.critical {
        DegradationSeverity::Critical
    } else if deviation_pct > cut_points.major {
        DegradationSeverity::Major
    } else if deviation_pct > cut_points.minor {
        DegradationSeverity::Minor
    } else {
        DegradationSeverity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hourly_samples, ts};

    fn example_thresholds() -> EntityThresholds {
        EntityThresholds {
            median: 98.5,
            dynamic: 88.65,
            static_threshold: 95.0,
            baseline: 88.65,
        }
    }

    #[test]
    fn groups_consecutive_degraded_readings_into_one_period() {
        let samples = hourly_samples("1900", ts(10, 0), &[98.5, 87.0, 86.0, 87.5, 96.0]);
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );

        assert_eq!(periods.len(), 1);
        let period = &periods[0];
        assert_eq!(period.start, ts(11, 0));
        assert_eq!(period.end, ts(13, 0));
        assert_eq!(period.min_value, 86.0);
        assert_eq!(period.baseline, 88.65);
        assert_eq!(period.sample_count, 3);
        // Span of 2h plus the 1h typical interval.
        assert_eq!(period.duration, Duration::hours(3));
        assert!((period.deviation_pct - 2.989).abs() < 0.01);
        assert_eq!(period.severity, DegradationSeverity::Warning);
    }

    #[test]
    fn separate_runs_yield_separate_periods() {
        let samples = hourly_samples("1900", ts(8, 0), &[85.0, 97.0, 84.0, 83.0, 97.0]);
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].start, ts(8, 0));
        assert_eq!(periods[0].sample_count, 1);
        assert_eq!(periods[1].start, ts(10, 0));
        assert_eq!(periods[1].sample_count, 2);
    }

    #[test]
    fn lone_degraded_reading_lasts_until_the_next_reading() {
        let samples = hourly_samples("1900", ts(10, 0), &[85.0, 97.0]);
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].duration, Duration::hours(1));
    }

    #[test]
    fn trailing_lone_reading_uses_the_default_duration() {
        let samples = hourly_samples("1900", ts(10, 0), &[97.0, 85.0]);
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].duration, Duration::hours(1));
    }

    #[test]
    fn runs_shorter_than_min_duration_are_discarded() {
        // A lone degraded sample followed two minutes later by a healthy one
        // lasts 2m, below the 5m floor.
        let samples = vec![
            crate::test_support::sample("1900", ts(10, 0), 85.0),
            crate::test_support::sample("1900", ts(10, 2), 97.0),
        ];
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );
        assert!(periods.is_empty());
    }

    #[test]
    fn severity_boundaries_are_strict() {
        let cuts = SeverityCutPoints::default();
        assert_eq!(severity_for(50.0, &cuts), DegradationSeverity::Major);
        assert_eq!(severity_for(50.01, &cuts), DegradationSeverity::Critical);
        assert_eq!(severity_for(25.0, &cuts), DegradationSeverity::Minor);
        assert_eq!(severity_for(10.0, &cuts), DegradationSeverity::Warning);
        assert_eq!(severity_for(10.5, &cuts), DegradationSeverity::Minor);
        assert_eq!(severity_for(0.0, &cuts), DegradationSeverity::Warning);
    }

    #[test]
    fn deviation_is_clamped_non_negative() {
        assert_eq!(deviation_percent(0.0, 10.0), 0.0);
        assert_eq!(deviation_percent(-5.0, -10.0), 0.0);
        assert!(deviation_percent(100.0, 100.0 + 1e-13) >= 0.0);
    }

    #[test]
    fn healthy_series_produces_no_periods() {
        let samples = hourly_samples("1900", ts(10, 0), &[98.0, 97.5, 99.0]);
        let periods = segment(
            "1900",
            &samples,
            &example_thresholds(),
            Duration::minutes(5),
            &SeverityCutPoints::default(),
        );
        assert!(periods.is_empty());
    }
}
