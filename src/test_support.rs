use crate::model::{
    AlarmEvent, AlarmSeverity, DegradationPeriod, DegradationSeverity, KpiSample,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Fixed test day; all fixtures share it so only hour and minute matter.
pub fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 10, hour, minute, 0)
        .single()
        .expect("fixture timestamp")
}

pub fn sample(entity_id: &str, timestamp: DateTime<Utc>, value: f64) -> KpiSample {
    KpiSample {
        entity_id: entity_id.to_string(),
        timestamp,
        value,
    }
}

/// Hourly readings starting at `start`, one per value.
pub fn hourly_samples(entity_id: &str, start: DateTime<Utc>, values: &[f64]) -> Vec<KpiSample> {
    values
        .iter()
        .enumerate()
        .map(|(hour, value)| sample(entity_id, start + Duration::hours(hour as i64), *value))
        .collect()
}

/// An alarm event with a pre-resolved canonical entity id.
pub fn alarm(
    alarm_id: &str,
    canonical_entity_id: Option<&str>,
    timestamp: DateTime<Utc>,
    severity: AlarmSeverity,
) -> AlarmEvent {
    AlarmEvent {
        alarm_id: alarm_id.to_string(),
        raw_object_path: canonical_entity_id
            .map(|id| format!("PLMN-PLMN/MRBTS-{id}/EQM_R-1"))
            .unwrap_or_default(),
        canonical_entity_id: canonical_entity_id.map(str::to_string),
        timestamp,
        severity,
        alarm_type: "EQUIPMENT".to_string(),
        specific_problem: "BASE STATION FAULT".to_string(),
        probable_cause: "equipment malfunction".to_string(),
    }
}

/// An alarm event carrying only its raw managed-object path; identity
/// resolution is left to the pipeline.
pub fn alarm_on_path(
    alarm_id: &str,
    raw_object_path: &str,
    timestamp: DateTime<Utc>,
    severity: AlarmSeverity,
) -> AlarmEvent {
    AlarmEvent {
        alarm_id: alarm_id.to_string(),
        raw_object_path: raw_object_path.to_string(),
        canonical_entity_id: None,
        timestamp,
        severity,
        alarm_type: "EQUIPMENT".to_string(),
        specific_problem: "BASE STATION FAULT".to_string(),
        probable_cause: "equipment malfunction".to_string(),
    }
}

/// A warning-tier degradation period using the shared fixture thresholds.
pub fn degradation(
    entity_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DegradationPeriod {
    DegradationPeriod {
        entity_id: entity_id.to_string(),
        start,
        end,
        min_value: 86.0,
        baseline: 88.65,
        deviation_pct: 2.99,
        duration: (end - start) + Duration::hours(1),
        severity: DegradationSeverity::Warning,
        sample_count: 3,
    }
}
