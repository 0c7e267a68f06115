use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One scalar KPI reading for an entity. Produced by the external loader,
/// which guarantees a finite value and a valid timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSample {
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Severity of a raw fault-management alarm event. `Cleared` marks the end
/// of an alarm's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
    Cleared,
}

impl AlarmSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Warning => "WARNING",
            Self::Cleared => "CLEARED",
        }
    }

    pub fn is_cleared(self) -> bool {
        matches!(self, Self::Cleared)
    }
}

pub fn parse_alarm_severity(value: &str) -> Option<AlarmSeverity> {
    match value.trim().to_lowercase().as_str() {
        "critical" => Some(AlarmSeverity::Critical),
        "major" => Some(AlarmSeverity::Major),
        "minor" => Some(AlarmSeverity::Minor),
        "warning" => Some(AlarmSeverity::Warning),
        "cleared" => Some(AlarmSeverity::Cleared),
        _ => None,
    }
}

/// Severity tier of a degradation period, assigned from `deviation_pct`
/// against the configured cut points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DegradationSeverity {
    Warning,
    Minor,
    Major,
    Critical,
}

impl DegradationSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
        }
    }
}

/// A raw alarm event row. `canonical_entity_id` is `None` until the identity
/// resolver has run, and stays `None` when the managed-object path carries no
/// recognizable entity segment; such events never match any degradation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub alarm_id: String,
    pub raw_object_path: String,
    #[serde(default)]
    pub canonical_entity_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub severity: AlarmSeverity,
    pub alarm_type: String,
    pub specific_problem: String,
    pub probable_cause: String,
}

/// A contiguous span where an entity's KPI failed the dual-threshold test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationPeriod {
    pub entity_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_value: f64,
    pub baseline: f64,
    pub deviation_pct: f64,
    #[serde(with = "serde_seconds")]
    pub duration: Duration,
    pub severity: DegradationSeverity,
    pub sample_count: usize,
}

/// One point in an alarm's lifecycle within a degradation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub timestamp: DateTime<Utc>,
    pub severity: AlarmSeverity,
    pub cleared: bool,
}

/// Position of an alarm's earliest matched event relative to the degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemporalRelation {
    Before,
    During,
    After,
}

impl TemporalRelation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::During => "DURING",
            Self::After => "AFTER",
        }
    }
}

/// One alarm identity's full event history inside a specific degradation's
/// time window, collapsed to a chronological status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedAlarm {
    pub alarm_id: String,
    pub entity_id: String,
    pub status_timeline: Vec<StatusEvent>,
    pub earliest_timestamp: DateTime<Utc>,
    pub temporal_relation: TemporalRelation,
    /// Signed offset of the earliest event from the degradation start.
    #[serde(with = "serde_seconds")]
    pub time_offset: Duration,
}

/// A degradation period plus its consolidated alarms. An empty alarm list is
/// the explicit "no FM correlation found" outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub degradation: DegradationPeriod,
    pub consolidated_alarms: Vec<ConsolidatedAlarm>,
}

/// Per-entity sample statistics and the thresholds actually applied, exposed
/// for observability and threshold tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub entity_id: String,
    pub sample_count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub dynamic_threshold: f64,
    pub static_threshold: f64,
    pub baseline: f64,
}

/// Serialize `chrono::Duration` as whole seconds (signed).
pub(crate) mod serde_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds))
    }
}
