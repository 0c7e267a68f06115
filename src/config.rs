use crate::error::AnalysisError;
use chrono::Duration;
use serde::Deserialize;
use std::collections::BTreeMap;

fn default_median_percentage() -> f64 {
    90.0
}

fn default_static_threshold() -> f64 {
    95.0
}

fn default_min_duration_minutes() -> i64 {
    5
}

fn default_window_minutes() -> i64 {
    30
}

/// Deviation-percentage cut points for severity scoring. Comparison is
/// strict, so a deviation exactly at a cut point falls to the lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeverityCutPoints {
    pub critical: f64,
    pub major: f64,
    pub minor: f64,
}

impl Default for SeverityCutPoints {
    fn default() -> Self {
        Self {
            critical: 50.0,
            major: 25.0,
            minor: 10.0,
        }
    }
}

/// Per-entity override of the degradation thresholds. Absent fields fall
/// back to the global defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityOverride {
    #[serde(default)]
    pub median_percentage: Option<f64>,
    #[serde(default)]
    pub static_threshold: Option<f64>,
}

/// Thresholds in effect for one entity after override resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSettings {
    pub median_percentage: f64,
    pub static_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Percentage of the entity median used as the dynamic threshold,
    /// in `(0, 100]`.
    #[serde(default = "default_median_percentage")]
    pub default_median_percentage: f64,
    /// Absolute degradation bar applied alongside the dynamic threshold.
    #[serde(default = "default_static_threshold")]
    pub default_static_threshold: f64,
    /// Degraded runs shorter than this are discarded.
    #[serde(default = "default_min_duration_minutes")]
    pub min_duration_minutes: i64,
    /// Window extension before a degradation's start when matching alarms.
    #[serde(default = "default_window_minutes")]
    pub time_before_minutes: i64,
    /// Window extension after a degradation's end when matching alarms.
    #[serde(default = "default_window_minutes")]
    pub time_after_minutes: i64,
    #[serde(default)]
    pub severity_cut_points: SeverityCutPoints,
    /// Per-entity threshold overrides, keyed by canonical entity id.
    #[serde(default)]
    pub entity_overrides: BTreeMap<String, EntityOverride>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_median_percentage: default_median_percentage(),
            default_static_threshold: default_static_threshold(),
            min_duration_minutes: default_min_duration_minutes(),
            time_before_minutes: default_window_minutes(),
            time_after_minutes: default_window_minutes(),
            severity_cut_points: SeverityCutPoints::default(),
            entity_overrides: BTreeMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Rejects values that would silently corrupt every downstream
    /// computation. Must pass before any entity is processed.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_median_percentage(self.default_median_percentage, None)?;
        if !self.default_static_threshold.is_finite() {
            return Err(AnalysisError::invalid_configuration(format!(
                "default_static_threshold must be finite, got {}",
                self.default_static_threshold
            )));
        }
        if self.min_duration_minutes < 0 {
            return Err(AnalysisError::invalid_configuration(format!(
                "min_duration_minutes must not be negative, got {}",
                self.min_duration_minutes
            )));
        }
        if self.time_before_minutes < 0 || self.time_after_minutes < 0 {
            return Err(AnalysisError::invalid_configuration(format!(
                "alarm window must not be negative, got before={} after={}",
                self.time_before_minutes, self.time_after_minutes
            )));
        }

        let cuts = &self.severity_cut_points;
        let ordered = cuts.critical > cuts.major && cuts.major > cuts.minor && cuts.minor > 0.0;
        if !ordered
            || !cuts.critical.is_finite()
            || !cuts.major.is_finite()
            || !cuts.minor.is_finite()
        {
            return Err(AnalysisError::invalid_configuration(format!(
                "severity cut points must be finite and strictly decreasing, got critical={} major={} minor={}",
                cuts.critical, cuts.major, cuts.minor
            )));
        }

        for (entity_id, overrides) in &self.entity_overrides {
            if let Some(pct) = overrides.median_percentage {
                validate_median_percentage(pct, Some(entity_id))?;
            }
            if let Some(threshold) = overrides.static_threshold {
                if !threshold.is_finite() {
                    return Err(AnalysisError::invalid_configuration(format!(
                        "static_threshold override for entity {entity_id} must be finite, got {threshold}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Resolves the thresholds in effect for one entity.
    pub fn thresholds_for(&self, entity_id: &str) -> ThresholdSettings {
        let overrides = self.entity_overrides.get(entity_id);
        ThresholdSettings {
            median_percentage: overrides
                .and_then(|o| o.median_percentage)
                .unwrap_or(self.default_median_percentage),
            static_threshold: overrides
                .and_then(|o| o.static_threshold)
                .unwrap_or(self.default_static_threshold),
        }
    }

    pub fn min_duration(&self) -> Duration {
        Duration::minutes(self.min_duration_minutes)
    }

    pub fn time_before(&self) -> Duration {
        Duration::minutes(self.time_before_minutes)
    }

    pub fn time_after(&self) -> Duration {
        Duration::minutes(self.time_after_minutes)
    }
}

fn validate_median_percentage(value: f64, entity_id: Option<&str>) -> Result<(), AnalysisError> {
    if value.is_finite() && value > 0.0 && value <= 100.0 {
        return Ok(());
    }
    let scope = match entity_id {
        Some(id) => format!("median_percentage override for entity {id}"),
        None => "default_median_percentage".to_string(),
    };
    Err(AnalysisError::invalid_configuration(format!(
        "{scope} must be in (0, 100], got {value}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        AnalysisConfig::default().validate().expect("valid defaults");
    }

    #[test]
    fn rejects_median_percentage_outside_unit_range() {
        let mut config = AnalysisConfig::default();
        config.default_median_percentage = 0.0;
        assert!(config.validate().is_err());

        config.default_median_percentage = 100.5;
        assert!(config.validate().is_err());

        config.default_median_percentage = 100.0;
        config.validate().expect("upper bound is inclusive");
    }

    #[test]
    fn rejects_negative_durations() {
        let mut config = AnalysisConfig::default();
        config.min_duration_minutes = -1;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.time_after_minutes = -30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unordered_severity_cut_points() {
        let mut config = AnalysisConfig::default();
        config.severity_cut_points = SeverityCutPoints {
            critical: 25.0,
            major: 50.0,
            minor: 10.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_entity_override() {
        let mut config = AnalysisConfig::default();
        config.entity_overrides.insert(
            "1900".to_string(),
            EntityOverride {
                median_percentage: Some(150.0),
                static_threshold: None,
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn override_resolution_falls_back_to_defaults() {
        let mut config = AnalysisConfig::default();
        config.entity_overrides.insert(
            "1900".to_string(),
            EntityOverride {
                median_percentage: Some(80.0),
                static_threshold: None,
            },
        );

        let overridden = config.thresholds_for("1900");
        assert_eq!(overridden.median_percentage, 80.0);
        assert_eq!(overridden.static_threshold, 95.0);

        let plain = config.thresholds_for("388042");
        assert_eq!(plain.median_percentage, 90.0);
        assert_eq!(plain.static_threshold, 95.0);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{
                "default_median_percentage": 85.0,
                "entity_overrides": {
                    "1900": { "static_threshold": 90.0 }
                }
            }"#,
        )
        .expect("parse");
        assert_eq!(config.default_median_percentage, 85.0);
        assert_eq!(config.min_duration_minutes, 5);
        assert_eq!(
            config.entity_overrides["1900"].static_threshold,
            Some(90.0)
        );
    }
}
