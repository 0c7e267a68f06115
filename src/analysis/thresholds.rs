use crate::analysis::stats;
use crate::config::ThresholdSettings;
use crate::model::EntityStats;
use statrs::statistics::Statistics;

/// Degradation bars in effect for one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityThresholds {
    pub median: f64,
    /// Entity-median-relative bar: `median * median_percentage / 100`.
    pub dynamic: f64,
    /// Absolute bar from configuration.
    pub static_threshold: f64,
    /// The tighter (lower) of the two bars, used for deviation math.
    pub baseline: f64,
}

/// Computes the dual thresholds from an entity's sample values. `None` means
/// the entity has no usable samples and must be skipped from detection.
pub fn compute(values: &[f64], settings: ThresholdSettings) -> Option<EntityThresholds> {
    let median = stats::median(values)?;
    let dynamic = median * (settings.median_percentage / 100.0);
    let static_threshold = settings.static_threshold;
    Some(EntityThresholds {
        median,
        dynamic,
        static_threshold,
        baseline: dynamic.min(static_threshold),
    })
}

/// A sample is degraded only when it is below both bars. A point below one
/// bar alone is not degraded.
pub fn is_degraded(value: f64, thresholds: &EntityThresholds) -> bool {
    value < thresholds.dynamic && value < thresholds.static_threshold
}

/// Per-entity sample statistics alongside the thresholds actually applied.
pub fn entity_stats(entity_id: &str, values: &[f64], thresholds: &EntityThresholds) -> EntityStats {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let count = finite.len();
    let mean = finite.iter().copied().mean();
    let std_dev = if count > 1 {
        finite.iter().copied().std_dev()
    } else {
        0.0
    };
    let quantile_or_median =
        |q: f64| stats::quantile(&finite, q).unwrap_or(thresholds.median);

    EntityStats {
        entity_id: entity_id.to_string(),
        sample_count: count,
        mean,
        median: thresholds.median,
        std_dev,
        min: finite.iter().copied().fold(f64::INFINITY, f64::min),
        max: finite.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        p5: quantile_or_median(0.05),
        p10: quantile_or_median(0.10),
        p25: quantile_or_median(0.25),
        p75: quantile_or_median(0.75),
        p90: quantile_or_median(0.90),
        p95: quantile_or_median(0.95),
        dynamic_threshold: thresholds.dynamic,
        static_threshold: thresholds.static_threshold,
        baseline: thresholds.baseline,
    }
}
