use crate::analysis::{segmentation, thresholds};
use crate::config::AnalysisConfig;
use crate::correlation::{consolidate, window};
use crate::error::{AnalysisError, SkipReason, SkippedEntity};
use crate::ids;
use crate::model::{AlarmEvent, CorrelationResult, DegradationPeriod, EntityStats, KpiSample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one detection run produces: correlation results ordered by
/// `(entity_id, start)`, the per-entity statistics actually applied, and the
/// entities excluded from detection with their reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub results: Vec<CorrelationResult>,
    pub entity_stats: Vec<EntityStats>,
    pub skipped_entities: Vec<SkippedEntity>,
}

/// Aggregate counts over one outcome, for reporting collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_degradations: usize,
    pub affected_entities: usize,
    pub total_correlated_alarms: usize,
    pub degradations_with_alarms: usize,
    pub degradations_without_alarms: usize,
}

/// Fills in `canonical_entity_id` from the raw managed-object path. An
/// already-present id is kept; an unresolvable path leaves the event
/// unmatchable rather than failing.
pub fn canonicalize_alarms(alarms: &[AlarmEvent]) -> Vec<AlarmEvent> {
    alarms
        .iter()
        .map(|alarm| {
            let mut alarm = alarm.clone();
            if alarm.canonical_entity_id.is_none() {
                alarm.canonical_entity_id = ids::resolve(&alarm.raw_object_path);
            }
            alarm
        })
        .collect()
}

/// Runs match-then-consolidate for one degradation. A period with no alarms
/// in its window still yields a result with an empty list — the explicit
/// "no FM correlation found" signal.
pub fn correlate_period(
    period: DegradationPeriod,
    canonicalized_alarms: &[AlarmEvent],
    config: &AnalysisConfig,
) -> CorrelationResult {
    let matched = window::alarms_in_window(
        &period,
        canonicalized_alarms,
        config.time_before(),
        config.time_after(),
    );
    let consolidated_alarms = consolidate::consolidate(&period, &matched);
    CorrelationResult {
        degradation: period,
        consolidated_alarms,
    }
}

/// Full pipeline over one input snapshot: thresholds, segmentation, alarm
/// matching and consolidation. Per-entity failures are isolated — a skipped
/// entity never prevents others from being processed. The only hard failure
/// is an invalid configuration, rejected before any entity work.
pub fn analyze(
    samples: &[KpiSample],
    alarms: &[AlarmEvent],
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, AnalysisError> {
    config.validate()?;

    let canonicalized_alarms = canonicalize_alarms(alarms);
    let unmatchable = canonicalized_alarms
        .iter()
        .filter(|a| a.canonical_entity_id.is_none())
        .count();
    if unmatchable > 0 {
        tracing::debug!(
            count = unmatchable,
            "alarm events without canonical entity id; excluded from matching"
        );
    }

    let mut by_entity: BTreeMap<String, Vec<KpiSample>> = BTreeMap::new();
    for sample in samples {
        by_entity
            .entry(ids::normalize_entity(&sample.entity_id))
            .or_default()
            .push(sample.clone());
    }
    // Entities configured with overrides but absent from the stream are
    // reported as skipped rather than silently ignored.
    for entity_id in config.entity_overrides.keys() {
        by_entity.entry(entity_id.clone()).or_default();
    }

    let mut results = Vec::new();
    let mut entity_stats = Vec::new();
    let mut skipped_entities = Vec::new();

    for (entity_id, mut entity_samples) in by_entity {
        entity_samples.sort_by_key(|s| s.timestamp);
        let values: Vec<f64> = entity_samples.iter().map(|s| s.value).collect();

        let settings = config.thresholds_for(&entity_id);
        let Some(entity_thresholds) = thresholds::compute(&values, settings) else {
            tracing::warn!(entity = %entity_id, "skipping entity with no usable samples");
            skipped_entities.push(SkippedEntity {
                entity_id,
                reason: SkipReason::InsufficientData,
            });
            continue;
        };

        entity_stats.push(thresholds::entity_stats(
            &entity_id,
            &values,
            &entity_thresholds,
        ));

        let periods = segmentation::segment(
            &entity_id,
            &entity_samples,
            &entity_thresholds,
            config.min_duration(),
            &config.severity_cut_points,
        );
        if !periods.is_empty() {
            tracing::debug!(
                entity = %entity_id,
                periods = periods.len(),
                baseline = entity_thresholds.baseline,
                "detected degradation periods"
            );
        }

        for period in periods {
            results.push(correlate_period(period, &canonicalized_alarms, config));
        }
    }

    tracing::info!(
        degradations = results.len(),
        entities = entity_stats.len(),
        skipped = skipped_entities.len(),
        "analysis run complete"
    );

    Ok(AnalysisOutcome {
        results,
        entity_stats,
        skipped_entities,
    })
}

pub fn summarize(outcome: &AnalysisOutcome) -> AnalysisSummary {
    let total_degradations = outcome.results.len();
    let affected_entities = outcome
        .results
        .iter()
        .map(|r| r.degradation.entity_id.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let total_correlated_alarms = outcome
        .results
        .iter()
        .map(|r| r.consolidated_alarms.len())
        .sum();
    let degradations_with_alarms = outcome
        .results
        .iter()
        .filter(|r| !r.consolidated_alarms.is_empty())
        .count();

    AnalysisSummary {
        total_degradations,
        affected_entities,
        total_correlated_alarms,
        degradations_with_alarms,
        degradations_without_alarms: total_degradations - degradations_with_alarms,
    }
}
