use crate::model::{
    AlarmEvent, ConsolidatedAlarm, DegradationPeriod, StatusEvent, TemporalRelation,
};
use std::collections::BTreeMap;

/// Collapses a degradation's matched alarm events into one lifecycle record
/// per alarm id. Raw alarm rows repeat the same identity across raised,
/// severity-change and cleared events; without consolidation a downstream
/// consumer would count those as distinct alarms.
///
/// Output is ordered by earliest event timestamp, ties broken by alarm id.
pub fn consolidate(
    period: &DegradationPeriod,
    matched_alarms: &[&AlarmEvent],
) -> Vec<ConsolidatedAlarm> {
    let mut groups: BTreeMap<&str, Vec<&AlarmEvent>> = BTreeMap::new();
    for alarm in matched_alarms.iter().copied() {
        groups.entry(alarm.alarm_id.as_str()).or_default().push(alarm);
    }

    let mut consolidated: Vec<ConsolidatedAlarm> = groups
        .into_iter()
        .map(|(alarm_id, mut events)| {
            // Stable sort keeps input order for equal timestamps.
            events.sort_by_key(|event| event.timestamp);

            let status_timeline: Vec<StatusEvent> = events
                .iter()
                .map(|event| StatusEvent {
                    timestamp: event.timestamp,
                    severity: event.severity,
                    cleared: event.severity.is_cleared(),
                })
                .collect();

            let earliest_timestamp = status_timeline[0].timestamp;
            let temporal_relation = if earliest_timestamp < period.start {
                TemporalRelation::Before
            } else if earliest_timestamp > period.end {
                TemporalRelation::After
            } else {
                TemporalRelation::During
            };

            ConsolidatedAlarm {
                alarm_id: alarm_id.to_string(),
                entity_id: period.entity_id.clone(),
                status_timeline,
                earliest_timestamp,
                temporal_relation,
                time_offset: earliest_timestamp - period.start,
            }
        })
        .collect();

    consolidated.sort_by(|a, b| {
        (a.earliest_timestamp, a.alarm_id.as_str()).cmp(&(b.earliest_timestamp, b.alarm_id.as_str()))
    });
    consolidated
}
