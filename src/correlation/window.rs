use crate::model::{AlarmEvent, DegradationPeriod};
use chrono::Duration;

/// Selects the alarm events belonging to a degradation's search window:
/// the closed interval `[start - time_before, end + time_after]`, restricted
/// to exact canonical-entity matches. Events without a canonical entity id
/// never match anything.
pub fn alarms_in_window<'a>(
    period: &DegradationPeriod,
    alarms: &'a [AlarmEvent],
    time_before: Duration,
    time_after: Duration,
) -> Vec<&'a AlarmEvent> {
    let window_start = period.start - time_before;
    let window_end = period.end + time_after;

    alarms
        .iter()
        .filter(|alarm| {
            alarm
                .canonical_entity_id
                .as_deref()
                .is_some_and(|id| id == period.entity_id)
        })
        .filter(|alarm| alarm.timestamp >= window_start && alarm.timestamp <= window_end)
        .collect()
}
