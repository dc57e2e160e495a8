//! Weekly schedule validation.
//!
//! A schedule maps a day label to a list of `{inicio, fin}` ranges. Within a
//! day no two ranges may overlap. Times are compared as strings, which is
//! only correct while every time uses the same zero-padded `HH:MM` form
//! ("9:00" sorts after "10:00"). Inputs are not normalised.

use serde_json::Value;

use crate::models::{TimeRange, WeeklySchedule};

/// Parse an untyped `dias_horarios` value. Returns `None` unless the value
/// is an object whose entries are arrays of `{inicio, fin}` string pairs.
pub fn parse_schedule(value: &Value) -> Option<WeeklySchedule> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// True if any day contains two ranges where one starts before the
/// previous (by start time) has ended. Touching ranges are allowed.
pub fn has_overlaps(schedule: &WeeklySchedule) -> bool {
    schedule
        .days()
        .any(|(_, ranges)| day_has_overlap(ranges))
}

fn day_has_overlap(ranges: &[TimeRange]) -> bool {
    let mut sorted: Vec<&TimeRange> = ranges.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start));
    sorted
        .windows(2)
        .any(|pair| pair[1].start.as_str() < pair[0].end.as_str())
}
