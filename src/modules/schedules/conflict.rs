//! Pure overlap logic for weekly meeting slots.
//!
//! Intervals are half-open `[start, end)`: back-to-back slots that touch at
//! a boundary do not conflict. The linear scan is fine here; a room or a
//! professor holds at most a handful of slots per weekday.

use chrono::NaiveTime;

use crate::modules::schedules::model::ClassSchedule;

/// Whether two half-open time intervals on the same day overlap.
pub fn overlaps(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Find the first existing slot the candidate interval collides with.
pub fn find_conflict<'a>(
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
    existing: &'a [ClassSchedule],
) -> Option<&'a ClassSchedule> {
    existing.iter().find(|slot| {
        slot.day_of_week == day_of_week
            && overlaps(start_time, end_time, slot.start_time, slot.end_time)
    })
}

pub fn valid_day_of_week(day_of_week: i16) -> bool {
    (1..=7).contains(&day_of_week)
}
