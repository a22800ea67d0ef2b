//! Weekly calendar primitives.
//!
//! The timetable grid is one week of operational days (Monday through
//! Saturday, day index 0..=5) crossed with whole hours of the day.
//!
//! # Time Model
//! Hours are whole hours of the day (e.g., 7 = 07:00). Ranges are
//! half-open: `[start, end)` includes `start` and excludes `end`, so a
//! 2-hour class starting at 8 occupies hours 8 and 9 and ends at 10:00.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Days on which classes may be held, in day-index order.
pub const OPERATIONAL_DAYS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Day index (0 = Monday) of an operational day. `None` for Sunday.
pub fn day_index(day: Weekday) -> Option<u8> {
    match day {
        Weekday::Sun => None,
        other => Some(other.num_days_from_monday() as u8),
    }
}

/// Weekday for an operational day index.
pub fn weekday_of(index: u8) -> Option<Weekday> {
    OPERATIONAL_DAYS.get(index as usize).copied()
}

/// A half-open range of whole hours `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HourRange {
    /// First occupied hour (inclusive).
    pub start: u32,
    /// First free hour after the range (exclusive).
    pub end: u32,
}

impl HourRange {
    /// Creates a range. `end < start` collapses to an empty range at `start`.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range of `duration` hours beginning at `start`.
    pub fn starting_at(start: u32, duration: u32) -> Self {
        Self::new(start, start.saturating_add(duration))
    }

    /// Number of hours covered.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the range covers no hour.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether an hour falls within this range.
    #[inline]
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Whether two ranges share at least one hour.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies fully inside this range.
    pub fn covers(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Iterates over the covered hours.
    pub fn hours(&self) -> std::ops::Range<u32> {
        self.start..self.end
    }
}

impl std::fmt::Display for HourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

/// A standing period in which a teacher cannot teach.
///
/// Hard exclusion, not a preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unavailability {
    /// Teacher this interval belongs to.
    pub teacher_id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Interval start (inclusive).
    pub start: NaiveTime,
    /// Interval end (exclusive).
    pub end: NaiveTime,
}

impl Unavailability {
    /// Creates an unavailability interval.
    pub fn new(
        teacher_id: impl Into<String>,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            day,
            start,
            end,
        }
    }

    /// Interval between two whole hours.
    pub fn hours(teacher_id: impl Into<String>, day: Weekday, start: u32, end: u32) -> Self {
        Self::new(teacher_id, day, whole_hour(start), whole_hour(end))
    }

    /// Whole hours blocked on the grid: `[start.hour, end.hour)`.
    ///
    /// Minutes are dropped on both ends, so 08:30-10:45 blocks 8 and 9.
    pub fn blocked_hours(&self) -> HourRange {
        HourRange::new(self.start.hour(), self.end.hour())
    }

    /// Exact length in hours, minutes included.
    pub fn duration_hours(&self) -> f64 {
        let secs = (self.end - self.start).num_seconds().max(0);
        secs as f64 / 3600.0
    }
}

/// `NaiveTime` at the top of an hour. Hours past 23 clamp to 23:00.
pub fn whole_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_index_mapping() {
        assert_eq!(day_index(Weekday::Mon), Some(0));
        assert_eq!(day_index(Weekday::Sat), Some(5));
        assert_eq!(day_index(Weekday::Sun), None);
        assert_eq!(weekday_of(2), Some(Weekday::Wed));
        assert_eq!(weekday_of(6), None);
    }

    #[test]
    fn test_hour_range_basics() {
        let r = HourRange::starting_at(8, 3);
        assert_eq!(r.len(), 3);
        assert!(r.contains(8));
        assert!(r.contains(10));
        assert!(!r.contains(11));
        assert_eq!(r.hours().collect::<Vec<_>>(), vec![8, 9, 10]);
        assert_eq!(r.to_string(), "08:00-11:00");
        assert!(HourRange::new(9, 7).is_empty());
    }

    #[test]
    fn test_hour_range_overlap() {
        let a = HourRange::new(8, 10);
        let b = HourRange::new(10, 12);
        let c = HourRange::new(9, 11);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert!(HourRange::new(7, 22).covers(&a));
        assert!(!a.covers(&c));
    }

    #[test]
    fn test_unavailability_drops_minutes() {
        let u = Unavailability::new(
            "T1",
            Weekday::Mon,
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 45, 0).unwrap(),
        );
        assert_eq!(u.blocked_hours(), HourRange::new(8, 10));
        assert!((u.duration_hours() - 2.25).abs() < 1e-10);
    }

    #[test]
    fn test_unavailability_whole_hours() {
        let u = Unavailability::hours("T1", Weekday::Tue, 8, 12);
        assert_eq!(u.blocked_hours().len(), 4);
        assert!((u.duration_hours() - 4.0).abs() < 1e-10);
    }
}
