//! Timetable (solution) model.
//!
//! A timetable is the set of committed placements for one period. Each
//! placement binds one session block of a section to a day, an hour
//! range, and optionally a teacher and a room.
//!
//! Placements are append-only within a construction run and never
//! mutated in place.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::calendar::{whole_hour, HourRange};
use super::SessionType;

/// The committed placements of a period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// Placements in commit order.
    pub placements: Vec<Placement>,
}

/// One session block placed on the weekly grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Course taught.
    pub course_id: String,
    /// Section attending.
    pub section_id: String,
    /// Teacher bound, if the course requires one.
    pub teacher_id: Option<String>,
    /// Room bound, if the course requires a space of this session's category.
    pub room_id: Option<String>,
    /// Day index (0 = Monday .. 5 = Saturday).
    pub day: u8,
    /// First hour (inclusive).
    pub start_hour: u32,
    /// End hour (exclusive).
    pub end_hour: u32,
    /// Theory or practice.
    pub session_type: SessionType,
}

/// A broken timetable invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (teacher, room, section, or cohort).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timetable invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A teacher holds two overlapping placements.
    TeacherDoubleBooked,
    /// A placement falls inside the teacher's standing unavailability.
    TeacherUnavailable,
    /// A room hosts two overlapping placements.
    RoomDoubleBooked,
    /// Two placements of the same cohort overlap.
    CohortClash,
    /// Bound room category does not match the session type, or a room is
    /// bound where none is required (or missing where one is).
    RoomCategoryMismatch,
    /// Room seats fewer students than the section needs.
    CapacityExceeded,
    /// Placement lies outside the operational window or grid.
    OutsideWindow,
    /// A teacher-required section is taught by more than one teacher,
    /// or a placement lacks its required teacher.
    TeacherSplit,
    /// Placement refers to an unknown section, course, teacher, or room.
    UnknownReference,
}

impl Placement {
    /// Hour range covered by this placement.
    #[inline]
    pub fn hours(&self) -> HourRange {
        HourRange::new(self.start_hour, self.end_hour)
    }

    /// Duration in hours. Zero for an inverted placement.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.hours().len()
    }

    /// Start as a time of day.
    pub fn start_time(&self) -> NaiveTime {
        whole_hour(self.start_hour)
    }

    /// End as a time of day.
    pub fn end_time(&self) -> NaiveTime {
        whole_hour(self.end_hour)
    }

    /// Whether two placements share the day and at least one hour.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.hours().overlaps(&other.hours())
    }
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placement.
    pub fn add_placement(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Number of placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Total placed hours.
    pub fn total_hours(&self) -> u32 {
        self.placements
            .iter()
            .fold(0, |total, p| total.saturating_add(p.duration()))
    }

    /// Returns all placements of a section.
    pub fn placements_for_section(&self, section_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.section_id == section_id)
            .collect()
    }

    /// Returns all placements taught by a teacher.
    pub fn placements_for_teacher(&self, teacher_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.teacher_id.as_deref() == Some(teacher_id))
            .collect()
    }

    /// Returns all placements held in a room.
    pub fn placements_for_room(&self, room_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.room_id.as_deref() == Some(room_id))
            .collect()
    }

    /// Returns all placements on a day index.
    pub fn placements_on_day(&self, day: u8) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.day == day).collect()
    }

    /// Busy hours per room.
    pub fn room_hours(&self) -> HashMap<String, u32> {
        let mut busy: HashMap<String, u32> = HashMap::new();
        for p in &self.placements {
            if let Some(room) = &p.room_id {
                let hours = busy.entry(room.clone()).or_insert(0);
                *hours = hours.saturating_add(p.duration());
            }
        }
        busy
    }

    /// Assigned hours per teacher.
    pub fn teacher_hours(&self) -> HashMap<String, u32> {
        let mut load: HashMap<String, u32> = HashMap::new();
        for p in &self.placements {
            if let Some(teacher) = &p.teacher_id {
                let hours = load.entry(teacher.clone()).or_insert(0);
                *hours = hours.saturating_add(p.duration());
            }
        }
        load
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(section: &str, teacher: Option<&str>, room: Option<&str>, day: u8, start: u32, end: u32) -> Placement {
        Placement {
            course_id: "C1".into(),
            section_id: section.into(),
            teacher_id: teacher.map(Into::into),
            room_id: room.map(Into::into),
            day,
            start_hour: start,
            end_hour: end,
            session_type: SessionType::Theory,
        }
    }

    fn sample_timetable() -> Timetable {
        let mut t = Timetable::new();
        t.add_placement(placement("S1", Some("T1"), Some("A1"), 0, 8, 10));
        t.add_placement(placement("S1", Some("T1"), Some("A2"), 2, 14, 17));
        t.add_placement(placement("S2", None, Some("A1"), 0, 10, 12));
        t
    }

    #[test]
    fn test_placement_times() {
        let p = placement("S1", None, None, 0, 8, 10);
        assert_eq!(p.duration(), 2);
        assert_eq!(p.start_time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(p.end_time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_inverted_placement_has_no_duration() {
        let mut t = Timetable::new();
        t.add_placement(placement("S1", Some("T1"), Some("A1"), 0, 10, 8));
        assert_eq!(t.placements[0].duration(), 0);
        assert_eq!(t.total_hours(), 0);
        assert_eq!(t.room_hours()["A1"], 0);
        assert_eq!(t.teacher_hours()["T1"], 0);
    }

    #[test]
    fn test_placement_overlap() {
        let a = placement("S1", None, None, 0, 8, 10);
        let b = placement("S2", None, None, 0, 9, 11);
        let c = placement("S3", None, None, 0, 10, 11);
        let d = placement("S4", None, None, 1, 8, 10);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_timetable_queries() {
        let t = sample_timetable();
        assert_eq!(t.placement_count(), 3);
        assert_eq!(t.total_hours(), 7);
        assert_eq!(t.placements_for_section("S1").len(), 2);
        assert_eq!(t.placements_for_teacher("T1").len(), 2);
        assert_eq!(t.placements_for_room("A1").len(), 2);
        assert_eq!(t.placements_on_day(0).len(), 2);
    }

    #[test]
    fn test_room_and_teacher_hours() {
        let t = sample_timetable();
        let rooms = t.room_hours();
        assert_eq!(rooms.get("A1"), Some(&4));
        assert_eq!(rooms.get("A2"), Some(&3));
        assert_eq!(t.teacher_hours().get("T1"), Some(&5));
    }
}
