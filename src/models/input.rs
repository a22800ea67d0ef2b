//! Input snapshot and its indexed form.
//!
//! [`TimetableInput`] is the read-only snapshot the collaborator layer
//! hands to a construction run. [`Catalog`] resolves it for one period:
//! sections in scope with their course and capacity, rooms in stable
//! order, and preference lookups.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::calendar::day_index;
use super::{
    Course, DayPreference, Offering, Period, Room, Section, Teacher, TeacherPreference,
    Unavailability,
};
use crate::config::ScheduleWindow;

/// Everything a construction run reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableInput {
    /// Known academic periods.
    #[serde(default)]
    pub periods: Vec<Period>,
    /// Global teaching window. `None` falls back to 07:00-22:00.
    #[serde(default)]
    pub window: Option<ScheduleWindow>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub offerings: Vec<Offering>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub unavailability: Vec<Unavailability>,
    #[serde(default)]
    pub teacher_preferences: Vec<TeacherPreference>,
    #[serde(default)]
    pub day_preferences: Vec<DayPreference>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl TimetableInput {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a period.
    pub fn with_period(mut self, period: Period) -> Self {
        self.periods.push(period);
        self
    }

    /// Sets the global teaching window.
    pub fn with_window(mut self, window: ScheduleWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds an offering.
    pub fn with_offering(mut self, offering: Offering) -> Self {
        self.offerings.push(offering);
        self
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds an unavailability interval.
    pub fn with_unavailability(mut self, interval: Unavailability) -> Self {
        self.unavailability.push(interval);
        self
    }

    /// Adds a teacher preference.
    pub fn with_teacher_preference(mut self, preference: TeacherPreference) -> Self {
        self.teacher_preferences.push(preference);
        self
    }

    /// Adds a day preference.
    pub fn with_day_preference(mut self, preference: DayPreference) -> Self {
        self.day_preferences.push(preference);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Replaces an offering's sections with `n` fresh ones.
    ///
    /// Returns `false` if the offering is unknown.
    pub fn resize_sections(&mut self, offering_id: &str, n: u32) -> bool {
        let Some(offering) = self.offerings.iter_mut().find(|o| o.id == offering_id) else {
            return false;
        };
        let fresh = offering.resize_sections(n);
        self.sections.retain(|s| s.offering_id != offering_id);
        self.sections.extend(fresh);
        true
    }
}

/// A section resolved against its offering and course.
#[derive(Debug, Clone)]
pub struct SectionUnit {
    /// The section itself.
    pub section: Section,
    /// Its course.
    pub course: Course,
    /// Seats a room must offer.
    pub capacity: u32,
}

impl SectionUnit {
    /// Human-readable label, e.g. "CS101-2".
    pub fn label(&self) -> String {
        format!("{}-{}", self.course.code, self.section.code)
    }
}

/// One period's input, indexed for the construction engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Target period.
    pub period: Period,
    /// Sections of the period's offerings, in input order.
    pub sections: Vec<SectionUnit>,
    /// All rooms, sorted by id.
    pub rooms: Vec<Room>,
    /// All teachers by id.
    pub teachers: BTreeMap<String, Teacher>,
    /// Standing teacher unavailability.
    pub unavailability: Vec<Unavailability>,
    /// Eligible teachers per course, in preference order, vetoes removed.
    teacher_preferences: HashMap<String, Vec<String>>,
    /// Preferred day indices per course.
    day_preferences: HashMap<String, HashSet<u8>>,
}

impl Catalog {
    /// Indexes the snapshot for `period`.
    ///
    /// Sections whose offering or course cannot be resolved are skipped;
    /// run [`validate_input`](crate::validation::validate_input) first to
    /// surface them.
    pub fn build(input: &TimetableInput, period: Period) -> Self {
        let courses: HashMap<&str, &Course> =
            input.courses.iter().map(|c| (c.id.as_str(), c)).collect();
        let offerings: HashMap<&str, &Offering> = input
            .offerings
            .iter()
            .filter(|o| o.period_id == period.id)
            .map(|o| (o.id.as_str(), o))
            .collect();

        let sections = input
            .sections
            .iter()
            .filter_map(|section| {
                let offering = offerings.get(section.offering_id.as_str())?;
                let course = courses.get(offering.course_id.as_str())?;
                Some(SectionUnit {
                    section: section.clone(),
                    course: (*course).clone(),
                    capacity: section.effective_capacity(offering),
                })
            })
            .collect();

        let mut rooms = input.rooms.clone();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));

        let vetoed: HashSet<(&str, &str)> = input
            .teacher_preferences
            .iter()
            .filter(|p| p.level.is_veto())
            .map(|p| (p.course_id.as_str(), p.teacher_id.as_str()))
            .collect();
        let mut teacher_preferences: HashMap<String, Vec<String>> = HashMap::new();
        for pref in &input.teacher_preferences {
            if vetoed.contains(&(pref.course_id.as_str(), pref.teacher_id.as_str())) {
                continue;
            }
            let list = teacher_preferences.entry(pref.course_id.clone()).or_default();
            if !list.contains(&pref.teacher_id) {
                list.push(pref.teacher_id.clone());
            }
        }

        let mut day_preferences: HashMap<String, HashSet<u8>> = HashMap::new();
        for pref in &input.day_preferences {
            if let Some(day) = day_index(pref.day) {
                day_preferences
                    .entry(pref.course_id.clone())
                    .or_default()
                    .insert(day);
            }
        }

        Self {
            period,
            sections,
            rooms,
            teachers: input
                .teachers
                .iter()
                .map(|t| (t.id.clone(), t.clone()))
                .collect(),
            unavailability: input.unavailability.clone(),
            teacher_preferences,
            day_preferences,
        }
    }

    /// Teachers allowed to teach a course, in preference order.
    ///
    /// A teacher with a veto entry for the course is never listed, even
    /// if the course also carries a regular entry for them.
    pub fn eligible_teachers(&self, course_id: &str) -> &[String] {
        self.teacher_preferences
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a teacher has an explicit preference entry for a course.
    pub fn prefers_teacher(&self, course_id: &str, teacher_id: &str) -> bool {
        self.eligible_teachers(course_id)
            .iter()
            .any(|t| t == teacher_id)
    }

    /// Whether a day index is among a course's preferred days.
    pub fn prefers_day(&self, course_id: &str, day: u8) -> bool {
        self.day_preferences
            .get(course_id)
            .is_some_and(|days| days.contains(&day))
    }

    /// Looks up a section by id.
    pub fn section(&self, section_id: &str) -> Option<&SectionUnit> {
        self.sections.iter().find(|s| s.section.id == section_id)
    }

    /// Looks up a room by id.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Ids of every section in scope.
    pub fn section_ids(&self) -> HashSet<String> {
        self.sections.iter().map(|s| s.section.id.clone()).collect()
    }
}
