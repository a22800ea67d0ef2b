//! Teacher and day preferences per course.
//!
//! Teacher preferences double as the allow-list of teachers for a
//! course: a teacher-required course with no entries cannot be
//! scheduled. A [`PreferenceLevel::Veto`] entry bars the teacher from
//! the course instead. Day preferences are soft and only affect scoring.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A teacher allowed (and preferred) to teach a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherPreference {
    /// Course the preference applies to.
    pub course_id: String,
    /// Preferred teacher.
    pub teacher_id: String,
    /// Strength of the preference. Only [`PreferenceLevel::Veto`] changes
    /// eligibility; the other levels do not affect scoring.
    #[serde(default)]
    pub level: PreferenceLevel,
}

/// Strength of a teacher preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceLevel {
    /// Strongly preferred.
    #[serde(alias = "alto")]
    High,
    /// Regular preference.
    #[default]
    Normal,
    /// Acceptable fallback.
    #[serde(alias = "baja")]
    Low,
    /// Must not teach the course.
    #[serde(alias = "nula")]
    Veto,
}

impl PreferenceLevel {
    /// Whether the entry bars the teacher from the course.
    #[inline]
    pub fn is_veto(self) -> bool {
        self == PreferenceLevel::Veto
    }
}

/// A day on which a course prefers to meet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPreference {
    /// Course the preference applies to.
    pub course_id: String,
    /// Preferred day.
    pub day: Weekday,
}

impl TeacherPreference {
    /// Creates a normal-level preference.
    pub fn new(course_id: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            teacher_id: teacher_id.into(),
            level: PreferenceLevel::Normal,
        }
    }

    /// Sets the preference level.
    pub fn with_level(mut self, level: PreferenceLevel) -> Self {
        self.level = level;
        self
    }

    /// Creates an entry barring `teacher_id` from `course_id`.
    pub fn veto(course_id: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self::new(course_id, teacher_id).with_level(PreferenceLevel::Veto)
    }
}

impl DayPreference {
    /// Creates a day preference.
    pub fn new(course_id: impl Into<String>, day: Weekday) -> Self {
        Self {
            course_id: course_id.into(),
            day,
        }
    }
}
