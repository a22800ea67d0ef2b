//! Run report and failure diagnostics.
//!
//! Hard-constraint violations found during the search never raise
//! errors. They are collected as [`Rejection`]s and surface only when a
//! block has no surviving candidate.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{weekday_of, HourRange, Placement, RoomCategory, SessionType, Timetable};

/// Why one candidate (or a whole block) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The cohort already attends another class.
    CohortClash { cycle: u32, day: u8, hours: HourRange },
    /// The teacher is booked or unavailable.
    TeacherBusy {
        teacher_id: String,
        day: u8,
        hours: HourRange,
    },
    /// No free room of the category seats the section.
    NoFreeRoom {
        category: RoomCategory,
        day: u8,
        hours: HourRange,
    },
    /// The block is longer than the teaching window.
    BlockTooLong { duration: u32, window: HourRange },
    /// The course requires a teacher but allows none.
    NoEligibleTeacher,
}

struct Day(u8);

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match weekday_of(self.0) {
            Some(day) => write!(f, "{day}"),
            None => write!(f, "day {}", self.0),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::CohortClash { cycle, day, hours } => {
                write!(f, "cycle {cycle} clash on {} {hours}", Day(*day))
            }
            Rejection::TeacherBusy {
                teacher_id,
                day,
                hours,
            } => write!(f, "teacher {teacher_id} busy on {} {hours}", Day(*day)),
            Rejection::NoFreeRoom {
                category,
                day,
                hours,
            } => write!(f, "no free {category} on {} {hours}", Day(*day)),
            Rejection::BlockTooLong { duration, window } => {
                write!(f, "{duration}h block does not fit window {window}")
            }
            Rejection::NoEligibleTeacher => f.write_str("no eligible teacher"),
        }
    }
}

/// A block that found no candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockFailure {
    /// Session types the block was meant to hold, in order.
    pub session_types: Vec<SessionType>,
    /// Distinct rejections met during the search.
    pub rejections: BTreeSet<Rejection>,
}

impl fmt::Display for BlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.session_types.iter().map(|t| t.label()).collect();
        write!(f, "{}: ", kinds.join("+"))?;
        let reasons: Vec<String> = self.rejections.iter().map(ToString::to_string).collect();
        f.write_str(&reasons.join("; "))
    }
}

/// Why a section could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionFailure {
    /// The course requires a teacher and lists none.
    NoEligibleTeacher,
    /// At least one block found no candidate. For teacher-required
    /// courses this is the last teacher tried.
    Unplaced {
        teacher_id: Option<String>,
        blocks: Vec<BlockFailure>,
    },
}

impl fmt::Display for SectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFailure::NoEligibleTeacher => f.write_str("no eligible teacher for this course"),
            SectionFailure::Unplaced { teacher_id, blocks } => {
                if let Some(teacher) = teacher_id {
                    write!(f, "no eligible teacher could take every block (last tried {teacher}); ")?;
                }
                let blocks: Vec<String> = blocks.iter().map(ToString::to_string).collect();
                f.write_str(&blocks.join(" | "))
            }
        }
    }
}

/// A section committed to the timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSection {
    pub section_id: String,
    /// Human-readable label, e.g. "CS101-1".
    pub label: String,
    /// Teacher bound to every placement, if the course requires one.
    pub teacher_id: Option<String>,
    /// Sum of the chosen candidates' scores.
    pub score: f64,
    /// Number of placements created.
    pub placements: usize,
}

/// A section left out of the timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedSection {
    pub section_id: String,
    pub label: String,
    pub failure: SectionFailure,
}

impl fmt::Display for FailedSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.failure)
    }
}

/// A room-hour nobody uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VacantSlot {
    pub room_id: String,
    pub day: u8,
    pub hour: u32,
}

/// Outcome of one construction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Period built.
    pub period_id: String,
    /// Prior placements removed before the run.
    pub cleared: usize,
    /// Sections committed, in processing order.
    pub placed: Vec<PlacedSection>,
    /// Sections that could not be placed, in processing order.
    pub failed: Vec<FailedSection>,
    /// Room-hours left unused, by day, hour, then room.
    pub vacant_slots: Vec<VacantSlot>,
    /// Placements created by this run.
    pub placements: Vec<Placement>,
}

impl RunReport {
    /// Whether every section was placed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Sections attempted.
    pub fn attempted(&self) -> usize {
        self.placed.len() + self.failed.len()
    }

    /// One diagnostic line per failed section.
    pub fn diagnostics(&self) -> Vec<String> {
        self.failed.iter().map(ToString::to_string).collect()
    }

    /// Finds a placed section.
    pub fn placed_section(&self, section_id: &str) -> Option<&PlacedSection> {
        self.placed.iter().find(|p| p.section_id == section_id)
    }

    /// Finds a failed section.
    pub fn failed_section(&self, section_id: &str) -> Option<&FailedSection> {
        self.failed.iter().find(|f| f.section_id == section_id)
    }

    /// The placements as a timetable.
    pub fn timetable(&self) -> Timetable {
        Timetable {
            placements: self.placements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let r = Rejection::TeacherBusy {
            teacher_id: "T1".into(),
            day: 0,
            hours: HourRange::new(8, 10),
        };
        assert_eq!(r.to_string(), "teacher T1 busy on Mon 08:00-10:00");

        let r = Rejection::NoFreeRoom {
            category: RoomCategory::Lab,
            day: 5,
            hours: HourRange::new(14, 16),
        };
        assert_eq!(r.to_string(), "no free lab on Sat 14:00-16:00");
    }

    #[test]
    fn test_failure_display() {
        let mut rejections = BTreeSet::new();
        rejections.insert(Rejection::CohortClash {
            cycle: 3,
            day: 1,
            hours: HourRange::new(8, 11),
        });
        let failed = FailedSection {
            section_id: "S1".into(),
            label: "MAT-1".into(),
            failure: SectionFailure::Unplaced {
                teacher_id: None,
                blocks: vec![BlockFailure {
                    session_types: vec![SessionType::Theory, SessionType::Practice],
                    rejections,
                }],
            },
        };
        assert_eq!(
            failed.to_string(),
            "MAT-1: theory+practice: cycle 3 clash on Tue 08:00-11:00"
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport {
            period_id: "P1".into(),
            failed: vec![FailedSection {
                section_id: "S1".into(),
                label: "MAT-1".into(),
                failure: SectionFailure::NoEligibleTeacher,
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0]["failure"]["kind"], "no_eligible_teacher");
        assert!(!report.is_complete());
        assert_eq!(report.attempted(), 1);
        assert_eq!(
            report.diagnostics(),
            vec!["MAT-1: no eligible teacher for this course".to_string()]
        );
    }
}
