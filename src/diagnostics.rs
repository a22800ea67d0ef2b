//! Capacity pre-checks.
//!
//! Read-only sanity checks that explain, before any search runs, why a
//! period is likely to leave sections unplaced:
//! - sections of teacher-required courses with no eligible teacher
//! - lab and lecture-room demand against weekly supply
//! - cohort congestion: weekly hours demanded per cycle against the grid
//! - teachers whose standing unavailability leaves little free time
//!
//! Passing every check does not guarantee a complete timetable; the
//! checks are aggregate and ignore contiguity.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::models::{day_index, Catalog, RoomCategory};
use crate::scheduler::TimeGrid;

/// Teachers with fewer free weekly hours than this are flagged.
pub const LOW_AVAILABILITY_HOURS: f64 = 10.0;

/// Cycles using more than this share of the week are at risk.
pub const CONGESTION_THRESHOLD: f64 = 0.8;

/// Free time of one teacher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherAvailability {
    pub teacher_id: String,
    /// Unavailable hours on operational days, minutes included.
    pub blocked_hours: f64,
    /// Weekly grid hours minus blocked hours, floored at zero.
    pub free_hours: f64,
}

impl TeacherAvailability {
    /// Whether the teacher has too little free time.
    pub fn is_scarce(&self) -> bool {
        self.free_hours < LOW_AVAILABILITY_HOURS
    }
}

/// Cohort congestion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Ok,
    AtRisk,
    /// More hours demanded than the week holds.
    Infeasible,
}

/// Weekly hours demanded by one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleLoad {
    pub cycle: u32,
    pub demand_hours: u32,
    pub status: LoadStatus,
}

/// Hours demanded from and offered by one room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpaceBalance {
    pub category: RoomCategory,
    pub demand_hours: u32,
    pub supply_hours: u32,
}

impl SpaceBalance {
    /// Whether demand exceeds supply.
    pub fn is_overloaded(&self) -> bool {
        self.demand_hours > self.supply_hours
    }
}

/// Result of the capacity pre-checks for one period.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityDiagnostics {
    /// Grid hours per week.
    pub weekly_hours: u32,
    /// Labels of teacher-required sections without any eligible teacher.
    pub sections_without_teacher: Vec<String>,
    pub rooms: SpaceBalance,
    pub labs: SpaceBalance,
    /// Per cycle, ascending.
    pub cycles: Vec<CycleLoad>,
    /// Per teacher, by id.
    pub teachers: Vec<TeacherAvailability>,
}

impl CapacityDiagnostics {
    /// Runs every check.
    pub fn analyze(catalog: &Catalog, grid: &TimeGrid) -> Self {
        let weekly_hours = grid.slots_per_week();

        let sections_without_teacher: Vec<String> = catalog
            .sections
            .iter()
            .filter(|unit| {
                unit.course.requires_teacher
                    && unit.course.total_hours() > 0
                    && catalog.eligible_teachers(&unit.course.id).is_empty()
            })
            .map(|unit| unit.label())
            .collect();

        let supply = |category: RoomCategory| {
            (catalog.rooms.iter().filter(|r| r.category == category).count() as u32)
                .saturating_mul(weekly_hours)
        };
        let mut rooms = SpaceBalance {
            category: RoomCategory::Room,
            demand_hours: 0,
            supply_hours: supply(RoomCategory::Room),
        };
        let mut labs = SpaceBalance {
            category: RoomCategory::Lab,
            demand_hours: 0,
            supply_hours: supply(RoomCategory::Lab),
        };
        let mut by_cycle: BTreeMap<u32, u32> = BTreeMap::new();
        for unit in &catalog.sections {
            let course = &unit.course;
            if course.requires_room {
                rooms.demand_hours = rooms.demand_hours.saturating_add(course.theoretical_hours);
            }
            if course.requires_lab {
                labs.demand_hours = labs.demand_hours.saturating_add(course.practical_hours);
            }
            let demand = by_cycle.entry(course.cycle).or_insert(0);
            *demand = demand.saturating_add(course.total_hours());
        }

        let cycles = by_cycle
            .into_iter()
            .map(|(cycle, demand_hours)| {
                let status = if demand_hours > weekly_hours {
                    LoadStatus::Infeasible
                } else if demand_hours as f64 > CONGESTION_THRESHOLD * weekly_hours as f64 {
                    LoadStatus::AtRisk
                } else {
                    LoadStatus::Ok
                };
                CycleLoad {
                    cycle,
                    demand_hours,
                    status,
                }
            })
            .collect();

        let teachers = catalog
            .teachers
            .keys()
            .map(|teacher_id| {
                let blocked_hours: f64 = catalog
                    .unavailability
                    .iter()
                    .filter(|u| &u.teacher_id == teacher_id && day_index(u.day).is_some())
                    .map(|u| u.duration_hours())
                    .sum();
                TeacherAvailability {
                    teacher_id: teacher_id.clone(),
                    blocked_hours,
                    free_hours: (weekly_hours as f64 - blocked_hours).max(0.0),
                }
            })
            .collect();

        let diagnostics = Self {
            weekly_hours,
            sections_without_teacher,
            rooms,
            labs,
            cycles,
            teachers,
        };
        debug!(
            period = %catalog.period.id,
            findings = diagnostics.findings().len(),
            "capacity diagnostics computed"
        );
        diagnostics
    }

    /// Whether no check rules a complete timetable out.
    pub fn is_feasible(&self) -> bool {
        self.sections_without_teacher.is_empty()
            && !self.rooms.is_overloaded()
            && !self.labs.is_overloaded()
            && self.cycles.iter().all(|c| c.status != LoadStatus::Infeasible)
    }

    /// Teachers with too little free time.
    pub fn scarce_teachers(&self) -> impl Iterator<Item = &TeacherAvailability> {
        self.teachers.iter().filter(|t| t.is_scarce())
    }

    /// One line per problem found.
    pub fn findings(&self) -> Vec<String> {
        let mut findings = Vec::new();
        if !self.sections_without_teacher.is_empty() {
            findings.push(format!(
                "{} section(s) have no eligible teacher: {}",
                self.sections_without_teacher.len(),
                self.sections_without_teacher.join(", ")
            ));
        }
        for balance in [&self.rooms, &self.labs] {
            if balance.is_overloaded() {
                findings.push(format!(
                    "{} demand of {}h exceeds weekly supply of {}h",
                    balance.category, balance.demand_hours, balance.supply_hours
                ));
            }
        }
        for load in &self.cycles {
            match load.status {
                LoadStatus::Ok => {}
                LoadStatus::AtRisk => findings.push(format!(
                    "cycle {} needs {}h of a {}h week",
                    load.cycle, load.demand_hours, self.weekly_hours
                )),
                LoadStatus::Infeasible => findings.push(format!(
                    "cycle {} needs {}h but the week holds {}h",
                    load.cycle, load.demand_hours, self.weekly_hours
                )),
            }
        }
        for teacher in self.scarce_teachers() {
            findings.push(format!(
                "teacher {} has only {:.1}h free",
                teacher.teacher_id, teacher.free_hours
            ));
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Course, Offering, Period, Room, Section, Teacher, TeacherPreference, TimetableInput,
        Unavailability,
    };
    use chrono::{NaiveTime, Weekday};

    fn input() -> TimetableInput {
        TimetableInput::new()
            .with_period(Period::new("P1", "2026-I"))
            .with_course(
                Course::new("MAT", 1)
                    .with_hours(4, 4)
                    .requiring_teacher()
                    .requiring_room()
                    .requiring_lab(),
            )
            .with_course(Course::new("ART", 2).with_hours(2, 0).requiring_teacher())
            .with_offering(Offering::new("O1", "MAT", "P1"))
            .with_offering(Offering::new("O2", "ART", "P1"))
            .with_section(Section::new("S1", "1", "O1"))
            .with_section(Section::new("S2", "2", "O1"))
            .with_section(Section::new("S3", "1", "O2"))
            .with_teacher(Teacher::new("T1", "Ada"))
            .with_teacher(Teacher::new("T2", "Grace"))
            .with_teacher_preference(TeacherPreference::new("MAT", "T1"))
            .with_room(Room::lecture("A1").with_capacity(30))
            .with_room(Room::lab("L1").with_capacity(30))
    }

    fn analyze(input: &TimetableInput, start: u32, end: u32) -> CapacityDiagnostics {
        let catalog = Catalog::build(input, input.periods[0].clone());
        CapacityDiagnostics::analyze(&catalog, &TimeGrid::with_hours(start, end).unwrap())
    }

    #[test]
    fn test_missing_teacher_flagged() {
        let d = analyze(&input(), 8, 14);
        assert_eq!(d.weekly_hours, 36);
        assert_eq!(d.sections_without_teacher, vec!["ART-1".to_string()]);
        assert!(!d.is_feasible());
        assert_eq!(d.findings()[0], "1 section(s) have no eligible teacher: ART-1");
    }

    #[test]
    fn test_vetoed_teacher_leaves_section_uncovered() {
        let input = input()
            .with_teacher_preference(TeacherPreference::new("ART", "T2"))
            .with_teacher_preference(TeacherPreference::veto("MAT", "T1"));
        let d = analyze(&input, 8, 14);
        assert_eq!(
            d.sections_without_teacher,
            vec!["MAT-1".to_string(), "MAT-2".to_string()]
        );
    }

    #[test]
    fn test_space_balance() {
        let d = analyze(&input(), 8, 10);
        assert_eq!(d.rooms.demand_hours, 8);
        assert_eq!(d.rooms.supply_hours, 12);
        assert_eq!(d.labs.demand_hours, 8);
        assert!(!d.labs.is_overloaded());

        let d = analyze(&input(), 8, 9);
        assert!(d.labs.is_overloaded());
        assert!(d
            .findings()
            .contains(&"lab demand of 8h exceeds weekly supply of 6h".to_string()));
    }

    #[test]
    fn test_cycle_congestion() {
        // Cycle 1 needs 16h, cycle 2 needs 2h.
        let d = analyze(&input(), 8, 11);
        assert_eq!(d.cycles[0].cycle, 1);
        assert_eq!(d.cycles[0].demand_hours, 16);
        assert_eq!(d.cycles[0].status, LoadStatus::AtRisk);
        assert_eq!(d.cycles[1].status, LoadStatus::Ok);

        let d = analyze(&input(), 8, 10);
        assert_eq!(d.cycles[0].status, LoadStatus::Infeasible);
    }

    #[test]
    fn test_teacher_free_hours() {
        let input = input()
            .with_unavailability(Unavailability::new(
                "T1",
                Weekday::Mon,
                NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ))
            .with_unavailability(Unavailability::hours("T1", Weekday::Sun, 8, 20))
            .with_unavailability(Unavailability::hours("T2", Weekday::Tue, 8, 14))
            .with_unavailability(Unavailability::hours("T2", Weekday::Wed, 8, 14))
            .with_unavailability(Unavailability::hours("T2", Weekday::Thu, 8, 14))
            .with_unavailability(Unavailability::hours("T2", Weekday::Fri, 8, 14));
        let d = analyze(&input, 8, 14);

        assert_eq!(d.teachers[0].teacher_id, "T1");
        assert!((d.teachers[0].blocked_hours - 1.5).abs() < 1e-10);
        assert!((d.teachers[0].free_hours - 34.5).abs() < 1e-10);
        assert!(!d.teachers[0].is_scarce());

        assert_eq!(d.teachers[1].free_hours, 12.0);
        assert!(!d.teachers[1].is_scarce());

        let d = analyze(&input.with_unavailability(Unavailability::hours("T2", Weekday::Sat, 8, 12)), 8, 14);
        let scarce: Vec<_> = d.scarce_teachers().map(|t| t.teacher_id.as_str()).collect();
        assert_eq!(scarce, vec!["T2"]);
        assert!(d.findings().contains(&"teacher T2 has only 8.0h free".to_string()));
    }
}
