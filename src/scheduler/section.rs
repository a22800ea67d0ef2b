//! Per-section placement: block layout, teacher trials, and commit.
//!
//! # Block Layout
//!
//! | Course | Policy | Blocks searched |
//! |--------|--------|-----------------|
//! | no teacher | combined | one block: theory then practice |
//! | no teacher | separate | theory alone, practice alone |
//! | teacher | any | theory alone, practice alone, same forced teacher |
//!
//! Every attempt owns a fresh overlay [`Occupancy`]. The chosen candidate
//! of each block is recorded into it so later blocks of the same attempt
//! see it. A successful attempt hands the overlay to [`SectionScheduler::commit`],
//! which merges it into the permanent model; a failed attempt simply
//! drops it.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Placement, SectionUnit, SessionPolicy, SessionType};
use crate::store::PlacementStore;

use super::candidate::{BlockRequest, Candidate, CandidateGenerator, TieBreaker};
use super::occupancy::Occupancy;
use super::report::{BlockFailure, PlacedSection, SectionFailure};

/// A fully placed (not yet committed) section.
#[derive(Debug, Clone)]
pub struct SectionPlan {
    /// Teacher bound to every block, for teacher-required courses.
    pub teacher_id: Option<String>,
    /// Chosen candidate per block.
    pub candidates: Vec<Candidate>,
    /// Occupancy the candidates claim.
    pub overlay: Occupancy,
}

impl SectionPlan {
    /// Total score of the chosen candidates.
    pub fn score(&self) -> f64 {
        self.candidates.iter().map(|c| c.score).sum()
    }
}

/// Decides block layout and teacher for each section.
#[derive(Debug, Clone)]
pub struct SectionScheduler<'a> {
    generator: CandidateGenerator<'a>,
    tie: TieBreaker,
}

impl<'a> SectionScheduler<'a> {
    /// Creates a scheduler.
    pub fn new(generator: CandidateGenerator<'a>, tie: TieBreaker) -> Self {
        Self { generator, tie }
    }

    /// Searches placements for every block of a section.
    ///
    /// Reads `occupancy` but never mutates it.
    pub fn plan(
        &mut self,
        unit: &SectionUnit,
        occupancy: &Occupancy,
        eligible_teachers: &[String],
    ) -> std::result::Result<SectionPlan, SectionFailure> {
        let course = &unit.course;
        let segments = course.segments();

        if !course.requires_teacher {
            let blocks: Vec<Vec<(SessionType, u32)>> = match course.session_policy {
                SessionPolicy::Combined if segments.is_empty() => Vec::new(),
                SessionPolicy::Combined => vec![segments],
                SessionPolicy::Separate => segments.into_iter().map(|s| vec![s]).collect(),
            };
            return self
                .attempt(unit, &blocks, None, occupancy)
                .map_err(|blocks| SectionFailure::Unplaced {
                    teacher_id: None,
                    blocks,
                });
        }

        if eligible_teachers.is_empty() {
            return Err(SectionFailure::NoEligibleTeacher);
        }

        let blocks: Vec<Vec<(SessionType, u32)>> = segments.into_iter().map(|s| vec![s]).collect();
        let mut last_failure = None;
        for teacher in eligible_teachers {
            match self.attempt(unit, &blocks, Some(teacher), occupancy) {
                Ok(plan) => return Ok(plan),
                Err(blocks) => {
                    debug!(section = %unit.section.id, teacher = %teacher, "teacher trial failed");
                    last_failure = Some(SectionFailure::Unplaced {
                        teacher_id: Some(teacher.clone()),
                        blocks,
                    });
                }
            }
        }
        Err(last_failure.unwrap_or(SectionFailure::NoEligibleTeacher))
    }

    /// Tries every block with one (optional) teacher on a fresh overlay.
    fn attempt(
        &mut self,
        unit: &SectionUnit,
        blocks: &[Vec<(SessionType, u32)>],
        teacher: Option<&str>,
        occupancy: &Occupancy,
    ) -> std::result::Result<SectionPlan, Vec<BlockFailure>> {
        let mut overlay = Occupancy::new();
        let mut candidates = Vec::with_capacity(blocks.len());
        let mut failures = Vec::new();

        for structure in blocks {
            let request = BlockRequest {
                unit,
                structure,
                forced_teacher: teacher,
            };
            let view = occupancy.view_with(Some(&overlay));
            match self.generator.search(&request, &view, &mut self.tie) {
                Ok(candidate) => {
                    candidate.record_into(&unit.course, &mut overlay);
                    candidates.push(candidate);
                }
                Err(rejections) => failures.push(BlockFailure {
                    session_types: request.session_types(),
                    rejections,
                }),
            }
        }

        if failures.is_empty() {
            Ok(SectionPlan {
                teacher_id: teacher
                    .filter(|_| unit.course.requires_teacher)
                    .map(str::to_string),
                candidates,
                overlay,
            })
        } else {
            Err(failures)
        }
    }

    /// Persists a plan and merges its overlay into the permanent model.
    ///
    /// # Errors
    /// Store failures; the caller aborts the run.
    pub fn commit<S>(
        unit: &SectionUnit,
        plan: SectionPlan,
        occupancy: &mut Occupancy,
        store: &mut S,
    ) -> Result<(PlacedSection, Vec<Placement>)>
    where
        S: PlacementStore + ?Sized,
    {
        let placements: Vec<Placement> = plan
            .candidates
            .iter()
            .flat_map(|c| c.placements(unit))
            .collect();
        for placement in &placements {
            store.insert(placement.clone())?;
        }

        let placed = PlacedSection {
            section_id: unit.section.id.clone(),
            label: unit.label(),
            teacher_id: plan.teacher_id.clone(),
            score: plan.score(),
            placements: placements.len(),
        };
        occupancy.absorb(plan.overlay);

        info!(
            section = %placed.label,
            teacher = placed.teacher_id.as_deref().unwrap_or("-"),
            placements = placed.placements,
            score = placed.score,
            "section committed"
        );
        Ok((placed, placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{
        Catalog, Course, HourRange, Offering, Period, Room, Section, TeacherPreference,
        TimetableInput,
    };
    use crate::scheduler::environment::TimeGrid;
    use crate::scheduler::report::Rejection;
    use crate::store::InMemoryStore;

    fn input(course: Course) -> TimetableInput {
        TimetableInput::new()
            .with_period(Period::new("P1", "2026-I"))
            .with_course(course)
            .with_offering(Offering::new("O1", "C1", "P1").with_default_capacity(20))
            .with_section(Section::new("S1", "1", "O1"))
            .with_room(Room::lecture("A1").with_capacity(30))
            .with_room(Room::lab("L1").with_capacity(30))
    }

    struct Fixture {
        catalog: Catalog,
        grid: TimeGrid,
        config: EngineConfig,
    }

    impl Fixture {
        fn new(input: TimetableInput, start: u32, end: u32) -> Self {
            Self {
                catalog: Catalog::build(&input, input.periods[0].clone()),
                grid: TimeGrid::with_hours(start, end).unwrap(),
                config: EngineConfig::default(),
            }
        }

        fn scheduler(&self) -> SectionScheduler<'_> {
            SectionScheduler::new(
                CandidateGenerator::new(&self.catalog, &self.grid, &self.config),
                TieBreaker::deterministic(),
            )
        }

        fn eligible(&self) -> Vec<String> {
            self.catalog.eligible_teachers("C1").to_vec()
        }
    }

    #[test]
    fn test_combined_without_teacher_one_block() {
        let course = Course::new("C1", 1)
            .with_hours(2, 2)
            .requiring_room()
            .requiring_lab()
            .with_policy(SessionPolicy::Combined);
        let fx = Fixture::new(input(course), 8, 12);
        let plan = fx.scheduler().plan(&fx.catalog.sections[0], &Occupancy::new(), &[]).unwrap();
        assert_eq!(plan.candidates.len(), 1);
        assert_eq!(plan.candidates[0].hours, HourRange::new(8, 12));
        assert_eq!(plan.teacher_id, None);
    }

    #[test]
    fn test_separate_blocks_see_each_other() {
        let course = Course::new("C1", 1).with_hours(2, 2).requiring_room().requiring_lab();
        let fx = Fixture::new(input(course), 8, 12);
        let plan = fx.scheduler().plan(&fx.catalog.sections[0], &Occupancy::new(), &[]).unwrap();
        assert_eq!(plan.candidates.len(), 2);
        let theory = &plan.candidates[0];
        let practice = &plan.candidates[1];
        assert_eq!((theory.day, theory.hours), (0, HourRange::new(8, 10)));
        // Cohort is taken 8-10 on Monday by theory, so practice goes after it.
        assert_eq!((practice.day, practice.hours), (0, HourRange::new(10, 12)));
    }

    #[test]
    fn test_zero_hours_places_nothing() {
        let course = Course::new("C1", 1).with_policy(SessionPolicy::Combined);
        let fx = Fixture::new(input(course), 8, 12);
        let plan = fx.scheduler().plan(&fx.catalog.sections[0], &Occupancy::new(), &[]).unwrap();
        assert!(plan.candidates.is_empty());
        assert!(plan.overlay.is_empty());
    }

    #[test]
    fn test_separate_failure_leaves_no_trace() {
        // Practice needs a lab and none exists; theory alone must not commit.
        let course = Course::new("C1", 1).with_hours(2, 2).requiring_room().requiring_lab();
        let mut inp = input(course);
        inp.rooms.retain(|r| r.id != "L1");
        let fx = Fixture::new(inp, 8, 12);
        let occupancy = Occupancy::new();
        let failure = fx.scheduler().plan(&fx.catalog.sections[0], &occupancy, &[]).unwrap_err();
        match failure {
            SectionFailure::Unplaced { teacher_id, blocks } => {
                assert_eq!(teacher_id, None);
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].session_types, vec![SessionType::Practice]);
            }
            other => panic!("unexpected failure: {other:?}"),
        }
        assert!(occupancy.is_empty());
    }

    #[test]
    fn test_no_eligible_teacher() {
        let course = Course::new("C1", 1).with_hours(2, 0).requiring_teacher();
        let fx = Fixture::new(input(course), 8, 12);
        let failure = fx
            .scheduler()
            .plan(&fx.catalog.sections[0], &Occupancy::new(), &fx.eligible())
            .unwrap_err();
        assert_eq!(failure, SectionFailure::NoEligibleTeacher);
    }

    #[test]
    fn test_falls_back_to_next_teacher() {
        let course = Course::new("C1", 1).with_hours(2, 2).requiring_teacher();
        let inp = input(course)
            .with_teacher_preference(TeacherPreference::new("C1", "T1"))
            .with_teacher_preference(TeacherPreference::new("C1", "T2"));
        let fx = Fixture::new(inp, 8, 12);
        let mut occupancy = Occupancy::new();
        // T1 can host theory on Monday 8-10 only; practice never fits.
        for day in 0..6 {
            occupancy.teachers.mark("T1".to_string(), day, HourRange::new(10, 12));
            if day > 0 {
                occupancy.teachers.mark("T1".to_string(), day, HourRange::new(8, 10));
            }
        }
        let plan = fx
            .scheduler()
            .plan(&fx.catalog.sections[0], &occupancy, &fx.eligible())
            .unwrap();
        assert_eq!(plan.teacher_id.as_deref(), Some("T2"));
        assert!(plan
            .candidates
            .iter()
            .all(|c| c.teacher_id.as_deref() == Some("T2")));
        assert_eq!(plan.score(), 80.0);
    }

    #[test]
    fn test_all_teachers_fail_reports_last() {
        let course = Course::new("C1", 1).with_hours(5, 0).requiring_teacher();
        let inp = input(course)
            .with_teacher_preference(TeacherPreference::new("C1", "T1"))
            .with_teacher_preference(TeacherPreference::new("C1", "T2"));
        let fx = Fixture::new(inp, 8, 12);
        let failure = fx
            .scheduler()
            .plan(&fx.catalog.sections[0], &Occupancy::new(), &fx.eligible())
            .unwrap_err();
        match failure {
            SectionFailure::Unplaced { teacher_id, blocks } => {
                assert_eq!(teacher_id.as_deref(), Some("T2"));
                assert!(blocks[0].rejections.contains(&Rejection::BlockTooLong {
                    duration: 5,
                    window: HourRange::new(8, 12)
                }));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_commit_merges_and_persists() {
        let course = Course::new("C1", 2).with_hours(2, 1).requiring_teacher().requiring_room();
        let inp = input(course).with_teacher_preference(TeacherPreference::new("C1", "T1"));
        let fx = Fixture::new(inp, 8, 12);
        let mut occupancy = Occupancy::new();
        let plan = fx
            .scheduler()
            .plan(&fx.catalog.sections[0], &occupancy, &fx.eligible())
            .unwrap();

        let mut store = InMemoryStore::new();
        store.begin().unwrap();
        let (placed, placements) =
            SectionScheduler::commit(&fx.catalog.sections[0], plan, &mut occupancy, &mut store).unwrap();
        store.commit().unwrap();

        assert_eq!(placed.placements, 2);
        assert_eq!(placed.teacher_id.as_deref(), Some("T1"));
        assert_eq!(store.placements(), placements.as_slice());
        // Theory binds a room; practice has no lab requirement.
        assert_eq!(placements[0].room_id.as_deref(), Some("A1"));
        assert_eq!(placements[1].room_id, None);
        assert_eq!(occupancy.teachers.len(), 3);
        assert_eq!(occupancy.cohorts.len(), 3);
        assert_eq!(occupancy.rooms.len(), 2);
    }
}
