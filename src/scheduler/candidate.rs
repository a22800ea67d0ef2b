//! Candidate generation: preference-scored slot search for one block.
//!
//! # Algorithm
//!
//! A block is a contiguous run of one or more segments (theory and/or
//! practice) that must sit back to back on one day. For every
//! `(day, start hour)` where the block fits the teaching window:
//!
//! 1. Skip if the cohort is busy for any hour of the block.
//! 2. For each candidate teacher, skip if the teacher is busy.
//! 3. Allocate a room per segment, in order. Any failed segment sinks
//!    the whole `(day, hour, teacher)` candidate.
//! 4. Score = day bonus + teacher bonus + tie-break noise.
//!
//! The whole space is enumerated and the single best candidate kept
//! (strictly greater score replaces the incumbent). If nothing survives
//! with day preferences honored, the search runs again with them
//! ignored. Every hard-constraint hit is recorded as a [`Rejection`];
//! the deduplicated set is returned when no candidate survives.
//!
//! # Complexity
//! O(d * h * t * r) per pass where d = days, h = start hours,
//! t = candidate teachers, r = rooms.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{EngineConfig, TieBreak};
use crate::models::{Catalog, Course, HourRange, Placement, SectionUnit, SessionType};

use super::environment::TimeGrid;
use super::occupancy::{Occupancy, OccupancyView};
use super::report::Rejection;
use super::rooms::allocate_room;

/// One block to place for a section.
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a> {
    /// Section being placed.
    pub unit: &'a SectionUnit,
    /// Ordered segments that must be contiguous within the block.
    pub structure: &'a [(SessionType, u32)],
    /// Teacher fixed by the caller. `None` lets the generator pick from
    /// the course's eligible teachers (or none, for teacher-less courses).
    pub forced_teacher: Option<&'a str>,
}

impl BlockRequest<'_> {
    /// Total block length in hours, saturating at `u32::MAX`.
    pub fn duration(&self) -> u32 {
        self.structure
            .iter()
            .fold(0, |total, (_, hours)| total.saturating_add(*hours))
    }

    /// Session types of the block, in order.
    pub fn session_types(&self) -> Vec<SessionType> {
        self.structure.iter().map(|(kind, _)| *kind).collect()
    }
}

/// One segment of a chosen candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAssignment {
    pub session_type: SessionType,
    pub hours: HourRange,
    /// Bound room, if the course requires one for this session type.
    pub room_id: Option<String>,
}

/// A hard-constraint-satisfying placement option for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub day: u8,
    /// Hours of the whole block.
    pub hours: HourRange,
    /// Bound teacher, only for teacher-required courses.
    pub teacher_id: Option<String>,
    pub segments: Vec<SegmentAssignment>,
    pub score: f64,
}

impl Candidate {
    /// Marks this candidate's teacher, room, and cohort ticks.
    pub fn record_into(&self, course: &Course, occupancy: &mut Occupancy) {
        for segment in &self.segments {
            if let Some(teacher) = &self.teacher_id {
                occupancy.teachers.mark(teacher.clone(), self.day, segment.hours);
            }
            if let Some(room) = &segment.room_id {
                occupancy.rooms.mark(room.clone(), self.day, segment.hours);
            }
            occupancy.cohorts.mark(course.cycle, self.day, segment.hours);
        }
    }

    /// One placement per segment.
    pub fn placements(&self, unit: &SectionUnit) -> Vec<Placement> {
        self.segments
            .iter()
            .map(|segment| Placement {
                course_id: unit.course.id.clone(),
                section_id: unit.section.id.clone(),
                teacher_id: self.teacher_id.clone(),
                room_id: segment.room_id.clone(),
                day: self.day,
                start_hour: segment.hours.start,
                end_hour: segment.hours.end,
                session_type: segment.session_type,
            })
            .collect()
    }
}

/// Tie-break noise source.
#[derive(Debug, Clone)]
pub struct TieBreaker {
    rng: Option<StdRng>,
    magnitude: f64,
}

impl TieBreaker {
    /// No noise: enumeration order decides ties.
    pub fn deterministic() -> Self {
        Self {
            rng: None,
            magnitude: 0.0,
        }
    }

    /// Builds the noise source for a strategy.
    pub fn from_strategy(tie_break: &TieBreak) -> Self {
        match tie_break {
            TieBreak::Deterministic => Self::deterministic(),
            TieBreak::Jitter { seed, magnitude } => Self {
                rng: Some(match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_os_rng(),
                }),
                magnitude: *magnitude,
            },
        }
    }

    /// Uniform noise in `[0, magnitude]`, or zero when deterministic.
    pub fn noise(&mut self) -> f64 {
        match self.rng.as_mut() {
            Some(rng) if self.magnitude > 0.0 => rng.random_range(0.0..=self.magnitude),
            _ => 0.0,
        }
    }
}

/// Enumerates, scores, and selects candidates for blocks.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'a> {
    catalog: &'a Catalog,
    grid: &'a TimeGrid,
    config: &'a EngineConfig,
}

impl<'a> CandidateGenerator<'a> {
    /// Creates a generator over one period's catalog and grid.
    pub fn new(catalog: &'a Catalog, grid: &'a TimeGrid, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            grid,
            config,
        }
    }

    /// Finds the best candidate for a block.
    ///
    /// Runs with day preferences honored first, then relaxed.
    ///
    /// # Errors
    /// The deduplicated rejections met across both passes.
    pub fn search(
        &self,
        request: &BlockRequest<'_>,
        occupancy: &OccupancyView<'_>,
        tie: &mut TieBreaker,
    ) -> Result<Candidate, BTreeSet<Rejection>> {
        let mut rejections = BTreeSet::new();
        for honor_days in [true, false] {
            if let Some(best) = self.search_pass(request, occupancy, honor_days, tie, &mut rejections) {
                return Ok(best);
            }
        }
        Err(rejections)
    }

    /// Candidate teachers: the forced one, the course's allow-list, or
    /// "no teacher" for teacher-less courses.
    fn teachers_for<'r>(&'r self, request: &BlockRequest<'r>) -> Vec<Option<&'r str>> {
        let course = &request.unit.course;
        match request.forced_teacher {
            Some(teacher) => vec![Some(teacher)],
            None if course.requires_teacher => self
                .catalog
                .eligible_teachers(&course.id)
                .iter()
                .map(|t| Some(t.as_str()))
                .collect(),
            None => vec![None],
        }
    }

    fn search_pass(
        &self,
        request: &BlockRequest<'_>,
        occupancy: &OccupancyView<'_>,
        honor_days: bool,
        tie: &mut TieBreaker,
        rejections: &mut BTreeSet<Rejection>,
    ) -> Option<Candidate> {
        let course = &request.unit.course;
        let duration = request.duration();

        let teachers = self.teachers_for(request);
        if teachers.is_empty() {
            rejections.insert(Rejection::NoEligibleTeacher);
            return None;
        }
        if self.grid.starts_for(duration).is_empty() {
            rejections.insert(Rejection::BlockTooLong {
                duration,
                window: self.grid.window(),
            });
            return None;
        }

        let mut best: Option<Candidate> = None;
        for day in self.grid.days() {
            let day_score = if honor_days && self.catalog.prefers_day(&course.id, day) {
                self.config.day_preference_score
            } else {
                0.0
            };

            for start in self.grid.starts_for(duration) {
                let hours = HourRange::starting_at(start, duration);
                if !occupancy.cohort_free(course.cycle, day, hours) {
                    rejections.insert(Rejection::CohortClash {
                        cycle: course.cycle,
                        day,
                        hours,
                    });
                    continue;
                }

                for &teacher in &teachers {
                    if let Some(teacher_id) = teacher {
                        if !occupancy.teacher_free(teacher_id, day, hours) {
                            rejections.insert(Rejection::TeacherBusy {
                                teacher_id: teacher_id.to_string(),
                                day,
                                hours,
                            });
                            continue;
                        }
                    }

                    let segments = match self.allocate_segments(request, day, start, occupancy) {
                        Ok(segments) => segments,
                        Err(rejection) => {
                            rejections.insert(rejection);
                            continue;
                        }
                    };

                    let teacher_score = match teacher {
                        Some(t) if self.catalog.prefers_teacher(&course.id, t) => {
                            self.config.teacher_preference_score
                        }
                        _ => 0.0,
                    };
                    let score = day_score + teacher_score + tie.noise();
                    if best.as_ref().map_or(true, |b| score > b.score) {
                        best = Some(Candidate {
                            day,
                            hours,
                            teacher_id: teacher
                                .filter(|_| course.requires_teacher)
                                .map(str::to_string),
                            segments,
                            score,
                        });
                    }
                }
            }
        }
        best
    }

    fn allocate_segments(
        &self,
        request: &BlockRequest<'_>,
        day: u8,
        start: u32,
        occupancy: &OccupancyView<'_>,
    ) -> Result<Vec<SegmentAssignment>, Rejection> {
        let unit = request.unit;
        let mut offset = start;
        let mut segments = Vec::with_capacity(request.structure.len());
        for &(session_type, hours) in request.structure {
            let range = HourRange::starting_at(offset, hours);
            let room = allocate_room(
                &self.catalog.rooms,
                &unit.course,
                session_type,
                day,
                range,
                unit.capacity,
                occupancy,
            )?;
            segments.push(SegmentAssignment {
                session_type,
                hours: range,
                room_id: room.map(|r| r.id.clone()),
            });
            offset += hours;
        }
        Ok(segments)
    }
}
