//! Greedy timetable construction and KPI evaluation.
//!
//! # Algorithm
//!
//! [`ConstructionDriver`] runs one greedy, non-backtracking pass over the
//! sections of a period. For each section, [`SectionScheduler`] decides
//! the block layout and teacher, [`CandidateGenerator`] enumerates every
//! `(day, start hour, teacher)` that satisfies the hard constraints and
//! keeps the best preference score, and the room allocator binds rooms
//! first-fit. A section commits atomically or not at all.
//!
//! Hard constraints:
//! - a cohort (all sections of one cycle) attends one class at a time
//! - a teacher teaches one class at a time and never inside standing
//!   unavailability
//! - a room hosts one class at a time, matches the session's category,
//!   and seats the section
//! - blocks lie inside the weekly teaching window
//!
//! Soft preferences, scored: preferred days (+20) and preferred teachers
//! (+40).
//!
//! # KPI
//!
//! [`TimetableKpi`] computes placed hours, placement rate, room
//! utilization, and teacher load.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"

mod candidate;
mod driver;
mod environment;
mod kpi;
mod occupancy;
mod report;
mod rooms;
mod section;

pub use candidate::{BlockRequest, Candidate, CandidateGenerator, SegmentAssignment, TieBreaker};
pub use driver::{order_sections, vacant_slots, ConstructionDriver};
pub use environment::{select_period, Environment, TimeGrid};
pub use kpi::TimetableKpi;
pub use occupancy::{Occupancy, OccupancySet, OccupancyView};
pub use report::{
    BlockFailure, FailedSection, PlacedSection, Rejection, RunReport, SectionFailure, VacantSlot,
};
pub use rooms::allocate_room;
pub use section::{SectionPlan, SectionScheduler};
