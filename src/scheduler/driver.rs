//! Construction driver: one greedy pass over every section of a period.
//!
//! # Algorithm
//!
//! 1. Validate the input snapshot and pick the period.
//! 2. Open a store transaction; load the [`Environment`] (clears prior
//!    placements of the period's sections, seeds unavailability).
//! 3. Order sections by cycle descending, then total weekly hours
//!    descending. Ties keep input order.
//! 4. Plan and commit each section once, in order. A section that cannot
//!    be placed is recorded and skipped; it is never retried and nothing
//!    committed before it is revisited.
//! 5. Collect vacant room-hours and commit the transaction.
//!
//! Any error from steps 2-5 rolls the transaction back, so the store is
//! left exactly as it was before the run.
//!
//! # Complexity
//! O(n * d * h * t * r) for n sections; see the candidate generator.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, TimetableError};
use crate::models::{Catalog, Period, SectionUnit, TimetableInput};
use crate::store::PlacementStore;
use crate::validation::validate_input;

use super::candidate::{CandidateGenerator, TieBreaker};
use super::environment::{select_period, Environment, TimeGrid};
use super::occupancy::Occupancy;
use super::report::{FailedSection, RunReport, VacantSlot};
use super::section::SectionScheduler;

/// Builds timetables for one period at a time.
///
/// # Example
/// ```
/// use u_timetable::config::EngineConfig;
/// use u_timetable::models::*;
/// use u_timetable::scheduler::ConstructionDriver;
/// use u_timetable::store::InMemoryStore;
///
/// let input = TimetableInput::new()
///     .with_period(Period::new("P1", "2026-I"))
///     .with_course(Course::new("C1", 1).with_hours(2, 0).requiring_room())
///     .with_offering(Offering::new("O1", "C1", "P1").with_default_capacity(20))
///     .with_section(Section::new("S1", "1", "O1"))
///     .with_room(Room::lecture("A1").with_capacity(30));
///
/// let mut store = InMemoryStore::new();
/// let report = ConstructionDriver::new(EngineConfig::default())
///     .run_period(&input, input.periods[0].clone(), &mut store)
///     .unwrap();
/// assert!(report.is_complete());
/// assert_eq!(store.placements().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstructionDriver {
    config: EngineConfig,
}

impl ConstructionDriver {
    /// Creates a driver.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates a driver after validating the configuration.
    ///
    /// # Errors
    /// [`TimetableError::Config`] for negative scores or an out-of-range
    /// jitter magnitude.
    pub fn try_new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the timetable of the period `period_id`, or of the period
    /// whose schedule-creation window is open at `now`.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidInput`] if the snapshot fails validation.
    /// - [`TimetableError::UnknownPeriod`] / [`TimetableError::NoActivePeriod`].
    /// - Anything [`run_period`](Self::run_period) returns.
    pub fn run<S>(
        &self,
        input: &TimetableInput,
        period_id: Option<&str>,
        now: NaiveDateTime,
        store: &mut S,
    ) -> Result<RunReport>
    where
        S: PlacementStore + ?Sized,
    {
        validate_input(input).map_err(TimetableError::InvalidInput)?;
        let period = select_period(&input.periods, period_id, now)?;
        self.execute(input, period, store)
    }

    /// Builds the timetable of an explicit period.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidInput`] if the snapshot fails validation.
    /// - [`TimetableError::InvalidWindow`] / [`TimetableError::NoRooms`].
    /// - [`TimetableError::Store`] on any store failure; the transaction
    ///   is rolled back.
    pub fn run_period<S>(&self, input: &TimetableInput, period: Period, store: &mut S) -> Result<RunReport>
    where
        S: PlacementStore + ?Sized,
    {
        validate_input(input).map_err(TimetableError::InvalidInput)?;
        self.execute(input, period, store)
    }

    fn execute<S>(&self, input: &TimetableInput, period: Period, store: &mut S) -> Result<RunReport>
    where
        S: PlacementStore + ?Sized,
    {
        store.begin()?;
        match self.construct(input, period, store) {
            Ok(report) => {
                store.commit()?;
                Ok(report)
            }
            Err(e) => {
                store.rollback();
                warn!(error = %e, "timetable construction aborted, transaction rolled back");
                Err(e)
            }
        }
    }

    fn construct<S>(&self, input: &TimetableInput, period: Period, store: &mut S) -> Result<RunReport>
    where
        S: PlacementStore + ?Sized,
    {
        let Environment {
            catalog,
            grid,
            mut occupancy,
            cleared,
        } = Environment::prepare(input, period, store)?;

        info!(
            period = %catalog.period.id,
            sections = catalog.sections.len(),
            rooms = catalog.rooms.len(),
            window = %grid.window(),
            cleared,
            "timetable construction started"
        );

        let generator = CandidateGenerator::new(&catalog, &grid, &self.config);
        let mut scheduler =
            SectionScheduler::new(generator, TieBreaker::from_strategy(&self.config.tie_break));

        let mut report = RunReport {
            period_id: catalog.period.id.clone(),
            cleared,
            ..RunReport::default()
        };

        for unit in order_sections(&catalog.sections) {
            let eligible = catalog.eligible_teachers(&unit.course.id);
            match scheduler.plan(unit, &occupancy, eligible) {
                Ok(plan) => {
                    let (placed, placements) =
                        SectionScheduler::commit(unit, plan, &mut occupancy, store)?;
                    report.placed.push(placed);
                    report.placements.extend(placements);
                }
                Err(failure) => {
                    warn!(section = %unit.label(), reason = %failure, "section not placed");
                    report.failed.push(FailedSection {
                        section_id: unit.section.id.clone(),
                        label: unit.label(),
                        failure,
                    });
                }
            }
        }

        report.vacant_slots = vacant_slots(&catalog, &grid, &occupancy);

        info!(
            period = %report.period_id,
            placed = report.placed.len(),
            failed = report.failed.len(),
            placements = report.placements.len(),
            vacant_slots = report.vacant_slots.len(),
            "timetable construction finished"
        );
        Ok(report)
    }
}

/// Processing order: cycle descending, then total weekly hours descending.
///
/// The sort is stable, so equal keys keep input order.
pub fn order_sections(sections: &[SectionUnit]) -> Vec<&SectionUnit> {
    let mut ordered: Vec<&SectionUnit> = sections.iter().collect();
    ordered.sort_by(|a, b| {
        b.course
            .cycle
            .cmp(&a.course.cycle)
            .then_with(|| b.course.total_hours().cmp(&a.course.total_hours()))
    });
    ordered
}

/// Every `(room, day, hour)` of the grid no placement occupies,
/// ordered by day, hour, then room id.
pub fn vacant_slots(catalog: &Catalog, grid: &TimeGrid, occupancy: &Occupancy) -> Vec<VacantSlot> {
    let mut vacant = Vec::new();
    for day in grid.days() {
        for hour in grid.window().hours() {
            for room in &catalog.rooms {
                if !occupancy.rooms.is_busy(room.id.as_str(), day, hour) {
                    vacant.push(VacantSlot {
                        room_id: room.id.clone(),
                        day,
                        hour,
                    });
                }
            }
        }
    }
    vacant
}
