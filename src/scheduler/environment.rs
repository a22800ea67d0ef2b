//! Environment loading: the time grid and the seeded occupancy model.
//!
//! Runs once per construction run, before any section is scheduled and
//! inside the run's transaction:
//!
//! 1. Build the weekly grid from the global teaching window.
//! 2. Delete prior placements of every section in the period's scope.
//! 3. Seed teacher occupancy from standing unavailability intervals.

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::config::ScheduleWindow;
use crate::error::{Result, TimetableError};
use crate::models::{day_index, Catalog, HourRange, Period, TimetableInput, OPERATIONAL_DAYS};
use crate::store::PlacementStore;

use super::occupancy::Occupancy;

/// The weekly grid: operational days × whole teaching hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    window: HourRange,
}

impl TimeGrid {
    /// Builds the grid from the global window, defaulting to 07:00-22:00.
    ///
    /// # Errors
    /// [`TimetableError::InvalidWindow`] if the window holds no whole hour.
    pub fn from_window(window: Option<&ScheduleWindow>) -> Result<Self> {
        let w = window.copied().unwrap_or_default();
        let range = w.hour_range();
        if range.is_empty() {
            return Err(TimetableError::InvalidWindow {
                start: w.start.hour(),
                end: w.end.hour(),
            });
        }
        Ok(Self { window: range })
    }

    /// Grid over `[start, end)` hours.
    pub fn with_hours(start: u32, end: u32) -> Result<Self> {
        Self::from_window(Some(&ScheduleWindow::hours(start, end)))
    }

    /// Operational day indices (0 = Monday).
    pub fn days(&self) -> impl Iterator<Item = u8> {
        0..OPERATIONAL_DAYS.len() as u8
    }

    /// Teaching hours of each day.
    pub fn window(&self) -> HourRange {
        self.window
    }

    /// Start hours at which a block of `duration` hours fits the window.
    pub fn starts_for(&self, duration: u32) -> std::ops::Range<u32> {
        let end = (self.window.end + 1)
            .saturating_sub(duration)
            .max(self.window.start);
        self.window.start..end
    }

    /// Whether a day/range lies fully inside the grid.
    pub fn contains(&self, day: u8, hours: HourRange) -> bool {
        (day as usize) < OPERATIONAL_DAYS.len() && self.window.covers(&hours)
    }

    /// Number of `(day, hour)` slots per week.
    pub fn slots_per_week(&self) -> u32 {
        OPERATIONAL_DAYS.len() as u32 * self.window.len()
    }
}

/// Picks the period to build.
///
/// An explicit id wins. Otherwise the period whose schedule-creation
/// window contains `now` is chosen, preferring the latest opening.
pub fn select_period(
    periods: &[Period],
    period_id: Option<&str>,
    now: NaiveDateTime,
) -> Result<Period> {
    if let Some(id) = period_id {
        return periods
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| TimetableError::UnknownPeriod(id.to_string()));
    }
    periods
        .iter()
        .filter(|p| p.is_open_at(now))
        .max_by_key(|p| p.schedule_creation.map(|w| w.start))
        .cloned()
        .ok_or(TimetableError::NoActivePeriod)
}

/// Loaded state a construction run starts from.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Indexed input for the target period.
    pub catalog: Catalog,
    /// Weekly grid.
    pub grid: TimeGrid,
    /// Occupancy seeded with teacher unavailability.
    pub occupancy: Occupancy,
    /// Prior placements deleted from the store.
    pub cleared: usize,
}

impl Environment {
    /// Prepares a run for `period`.
    ///
    /// The caller must already hold an open transaction on `store`.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidWindow`] for an empty teaching window.
    /// - [`TimetableError::NoRooms`] if no room is registered.
    /// - [`TimetableError::Store`] if clearing prior placements fails.
    pub fn prepare<S>(input: &TimetableInput, period: Period, store: &mut S) -> Result<Self>
    where
        S: PlacementStore + ?Sized,
    {
        let grid = TimeGrid::from_window(input.window.as_ref())?;
        if input.rooms.is_empty() {
            return Err(TimetableError::NoRooms);
        }

        let catalog = Catalog::build(input, period);
        let cleared = store.delete_for_sections(&catalog.section_ids())?;

        let mut occupancy = Occupancy::new();
        for interval in &catalog.unavailability {
            let Some(day) = day_index(interval.day) else {
                continue;
            };
            occupancy
                .teachers
                .mark(interval.teacher_id.clone(), day, interval.blocked_hours());
        }

        debug!(
            period = %catalog.period.id,
            sections = catalog.sections.len(),
            cleared,
            blocked_ticks = occupancy.teachers.len(),
            "environment prepared"
        );

        Ok(Self {
            catalog,
            grid,
            occupancy,
            cleared,
        })
    }
}
