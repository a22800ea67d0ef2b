//! Timetable quality metrics (KPIs).
//!
//! Computes summary indicators from a finished timetable and the catalog
//! it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placed Hours | Sum of placement durations |
//! | Placement Rate | Sections with at least one placement / sections needing hours |
//! | Room Utilization | Busy room-hours / weekly grid slots, per room |
//! | Avg Utilization | Mean over all rooms, idle rooms included |
//! | Vacant Room-Hours | Room-hours of the grid nobody uses |
//! | Teacher Load | Assigned hours per teacher |

use std::collections::{HashMap, HashSet};

use crate::models::{Catalog, Timetable};

use super::environment::TimeGrid;

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Number of placements.
    pub placement_count: usize,
    /// Total placed hours.
    pub placed_hours: u32,
    /// Fraction of sections needing hours that got any placement (0.0..1.0).
    pub placement_rate: f64,
    /// Per-room utilization (0.0..1.0) over the weekly grid.
    pub utilization_by_room: HashMap<String, f64>,
    /// Average room utilization (0.0..1.0).
    pub avg_room_utilization: f64,
    /// Room-hours left unused.
    pub vacant_room_hours: u32,
    /// Assigned hours per teacher.
    pub teacher_hours: HashMap<String, u32>,
    /// Heaviest teacher load in hours.
    pub max_teacher_hours: u32,
}

impl TimetableKpi {
    /// Computes KPIs for a timetable.
    pub fn calculate(timetable: &Timetable, catalog: &Catalog, grid: &TimeGrid) -> Self {
        let slots = grid.slots_per_week();
        let busy = timetable.room_hours();

        let utilization_by_room: HashMap<String, f64> = catalog
            .rooms
            .iter()
            .map(|room| {
                let hours = busy.get(&room.id).copied().unwrap_or(0);
                let rate = if slots == 0 {
                    0.0
                } else {
                    hours as f64 / slots as f64
                };
                (room.id.clone(), rate)
            })
            .collect();
        let avg_room_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        let busy_total: u32 = catalog
            .rooms
            .iter()
            .filter_map(|room| busy.get(&room.id))
            .fold(0, |total, hours| total.saturating_add(*hours));
        let vacant_room_hours = slots
            .saturating_mul(catalog.rooms.len() as u32)
            .saturating_sub(busy_total);

        let needing: Vec<&str> = catalog
            .sections
            .iter()
            .filter(|unit| unit.course.total_hours() > 0)
            .map(|unit| unit.section.id.as_str())
            .collect();
        let placed: HashSet<&str> = timetable
            .placements
            .iter()
            .map(|p| p.section_id.as_str())
            .collect();
        let placement_rate = if needing.is_empty() {
            1.0
        } else {
            needing.iter().filter(|id| placed.contains(*id)).count() as f64 / needing.len() as f64
        };

        let teacher_hours = timetable.teacher_hours();
        let max_teacher_hours = teacher_hours.values().copied().max().unwrap_or(0);

        Self {
            placement_count: timetable.placement_count(),
            placed_hours: timetable.total_hours(),
            placement_rate,
            utilization_by_room,
            avg_room_utilization,
            vacant_room_hours,
            teacher_hours,
            max_teacher_hours,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, min_utilization: f64) -> bool {
        self.placement_rate >= min_placement_rate && self.avg_room_utilization >= min_utilization
    }
}
