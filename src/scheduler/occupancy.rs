//! Occupancy model: what is already busy.
//!
//! Three disjoint sets of `(entity, day, hour)` ticks: teacher-time,
//! room-time, and cohort-time. A trial attempt writes into a separate
//! overlay [`Occupancy`] that is checked together with the permanent one
//! through an [`OccupancyView`] and merged only on commit via
//! [`Occupancy::absorb`]. Nothing is ever removed within a run.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::HourRange;

/// A set of busy `(entity, day, hour)` ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySet<K: Eq + Hash> {
    ticks: HashMap<K, HashSet<(u8, u32)>>,
}

impl<K: Eq + Hash> Default for OccupancySet<K> {
    fn default() -> Self {
        Self {
            ticks: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> OccupancySet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is busy at `(day, hour)`.
    #[inline]
    pub fn is_busy<Q>(&self, id: &Q, day: u8, hour: u32) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ticks
            .get(id)
            .is_some_and(|busy| busy.contains(&(day, hour)))
    }

    /// Whether no hour of `hours` is busy for `id` on `day`.
    pub fn is_free<Q>(&self, id: &Q, day: u8, hours: HourRange) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        match self.ticks.get(id) {
            None => true,
            Some(busy) => hours.hours().all(|h| !busy.contains(&(day, h))),
        }
    }

    /// Marks every hour of `hours` busy for `id` on `day`.
    pub fn mark(&mut self, id: K, day: u8, hours: HourRange) {
        if hours.is_empty() {
            return;
        }
        self.ticks
            .entry(id)
            .or_default()
            .extend(hours.hours().map(|h| (day, h)));
    }

    /// Moves every tick of `other` into this set.
    pub fn absorb(&mut self, other: Self) {
        for (id, busy) in other.ticks {
            self.ticks.entry(id).or_default().extend(busy);
        }
    }

    /// Number of busy ticks.
    pub fn len(&self) -> usize {
        self.ticks.values().map(HashSet::len).sum()
    }

    /// Whether no tick is busy.
    pub fn is_empty(&self) -> bool {
        self.ticks.values().all(HashSet::is_empty)
    }
}

/// Teacher, room, and cohort occupancy.
///
/// Teachers and rooms are keyed by id; cohorts by cycle number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    /// Teacher-time ticks.
    pub teachers: OccupancySet<String>,
    /// Room-time ticks.
    pub rooms: OccupancySet<String>,
    /// Cohort-time ticks.
    pub cohorts: OccupancySet<u32>,
}

impl Occupancy {
    /// Creates an empty occupancy model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges an overlay into this model, consuming it.
    pub fn absorb(&mut self, overlay: Occupancy) {
        self.teachers.absorb(overlay.teachers);
        self.rooms.absorb(overlay.rooms);
        self.cohorts.absorb(overlay.cohorts);
    }

    /// Whether nothing is occupied.
    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty() && self.rooms.is_empty() && self.cohorts.is_empty()
    }

    /// Read view over this model alone.
    pub fn view(&self) -> OccupancyView<'_> {
        OccupancyView {
            base: self,
            overlay: None,
        }
    }

    /// Read view over this model plus an overlay.
    pub fn view_with<'a>(&'a self, overlay: Option<&'a Occupancy>) -> OccupancyView<'a> {
        OccupancyView {
            base: self,
            overlay,
        }
    }
}

/// Union of the permanent model and an optional trial overlay.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyView<'a> {
    base: &'a Occupancy,
    overlay: Option<&'a Occupancy>,
}

impl OccupancyView<'_> {
    /// Whether a teacher is free for the whole range.
    pub fn teacher_free(&self, teacher_id: &str, day: u8, hours: HourRange) -> bool {
        self.base.teachers.is_free(teacher_id, day, hours)
            && self
                .overlay
                .map_or(true, |o| o.teachers.is_free(teacher_id, day, hours))
    }

    /// Whether a room is free for the whole range.
    pub fn room_free(&self, room_id: &str, day: u8, hours: HourRange) -> bool {
        self.base.rooms.is_free(room_id, day, hours)
            && self
                .overlay
                .map_or(true, |o| o.rooms.is_free(room_id, day, hours))
    }

    /// Whether a cohort is free for the whole range.
    pub fn cohort_free(&self, cycle: u32, day: u8, hours: HourRange) -> bool {
        self.base.cohorts.is_free(&cycle, day, hours)
            && self
                .overlay
                .map_or(true, |o| o.cohorts.is_free(&cycle, day, hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_is_free() {
        let mut set: OccupancySet<String> = OccupancySet::new();
        set.mark("T1".to_string(), 0, HourRange::new(8, 10));
        assert_eq!(set.len(), 2);
        assert!(set.is_busy("T1", 0, 9));
        assert!(!set.is_free("T1", 0, HourRange::new(9, 11)));
        assert!(set.is_free("T1", 0, HourRange::new(10, 12)));
        assert!(set.is_free("T1", 1, HourRange::new(8, 10)));
        assert!(set.is_free("T2", 0, HourRange::new(8, 10)));
    }

    #[test]
    fn test_empty_range_is_free() {
        let mut set: OccupancySet<u32> = OccupancySet::new();
        set.mark(3, 0, HourRange::new(7, 22));
        assert!(set.is_free(&3, 0, HourRange::new(9, 9)));
    }

    #[test]
    fn test_view_unions_overlay() {
        let mut base = Occupancy::new();
        base.rooms.mark("A1".to_string(), 0, HourRange::new(8, 9));
        let mut overlay = Occupancy::new();
        overlay.cohorts.mark(2, 0, HourRange::new(10, 12));

        let plain = base.view();
        assert!(plain.cohort_free(2, 0, HourRange::new(10, 11)));

        let view = base.view_with(Some(&overlay));
        assert!(!view.room_free("A1", 0, HourRange::new(8, 9)));
        assert!(!view.cohort_free(2, 0, HourRange::new(11, 12)));
        assert!(view.cohort_free(2, 0, HourRange::new(12, 13)));
        assert!(view.teacher_free("T1", 0, HourRange::new(8, 12)));
    }

    #[test]
    fn test_absorb_merges_overlay() {
        let mut base = Occupancy::new();
        let mut overlay = Occupancy::new();
        overlay.teachers.mark("T1".to_string(), 3, HourRange::new(14, 16));
        overlay.cohorts.mark(1, 3, HourRange::new(14, 16));
        base.absorb(overlay);
        assert_eq!(base.teachers.len(), 2);
        assert!(!base.view().cohort_free(1, 3, HourRange::new(15, 16)));
        assert!(base.rooms.is_empty());
    }
}
