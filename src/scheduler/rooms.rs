//! Room allocation.
//!
//! First-fit over rooms in id order: the first room of the required
//! category that seats the section and is free for every hour of the
//! range wins. Iteration order is stable, so allocation is reproducible.

use crate::models::{Course, HourRange, Room, RoomCategory, SessionType};

use super::occupancy::OccupancyView;
use super::report::Rejection;

/// Finds a room for one session segment.
///
/// Returns `Ok(None)` when the course does not require a space for this
/// session type; no room is bound and the segment needs no allocation.
///
/// # Errors
/// [`Rejection::NoFreeRoom`] if the category is required and no room
/// qualifies.
pub fn allocate_room<'a>(
    rooms: &'a [Room],
    course: &Course,
    session_type: SessionType,
    day: u8,
    hours: HourRange,
    seats: u32,
    occupancy: &OccupancyView<'_>,
) -> Result<Option<&'a Room>, Rejection> {
    if !course.requires_space_for(session_type) {
        return Ok(None);
    }
    let category = RoomCategory::for_session(session_type);
    rooms
        .iter()
        .find(|room| room.fits(category, seats) && occupancy.room_free(&room.id, day, hours))
        .map(Some)
        .ok_or(Rejection::NoFreeRoom {
            category,
            day,
            hours,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::occupancy::Occupancy;

    fn rooms() -> Vec<Room> {
        vec![
            Room::lecture("A1").with_capacity(20),
            Room::lecture("A2").with_capacity(40),
            Room::lab("L1").with_capacity(30),
        ]
    }

    fn course() -> Course {
        Course::new("C1", 1).with_hours(2, 2).requiring_room().requiring_lab()
    }

    #[test]
    fn test_first_fit_by_capacity() {
        let occ = Occupancy::new();
        let rooms = rooms();
        let r = allocate_room(&rooms, &course(), SessionType::Theory, 0, HourRange::new(8, 10), 10, &occ.view())
            .unwrap()
            .unwrap();
        assert_eq!(r.id, "A1");

        let r = allocate_room(&rooms, &course(), SessionType::Theory, 0, HourRange::new(8, 10), 35, &occ.view())
            .unwrap()
            .unwrap();
        assert_eq!(r.id, "A2");
    }

    #[test]
    fn test_practice_needs_lab() {
        let occ = Occupancy::new();
        let rooms = rooms();
        let r = allocate_room(&rooms, &course(), SessionType::Practice, 0, HourRange::new(8, 10), 25, &occ.view())
            .unwrap()
            .unwrap();
        assert_eq!(r.id, "L1");
    }

    #[test]
    fn test_skips_busy_room() {
        let mut occ = Occupancy::new();
        occ.rooms.mark("A1".to_string(), 0, HourRange::new(9, 10));
        let rooms = rooms();
        let r = allocate_room(&rooms, &course(), SessionType::Theory, 0, HourRange::new(8, 10), 10, &occ.view())
            .unwrap()
            .unwrap();
        assert_eq!(r.id, "A2");
    }

    #[test]
    fn test_overlay_rooms_count() {
        let base = Occupancy::new();
        let mut overlay = Occupancy::new();
        overlay.rooms.mark("L1".to_string(), 2, HourRange::new(8, 12));
        let rooms = rooms();
        let err = allocate_room(
            &rooms,
            &course(),
            SessionType::Practice,
            2,
            HourRange::new(10, 12),
            5,
            &base.view_with(Some(&overlay)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Rejection::NoFreeRoom {
                category: RoomCategory::Lab,
                day: 2,
                hours: HourRange::new(10, 12)
            }
        );
    }

    #[test]
    fn test_not_required_binds_nothing() {
        let occ = Occupancy::new();
        let rooms = rooms();
        let theory_only = Course::new("C2", 1).with_hours(2, 0);
        let r = allocate_room(&rooms, &theory_only, SessionType::Theory, 0, HourRange::new(8, 10), 500, &occ.view())
            .unwrap();
        assert!(r.is_none());
    }
}
