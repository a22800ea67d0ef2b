//! Input validation and timetable verification.
//!
//! Two directions:
//! - [`validate_input`] checks the snapshot before a run: duplicate ids,
//!   dangling references, inverted intervals, seatless rooms. Every issue
//!   is collected; nothing short-circuits.
//! - [`check_timetable`] verifies a finished timetable against the hard
//!   constraints exhaustively. The construction engine never produces a
//!   violation, so a non-empty result means a bug or a hand-edited
//!   timetable.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;

use crate::models::{
    day_index, weekday_of, Catalog, Placement, RoomCategory, Timetable, TimetableInput, Violation,
    ViolationType,
};
use crate::scheduler::TimeGrid;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references an entity that doesn't exist.
    InvalidReference,
    /// An unavailability interval ends before it starts.
    InvalidInterval,
    /// A room has no seats.
    EmptyCapacity,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn collect_ids<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
    seen
}

fn check_reference(
    known: &HashSet<&str>,
    target: &str,
    owner: impl Display,
    what: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !known.contains(target) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidReference,
            format!("{owner} references unknown {what} '{target}'"),
        ));
    }
}

/// Validates a timetable input snapshot.
///
/// Checks:
/// 1. No duplicate period, course, offering, section, teacher, or room IDs
/// 2. Offerings reference existing courses and periods
/// 3. Sections reference existing offerings
/// 4. Preferences reference existing courses (and teachers)
/// 5. Unavailability references existing teachers and does not end
///    before it starts
/// 6. Every room has at least one seat
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &TimetableInput) -> ValidationResult {
    let mut errors = Vec::new();

    let periods = collect_ids("period", input.periods.iter().map(|p| p.id.as_str()), &mut errors);
    let courses = collect_ids("course", input.courses.iter().map(|c| c.id.as_str()), &mut errors);
    let offerings = collect_ids(
        "offering",
        input.offerings.iter().map(|o| o.id.as_str()),
        &mut errors,
    );
    collect_ids(
        "section",
        input.sections.iter().map(|s| s.id.as_str()),
        &mut errors,
    );
    let teachers = collect_ids(
        "teacher",
        input.teachers.iter().map(|t| t.id.as_str()),
        &mut errors,
    );
    collect_ids("room", input.rooms.iter().map(|r| r.id.as_str()), &mut errors);

    for offering in &input.offerings {
        let owner = format!("Offering '{}'", offering.id);
        check_reference(&courses, &offering.course_id, &owner, "course", &mut errors);
        check_reference(&periods, &offering.period_id, &owner, "period", &mut errors);
    }

    for section in &input.sections {
        check_reference(
            &offerings,
            &section.offering_id,
            format!("Section '{}'", section.id),
            "offering",
            &mut errors,
        );
    }

    for pref in &input.teacher_preferences {
        let owner = format!("Teacher preference {}/{}", pref.course_id, pref.teacher_id);
        check_reference(&courses, &pref.course_id, &owner, "course", &mut errors);
        check_reference(&teachers, &pref.teacher_id, &owner, "teacher", &mut errors);
    }

    for pref in &input.day_preferences {
        check_reference(
            &courses,
            &pref.course_id,
            format!("Day preference {}/{}", pref.course_id, pref.day),
            "course",
            &mut errors,
        );
    }

    for interval in &input.unavailability {
        let owner = format!(
            "Unavailability of '{}' on {}",
            interval.teacher_id, interval.day
        );
        check_reference(&teachers, &interval.teacher_id, &owner, "teacher", &mut errors);
        if interval.end < interval.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!("{owner} ends before it starts"),
            ));
        }
    }

    for room in &input.rooms {
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCapacity,
                format!("Room '{}' has no seats", room.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn day_name(day: u8) -> String {
    weekday_of(day).map_or_else(|| format!("day {day}"), |d| d.to_string())
}

/// Flags every overlapping pair within each group.
fn pairwise_clashes<K: Ord + Display>(
    groups: BTreeMap<K, Vec<&Placement>>,
    violation_type: ViolationType,
    what: &str,
    violations: &mut Vec<Violation>,
) {
    for (key, placements) in groups {
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                if a.overlaps(b) {
                    violations.push(Violation::new(
                        violation_type.clone(),
                        key.to_string(),
                        format!(
                            "{what} {key} double-booked on {}: {} ({}) and {} ({})",
                            day_name(a.day),
                            a.hours(),
                            a.section_id,
                            b.hours(),
                            b.section_id
                        ),
                    ));
                }
            }
        }
    }
}

/// Verifies every hard constraint over a finished timetable.
///
/// Checks, per placement: known section/course/room, inside the grid,
/// room category and presence match the course requirements, room seats
/// the section, teacher presence matches the course requirement, teacher
/// not inside standing unavailability. Across placements: no teacher,
/// room, or cohort overlap, and a single teacher per teacher-required
/// section.
///
/// # Complexity
/// O(n²) in the largest per-teacher, per-room, or per-cohort group.
pub fn check_timetable(timetable: &Timetable, catalog: &Catalog, grid: &TimeGrid) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut by_teacher: BTreeMap<&str, Vec<&Placement>> = BTreeMap::new();
    let mut by_room: BTreeMap<&str, Vec<&Placement>> = BTreeMap::new();
    let mut by_cohort: BTreeMap<u32, Vec<&Placement>> = BTreeMap::new();
    let mut section_teachers: HashMap<&str, HashSet<&str>> = HashMap::new();

    let mut blocked: HashMap<(&str, u8), Vec<_>> = HashMap::new();
    for interval in &catalog.unavailability {
        if let Some(day) = day_index(interval.day) {
            blocked
                .entry((interval.teacher_id.as_str(), day))
                .or_default()
                .push(interval.blocked_hours());
        }
    }

    for p in &timetable.placements {
        let Some(unit) = catalog.section(&p.section_id) else {
            violations.push(Violation::new(
                ViolationType::UnknownReference,
                &p.section_id,
                format!("Placement references unknown section '{}'", p.section_id),
            ));
            continue;
        };
        let course = &unit.course;
        if course.id != p.course_id {
            violations.push(Violation::new(
                ViolationType::UnknownReference,
                &p.section_id,
                format!(
                    "Section '{}' belongs to course '{}', not '{}'",
                    p.section_id, course.id, p.course_id
                ),
            ));
        }

        if p.start_hour >= p.end_hour || !grid.contains(p.day, p.hours()) {
            violations.push(Violation::new(
                ViolationType::OutsideWindow,
                &p.section_id,
                format!(
                    "{} on {} {} lies outside the {} window",
                    unit.label(),
                    day_name(p.day),
                    p.hours(),
                    grid.window()
                ),
            ));
        }

        let required = course
            .requires_space_for(p.session_type)
            .then(|| RoomCategory::for_session(p.session_type));
        match (&p.room_id, required) {
            (None, None) => {}
            (None, Some(category)) => violations.push(Violation::new(
                ViolationType::RoomCategoryMismatch,
                &p.section_id,
                format!("{} {} needs a {category}", unit.label(), p.session_type),
            )),
            (Some(room_id), None) => violations.push(Violation::new(
                ViolationType::RoomCategoryMismatch,
                room_id,
                format!(
                    "{} {} binds room '{room_id}' but needs none",
                    unit.label(),
                    p.session_type
                ),
            )),
            (Some(room_id), Some(category)) => match catalog.room(room_id) {
                None => violations.push(Violation::new(
                    ViolationType::UnknownReference,
                    room_id,
                    format!("Placement references unknown room '{room_id}'"),
                )),
                Some(room) => {
                    if room.category != category {
                        violations.push(Violation::new(
                            ViolationType::RoomCategoryMismatch,
                            room_id,
                            format!(
                                "{} {} held in {} '{room_id}'",
                                unit.label(),
                                p.session_type,
                                room.category
                            ),
                        ));
                    }
                    if room.capacity < unit.capacity {
                        violations.push(Violation::new(
                            ViolationType::CapacityExceeded,
                            room_id,
                            format!(
                                "Room '{room_id}' seats {} but {} needs {}",
                                room.capacity,
                                unit.label(),
                                unit.capacity
                            ),
                        ));
                    }
                }
            },
        }

        match (&p.teacher_id, course.requires_teacher) {
            (Some(teacher), true) => {
                section_teachers
                    .entry(p.section_id.as_str())
                    .or_default()
                    .insert(teacher.as_str());
            }
            (None, true) => violations.push(Violation::new(
                ViolationType::TeacherSplit,
                &p.section_id,
                format!("{} {} has no teacher", unit.label(), p.session_type),
            )),
            (Some(teacher), false) => violations.push(Violation::new(
                ViolationType::TeacherSplit,
                teacher,
                format!(
                    "{} binds teacher '{teacher}' but its course needs none",
                    unit.label()
                ),
            )),
            (None, false) => {}
        }

        if let Some(teacher) = &p.teacher_id {
            if let Some(ranges) = blocked.get(&(teacher.as_str(), p.day)) {
                if ranges.iter().any(|r| r.overlaps(&p.hours())) {
                    violations.push(Violation::new(
                        ViolationType::TeacherUnavailable,
                        teacher,
                        format!(
                            "Teacher '{teacher}' is unavailable on {} {}",
                            day_name(p.day),
                            p.hours()
                        ),
                    ));
                }
            }
            by_teacher.entry(teacher.as_str()).or_default().push(p);
        }
        if let Some(room) = &p.room_id {
            by_room.entry(room.as_str()).or_default().push(p);
        }
        by_cohort.entry(course.cycle).or_default().push(p);
    }

    let mut split: Vec<_> = section_teachers
        .into_iter()
        .filter(|(_, teachers)| teachers.len() > 1)
        .collect();
    split.sort_by_key(|(section, _)| *section);
    for (section, teachers) in split {
        let mut teachers: Vec<_> = teachers.into_iter().collect();
        teachers.sort_unstable();
        violations.push(Violation::new(
            ViolationType::TeacherSplit,
            section,
            format!(
                "Section '{section}' is split across teachers {}",
                teachers.join(", ")
            ),
        ));
    }

    pairwise_clashes(by_teacher, ViolationType::TeacherDoubleBooked, "Teacher", &mut violations);
    pairwise_clashes(by_room, ViolationType::RoomDoubleBooked, "Room", &mut violations);
    pairwise_clashes(by_cohort, ViolationType::CohortClash, "Cycle", &mut violations);

    violations
}
