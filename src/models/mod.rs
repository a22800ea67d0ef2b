//! Timetabling domain models.
//!
//! Provides the read-only input snapshot of one academic period and the
//! placement output produced by the construction engine.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Training Center |
//! |-------------|------------|-----------------|
//! | Course | Course in a study plan | Program module |
//! | Offering | Course opened in a term | Scheduled run |
//! | Section | Group / class section | Cohort batch |
//! | Room | Lecture room / lab | Classroom / workshop |
//! | Placement | Timetable slot | Session booking |

mod calendar;
mod course;
mod input;
mod period;
mod preference;
mod resource;
mod schedule;

pub use calendar::{
    day_index, weekday_of, whole_hour, HourRange, Unavailability, OPERATIONAL_DAYS,
};
pub use course::{Course, Offering, Section, SessionPolicy, SessionType};
pub use input::{Catalog, SectionUnit, TimetableInput};
pub use period::{CreationWindow, Period};
pub use preference::{DayPreference, PreferenceLevel, TeacherPreference};
pub use resource::{Room, RoomCategory, Teacher};
pub use schedule::{Placement, Timetable, Violation, ViolationType};
