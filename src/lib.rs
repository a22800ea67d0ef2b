//! Course timetable construction.
//!
//! Builds the weekly timetable of an academic period: every course
//! section gets a day, a contiguous hour range, and where the course asks
//! for them a teacher and a room, without double-booking any teacher,
//! room, or student cohort.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Offering`, `Section`, `Room`,
//!   `Teacher`, `Unavailability`, preferences, `Placement`, `Timetable`,
//!   and the `TimetableInput` snapshot with its indexed `Catalog`
//! - **`scheduler`**: Greedy construction engine (`ConstructionDriver`)
//!   and timetable KPIs
//! - **`validation`**: Input integrity checks and exhaustive timetable
//!   verification
//! - **`diagnostics`**: Capacity pre-checks (teacher eligibility, room and
//!   lab supply, cohort congestion, teacher free time)
//! - **`store`**: Transactional placement persistence
//! - **`config`**: Engine configuration and the global teaching window
//! - **`error`**: Run-level errors
//!
//! # Logging
//!
//! The crate emits `tracing` events and installs no subscriber.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - de Werra (1985), "An introduction to timetabling"

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use config::EngineConfig;
pub use error::{Result, TimetableError};
pub use scheduler::{ConstructionDriver, RunReport};
pub use store::{InMemoryStore, PlacementStore};
