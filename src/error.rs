//! Run-level errors.
//!
//! Only configuration problems and store failures abort a construction
//! run. A section that cannot be placed is not an error: it is reported
//! in [`RunReport::failed`](crate::scheduler::RunReport).

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Errors that abort a construction run.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("No academic period is open for timetable construction")]
    NoActivePeriod,

    #[error("Unknown academic period: {0}")]
    UnknownPeriod(String),

    #[error("Invalid teaching window: {start}:00-{end}:00")]
    InvalidWindow { start: u32, end: u32 },

    #[error("No rooms are registered")]
    NoRooms,

    #[error("Invalid input ({} issue(s)): {}", .0.len(), summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for run-level operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_input_message() {
        let err = TimetableError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate room ID: A1"),
            ValidationError::new(ValidationErrorKind::EmptyCapacity, "Room 'L1' has no seats"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input (2 issue(s)): Duplicate room ID: A1; Room 'L1' has no seats"
        );
    }

    #[test]
    fn test_window_message() {
        let err = TimetableError::InvalidWindow { start: 22, end: 7 };
        assert_eq!(err.to_string(), "Invalid teaching window: 22:00-7:00");
    }
}
