//! Error types for the attendance tracker.

use thiserror::Error;

use crate::models::StudentId;

#[derive(Debug, Error)]
pub enum AttendanceError {
    /// The front end referred to a student that is not on the roster.
    #[error("no student with ID {0} is on the roster")]
    UnknownStudent(StudentId),

    #[error("invalid year '{0}', expected one of FE, SE, TE, BE")]
    InvalidYear(String),

    #[error("unterminated quote in command: {0}")]
    UnterminatedQuote(String),

    #[error("failed to encode attendance export: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
