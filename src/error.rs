use std::fmt;

use thiserror::Error;

use crate::domain::utils::id::{EventName, VenueName};

/// Where in a venue description a problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLocation {
    /// 1-based line of the text document.
    Line(usize),
    /// 1-based line and column, reported for JSON syntax errors.
    Position { line: usize, column: usize },
    /// 1-based index of the venue record when no line is known.
    Record(usize),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Line(line) => write!(f, "line {}", line),
            SourceLocation::Position { line, column } => write!(f, "line {}, column {}", line, column),
            SourceLocation::Record(index) => write!(f, "record {}", index),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed venue description at {location}: {reason}")]
    FormatError { location: SourceLocation, reason: String },

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Event '{0}' already exists")]
    DuplicateEvent(EventName),

    #[error("Event '{event}' (size {size}) does not fit venue '{venue}' (capacity {capacity})")]
    CapacityExceeded { event: EventName, size: i64, venue: VenueName, capacity: i64 },

    #[error("Venue '{venue}' is already allocated to event '{occupant}'")]
    VenueInUse { venue: VenueName, occupant: EventName },
}

impl Error {
    pub fn format(location: SourceLocation, reason: impl Into<String>) -> Self {
        Error::FormatError { location, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
