use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::utils::id::EventName;
use crate::error::{Error, Result};

/// Something that needs a venue: a named gathering of `size` attendees.
///
/// Two events with the same name are the same event, regardless of size.
#[derive(Debug, Clone)]
pub struct Event {
    name: EventName,
    size: i64,
}

impl Event {
    /// Creates an event, rejecting an empty name or a non-positive size.
    pub fn new(name: impl Into<String>, size: i64) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::InvalidInput("event name cannot be empty".to_string()));
        }
        if size <= 0 {
            return Err(Error::InvalidInput(format!("event '{}' must have a positive size, got {}", trimmed, size)));
        }

        Ok(Self { name: EventName::new(trimmed), size })
    }

    pub fn name(&self) -> &EventName {
        &self.name
    }

    pub fn size(&self) -> i64 {
        self.size
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.size)
    }
}
