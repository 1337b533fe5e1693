use serde::{Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A name or identifier tagged with the kind of thing it names.
///
/// The tag only exists at compile time, so an `EventName` can never be
/// handed to an API expecting a `VenueName`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Id<T> {
    pub id: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(id_wrapper: Id<T>) -> Self {
        id_wrapper.id
    }
}

impl<T> From<&str> for Id<T> {
    fn from(id: &str) -> Self {
        Id::new(id)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.trim_end_matches("Tag");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct EventTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct VenueTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct CorridorTag;

pub type EventName = Id<EventTag>;
pub type VenueName = Id<VenueTag>;
pub type CorridorId = Id<CorridorTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_shows_kind() {
        let venue = VenueName::new("Hall A");
        assert_eq!(format!("{:?}", venue), "Venue: \"Hall A\"");
        assert_eq!(venue.to_string(), "Hall A");
    }

    #[test]
    fn test_corridor_ids_order_by_string() {
        let mut ids = vec![CorridorId::new("r2"), CorridorId::new("r10"), CorridorId::new("r1")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["r1", "r10", "r2"]);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&EventName::new("Expo")).unwrap();
        assert_eq!(json, "\"Expo\"");
    }
}
