use std::fmt;
use std::sync::Arc;

use crate::domain::allocation_store::AllocationStore;
use crate::domain::event::Event;
use crate::domain::traffic::{TrafficReport, compute_traffic};
use crate::domain::utils::id::{EventName, VenueName};
use crate::domain::venue::{Venue, VenueCatalog};
use crate::error::{Error, Result};

pub const HELP: &str = "\
add <event> <size>                  register an event
allocate <event> <size> <venue>     register and allocate an event
remove <event name...>              unregister an event and free its venue
deallocate <event name...>          free the venue of an event
events | allocations | venues       list current state
traffic                             show corridor loads
help                                show this text";

/// A request understood by [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Event),
    Allocate { event: Event, venue: VenueName },
    Remove(EventName),
    Deallocate(EventName),
    Events,
    Allocations,
    Venues,
    Traffic,
    Help,
}

impl Command {
    /// Parses one command line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("add", [name, size]) => Command::Add(Event::new(*name, parse_size(size)?)?),
            ("allocate", [name, size, venue @ ..]) if !venue.is_empty() => {
                Command::Allocate { event: Event::new(*name, parse_size(size)?)?, venue: VenueName::new(venue.join(" ")) }
            }
            ("remove", name @ [_, ..]) => Command::Remove(EventName::new(name.join(" "))),
            ("deallocate", name @ [_, ..]) => Command::Deallocate(EventName::new(name.join(" "))),
            ("events", []) => Command::Events,
            ("allocations", []) => Command::Allocations,
            ("venues", []) => Command::Venues,
            ("traffic", []) => Command::Traffic,
            ("help", []) => Command::Help,
            _ => return Err(Error::InvalidInput(format!("cannot understand '{}', try 'help'", line))),
        };

        Ok(Some(command))
    }
}

fn parse_size(size: &str) -> Result<i64> {
    size.parse::<i64>().map_err(|_| Error::InvalidInput(format!("event size '{}' is not a number", size)))
}

/// What a [`Session`] hands back for a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// State changed; carries the traffic recomputed from the new state.
    Updated(TrafficReport),
    Events(Vec<Event>),
    Allocations(Vec<(Event, Venue)>),
    Venues(Vec<(Venue, Option<EventName>)>),
    Traffic(TrafficReport),
    Help,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Updated(report) | Response::Traffic(report) if report.is_empty() => writeln!(f, "no corridor traffic"),
            Response::Updated(report) | Response::Traffic(report) => {
                for entry in report.entries() {
                    let marker = if entry.is_congested() { "  (over capacity)" } else { "" };
                    writeln!(f, "{} / {}{}", entry, entry.capacity, marker)?;
                }
                Ok(())
            }
            Response::Events(events) if events.is_empty() => writeln!(f, "no events"),
            Response::Events(events) => events.iter().try_for_each(|event| writeln!(f, "{}", event)),
            Response::Allocations(allocations) if allocations.is_empty() => writeln!(f, "no allocations"),
            Response::Allocations(allocations) => {
                allocations.iter().try_for_each(|(event, venue)| writeln!(f, "{} => {}", event, venue))
            }
            Response::Venues(venues) => venues.iter().try_for_each(|(venue, occupant)| match occupant {
                Some(event) => writeln!(f, "{} [{}]", venue, event),
                None => writeln!(f, "{} [free]", venue),
            }),
            Response::Help => writeln!(f, "{}", HELP),
        }
    }
}

/// Ties the venue catalog, the allocation store and traffic aggregation together.
///
/// Every mutation is answered with traffic computed from the state it produced,
/// so a caller never sees a report from a different state than its own change.
#[derive(Debug)]
pub struct Session {
    catalog: Arc<VenueCatalog>,
    store: AllocationStore,
}

impl Session {
    pub fn new(catalog: Arc<VenueCatalog>) -> Self {
        let store = AllocationStore::new(Arc::clone(&catalog));
        Self { catalog, store }
    }

    pub fn store(&self) -> &AllocationStore {
        &self.store
    }

    pub fn traffic(&self) -> TrafficReport {
        compute_traffic(&self.store.current_allocations(), &self.catalog)
    }

    /// Parses and applies one command line.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Response>> {
        match Command::parse(line)? {
            Some(command) => self.apply(command).map(Some),
            None => Ok(None),
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::Add(event) => {
                self.store.add_event(event)?;
                Ok(Response::Updated(self.traffic()))
            }
            Command::Allocate { event, venue } => {
                let report = compute_traffic(&self.store.allocate(event, &venue)?, &self.catalog);
                Ok(Response::Updated(report))
            }
            Command::Remove(name) => {
                self.store.remove_event(&name);
                Ok(Response::Updated(self.traffic()))
            }
            Command::Deallocate(name) => {
                self.store.deallocate(&name);
                Ok(Response::Updated(self.traffic()))
            }
            Command::Events => Ok(Response::Events(self.store.events().cloned().collect())),
            Command::Allocations => Ok(Response::Allocations(
                self.store
                    .current_allocations()
                    .into_iter()
                    .map(|allocation| (allocation.event.clone(), allocation.venue.clone()))
                    .collect(),
            )),
            Command::Venues => Ok(Response::Venues(
                self.catalog
                    .venues()
                    .iter()
                    .map(|venue| (venue.clone(), self.store.event_at(venue.name()).map(|event| event.name().clone())))
                    .collect(),
            )),
            Command::Traffic => Ok(Response::Traffic(self.traffic())),
            Command::Help => Ok(Response::Help),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allocate_with_spaced_venue() {
        let command = Command::parse("allocate Gala 40 Town Hall").unwrap().unwrap();

        assert_eq!(command, Command::Allocate { event: Event::new("Gala", 40).unwrap(), venue: VenueName::new("Town Hall") });
    }

    #[test]
    fn test_parse_remove_and_deallocate_keep_spaced_names() {
        assert_eq!(Command::parse("remove Summer  Gala").unwrap(), Some(Command::Remove(EventName::new("Summer Gala"))));
        assert_eq!(Command::parse("deallocate Summer Gala").unwrap(), Some(Command::Deallocate(EventName::new("Summer Gala"))));
        assert!(matches!(Command::parse("remove"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# setup").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_malformed_commands() {
        assert!(matches!(Command::parse("allocate Gala 40"), Err(Error::InvalidInput(_))));
        assert!(matches!(Command::parse("add Gala many"), Err(Error::InvalidInput(_))));
        assert!(matches!(Command::parse("add Gala 0"), Err(Error::InvalidInput(_))));
        assert!(matches!(Command::parse("launch"), Err(Error::InvalidInput(_))));
    }
}
