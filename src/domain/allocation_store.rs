use bimap::BiMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::event::Event;
use crate::domain::utils::id::{EventName, VenueName};
use crate::domain::venue::{Venue, VenueCatalog};
use crate::error::{Error, Result};

new_key_type! {
    pub struct EventKey;
}

/// One event paired with the venue hosting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation<'a> {
    pub event: &'a Event,
    pub venue: &'a Venue,
}

/// Single source of truth for the known events and their venue assignments.
///
/// Invariants held after every public call:
/// * each event is allocated at most once and each venue hosts at most one event,
/// * every allocated event is registered,
/// * an allocated event never exceeds its venue's capacity.
///
/// Failed mutations leave the store untouched.
#[derive(Debug)]
pub struct AllocationStore {
    catalog: Arc<VenueCatalog>,

    /// Event storage.
    events: SlotMap<EventKey, Event>,

    /// Index lookup EventKey using the event name.
    name_index: HashMap<EventName, EventKey>,

    /// Registered events in the order they became known.
    registration_order: Vec<EventKey>,

    /// Event <-> venue, bijective by construction.
    allocations: BiMap<EventKey, VenueName>,

    /// Allocated events in the order of their first successful allocate call.
    allocation_order: Vec<EventKey>,
}

impl AllocationStore {
    pub fn new(catalog: Arc<VenueCatalog>) -> Self {
        Self {
            catalog,
            events: SlotMap::with_key(),
            name_index: HashMap::new(),
            registration_order: Vec::new(),
            allocations: BiMap::new(),
            allocation_order: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<VenueCatalog> {
        &self.catalog
    }

    //----------------------
    // --- Event catalog ---
    //----------------------

    /// Registers an event without allocating it.
    pub fn add_event(&mut self, event: Event) -> Result<()> {
        if self.name_index.contains_key(event.name()) {
            return Err(Error::DuplicateEvent(event.name().clone()));
        }

        log::debug!("Event {} registered.", event);
        self.insert_event(event);
        Ok(())
    }

    /// Unregisters an event, dropping its allocation as well.
    ///
    /// # Returns
    /// The removed event, or `None` if no event of that name was known.
    pub fn remove_event(&mut self, name: &EventName) -> Option<Event> {
        let key = self.name_index.remove(name)?;

        if let Some(venue) = self.release(key) {
            log::debug!("Event '{}' removed while allocated; released venue '{}'.", name, venue);
        }
        self.registration_order.retain(|&registered| registered != key);

        let event = self.events.remove(key);
        log::debug!("Event '{}' unregistered.", name);
        event
    }

    pub fn contains_event(&self, name: &EventName) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn get_event(&self, name: &EventName) -> Option<&Event> {
        let key = self.name_index.get(name)?;
        self.events.get(*key)
    }

    /// Registered events in registration order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.registration_order.iter().filter_map(|&key| self.events.get(key))
    }

    //-------------------
    // --- Allocation ---
    //-------------------

    /// Assigns `event` to the venue called `venue`, registering the event if needed.
    ///
    /// Registration and assignment happen together or not at all. Checks run in
    /// this order: the venue exists, the event fits the venue, the venue is not
    /// hosting a different event. Re-allocating an allocated event moves it.
    ///
    /// # Returns
    /// The allocation snapshot after the change.
    pub fn allocate(&mut self, event: Event, venue: &VenueName) -> Result<Vec<Allocation<'_>>> {
        let catalog = Arc::clone(&self.catalog);
        let venue = catalog
            .get(venue)
            .ok_or_else(|| Error::InvalidInput(format!("venue '{}' is not part of the venue catalog", venue)))?;

        let existing = self.name_index.get(event.name()).copied();
        if let Some(key) = existing {
            if self.events[key].size() != event.size() {
                return Err(Error::DuplicateEvent(event.name().clone()));
            }
        }

        if event.size() > venue.capacity() {
            return Err(Error::CapacityExceeded {
                event: event.name().clone(),
                size: event.size(),
                venue: venue.name().clone(),
                capacity: venue.capacity(),
            });
        }

        if let Some(&occupant) = self.allocations.get_by_right(venue.name()) {
            if Some(occupant) != existing {
                return Err(Error::VenueInUse { venue: venue.name().clone(), occupant: self.events[occupant].name().clone() });
            }
        }

        // All checks passed; nothing below can fail.
        let key = match existing {
            Some(key) => key,
            None => {
                log::debug!("Event {} registered by allocation.", event);
                self.insert_event(event)
            }
        };

        match self.allocations.get_by_left(&key) {
            Some(previous) if previous == venue.name() => {}
            Some(previous) => log::debug!("Event '{}' moved from '{}' to '{}'.", self.events[key].name(), previous, venue.name()),
            None => {
                self.allocation_order.push(key);
                log::debug!("Event '{}' allocated to '{}'.", self.events[key].name(), venue.name());
            }
        }
        self.allocations.insert(key, venue.name().clone());

        Ok(self.current_allocations())
    }

    /// Releases the venue held by `name`; a no-op for unallocated or unknown events.
    ///
    /// # Returns
    /// The venue that was released, if any.
    pub fn deallocate(&mut self, name: &EventName) -> Option<VenueName> {
        let key = *self.name_index.get(name)?;
        let venue = self.release(key)?;

        log::debug!("Event '{}' deallocated from '{}'.", name, venue);
        Some(venue)
    }

    /// Snapshot of all allocations in allocation order.
    pub fn current_allocations(&self) -> Vec<Allocation<'_>> {
        self.allocation_order
            .iter()
            .filter_map(|&key| {
                let event = self.events.get(key)?;
                let venue = self.catalog.get(self.allocations.get_by_left(&key)?)?;
                Some(Allocation { event, venue })
            })
            .collect()
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    pub fn venue_of(&self, name: &EventName) -> Option<&Venue> {
        let key = self.name_index.get(name)?;
        self.catalog.get(self.allocations.get_by_left(key)?)
    }

    pub fn event_at(&self, venue: &VenueName) -> Option<&Event> {
        let key = self.allocations.get_by_right(venue)?;
        self.events.get(*key)
    }

    pub fn is_venue_free(&self, venue: &VenueName) -> bool {
        !self.allocations.contains_right(venue)
    }

    /// Catalog venues without an event, in catalog order.
    pub fn free_venues(&self) -> impl Iterator<Item = &Venue> {
        self.catalog.venues().iter().filter(|venue| self.is_venue_free(venue.name()))
    }

    fn insert_event(&mut self, event: Event) -> EventKey {
        let name = event.name().clone();
        let key = self.events.insert(event);

        self.name_index.insert(name, key);
        self.registration_order.push(key);
        key
    }

    fn release(&mut self, key: EventKey) -> Option<VenueName> {
        let (_, venue) = self.allocations.remove_by_left(&key)?;
        self.allocation_order.retain(|&allocated| allocated != key);
        Some(venue)
    }
}
