use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::api::catalog_dto::{CorridorDto, VenueCatalogDto, VenueDto};
use crate::domain::utils::id::{CorridorId, VenueName};
use crate::error::{Error, Result, SourceLocation};

/// A road segment giving access to a venue.
///
/// The same `id` may appear on several venues when one physical road serves
/// all of them; traffic on that road is the sum over those venues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corridor {
    pub id: CorridorId,
    pub target: VenueName,
    pub capacity: i64,
}

/// A location that can host at most one event of up to `capacity` attendees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    name: VenueName,
    capacity: i64,
    /// The corridors used to reach this venue, in document order.
    corridors: Vec<Corridor>,
}

impl Venue {
    pub fn name(&self) -> &VenueName {
        &self.name
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.capacity)
    }
}

/// The validated, immutable venue network.
///
/// Built once from a [`VenueCatalogDto`] and then shared read-only
/// (usually behind an `Arc`) by the allocation store and traffic aggregation.
#[derive(Debug, Clone, Default)]
pub struct VenueCatalog {
    venues: Vec<Venue>,

    /// Position of each venue in `venues`.
    index: HashMap<VenueName, usize>,

    /// Lowest capacity declared for each corridor id across all venues.
    corridor_capacities: BTreeMap<CorridorId, i64>,
}

impl TryFrom<VenueCatalogDto> for VenueCatalog {
    type Error = Error;

    fn try_from(dto: VenueCatalogDto) -> Result<Self> {
        // 1. Every name in the document may be referenced, including ones further down.
        let known_names: HashSet<&str> = dto.venues.iter().map(|venue| venue.name.trim()).collect();

        // 2. Validate and convert records in document order; the first violation wins.
        let mut venues = Vec::with_capacity(dto.venues.len());
        let mut index = HashMap::with_capacity(dto.venues.len());

        for (position, venue_dto) in dto.venues.iter().enumerate() {
            let venue = VenueCatalog::convert_venue(venue_dto, position, &known_names)?;

            if index.contains_key(&venue.name) {
                return Err(Error::format(
                    record_location(venue_dto.line, position),
                    format!("duplicate venue name '{}'", venue.name),
                ));
            }

            index.insert(venue.name.clone(), venues.len());
            venues.push(venue);
        }

        // 3. Index shared corridors.
        let corridor_capacities = VenueCatalog::setup_corridor_capacities(&venues);

        log::debug!("Venue catalog built: {} venues, {} distinct corridors.", venues.len(), corridor_capacities.len());

        Ok(VenueCatalog { venues, index, corridor_capacities })
    }
}

impl VenueCatalog {
    fn convert_venue(dto: &VenueDto, position: usize, known_names: &HashSet<&str>) -> Result<Venue> {
        let location = record_location(dto.line, position);
        let name = dto.name.trim();

        if name.is_empty() {
            return Err(Error::format(location, "venue name is empty"));
        }
        if dto.capacity <= 0 {
            return Err(Error::format(location, format!("venue '{}' has non-positive capacity {}", name, dto.capacity)));
        }

        let mut corridors: Vec<Corridor> = Vec::with_capacity(dto.corridors.len());
        for corridor_dto in &dto.corridors {
            let corridor = VenueCatalog::convert_corridor(corridor_dto, position, known_names)?;

            if corridors.iter().any(|existing| existing.id == corridor.id) {
                return Err(Error::format(
                    record_location(corridor_dto.line, position),
                    format!("corridor '{}' listed twice for venue '{}'", corridor.id, name),
                ));
            }
            corridors.push(corridor);
        }

        Ok(Venue { name: VenueName::new(name), capacity: dto.capacity, corridors })
    }

    fn convert_corridor(dto: &CorridorDto, position: usize, known_names: &HashSet<&str>) -> Result<Corridor> {
        let location = record_location(dto.line, position);
        let id = dto.id.trim();
        let target = dto.target.trim();

        if id.is_empty() {
            return Err(Error::format(location, "corridor id is empty"));
        }
        if dto.capacity <= 0 {
            return Err(Error::format(location, format!("corridor '{}' has non-positive capacity {}", id, dto.capacity)));
        }
        if !known_names.contains(target) {
            return Err(Error::format(location, format!("corridor '{}' references unknown venue '{}'", id, target)));
        }

        Ok(Corridor { id: CorridorId::new(id), target: VenueName::new(target), capacity: dto.capacity })
    }

    fn setup_corridor_capacities(venues: &[Venue]) -> BTreeMap<CorridorId, i64> {
        let mut capacities: BTreeMap<CorridorId, i64> = BTreeMap::new();

        for corridor in venues.iter().flat_map(|venue| venue.corridors.iter()) {
            capacities
                .entry(corridor.id.clone())
                .and_modify(|capacity| *capacity = (*capacity).min(corridor.capacity))
                .or_insert(corridor.capacity);
        }

        capacities
    }

    /// All venues in document order.
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn get(&self, name: &VenueName) -> Option<&Venue> {
        self.index.get(name).map(|&position| &self.venues[position])
    }

    pub fn contains(&self, name: &VenueName) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Capacity of a corridor; for a shared corridor the tightest declaration.
    pub fn corridor_capacity(&self, id: &CorridorId) -> Option<i64> {
        self.corridor_capacities.get(id).copied()
    }

    pub fn corridor_ids(&self) -> impl Iterator<Item = &CorridorId> {
        self.corridor_capacities.keys()
    }
}

fn record_location(line: Option<usize>, position: usize) -> SourceLocation {
    match line {
        Some(line) => SourceLocation::Line(line),
        None => SourceLocation::Record(position + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_dto(name: &str, capacity: i64, corridors: Vec<CorridorDto>) -> VenueDto {
        VenueDto { name: name.to_string(), capacity, corridors, line: None }
    }

    fn corridor_dto(id: &str, target: &str, capacity: i64) -> CorridorDto {
        CorridorDto { id: id.to_string(), target: target.to_string(), capacity, line: None }
    }

    #[test]
    fn test_forward_references_resolve() {
        let dto = VenueCatalogDto {
            venues: vec![venue_dto("A", 100, vec![corridor_dto("r1", "B", 50)]), venue_dto("B", 80, vec![])],
        };

        let catalog = VenueCatalog::try_from(dto).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&VenueName::new("A")).unwrap().corridors()[0].target, VenueName::new("B"));
    }

    #[test]
    fn test_shared_corridor_keeps_tightest_capacity() {
        let dto = VenueCatalogDto {
            venues: vec![
                venue_dto("A", 100, vec![corridor_dto("r1", "A", 50)]),
                venue_dto("B", 80, vec![corridor_dto("r1", "B", 35)]),
            ],
        };

        let catalog = VenueCatalog::try_from(dto).unwrap();

        assert_eq!(catalog.corridor_capacity(&CorridorId::new("r1")), Some(35));
        assert_eq!(catalog.corridor_ids().count(), 1);
    }

    #[test]
    fn test_duplicate_venue_reports_second_record() {
        let dto = VenueCatalogDto { venues: vec![venue_dto("A", 10, vec![]), venue_dto("A", 20, vec![])] };

        match VenueCatalog::try_from(dto) {
            Err(Error::FormatError { location, .. }) => assert_eq!(location, SourceLocation::Record(2)),
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_corridor_within_venue_is_rejected() {
        let dto = VenueCatalogDto {
            venues: vec![venue_dto("A", 10, vec![corridor_dto("r1", "A", 5), corridor_dto("r1", "A", 5)])],
        };

        assert!(matches!(VenueCatalog::try_from(dto), Err(Error::FormatError { .. })));
    }
}
