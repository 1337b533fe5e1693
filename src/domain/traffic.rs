use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use crate::domain::allocation_store::Allocation;
use crate::domain::utils::id::CorridorId;
use crate::domain::venue::VenueCatalog;
use crate::error::Result;

/// Total load carried by one corridor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorridorLoad {
    pub corridor: CorridorId,
    pub load: i64,
    pub capacity: i64,
}

impl CorridorLoad {
    pub fn is_congested(&self) -> bool {
        self.load > self.capacity
    }
}

impl fmt::Display for CorridorLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.corridor, self.load)
    }
}

/// Corridors with nonzero load, ordered by corridor id.
///
/// Always derived from an allocation snapshot; never stored alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficReport {
    entries: Vec<CorridorLoad>,
}

impl TrafficReport {
    pub fn entries(&self) -> &[CorridorLoad] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load_on(&self, corridor: &CorridorId) -> Option<i64> {
        self.entries
            .binary_search_by(|entry| entry.corridor.cmp(corridor))
            .ok()
            .map(|position| self.entries[position].load)
    }

    /// Entries whose load exceeds the corridor capacity.
    pub fn congested(&self) -> impl Iterator<Item = &CorridorLoad> {
        self.entries.iter().filter(|entry| entry.is_congested())
    }

    pub fn total_load(&self) -> i64 {
        self.entries.iter().fold(0, |total, entry| total.saturating_add(entry.load))
    }

    /// Writes the report as `;`-separated CSV with a `corridor;load;capacity` header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').terminator(csv::Terminator::Any(b'\n')).from_writer(writer);

        if self.entries.is_empty() {
            csv_wtr.write_record(["corridor", "load", "capacity"]).map_err(io::Error::from)?;
        }
        for entry in &self.entries {
            csv_wtr.serialize(entry).map_err(io::Error::from)?;
        }

        csv_wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for TrafficReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Computes corridor loads from an allocation snapshot.
///
/// Every allocated event adds its size to each corridor listed on its venue.
/// Corridors listed on several venues accumulate across all of them; a load
/// too large for `i64` is reported as `i64::MAX`. A corridor's capacity comes
/// from `catalog`, falling back to the tightest capacity seen on the allocated
/// venues when the catalog does not know the corridor.
/// Neither input is modified and the result is built from scratch on every call.
pub fn compute_traffic(allocations: &[Allocation<'_>], catalog: &VenueCatalog) -> TrafficReport {
    // corridor -> (load, tightest capacity on the allocated venues)
    let mut loads: BTreeMap<&CorridorId, (i64, i64)> = BTreeMap::new();

    for allocation in allocations {
        for corridor in allocation.venue.corridors() {
            let (load, capacity) = loads.entry(&corridor.id).or_insert((0, corridor.capacity));
            *load = load.saturating_add(allocation.event.size());
            *capacity = (*capacity).min(corridor.capacity);
        }
    }

    let entries = loads
        .into_iter()
        .filter(|&(_, (load, _))| load != 0)
        .map(|(corridor, (load, seen_capacity))| CorridorLoad {
            corridor: corridor.clone(),
            load,
            capacity: catalog.corridor_capacity(corridor).unwrap_or(seen_capacity),
        })
        .collect();

    TrafficReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::catalog_dto::{CorridorDto, VenueCatalogDto, VenueDto};
    use crate::domain::allocation_store::AllocationStore;
    use crate::domain::event::Event;
    use crate::domain::utils::id::VenueName;
    use std::sync::Arc;

    fn venue_dto(name: &str, capacity: i64, corridors: Vec<(&str, i64)>) -> VenueDto {
        VenueDto {
            name: name.to_string(),
            capacity,
            corridors: corridors
                .into_iter()
                .map(|(id, corridor_capacity)| CorridorDto {
                    id: id.to_string(),
                    target: name.to_string(),
                    capacity: corridor_capacity,
                    line: None,
                })
                .collect(),
            line: None,
        }
    }

    fn catalog(venues: Vec<VenueDto>) -> Arc<VenueCatalog> {
        Arc::new(VenueCatalog::try_from(VenueCatalogDto { venues }).unwrap())
    }

    #[test]
    fn test_huge_loads_saturate_instead_of_overflowing() {
        let catalog = catalog(vec![
            venue_dto("A", i64::MAX, vec![("r1", 10)]),
            venue_dto("B", i64::MAX, vec![("r1", 10)]),
        ]);
        let mut store = AllocationStore::new(Arc::clone(&catalog));
        store.allocate(Event::new("X", i64::MAX).unwrap(), &VenueName::new("A")).unwrap();
        store.allocate(Event::new("Y", i64::MAX).unwrap(), &VenueName::new("B")).unwrap();

        let report = compute_traffic(&store.current_allocations(), &catalog);

        assert_eq!(report.load_on(&CorridorId::new("r1")), Some(i64::MAX));
        assert_eq!(report.total_load(), i64::MAX);
        assert!(report.entries()[0].is_congested());
    }

    #[test]
    fn test_total_load_saturates_across_corridors() {
        let catalog = catalog(vec![venue_dto("A", i64::MAX, vec![("r1", 10), ("r2", 10)])]);
        let mut store = AllocationStore::new(Arc::clone(&catalog));
        store.allocate(Event::new("X", i64::MAX).unwrap(), &VenueName::new("A")).unwrap();

        let report = compute_traffic(&store.current_allocations(), &catalog);

        assert_eq!(report.len(), 2);
        assert_eq!(report.total_load(), i64::MAX);
    }

    #[test]
    fn test_capacity_falls_back_to_allocated_venues_for_foreign_catalog() {
        let own = catalog(vec![venue_dto("A", 100, vec![("r1", 50)])]);
        let unrelated = catalog(vec![venue_dto("Z", 100, vec![("z1", 5)])]);
        let mut store = AllocationStore::new(Arc::clone(&own));
        store.allocate(Event::new("X", 40).unwrap(), &VenueName::new("A")).unwrap();

        let report = compute_traffic(&store.current_allocations(), &unrelated);

        assert_eq!(report.entries()[0].capacity, 50);
        assert_eq!(report.congested().count(), 0);
    }
}
