#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use venue_allocator::domain::event::Event;
use venue_allocator::domain::venue::VenueCatalog;
use venue_allocator::load_catalog;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// Venue A (100, r1), Venue B (80, r1 + r2), Venue C (20, no corridors).
pub fn test_catalog() -> Arc<VenueCatalog> {
    Arc::new(load_catalog(fixture("venues.txt")).expect("fixture catalog should load"))
}

pub fn event(name: &str, size: i64) -> Event {
    Event::new(name, size).expect("valid test event")
}
