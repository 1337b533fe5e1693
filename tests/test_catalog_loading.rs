mod common;

use std::io::ErrorKind;

use common::fixture;
use venue_allocator::domain::utils::id::{CorridorId, VenueName};
use venue_allocator::error::{Error, SourceLocation};
use venue_allocator::load_catalog;

fn expect_format_error(file: &str) -> (SourceLocation, String) {
    match load_catalog(fixture(file)) {
        Err(Error::FormatError { location, reason }) => (location, reason),
        other => panic!("{}: expected FormatError, got {:?}", file, other),
    }
}

#[test]
fn test_load_text_catalog() {
    let catalog = load_catalog(fixture("venues.txt")).unwrap();

    assert_eq!(catalog.len(), 3);
    let names: Vec<&str> = catalog.venues().iter().map(|venue| venue.name().as_str()).collect();
    assert_eq!(names, vec!["Venue A", "Venue B", "Venue C"]);

    let venue_b = catalog.get(&VenueName::new("Venue B")).unwrap();
    assert_eq!(venue_b.capacity(), 80);
    assert_eq!(venue_b.corridors().len(), 2);
    assert_eq!(venue_b.corridors()[1].id, CorridorId::new("r2"));
    assert_eq!(venue_b.corridors()[1].capacity, 40);

    assert!(catalog.get(&VenueName::new("Venue C")).unwrap().corridors().is_empty());
    assert_eq!(catalog.corridor_capacity(&CorridorId::new("r1")), Some(50));
}

#[test]
fn test_json_and_text_catalogs_agree() {
    let text = load_catalog(fixture("venues.txt")).unwrap();
    let json = load_catalog(fixture("venues.json")).unwrap();

    assert_eq!(text.venues(), json.venues());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_catalog(fixture("does_not_exist.txt"));

    match result {
        Err(Error::IoError(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected IoError, got {:?}", other),
    }
}

#[test]
fn test_truncated_record_is_io_error() {
    match load_catalog(fixture("truncated.txt")) {
        Err(Error::IoError(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected IoError, got {:?}", other),
    }
}

#[test]
fn test_non_positive_capacity_is_rejected() {
    let (location, reason) = expect_format_error("non_positive_capacity.txt");

    assert_eq!(location, SourceLocation::Line(4));
    assert!(reason.contains("non-positive capacity"), "unexpected reason: {}", reason);
}

#[test]
fn test_zero_corridor_capacity_is_rejected() {
    let (location, reason) = expect_format_error("non_positive_corridor.txt");

    assert_eq!(location, SourceLocation::Line(4));
    assert!(reason.contains("corridor 'r2' has non-positive capacity 0"), "unexpected reason: {}", reason);
}

#[test]
fn test_negative_corridor_capacity_is_rejected() {
    let (location, reason) = expect_format_error("negative_corridor.txt");

    assert_eq!(location, SourceLocation::Line(7));
    assert!(reason.contains("non-positive capacity -5"), "unexpected reason: {}", reason);
}

#[test]
fn test_venue_name_with_separator_is_rejected() {
    let (location, reason) = expect_format_error("name_with_separator.txt");

    assert_eq!(location, SourceLocation::Line(5));
    assert!(reason.contains("single venue name"), "unexpected reason: {}", reason);
}

#[test]
fn test_unknown_corridor_target_is_rejected() {
    let (location, reason) = expect_format_error("unknown_target.txt");

    assert_eq!(location, SourceLocation::Line(4));
    assert!(reason.contains("Venue Z"), "unexpected reason: {}", reason);
}

#[test]
fn test_duplicate_venue_is_rejected() {
    let (location, reason) = expect_format_error("duplicate_venue.txt");

    assert_eq!(location, SourceLocation::Line(4));
    assert!(reason.contains("duplicate venue name"), "unexpected reason: {}", reason);
}

#[test]
fn test_format_error_message_names_location() {
    let error = load_catalog(fixture("unknown_target.txt")).unwrap_err();

    assert!(error.to_string().starts_with("Malformed venue description at line 4:"), "got: {}", error);
}
