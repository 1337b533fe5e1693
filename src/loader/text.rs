//! Line grammar for venue descriptions.
//!
//! ```text
//! # comment
//! Venue name
//! 120
//! corridor-id, Target venue, 40
//! <blank line ends the record>
//! ```

use std::io;

use crate::api::catalog_dto::{CorridorDto, VenueCatalogDto, VenueDto};
use crate::error::{Error, Result, SourceLocation};

const COMMENT_PREFIX: char = '#';
const CORRIDOR_FIELDS: usize = 3;

enum RecordState {
    /// Between records.
    Idle,
    /// Name line read, capacity line expected next.
    AwaitCapacity { name: String, line: usize },
    /// Capacity read, collecting corridor lines until a blank line.
    Corridors(VenueDto),
}

/// Parses the text grammar into an unvalidated catalog DTO.
///
/// Only the shape of each line is checked here; positivity, uniqueness and
/// corridor targets are checked when the DTO becomes a `VenueCatalog`.
pub fn parse_venue_text(source: &str) -> Result<VenueCatalogDto> {
    let mut catalog = VenueCatalogDto::default();
    let mut state = RecordState::Idle;

    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        state = match state {
            RecordState::Idle if line.is_empty() => RecordState::Idle,
            RecordState::Idle => RecordState::AwaitCapacity { name: parse_name(line, line_number)?, line: line_number },
            RecordState::AwaitCapacity { name, .. } if line.is_empty() => {
                return Err(Error::format(
                    SourceLocation::Line(line_number),
                    format!("venue '{}' is missing its capacity line", name),
                ));
            }
            RecordState::AwaitCapacity { name, line: name_line } => {
                let capacity = parse_capacity(line, line_number)?;
                RecordState::Corridors(VenueDto { name, capacity, corridors: Vec::new(), line: Some(name_line) })
            }
            RecordState::Corridors(venue) if line.is_empty() => {
                catalog.venues.push(venue);
                RecordState::Idle
            }
            RecordState::Corridors(mut venue) => {
                venue.corridors.push(parse_corridor(line, line_number)?);
                RecordState::Corridors(venue)
            }
        };
    }

    match state {
        RecordState::Idle => {}
        RecordState::AwaitCapacity { name, line } => {
            return Err(Error::IoError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("venue '{}' at line {} ends before its capacity line", name, line),
            )));
        }
        RecordState::Corridors(venue) => catalog.venues.push(venue),
    }

    Ok(catalog)
}

/// Venue names cannot contain the corridor field separator.
fn parse_name(line: &str, line_number: usize) -> Result<String> {
    let fields = line.split(',').count();
    if fields != 1 {
        return Err(Error::format(
            SourceLocation::Line(line_number),
            format!("expected a single venue name, found {} fields", fields),
        ));
    }

    Ok(line.to_string())
}

fn parse_capacity(line: &str, line_number: usize) -> Result<i64> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 1 {
        return Err(Error::format(
            SourceLocation::Line(line_number),
            format!("expected a single capacity value, found {} fields", fields.len()),
        ));
    }

    parse_number(fields[0].trim(), "capacity", line_number)
}

fn parse_corridor(line: &str, line_number: usize) -> Result<CorridorDto> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != CORRIDOR_FIELDS {
        return Err(Error::format(
            SourceLocation::Line(line_number),
            format!("corridor needs {} fields (id, target, capacity), found {}", CORRIDOR_FIELDS, fields.len()),
        ));
    }
    if fields[0].is_empty() || fields[1].is_empty() {
        return Err(Error::format(SourceLocation::Line(line_number), "corridor id and target must not be empty"));
    }

    Ok(CorridorDto {
        id: fields[0].to_string(),
        target: fields[1].to_string(),
        capacity: parse_number(fields[2], "corridor capacity", line_number)?,
        line: Some(line_number),
    })
}

fn parse_number(value: &str, what: &str, line_number: usize) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| Error::format(SourceLocation::Line(line_number), format!("{} '{}' is not a number", what, value)))
}
