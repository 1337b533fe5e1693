use std::path::Path;

use crate::api::catalog_dto::VenueCatalogDto;
use crate::domain::venue::VenueCatalog;
use crate::error::Result;

pub mod parser;
pub mod text;

/// Reads and validates a venue description.
///
/// Files with a `.json` extension are read as JSON, everything else with the
/// line grammar in [`text`]. The file is only read; nothing is written.
pub fn load(path: &Path) -> Result<VenueCatalog> {
    let is_json = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let dto: VenueCatalogDto = if is_json {
        parser::parse_json_file(path)?
    } else {
        let source = std::fs::read_to_string(path)?;
        text::parse_venue_text(&source)?
    };
    log::debug!("Venue description '{}' parsed: {} records.", path.display(), dto.venues.len());

    VenueCatalog::try_from(dto)
}
