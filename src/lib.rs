use std::path::Path;

use crate::domain::venue::VenueCatalog;
use crate::error::Result;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads and validates the venue description at `file_path`.
pub fn load_catalog(file_path: impl AsRef<Path>) -> Result<VenueCatalog> {
    let file_path = file_path.as_ref();
    log::info!("Loading venue catalog from '{}'.", file_path.display());

    let catalog = loader::load(file_path)?;
    log::info!("Venue catalog loaded: {} venues, {} corridors.", catalog.len(), catalog.corridor_ids().count());

    Ok(catalog)
}
