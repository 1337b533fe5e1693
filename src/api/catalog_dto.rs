use serde::Deserialize;

/// Raw venue description as read from disk, before any validation.
///
/// Both the JSON and the text grammar produce this shape; the text parser
/// additionally fills in `line` so validation errors can point at it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueCatalogDto {
    pub venues: Vec<VenueDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueDto {
    pub name: String,
    pub capacity: i64,
    #[serde(default)]
    pub corridors: Vec<CorridorDto>,
    #[serde(skip)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorDto {
    pub id: String,
    pub target: String,
    pub capacity: i64,
    #[serde(skip)]
    pub line: Option<usize>,
}
