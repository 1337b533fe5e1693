use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result, SourceLocation};

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read or ends in the middle of a value.
/// - `Error::FormatError` with line and column if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    parse_json_str(&data)
}

pub fn parse_json_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| match e.classify() {
        Category::Eof => Error::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string())),
        Category::Io => Error::IoError(io::Error::other(e.to_string())),
        Category::Syntax | Category::Data => {
            Error::format(SourceLocation::Position { line: e.line(), column: e.column() }, e.to_string())
        }
    })
}
