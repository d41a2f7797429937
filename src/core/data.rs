//! Shared RON loading for the files under `assets/data/`.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::DataLoadError;

/// Read and parse one RON file.
pub fn load_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, DataLoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    parse_ron(&contents, &display)
}

/// Parse RON text; `source` names the origin in error messages.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, source: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: source.to_string(),
        details: e.to_string(),
    })
}
