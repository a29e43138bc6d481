//! Helpers for building request payloads and fixtures.

use crate::error::Result;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Random alphanumeric string of `length` characters.
pub fn random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Random address under `example.com`.
pub fn random_email() -> String {
    format!("test_{}@example.com", random_string(8).to_lowercase())
}

/// Random integer in `min..max`. Returns `min` for an empty range.
pub fn random_int(min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rand::rng().random_range(min..max)
}

/// Indented JSON rendering of `value`.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decode `json` into `T`.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Read and decode a JSON fixture file.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    from_json(&contents)
}

/// Write `value` as indented JSON, creating parent directories.
pub fn write_json_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json_pretty(value)?)?;
    Ok(())
}
