//! File read/write convenience layer.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{JsoncError, Result};
use crate::parse;

/// Read and parse a JSONC file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| JsoncError::io(path, e))?;
    parse::parse(&text)
}

/// Read a JSONC file and deserialize it into `T`.
pub fn read_file_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| JsoncError::io(path, e))?;
    parse::from_str(&text)
}

/// Serialize a value as compact JSON and write it to `path`.
pub fn write_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let text = parse::to_string(value)?;
    fs::write(path, text).map_err(|e| JsoncError::io(path, e))
}

/// Serialize a value as pretty-printed JSON and write it to `path`.
pub fn write_file_pretty<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let text = parse::to_string_pretty(value)?;
    fs::write(path, text).map_err(|e| JsoncError::io(path, e))
}
