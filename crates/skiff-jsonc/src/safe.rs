//! Non-throwing variants of the parse and read entry points.
//!
//! These return `None` instead of an error, for callers that treat a broken
//! or missing config the same as an absent one (optional overrides, probing
//! for a file that may not exist). When the cause matters, use the fallible
//! functions in the crate root instead.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse JSONC text, returning `None` on any syntax error.
pub fn parse(text: &str) -> Option<Value> {
    crate::parse::parse(text).ok()
}

/// Deserialize JSONC text into `T`, returning `None` on any error.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Option<T> {
    crate::parse::from_str(text).ok()
}

/// Read and parse a JSONC file, returning `None` if the file is missing,
/// unreadable, or malformed.
pub fn read_file(path: impl AsRef<Path>) -> Option<Value> {
    crate::io::read_file(path).ok()
}

/// Read a JSONC file into `T`, returning `None` on any error.
pub fn read_file_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Option<T> {
    crate::io::read_file_as(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok() {
        let value = parse("{\"a\": 1} // ok").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parse_bad_input_is_none() {
        assert!(parse("{oops").is_none());
        assert!(parse("/* never closed").is_none());
    }

    #[test]
    fn test_read_missing_file_is_none() {
        assert!(read_file("/no/such/file.jsonc").is_none());
    }
}
