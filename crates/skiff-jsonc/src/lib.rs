//! # skiff-jsonc
//!
//! JSON with comments (JSONC) for configuration files.
//!
//! JSONC is plain JSON plus `//` line comments, `/* */` block comments, and
//! (by default) trailing commas in arrays and objects. This crate strips the
//! extensions down to standard JSON and delegates the actual parsing to
//! `serde_json`, so anything serde can deserialize works here too.
//!
//! Comments are replaced with spaces rather than removed, which keeps every
//! byte offset intact: a syntax error reported by the parser points at the
//! right line and column of the *original* file.
//!
//! ```
//! let value = skiff_jsonc::parse(r#"
//! {
//!     // listen address for the local loop
//!     "addr": "127.0.0.1:8000",
//!     "watch": true, // trailing comma below is fine
//! }
//! "#).unwrap();
//!
//! assert_eq!(value["watch"], serde_json::Value::Bool(true));
//! ```
//!
//! Serialization always emits plain JSON; comments are not round-tripped.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod io;
mod parse;
pub mod safe;
mod strip;

pub use error::{JsoncError, Result};
pub use io::{read_file, read_file_as, write_file, write_file_pretty};
pub use parse::{from_str, parse, parse_with, to_string, to_string_pretty, ParseOptions};
pub use strip::{strip, strip_with};
