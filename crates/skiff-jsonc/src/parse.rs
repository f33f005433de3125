//! Parsing and serialization entry points.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::strip::strip_with;

/// Options controlling which JSONC extensions are accepted.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Accept a trailing comma after the last element of an array or object.
    pub allow_trailing_commas: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_trailing_commas: true,
        }
    }
}

/// Parse JSONC text into a [`serde_json::Value`].
pub fn parse(text: &str) -> Result<Value> {
    parse_with(text, &ParseOptions::default())
}

/// Parse JSONC text into a [`serde_json::Value`] with explicit options.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value> {
    let stripped = strip_with(text, options)?;
    Ok(serde_json::from_str(&stripped)?)
}

/// Deserialize JSONC text into any serde-deserializable type.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    let stripped = strip_with(text, &ParseOptions::default())?;
    Ok(serde_json::from_str(&stripped)?)
}

/// Serialize a value to compact JSON.
///
/// Output is plain JSON; the format has no way to reattach comments.
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a value to pretty-printed JSON ending with a newline.
pub fn to_string_pretty<T: Serialize>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_parse_with_comments() {
        let value = parse(
            r#"
            {
                // project id
                "project": "jet-stream", /* inline */
                "entrypoint": "main.ts",
            }
            "#,
        )
        .unwrap();
        assert_eq!(value["project"], "jet-stream");
        assert_eq!(value["entrypoint"], "main.ts");
    }

    #[test]
    fn test_parse_plain_json_still_works() {
        let value = parse(r#"{"n": 42}"#).unwrap();
        assert_eq!(value["n"], 42);
    }

    #[test]
    fn test_error_position_matches_original_text() {
        // The comment on line 2 is stripped to spaces, so the bad token on
        // line 3 is still reported on line 3.
        let err = parse("{\n  // comment line\n  oops\n}").unwrap_err();
        assert!(err.to_string().contains("line 3"), "got: {err}");
    }

    #[test]
    fn test_from_str_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Config {
            addr: String,
            watch: bool,
        }

        let config: Config = from_str(
            r#"
            {
                "addr": "127.0.0.1:8000", // local only
                "watch": true,
            }
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            Config {
                addr: "127.0.0.1:8000".into(),
                watch: true,
            }
        );
    }

    #[test]
    fn test_trailing_comma_rejected_when_disabled() {
        let options = ParseOptions {
            allow_trailing_commas: false,
        };
        assert!(parse_with("[1, 2, ]", &options).is_err());
        assert!(parse_with("[1, 2]", &options).is_ok());
    }

    #[test]
    fn test_to_string_pretty_ends_with_newline() {
        let text = to_string_pretty(&serde_json::json!({"a": 1})).unwrap();
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }
}
