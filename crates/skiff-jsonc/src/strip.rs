//! Comment and trailing-comma stripping.
//!
//! The stripper is a single pass over the input bytes. Stripped characters
//! are overwritten with spaces (newlines are kept) so that the output has
//! exactly the same length and line structure as the input. Errors reported
//! by the JSON parser afterwards therefore point at the original text.

use crate::error::{JsoncError, Result};
use crate::parse::ParseOptions;

#[derive(Clone, Copy)]
enum State {
    /// Outside any string or comment.
    Default,
    /// Inside a `"..."` string literal.
    Str,
    /// Inside a `//` comment.
    Line,
    /// Inside a `/* */` comment; holds the byte offset of the opener.
    Block(usize),
}

/// Strip comments and trailing commas with the default options.
pub fn strip(text: &str) -> Result<String> {
    strip_with(text, &ParseOptions::default())
}

/// Strip `//` and `/* */` comments, and trailing commas if the options allow
/// them, replacing each stripped character with a space.
///
/// String literals are never altered, so comment markers inside strings
/// survive. An unterminated block comment is an error located at its opener.
pub fn strip_with(text: &str, options: &ParseOptions) -> Result<String> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out = bytes.to_vec();

    let mut state = State::Default;
    // Offset of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;
    // Whether the last significant character could end a JSON value. Only a
    // comma after a value is a candidate for removal; `[,]` must stay broken.
    let mut after_value = false;

    let mut i = 0;
    while i < len {
        let b = bytes[i];
        match state {
            State::Default => match b {
                b'"' => {
                    pending_comma = None;
                    state = State::Str;
                    i += 1;
                }
                b'/' if i + 1 < len && bytes[i + 1] == b'/' => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Line;
                    i += 2;
                }
                b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Block(i);
                    i += 2;
                }
                b',' => {
                    if options.allow_trailing_commas && after_value {
                        pending_comma = Some(i);
                    } else {
                        pending_comma = None;
                    }
                    after_value = false;
                    i += 1;
                }
                b']' | b'}' => {
                    if let Some(comma) = pending_comma.take() {
                        out[comma] = b' ';
                    }
                    after_value = true;
                    i += 1;
                }
                b'{' | b'[' | b':' => {
                    pending_comma = None;
                    after_value = false;
                    i += 1;
                }
                b' ' | b'\t' | b'\n' | b'\r' => {
                    i += 1;
                }
                _ => {
                    // Numbers, `true`/`false`/`null`, or garbage the parser
                    // will reject later.
                    pending_comma = None;
                    after_value = true;
                    i += 1;
                }
            },
            State::Str => match b {
                b'\\' => {
                    // Skip the escaped character as well.
                    i += 2;
                }
                b'"' => {
                    state = State::Default;
                    after_value = true;
                    i += 1;
                }
                _ => {
                    i += 1;
                }
            },
            State::Line => {
                if b == b'\n' {
                    state = State::Default;
                } else if b != b'\r' {
                    out[i] = b' ';
                }
                i += 1;
            }
            State::Block(_) => {
                if b == b'*' && i + 1 < len && bytes[i + 1] == b'/' {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Default;
                    i += 2;
                } else {
                    if b != b'\n' && b != b'\r' {
                        out[i] = b' ';
                    }
                    i += 1;
                }
            }
        }
    }

    if let State::Block(opened_at) = state {
        let (line, column) = line_col(text, opened_at);
        return Err(JsoncError::UnterminatedComment { line, column });
    }

    // Only whole characters are ever overwritten: comment bodies are blanked
    // byte-for-byte and all markers are ASCII.
    Ok(String::from_utf8(out).expect("stripping preserves UTF-8"))
}

/// 1-based line and column of a byte offset.
fn line_col(text: &str, byte_idx: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, ch) in text.char_indices() {
        if i >= byte_idx {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
