// src/core/arglist.rs

//! The argument-list codec: one string to and from an ordered list of
//! argument strings.
//!
//! A serialized list separates elements with `;`. A `\;` inside an element is
//! a literal semicolon, and a `[...]` group may carry delimiters without
//! being split, so an element can embed a delimiter-bearing sub-expression.

use thiserror::Error;

use crate::constants::LIST_DELIMITER;
use crate::system::platform::Platform;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("trailing backslash in argument '{token}'")]
    TrailingBackslash { token: String },
    #[error("invalid escape sequence '\\{sequence}' in argument '{token}'")]
    InvalidEscape { sequence: char, token: String },
}

/// Splits a raw string into its argument-list elements.
///
/// Empty input yields an empty list. Splitting happens on unescaped `;`
/// only, zero-length segments are dropped, and a candidate segment with
/// unbalanced `[`/`]` counts is extended through the next delimiter until
/// the counts balance or the input is exhausted.
///
/// The bracket rule cannot detect genuinely malformed nesting (`a[b;c` is
/// accepted as one element); that is a documented limitation, not an error.
pub fn parse(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    if !raw.contains(LIST_DELIMITER) {
        return vec![raw.to_string()];
    }

    let size = raw.len();
    let mut items = Vec::new();
    let mut start = 0usize;
    let mut endpos = 0usize;
    while endpos != size {
        endpos = next_delimiter(raw, start);
        if endpos > start {
            // Extend the segment while its bracket counts disagree.
            while !brackets_balanced(segment(raw, start, endpos)) && endpos != size {
                endpos = next_delimiter(raw, endpos + 1);
            }
            let element = segment(raw, start, endpos).replace("\\;", ";");
            items.push(element);
        }
        start = endpos + 1;
    }
    items
}

/// The inverse of [`parse`] for elements that carry no delimiter.
pub fn serialize(list: &[String]) -> String {
    list.join(";")
}

/// Escapes a token for embedding in an outer shell line.
///
/// POSIX-style targets backslash-escape every space. Windows-style targets
/// wrap the whole token in double quotes, but only when it contains a space
/// and is not already quoted.
pub fn escape_spaces(token: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows | Platform::WindowsLegacy => {
            if token.contains(' ') && !token.contains('"') {
                format!("\"{token}\"")
            } else {
                token.to_string()
            }
        }
        Platform::Unix => token.replace(' ', "\\ "),
    }
}

/// Decodes the backslash escapes in a single token.
///
/// Recognized sequences are `\\`, `\"`, `\ `, `\t`, `\n`, `\r` and `\0`.
/// A `\;` is passed through untouched; it belongs to the list splitter, not
/// to this decoder. A trailing backslash or an unrecognized sequence fails
/// with [`ListError`], aborting only this token.
pub fn unescape(token: &str) -> Result<String, ListError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&';') {
            // Reserved for the splitter: keep the backslash, the ';' follows.
            out.push('\\');
            continue;
        }
        match chars.next() {
            None => {
                return Err(ListError::TrailingBackslash {
                    token: token.to_string(),
                });
            }
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(' ') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => {
                return Err(ListError::InvalidEscape {
                    sequence: other,
                    token: token.to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Index of the next unescaped delimiter at or after `from`, or `raw.len()`.
fn next_delimiter(raw: &str, from: usize) -> usize {
    let bytes = raw.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes.get(i) == Some(&b';') && (i == 0 || bytes.get(i - 1) != Some(&b'\\')) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

fn segment(raw: &str, start: usize, end: usize) -> &str {
    raw.get(start..end).unwrap_or_default()
}

/// A segment with no `[` at all is taken as-is; otherwise the `[` and `]`
/// counts must agree.
fn brackets_balanced(segment: &str) -> bool {
    if !segment.contains('[') {
        return true;
    }
    let open = segment.chars().filter(|c| *c == '[').count();
    let close = segment.chars().filter(|c| *c == ']').count();
    open == close
}
