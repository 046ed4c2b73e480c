//! Text patterns
//!
//! A [`Pattern`] is a compiled regular expression that remembers the
//! source and flags it was written with, so it can be taken apart into a
//! [`PatternDescriptor`] for transport and rebuilt on the other side.
//!
//! Flags follow the `/source/flags` convention: `i` ignores case, `m`
//! makes `^`/`$` match at line breaks, `s` lets `.` match newlines, `y`
//! anchors the match at the start of the text. `g`, `u`, `v` and `d`
//! do not change whether a text matches and are accepted as-is.
//!
//! `\d`, `\w` and `\b` keep their ASCII-only meaning whatever the flags;
//! `\B` and `\s` stay Unicode-aware.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::QueryError;

const KNOWN_FLAGS: &str = "dgimsuvy";

/// Compiled text pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with `flags`
    pub fn new(source: &str, flags: &str) -> Result<Self, QueryError> {
        let invalid = |message: String| QueryError::InvalidPattern {
            pattern: source.to_string(),
            flags: flags.to_string(),
            message,
        };

        for (i, flag) in flags.char_indices() {
            if !KNOWN_FLAGS.contains(flag) {
                return Err(invalid(format!("unknown flag '{flag}'")));
            }
            if flags[..i].contains(flag) {
                return Err(invalid(format!("duplicate flag '{flag}'")));
            }
        }

        let mut pattern = ascii_shorthands(source);
        if flags.contains('y') {
            pattern = format!(r"\A(?:{pattern})");
        }

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Check whether the pattern matches anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Boundary-safe form of this pattern
    pub fn to_descriptor(&self) -> PatternDescriptor {
        PatternDescriptor(self.source.clone(), self.flags.clone())
    }

    /// Rebuild a pattern from its boundary-safe form
    pub fn from_descriptor(descriptor: &PatternDescriptor) -> Result<Self, QueryError> {
        Self::new(&descriptor.0, &descriptor.1)
    }
}

/// Rewrite `\d`, `\w` and `\b` into explicit ASCII forms
fn ascii_shorthands(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    let mut in_class = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    out.push('\\');
                    break;
                };
                let replacement = match (escaped, in_class) {
                    ('d', false) => "[0-9]",
                    ('D', false) => "[^0-9]",
                    ('w', false) => "[0-9A-Za-z_]",
                    ('W', false) => "[^0-9A-Za-z_]",
                    ('b', false) => r"(?-u:\b)",
                    ('d', true) => "0-9",
                    ('D', true) => "[:^digit:]",
                    ('w', true) => "0-9A-Za-z_",
                    ('W', true) => "[:^word:]",
                    // Backspace inside a class
                    ('b', true) => r"\x08",
                    _ => {
                        out.push('\\');
                        out.push(escaped);
                        continue;
                    }
                };
                out.push_str(replacement);
            }
            '[' if !in_class => {
                in_class = true;
                out.push(ch);
            }
            ']' if in_class => {
                in_class = false;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// `[source, flags]` pair carried across the context boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDescriptor(pub String, pub String);

impl PatternDescriptor {
    /// Read a descriptor from a clause value
    ///
    /// Accepts `[source, flags]`, `[source]`, or a bare source string.
    pub fn from_value(key: &str, value: &Value) -> Result<Self, QueryError> {
        let invalid = |reason: &str| QueryError::InvalidClause {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        match value {
            Value::String(source) => Ok(Self(source.clone(), String::new())),
            Value::Array(parts) => match parts.as_slice() {
                [Value::String(source)] => Ok(Self(source.clone(), String::new())),
                [Value::String(source), Value::String(flags)] => Ok(Self(source.clone(), flags.clone())),
                _ => Err(invalid("expected [source, flags] with string elements")),
            },
            _ => Err(invalid("expected a pattern descriptor")),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![Value::String(self.0.clone()), Value::String(self.1.clone())])
    }
}
