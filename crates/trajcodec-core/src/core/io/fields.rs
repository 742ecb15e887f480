use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Character,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Character => "character",
        })
    }
}

/// A fixed-width field that could not be converted to its expected type.
///
/// Columns are reported 1-based and inclusive, the way record layouts are
/// usually documented.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid {kind} in field '{field}' at columns {}-{} (value: '{text}')", .start + 1, .end)]
pub struct FieldParseError {
    pub field: &'static str,
    pub text: String,
    pub kind: FieldKind,
    pub start: usize,
    pub end: usize,
}

/// A named half-open, 0-based byte-column range of a fixed-width record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

impl Field {
    pub const fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self { name, start, end }
    }

    /// Whether the line is long enough to contain at least part of the field.
    pub fn present(&self, line: &str) -> bool {
        line.len() > self.start
    }

    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        field(line, self.start, self.end)
    }

    pub fn parse_int(&self, line: &str) -> Result<i64, FieldParseError> {
        let text = self.text(line);
        text.parse().map_err(|_| self.error(text, FieldKind::Integer))
    }

    pub fn parse_float(&self, line: &str) -> Result<f64, FieldParseError> {
        let text = self.text(line);
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.error(text, FieldKind::Float)),
        }
    }

    /// Parses a one-character field. A blank field yields `' '`.
    pub fn parse_char(&self, line: &str) -> Result<char, FieldParseError> {
        let text = self.text(line);
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(' '),
            (Some(c), None) => Ok(c),
            _ => Err(self.error(text, FieldKind::Character)),
        }
    }

    pub fn try_int(&self, line: &str) -> Option<i64> {
        self.parse_int(line).ok()
    }

    fn error(&self, text: &str, kind: FieldKind) -> FieldParseError {
        FieldParseError {
            field: self.name,
            text: text.to_string(),
            kind,
            start: self.start,
            end: self.end,
        }
    }
}

/// Extracts the byte columns `[start, end)` of `line`, clamped to the line
/// length, with surrounding whitespace removed.
///
/// A multi-byte character cut by either edge is left out of the field.
pub fn field(line: &str, start: usize, end: usize) -> &str {
    let mut start = start;
    let mut end = end.min(line.len());
    while start < end && !line.is_char_boundary(start) {
        start += 1;
    }
    while end > start && !line.is_char_boundary(end) {
        end -= 1;
    }
    if start >= end {
        return "";
    }
    line[start..end].trim()
}

/// The byte at column `index` as a character, or `' '` past the end of the
/// line.
pub fn char_at(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(' ', |b| *b as char)
}

/// Whether an already formatted value fits a column of `width` characters.
pub fn fits_width(formatted: &str, width: usize) -> bool {
    formatted.chars().count() <= width
}
