use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::models::cell::UnitCell;
use crate::core::models::frame::Frame;
use crate::core::models::property::Property;
use crate::error::{Result, TrajectoryError};
use nalgebra::{Matrix3, Vector3};

/// The only per-atom column layout this codec reads and writes.
pub const PROPERTIES_LAYOUT: &str = "species:S:1:pos:R:3";

/// Splits an extended XYZ comment into `key=value` pairs.
///
/// Values may be double-quoted to contain whitespace. Returns `None` when
/// the comment holds anything that is not a pair, in which case it is a
/// plain title.
pub fn parse_pairs(comment: &str) -> Option<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut rest = comment.trim_start();
    while !rest.is_empty() {
        let key_end = rest.find(|c: char| c == '=' || c.is_whitespace())?;
        let key = &rest[..key_end];
        if key.is_empty() || !rest[key_end..].starts_with('=') {
            return None;
        }
        let after = &rest[key_end + 1..];
        let (value, remaining) = match after.strip_prefix('"') {
            Some(quoted) => {
                let close = quoted.find('"')?;
                (&quoted[..close], &quoted[close + 1..])
            }
            None => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };
        pairs.push((key.to_string(), value.to_string()));
        rest = remaining.trim_start();
    }
    if pairs.is_empty() { None } else { Some(pairs) }
}

fn parse_value(value: &str) -> Property {
    match value {
        "T" | "True" | "true" => Property::Bool(true),
        "F" | "False" | "false" => Property::Bool(false),
        _ => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Property::Double(number),
            _ => Property::String(value.to_string()),
        },
    }
}

fn parse_lattice(value: &str) -> Result<UnitCell> {
    let numbers = value
        .split_whitespace()
        .map(|token| token.parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| TrajectoryError::format(format!("Invalid Lattice '{}': {}", value, e)))?;
    if numbers.len() != 9 {
        return Err(TrajectoryError::format(format!(
            "Lattice needs 9 values, found {}",
            numbers.len()
        )));
    }
    let matrix = Matrix3::from_columns(&[
        Vector3::new(numbers[0], numbers[1], numbers[2]),
        Vector3::new(numbers[3], numbers[4], numbers[5]),
        Vector3::new(numbers[6], numbers[7], numbers[8]),
    ]);
    UnitCell::from_matrix(&matrix)
        .map_err(|e| TrajectoryError::format(format!("Invalid Lattice '{}': {}", value, e)))
}

/// Stores the information of an XYZ comment line in `frame`.
///
/// # Errors
///
/// Returns a `Format` error if a `Lattice` value is malformed or describes
/// an invalid cell.
pub fn apply_comment(comment: &str, frame: &mut Frame, diagnostics: &mut Diagnostics) -> Result<()> {
    let Some(pairs) = parse_pairs(comment) else {
        let title = comment.trim();
        if !title.is_empty() {
            frame.properties.set("name", title);
        }
        return Ok(());
    };

    for (key, value) in pairs {
        if key.eq_ignore_ascii_case("lattice") {
            frame.cell = parse_lattice(&value)?;
        } else if key.eq_ignore_ascii_case("properties") {
            if !value.starts_with(PROPERTIES_LAYOUT) {
                diagnostics.warn(
                    WarningKind::FieldParse,
                    format!(
                        "Unsupported Properties '{}', reading species and positions only",
                        value
                    ),
                );
            }
        } else {
            frame.properties.set(&key, parse_value(&value));
        }
    }
    Ok(())
}

fn format_value(value: &Property) -> String {
    match value {
        Property::Bool(true) => "T".to_string(),
        Property::Bool(false) => "F".to_string(),
        Property::Double(number) => number.to_string(),
        Property::String(text) => {
            if text.is_empty() || text.contains(|c: char| c.is_whitespace() || c == '=') {
                format!("\"{}\"", text.replace('"', "'"))
            } else {
                text.clone()
            }
        }
    }
}

/// Builds the comment line for `frame`.
///
/// Frames with an infinite cell and no property other than `name` get a
/// plain title; everything else is written in the extended form.
pub fn format_comment(frame: &Frame) -> String {
    let plain = frame.cell.is_infinite() && frame.properties.iter().all(|(key, _)| key == "name");
    if plain {
        return frame
            .properties
            .get("name")
            .map(|name| name.to_string())
            .unwrap_or_default();
    }

    let mut parts = Vec::new();
    if !frame.cell.is_infinite() {
        let matrix = frame.cell.matrix();
        let values: Vec<String> = (0..3)
            .flat_map(|column| (0..3).map(move |row| (row, column)))
            .map(|(row, column)| matrix[(row, column)].to_string())
            .collect();
        parts.push(format!("Lattice=\"{}\"", values.join(" ")));
    }
    parts.push(format!("Properties={}", PROPERTIES_LAYOUT));
    for (key, value) in frame.properties.iter() {
        parts.push(format!("{}={}", key, format_value(value)));
    }
    parts.join(" ")
}
