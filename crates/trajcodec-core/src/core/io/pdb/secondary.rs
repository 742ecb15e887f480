use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::io::fields::{Field, char_at};
use crate::core::models::residue::Residue;
use std::collections::BTreeMap;

/// A secondary-structure assignment read from a HELIX, SHEET or TURN record.
///
/// Covers the residues of `chain` whose id lies in `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondarySpan {
    pub chain: char,
    pub start: i64,
    pub end: i64,
    pub label: &'static str,
}

/// Spans collected while a frame is read. They are applied once every
/// residue of the frame is known, since the records usually precede the
/// atoms they describe.
#[derive(Debug, Clone, Default)]
pub struct SecondaryStaging {
    spans: Vec<SecondarySpan>,
}

impl SecondaryStaging {
    pub fn stage(&mut self, span: SecondarySpan) {
        self.spans.push(span);
    }

    /// Sets the `secondary_structure` property on every residue covered by a
    /// staged span. Later spans win when they overlap.
    pub fn apply(&self, residues: &mut BTreeMap<(char, i64), Residue>) {
        for span in self.spans.iter().filter(|span| span.start < span.end) {
            for (_, residue) in residues.range_mut((span.chain, span.start)..(span.chain, span.end)) {
                residue.properties.set("secondary_structure", span.label);
            }
        }
    }
}

const HELIX_START: Field = Field::new("helix initial residue", 21, 25);
const HELIX_END: Field = Field::new("helix terminal residue", 33, 37);
const HELIX_CLASS: Field = Field::new("helix class", 38, 40);
const SHEET_START: Field = Field::new("strand initial residue", 22, 26);
const SHEET_END: Field = Field::new("strand terminal residue", 33, 37);
const TURN_START: Field = Field::new("turn initial residue", 20, 24);
const TURN_END: Field = Field::new("turn terminal residue", 31, 35);

fn helix_label(class: i64) -> Option<&'static str> {
    match class {
        1 | 6 => Some("alpha helix"),
        2 | 7 => Some("omega helix"),
        3 => Some("pi helix"),
        4 | 8 => Some("gamma helix"),
        5 => Some("3-10 helix"),
        _ => None,
    }
}

fn span(
    line: &str,
    record: &str,
    chains: (usize, usize),
    start: Field,
    end: Field,
    label: &'static str,
    diagnostics: &mut Diagnostics,
) -> Option<SecondarySpan> {
    let chain = char_at(line, chains.0);
    if chain != char_at(line, chains.1) {
        diagnostics.warn(
            WarningKind::SecondaryStructure,
            format!("{} record spans two chains, ignoring it: '{}'", record, line),
        );
        return None;
    }
    match (start.parse_int(line), end.parse_int(line)) {
        (Ok(start), Ok(end)) => Some(SecondarySpan {
            chain,
            start,
            end,
            label,
        }),
        (Err(err), _) | (_, Err(err)) => {
            diagnostics.warn(
                WarningKind::SecondaryStructure,
                format!("Ignoring {} record: {}", record, err),
            );
            None
        }
    }
}

pub fn parse_helix(line: &str, diagnostics: &mut Diagnostics) -> Option<SecondarySpan> {
    if line.len() < 38 {
        diagnostics.warn(
            WarningKind::SecondaryStructure,
            format!("HELIX record is too short: '{}'", line),
        );
        return None;
    }
    let label = match HELIX_CLASS.parse_int(line).ok().and_then(helix_label) {
        Some(label) => label,
        None => {
            diagnostics.warn(
                WarningKind::SecondaryStructure,
                format!(
                    "Unsupported helix class '{}', ignoring HELIX record",
                    HELIX_CLASS.text(line)
                ),
            );
            return None;
        }
    };
    span(line, "HELIX", (19, 31), HELIX_START, HELIX_END, label, diagnostics)
}

pub fn parse_sheet(line: &str, diagnostics: &mut Diagnostics) -> Option<SecondarySpan> {
    span(line, "SHEET", (21, 32), SHEET_START, SHEET_END, "extended", diagnostics)
}

pub fn parse_turn(line: &str, diagnostics: &mut Diagnostics) -> Option<SecondarySpan> {
    span(line, "TURN", (19, 30), TURN_START, TURN_END, "turn", diagnostics)
}
