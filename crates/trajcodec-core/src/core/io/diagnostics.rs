use std::fmt;
use tracing::warn;

/// Category of a recoverable problem met while reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    FieldParse,
    OutOfRangeReference,
    InvalidBond,
    UnknownRecord,
    MissingEnd,
    SecondaryStructure,
    SpaceGroup,
    MissingTemplateAtom,
    Truncated,
    Overflow,
    IncompleteFrame,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::FieldParse => "field-parse",
            WarningKind::OutOfRangeReference => "out-of-range-reference",
            WarningKind::InvalidBond => "invalid-bond",
            WarningKind::UnknownRecord => "unknown-record",
            WarningKind::MissingEnd => "missing-end",
            WarningKind::SecondaryStructure => "secondary-structure",
            WarningKind::SpaceGroup => "space-group",
            WarningKind::MissingTemplateAtom => "missing-template-atom",
            WarningKind::Truncated => "truncated",
            WarningKind::Overflow => "overflow",
            WarningKind::IncompleteFrame => "incomplete-frame",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Warnings kept before further ones are only counted.
pub const MAX_RETAINED_WARNINGS: usize = 10_000;

/// Warning log owned by every reader and writer.
///
/// Each call to [`warn`](Self::warn) emits the warning through `tracing` at
/// the `WARN` level. The log lives as long as its reader or writer and only
/// shrinks through [`take`](Self::take); once it holds `limit` entries,
/// further warnings are counted in [`dropped`](Self::dropped) instead of
/// stored.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    limit: usize,
    dropped: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_limit(MAX_RETAINED_WARNINGS)
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            limit,
            dropped: 0,
        }
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = %kind, "{}", message);
        if self.warnings.len() < self.limit {
            self.warnings.push(Warning { kind, message });
            return;
        }
        if self.dropped == 0 {
            warn!(limit = self.limit, "Warning log is full, later warnings are not retained");
        }
        self.dropped += 1;
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the recorded warnings and empties the log.
    pub fn take(&mut self) -> Vec<Warning> {
        self.dropped = 0;
        std::mem::take(&mut self.warnings)
    }

    /// Warnings emitted but not retained since the last [`take`](Self::take).
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
