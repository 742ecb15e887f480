/// Maps PDB atom serial numbers to zero-based atom indices.
///
/// Serials normally count atoms from the first serial of the frame, but every
/// `TER` record also consumes a serial. The table keeps those gaps sorted and
/// translates with a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    first_serial: i64,
    gaps: Vec<i64>,
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::new(1)
    }
}

impl OffsetTable {
    pub fn new(first_serial: i64) -> Self {
        Self {
            first_serial,
            gaps: Vec::new(),
        }
    }

    pub fn set_first_serial(&mut self, first_serial: i64) {
        self.first_serial = first_serial;
    }

    /// Records the serial consumed by a `TER` record.
    pub fn add_gap(&mut self, serial: i64) {
        if let Err(position) = self.gaps.binary_search(&serial) {
            self.gaps.insert(position, serial);
        }
    }

    /// Translates a serial into an atom index.
    ///
    /// A gap at serial `t` shifts every serial strictly greater than `t`.
    /// Serials before the first one, and serials naming a `TER` record
    /// itself, have no atom and give `None`. Gaps before the first serial
    /// are ignored.
    pub fn translate(&self, serial: i64) -> Option<usize> {
        if serial < self.first_serial || self.gaps.binary_search(&serial).is_ok() {
            return None;
        }
        let before_first = self.gaps.partition_point(|gap| *gap < self.first_serial);
        let before_serial = self.gaps.partition_point(|gap| *gap < serial);
        let shift = (before_serial - before_first) as i64;
        usize::try_from(serial - self.first_serial - shift).ok()
    }
}
