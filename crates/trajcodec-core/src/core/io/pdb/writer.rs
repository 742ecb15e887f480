use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::io::fields::fits_width;
use crate::core::io::index::StepIndex;
use crate::core::io::traits::FrameWriter;
use crate::core::models::frame::Frame;
use crate::error::{Result, TrajectoryError};
use std::io::Write;
use tracing::{debug, instrument};

const MAX_SERIAL: usize = 99999;
const MAX_RESID: i64 = 9999;
const MIN_RESID: i64 = -999;
const NO_RESID: &str = "  -1";

/// Formats `value` right-aligned with `precision` decimals, failing when the
/// result does not fit `width` columns.
fn fixed(
    value: f64,
    width: usize,
    precision: usize,
    context: &'static str,
    format: &'static str,
) -> Result<String> {
    let text = format!("{:>width$.precision$}", value, width = width, precision = precision);
    if !value.is_finite() || !fits_width(&text, width) {
        return Err(TrajectoryError::ValueTooLarge {
            context,
            value: value.to_string(),
            format,
        });
    }
    Ok(text)
}

/// Keeps the first `width` characters of `value`, warning when something
/// had to be cut.
fn truncated<'a>(
    value: &'a str,
    width: usize,
    what: &str,
    diagnostics: &mut Diagnostics,
) -> &'a str {
    match value.char_indices().nth(width) {
        Some((cut, _)) => {
            diagnostics.warn(
                WarningKind::Truncated,
                format!(
                    "{} '{}' is too long for the PDB format and is truncated to {} characters",
                    what, value, width
                ),
            );
            &value[..cut]
        }
        None => value,
    }
}

/// Writes frames as PDB models.
///
/// Each frame becomes a `MODEL` ... `ENDMDL` block. A single `END` record
/// closes the file when the writer is finished.
#[derive(Debug)]
pub struct PdbWriter<W: Write> {
    inner: W,
    index: StepIndex,
    offset: u64,
    written: bool,
    finished: bool,
    diagnostics: Diagnostics,
}

impl<W: Write> PdbWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::appending(inner, StepIndex::new(), 0)
    }

    /// Continues a file that already holds the frames described by `index`
    /// and is `offset` bytes long.
    pub fn appending(inner: W, index: StepIndex, offset: u64) -> Self {
        Self {
            inner,
            index,
            offset,
            written: false,
            finished: false,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Start offsets of every frame in the file, as a reader would index them.
    pub fn index(&self) -> &StepIndex {
        &self.index
    }

    /// Finishes the file and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        Ok(self.inner)
    }

    fn format_frame(&mut self, frame: &Frame) -> Result<String> {
        let diagnostics = &mut self.diagnostics;
        let mut out = String::new();

        out += &format!("MODEL {:>4}\n", self.index.len() + 1);

        let [a, b, c] = frame.cell.lengths();
        let [alpha, beta, gamma] = frame.cell.angles();
        out += "CRYST1";
        for length in [a, b, c] {
            out += &fixed(length, 9, 3, "cell lengths", "{:9.3}")?;
        }
        for angle in [alpha, beta, gamma] {
            out += &fixed(angle, 7, 2, "cell angles", "{:7.2}")?;
        }
        out += " P 1           1\n";

        let mut next_orphan_resid = frame
            .residues()
            .iter()
            .filter_map(|residue| residue.id)
            .max()
            .unwrap_or(0)
            .max(0)
            .saturating_add(1);
        let mut serial_overflow = false;
        let mut serial = |index: usize, diagnostics: &mut Diagnostics| -> String {
            if index + 1 > MAX_SERIAL {
                if !serial_overflow {
                    serial_overflow = true;
                    diagnostics.warn(
                        WarningKind::Overflow,
                        format!(
                            "Too many atoms for the PDB format, serials above {} are written as '*****'",
                            MAX_SERIAL
                        ),
                    );
                }
                "*****".to_string()
            } else {
                (index + 1).to_string()
            }
        };

        for (index, (atom, position)) in frame.atoms().iter().zip(frame.positions()).enumerate() {
            let altloc = atom.properties.get_str("altloc").unwrap_or(" ");
            let altloc = truncated(altloc, 1, "Alternate location", diagnostics);

            let (record, resname, chain, resid, icode) =
                match frame.topology().residue_for_atom(index) {
                    Some(residue) => {
                        let record = if residue.properties.get_bool("is_standard_pdb") == Some(true) {
                            "ATOM"
                        } else {
                            "HETATM"
                        };
                        let resname = truncated(&residue.name, 3, "Residue name", diagnostics);
                        let chain = match residue.properties.get_str("chainid") {
                            Some(chain) => truncated(chain, 1, "Chain id", diagnostics),
                            None => "X",
                        };
                        let icode = match residue.properties.get_str("insertion_code") {
                            Some(icode) => truncated(icode, 1, "Insertion code", diagnostics),
                            None => " ",
                        };
                        let resid = match residue.id {
                            Some(id) if (MIN_RESID..=MAX_RESID).contains(&id) => id.to_string(),
                            Some(id) => {
                                diagnostics.warn(
                                    WarningKind::Overflow,
                                    format!(
                                        "Residue id {} does not fit the PDB format, writing {}",
                                        id,
                                        NO_RESID.trim()
                                    ),
                                );
                                NO_RESID.to_string()
                            }
                            None => NO_RESID.to_string(),
                        };
                        (record, resname, chain, resid, icode)
                    }
                    None => {
                        let resid = if next_orphan_resid <= MAX_RESID {
                            next_orphan_resid.to_string()
                        } else {
                            NO_RESID.to_string()
                        };
                        next_orphan_resid = next_orphan_resid.saturating_add(1);
                        ("HETATM", "XXX", "X", resid, " ")
                    }
                };

            let name = truncated(&atom.name, 4, "Atom name", diagnostics);
            let element = truncated(&atom.element, 2, "Element", diagnostics);
            let x = fixed(position.x, 8, 3, "atomic position", "{:8.3}")?;
            let y = fixed(position.y, 8, 3, "atomic position", "{:8.3}")?;
            let z = fixed(position.z, 8, 3, "atomic position", "{:8.3}")?;

            out += &format!(
                "{:<6}{:>5} {:<4}{:1}{:<3} {:1}{:>4}{:1}   {}{}{}{:6.2}{:6.2}          {:>2}\n",
                record,
                serial(index, diagnostics),
                name,
                altloc,
                resname,
                chain,
                resid,
                icode,
                x,
                y,
                z,
                1.0,
                0.0,
                element
            );
        }

        let mut partners = vec![Vec::new(); frame.size()];
        for bond in frame.bonds() {
            let (i, j) = (bond.first(), bond.second());
            if i + 1 > MAX_SERIAL || j + 1 > MAX_SERIAL {
                diagnostics.warn(
                    WarningKind::Overflow,
                    format!(
                        "Atom index too large for CONECT, removing the bond between {} and {}",
                        i, j
                    ),
                );
                continue;
            }
            partners[i].push(j);
            partners[j].push(i);
        }
        for (index, bonded) in partners.iter_mut().enumerate() {
            bonded.sort_unstable();
            for chunk in bonded.chunks(4) {
                out += &format!("CONECT{:>5}", index + 1);
                for partner in chunk {
                    out += &format!("{:>5}", partner + 1);
                }
                out += "\n";
            }
        }

        out += "ENDMDL\n";
        Ok(out)
    }
}

impl<W: Write> FrameWriter for PdbWriter<W> {
    fn nsteps(&self) -> usize {
        self.index.len()
    }

    #[instrument(level = "debug", skip_all, name = "pdb_write_frame", fields(atoms = frame.size()))]
    fn write(&mut self, frame: &Frame) -> Result<()> {
        let text = self.format_frame(frame)?;
        self.inner.write_all(text.as_bytes())?;
        self.index.push(self.offset);
        self.offset += text.len() as u64;
        self.written = true;
        debug!(step = self.index.len() - 1, "Wrote PDB frame");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.written {
            self.inner.write_all(b"END\n")?;
            self.offset += 4;
        }
        self.inner.flush()?;
        Ok(())
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::reader::PdbReader;
    use crate::core::io::traits::FrameReader;
    use crate::core::models::atom::Atom;
    use crate::core::models::cell::UnitCell;
    use crate::core::models::residue::Residue;
    use nalgebra::Point3;
    use std::io::Cursor;

    fn write_frames(frames: &[Frame]) -> (String, Diagnostics) {
        let mut writer = PdbWriter::new(Vec::new());
        for frame in frames {
            writer.write(frame).unwrap();
        }
        let diagnostics = writer.diagnostics().clone();
        let bytes = writer.into_inner().unwrap();
        (String::from_utf8(bytes).unwrap(), diagnostics)
    }

    fn dimer() -> Frame {
        let mut frame = Frame::new();
        frame.add_atom(Atom::new("H"), Point3::new(0.0, 0.0, 0.0));
        frame.add_atom(Atom::new("H"), Point3::new(0.74, 0.0, 0.0));
        frame.add_bond(0, 1).unwrap();
        frame.cell = UnitCell::orthorhombic(1.0, 1.0, 1.0).unwrap();
        frame
    }

    fn peptide() -> Frame {
        let mut frame = Frame::new();
        for (resid, offset) in [(1, 0.0), (2, 3.8)] {
            let mut residue = Residue::with_id("GLY", resid);
            residue.properties.set("is_standard_pdb", true);
            residue.properties.set("chainid", "A");
            for (k, name) in ["N", "CA", "C", "O"].iter().enumerate() {
                let mut atom = Atom::new(name);
                atom.element = name[..1].to_string();
                let index =
                    frame.add_atom(atom, Point3::new(offset + k as f64 * 1.2, -1.25, 10.5));
                residue.add_atom(index);
            }
            frame.add_residue(residue).unwrap();
        }
        frame
    }

    #[test]
    fn frame_is_written_on_the_fixed_column_grid() {
        let (text, diagnostics) = write_frames(&[peptide()]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "MODEL    1");
        assert_eq!(
            lines[1],
            "CRYST1    0.000    0.000    0.000  90.00  90.00  90.00 P 1           1"
        );
        assert_eq!(
            lines[2],
            "ATOM      1 N    GLY A   1       0.000  -1.250  10.500  1.00  0.00           N"
        );
        assert_eq!(&lines[3][30..54], "   1.200  -1.250  10.500");
        assert_eq!(lines[lines.len() - 2], "ENDMDL");
        assert_eq!(lines[lines.len() - 1], "END");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn end_is_written_once_after_all_models() {
        let (text, _) = write_frames(&[dimer(), dimer(), dimer()]);
        assert_eq!(text.matches("ENDMDL\n").count(), 3);
        assert_eq!(text.lines().filter(|l| *l == "END").count(), 1);
        assert!(text.contains("MODEL    3\n"));
    }

    #[test]
    fn nothing_is_written_when_no_frame_was_written() {
        let writer = PdbWriter::new(Vec::new());
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn conect_records_hold_at_most_four_partners() {
        let mut frame = Frame::new();
        for _ in 0..6 {
            frame.add_atom(Atom::new("C"), Point3::origin());
        }
        for partner in 1..6 {
            frame.add_bond(0, partner).unwrap();
        }
        let (text, _) = write_frames(&[frame]);
        let conect: Vec<&str> = text.lines().filter(|l| l.starts_with("CONECT")).collect();
        assert_eq!(conect[0], "CONECT    1    2    3    4    5");
        assert_eq!(conect[1], "CONECT    1    6");
        assert_eq!(conect[2], "CONECT    2    1");
        assert_eq!(conect.len(), 7);
    }

    #[test]
    fn atoms_without_residue_get_placeholder_residues() {
        let mut frame = peptide();
        frame.add_atom(Atom::new("ZN"), Point3::origin());
        frame.add_atom(Atom::new("CL"), Point3::origin());
        let (text, _) = write_frames(&[frame]);
        let hetatm: Vec<&str> = text.lines().filter(|l| l.starts_with("HETATM")).collect();
        assert_eq!(&hetatm[0][17..26], "XXX X   3");
        assert_eq!(&hetatm[1][17..26], "XXX X   4");
    }

    #[test]
    fn long_string_fields_are_truncated_with_warnings() {
        let mut frame = Frame::new();
        let mut atom = Atom::with_element("CA1234", "Zn2");
        atom.properties.set("altloc", "AB");
        frame.add_atom(atom, Point3::origin());
        let mut residue = Residue::with_id("LONG", 1);
        residue.properties.set("chainid", "AB");
        residue.properties.set("insertion_code", "XY");
        residue.add_atom(0);
        frame.add_residue(residue).unwrap();

        let (text, diagnostics) = write_frames(&[frame]);
        let line = text.lines().find(|l| l.starts_with("HETATM")).unwrap();
        assert_eq!(&line[12..27], "CA12ALON A   1X");
        assert_eq!(&line[76..78], "Zn");
        assert_eq!(diagnostics.count(WarningKind::Truncated), 6);
    }

    #[test]
    fn residue_id_above_9999_is_written_as_minus_one() {
        let mut frame = Frame::new();
        frame.add_atom(Atom::new("O"), Point3::origin());
        let mut residue = Residue::with_id("HOH", 10000);
        residue.add_atom(0);
        frame.add_residue(residue).unwrap();
        let (text, diagnostics) = write_frames(&[frame]);
        let line = text.lines().find(|l| l.starts_with("HETATM")).unwrap();
        assert_eq!(&line[22..26], "  -1");
        assert_eq!(diagnostics.count(WarningKind::Overflow), 1);
    }

    #[test]
    fn placeholder_resid_after_the_largest_id_does_not_overflow() {
        let mut frame = Frame::new();
        frame.add_atom(Atom::new("O"), Point3::origin());
        let mut residue = Residue::with_id("HOH", i64::MAX);
        residue.add_atom(0);
        frame.add_residue(residue).unwrap();
        frame.add_atom(Atom::new("NA"), Point3::origin());
        frame.add_atom(Atom::new("CL"), Point3::origin());

        let (text, diagnostics) = write_frames(&[frame]);
        let hetatm: Vec<&str> = text.lines().filter(|l| l.starts_with("HETATM")).collect();
        assert_eq!(hetatm.len(), 3);
        for line in hetatm {
            assert_eq!(&line[22..26], "  -1");
        }
        assert_eq!(diagnostics.count(WarningKind::Overflow), 1);
    }

    #[test]
    fn serial_overflow_prints_stars_and_warns_once() {
        let mut frame = Frame::new();
        for _ in 0..100_001 {
            frame.add_atom(Atom::new("C"), Point3::origin());
        }
        let (text, diagnostics) = write_frames(&[frame]);
        let last = text.lines().filter(|l| l.starts_with("HETATM")).last().unwrap();
        assert_eq!(&last[6..11], "*****");
        assert!(text.contains("HETATM99999 "));
        assert_eq!(diagnostics.count(WarningKind::Overflow), 1);
    }

    #[test]
    fn bonds_beyond_the_serial_range_are_dropped() {
        let mut frame = Frame::new();
        for _ in 0..100_001 {
            frame.add_atom(Atom::new("C"), Point3::origin());
        }
        frame.add_bond(0, 100_000).unwrap();
        frame.add_bond(0, 1).unwrap();
        let (text, diagnostics) = write_frames(&[frame]);
        assert_eq!(text.lines().filter(|l| l.starts_with("CONECT")).count(), 2);
        assert_eq!(diagnostics.count(WarningKind::Overflow), 2);
    }

    #[test]
    fn oversized_coordinates_are_fatal_and_leave_no_output() {
        let mut frame = dimer();
        frame.positions_mut()[1].x = 123456.0;
        let mut writer = PdbWriter::new(Vec::new());
        let err = writer.write(&frame).unwrap_err();
        assert!(matches!(
            err,
            TrajectoryError::ValueTooLarge { context: "atomic position", .. }
        ));
        assert_eq!(writer.nsteps(), 0);
        assert!(writer.into_inner().unwrap().is_empty());
    }

    #[test]
    fn oversized_cell_length_is_fatal() {
        let mut frame = dimer();
        frame.cell = UnitCell::orthorhombic(123456.0, 1.0, 1.0).unwrap();
        let mut writer = PdbWriter::new(Vec::new());
        assert!(matches!(
            writer.write(&frame),
            Err(TrajectoryError::ValueTooLarge { context: "cell lengths", .. })
        ));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let mut frame = dimer();
        frame.positions_mut()[0].y = f64::NAN;
        assert!(PdbWriter::new(Vec::new()).write(&frame).is_err());
    }

    #[test]
    fn dimer_round_trip_keeps_bond_and_right_angles() {
        let (text, _) = write_frames(&[dimer()]);
        let mut reader = PdbReader::new(Cursor::new(text.into_bytes())).unwrap();
        let frame = reader.read_step(0).unwrap();
        assert_eq!(frame.size(), 2);
        assert_eq!(frame.bonds().count(), 1);
        assert!(frame.topology().contains_bond(0, 1));
        assert_eq!(frame.cell.angles(), [90.0, 90.0, 90.0]);
        assert_eq!(frame.cell.lengths(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn round_trip_keeps_names_positions_and_bonds() {
        let mut original = peptide();
        original.add_bond(0, 1).unwrap();
        original.add_bond(2, 4).unwrap();
        original.positions_mut()[3] = Point3::new(-12.3456, 7.0001, 0.4444);
        let (text, _) = write_frames(&[original.clone(), original.clone()]);

        let mut reader = PdbReader::new(Cursor::new(text.into_bytes()))
            .unwrap()
            .infer_bonds(false);
        assert_eq!(reader.nsteps(), 2);
        let frame = reader.read_step(1).unwrap();
        assert_eq!(frame.size(), original.size());
        for (a, b) in frame.atoms().iter().zip(original.atoms()) {
            assert_eq!(a.name, b.name);
        }
        for (a, b) in frame.positions().iter().zip(original.positions()) {
            assert!((a - b).norm() < 1e-3);
        }
        let bonds: Vec<_> = frame.bonds().collect();
        let expected: Vec<_> = original.bonds().collect();
        assert_eq!(bonds, expected);
        assert_eq!(frame.residues().len(), 2);
        assert_eq!(frame.residues()[1].properties.get_bool("is_standard_pdb"), Some(true));
    }

    #[test]
    fn writer_index_matches_the_index_a_reader_builds() {
        let mut writer = PdbWriter::new(Vec::new());
        for _ in 0..3 {
            writer.write(&dimer()).unwrap();
        }
        let index = writer.index().clone();
        let bytes = writer.into_inner().unwrap();
        let reader = PdbReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.index(), &index);
    }

    #[test]
    fn appending_continues_model_numbering() {
        let mut index = StepIndex::new();
        index.push(0);
        index.push(100);
        let mut writer = PdbWriter::appending(Vec::new(), index, 200);
        writer.write(&dimer()).unwrap();
        assert_eq!(writer.nsteps(), 3);
        assert_eq!(writer.index().get(2), Some(200));
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.starts_with("MODEL    3\n"));
    }
}
