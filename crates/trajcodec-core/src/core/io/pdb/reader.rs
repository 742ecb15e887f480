use super::offsets::OffsetTable;
use super::record::{RecordKind, classify};
use super::secondary::{SecondaryStaging, parse_helix, parse_sheet, parse_turn};
use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::io::fields::{Field, char_at, field};
use crate::core::io::index::StepIndex;
use crate::core::io::stream::LineStream;
use crate::core::io::traits::FrameReader;
use crate::core::models::atom::Atom;
use crate::core::models::cell::UnitCell;
use crate::core::models::frame::Frame;
use crate::core::models::residue::Residue;
use crate::core::topology::connectivity::link_standard_residue_bonds;
use crate::core::topology::templates::ConnectivityRegistry;
use crate::error::{Result, TrajectoryError};
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::io::{BufRead, Seek};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

const SERIAL: Field = Field::new("atom serial", 6, 11);
const NAME: Field = Field::new("atom name", 12, 16);
const RESNAME: Field = Field::new("residue name", 17, 20);
const RESID: Field = Field::new("residue sequence number", 22, 26);
const X: Field = Field::new("x coordinate", 30, 38);
const Y: Field = Field::new("y coordinate", 38, 46);
const Z: Field = Field::new("z coordinate", 46, 54);
const ELEMENT: Field = Field::new("element symbol", 76, 78);
const ALTLOC: usize = 16;
const CHAIN: usize = 21;
const ICODE: usize = 26;

const CELL_A: Field = Field::new("cell length a", 6, 15);
const CELL_B: Field = Field::new("cell length b", 15, 24);
const CELL_C: Field = Field::new("cell length c", 24, 33);
const CELL_ALPHA: Field = Field::new("cell angle alpha", 33, 40);
const CELL_BETA: Field = Field::new("cell angle beta", 40, 47);
const CELL_GAMMA: Field = Field::new("cell angle gamma", 47, 54);

const TER_SERIAL: Field = Field::new("TER serial", 6, 11);

const CONECT_FIELDS: [Field; 5] = [
    Field::new("CONECT atom serial", 6, 11),
    Field::new("CONECT bonded serial 1", 11, 16),
    Field::new("CONECT bonded serial 2", 16, 21),
    Field::new("CONECT bonded serial 3", 21, 26),
    Field::new("CONECT bonded serial 4", 26, 31),
];

/// Skips one PDB frame, returning `false` if the stream ended before a
/// terminator was found.
///
/// An `ENDMDL` directly followed by `END` is consumed together with it, so
/// the pair closes a single frame.
pub(crate) fn forward<R: BufRead + Seek>(stream: &mut LineStream<R>) -> Result<bool> {
    while !stream.eof()? {
        let line = stream.read_line()?;
        match classify(&line) {
            RecordKind::Endmdl => {
                if let Some(next) = stream.peek_line()? {
                    if classify(&next) == RecordKind::End {
                        stream.read_line()?;
                    }
                }
                return Ok(true);
            }
            RecordKind::End => return Ok(true),
            _ => {}
        }
    }
    Ok(false)
}

/// Random-access reader for PDB files.
///
/// The frame boundaries are indexed once on construction. A file without any
/// `END`/`ENDMDL` record is exposed as a single frame.
#[derive(Debug)]
pub struct PdbReader<R> {
    stream: LineStream<R>,
    index: StepIndex,
    next_step: usize,
    registry: Arc<ConnectivityRegistry>,
    infer_bonds: bool,
    diagnostics: Diagnostics,
}

impl<R: BufRead + Seek> PdbReader<R> {
    pub fn new(inner: R) -> Result<Self> {
        Self::with_templates(inner, ConnectivityRegistry::standard())
    }

    pub fn with_templates(inner: R, registry: Arc<ConnectivityRegistry>) -> Result<Self> {
        Self::from_stream(LineStream::new(inner)?, registry)
    }

    pub fn from_stream(
        mut stream: LineStream<R>,
        registry: Arc<ConnectivityRegistry>,
    ) -> Result<Self> {
        let index = StepIndex::build(&mut stream, forward)?;
        Ok(Self {
            stream,
            index,
            next_step: 0,
            registry,
            infer_bonds: true,
            diagnostics: Diagnostics::new(),
        })
    }

    /// Enables or disables template-based bond inference (on by default).
    pub fn infer_bonds(mut self, infer_bonds: bool) -> Self {
        self.infer_bonds = infer_bonds;
        self
    }

    pub fn index(&self) -> &StepIndex {
        &self.index
    }

    fn read_frame(&mut self) -> Result<Frame> {
        let mut builder = FrameBuilder::default();
        let mut terminated = false;

        while !self.stream.eof()? {
            let line = self.stream.read_line()?;
            let diagnostics = &mut self.diagnostics;
            match classify(&line) {
                RecordKind::Header => builder.read_header(&line),
                RecordKind::Title => builder.read_title(&line),
                RecordKind::Cryst1 => builder.frame.cell = read_cryst1(&line, diagnostics)?,
                RecordKind::Atom => builder.read_atom(&line, false, diagnostics)?,
                RecordKind::Hetatm => builder.read_atom(&line, true, diagnostics)?,
                RecordKind::Conect => builder.read_conect(&line, diagnostics),
                RecordKind::Ter => builder.read_ter(&line, diagnostics),
                RecordKind::Helix => builder.stage(parse_helix(&line, diagnostics)),
                RecordKind::Sheet => builder.stage(parse_sheet(&line, diagnostics)),
                RecordKind::Turn => builder.stage(parse_turn(&line, diagnostics)),
                RecordKind::Model => trace!(model = field(&line, 10, 14), "MODEL record"),
                RecordKind::Endmdl => {
                    let next = self.stream.peek_line()?;
                    if next.is_some_and(|next| classify(&next) == RecordKind::End) {
                        continue;
                    }
                    terminated = true;
                    break;
                }
                RecordKind::End => {
                    terminated = true;
                    break;
                }
                RecordKind::Ignored => {}
                RecordKind::Unknown => {
                    if !self.stream.eof()? {
                        diagnostics.warn(
                            WarningKind::UnknownRecord,
                            format!("Ignoring unknown record: '{}'", line),
                        );
                    }
                }
            }
        }

        if !terminated {
            self.diagnostics.warn(
                WarningKind::MissingEnd,
                "Missing END or ENDMDL record at the end of the frame",
            );
        }

        builder.finish(
            self.infer_bonds.then_some(self.registry.as_ref()),
            &mut self.diagnostics,
        )
    }
}

impl<R: BufRead + Seek> FrameReader for PdbReader<R> {
    fn nsteps(&self) -> usize {
        self.index.len()
    }

    #[instrument(level = "debug", skip_all, name = "pdb_read_step", fields(step = step))]
    fn read_step(&mut self, step: usize) -> Result<Frame> {
        let offset = self.index.get(step).ok_or(TrajectoryError::StepOutOfRange {
            step,
            nsteps: self.index.len(),
        })?;
        self.next_step = step + 1;
        self.stream.seek(offset)?;
        let mut frame = self.read_frame()?;
        frame.step = step;
        debug!(atoms = frame.size(), "Read PDB frame");
        Ok(frame)
    }

    fn read(&mut self) -> Result<Frame> {
        self.read_step(self.next_step)
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}

fn read_cryst1(line: &str, diagnostics: &mut Diagnostics) -> Result<UnitCell> {
    if line.len() < 54 {
        return Err(TrajectoryError::format(format!(
            "CRYST1 record is too short: '{}'",
            line
        )));
    }
    let parse = |field: Field| {
        field
            .parse_float(line)
            .map_err(|e| TrajectoryError::format(format!("Invalid CRYST1 record: {}", e)))
    };
    let lengths = [parse(CELL_A)?, parse(CELL_B)?, parse(CELL_C)?];
    let angles = [parse(CELL_ALPHA)?, parse(CELL_BETA)?, parse(CELL_GAMMA)?];

    let cell = if lengths.iter().all(|l| *l == 0.0) {
        UnitCell::infinite()
    } else {
        UnitCell::new(lengths, angles)
            .map_err(|e| TrajectoryError::format(format!("Invalid CRYST1 record: {}", e)))?
    };

    let space_group = field(line, 55, 65);
    if !space_group.is_empty() && space_group != "P 1" && space_group != "P1" {
        diagnostics.warn(
            WarningKind::SpaceGroup,
            format!(
                "Space group '{}' is not supported, the cell is read as 'P 1'",
                space_group
            ),
        );
    }
    Ok(cell)
}

/// Per-frame parsing state, discarded once the frame is complete.
#[derive(Default)]
struct FrameBuilder {
    frame: Frame,
    residues: BTreeMap<(char, i64), Residue>,
    offsets: OffsetTable,
    secondary: SecondaryStaging,
}

impl FrameBuilder {
    fn read_header(&mut self, line: &str) {
        if line.len() < 66 {
            return;
        }
        for (name, start, end) in [
            ("classification", 10, 50),
            ("deposition_date", 50, 59),
            ("pdb_idcode", 62, 66),
        ] {
            let value = field(line, start, end);
            if !value.is_empty() {
                self.frame.properties.set(name, value);
            }
        }
    }

    fn read_title(&mut self, line: &str) {
        if line.len() < 11 {
            return;
        }
        let segment = line.get(10..line.len().min(80)).unwrap_or("");
        let previous = self.frame.properties.get_str("name").unwrap_or("");
        let name = format!("{}{}", previous, segment).trim().to_string();
        self.frame.properties.set("name", name);
    }

    fn read_atom(&mut self, line: &str, hetatm: bool, diagnostics: &mut Diagnostics) -> Result<()> {
        if line.len() < 54 {
            return Err(TrajectoryError::format(format!(
                "{} record is too short: '{}'",
                if hetatm { "HETATM" } else { "ATOM" },
                line
            )));
        }

        if self.frame.is_empty() {
            match SERIAL.parse_int(line) {
                Ok(serial) if serial > 0 => self.offsets.set_first_serial(serial),
                Ok(serial) => diagnostics.warn(
                    WarningKind::FieldParse,
                    format!("First atom serial {} is not positive, assuming 1", serial),
                ),
                Err(err) => diagnostics.warn(
                    WarningKind::FieldParse,
                    format!("{}, assuming the first atom serial is 1", err),
                ),
            }
        }

        let position = Point3::new(X.parse_float(line)?, Y.parse_float(line)?, Z.parse_float(line)?);

        let mut atom = Atom::new(NAME.text(line));
        let altloc = char_at(line, ALTLOC);
        if altloc != ' ' {
            atom.properties.set("altloc", altloc.to_string());
        }
        let element = ELEMENT.text(line);
        if !element.is_empty() {
            atom.element = element.to_string();
        }
        let index = self.frame.add_atom(atom, position);

        if let Some(resid) = RESID.try_int(line) {
            let chain = char_at(line, CHAIN);
            let residue = self.residues.entry((chain, resid)).or_insert_with(|| {
                let mut residue = Residue::with_id(RESNAME.text(line), resid);
                residue.properties.set("is_standard_pdb", !hetatm);
                residue.properties.set("chainid", chain.to_string());
                residue.properties.set("chainname", chain.to_string());
                let icode = char_at(line, ICODE);
                if icode != ' ' {
                    residue.properties.set("insertion_code", icode.to_string());
                }
                residue
            });
            residue.add_atom(index);
        }
        Ok(())
    }

    fn read_ter(&mut self, line: &str, diagnostics: &mut Diagnostics) {
        if line.len() < 12 {
            return;
        }
        match TER_SERIAL.parse_int(line) {
            Ok(serial) => self.offsets.add_gap(serial),
            Err(err) => diagnostics.warn(
                WarningKind::FieldParse,
                format!("Ignoring TER serial: {}", err),
            ),
        }
    }

    fn read_conect(&mut self, line: &str, diagnostics: &mut Diagnostics) {
        let line = line.trim_end();
        let [source_field, targets @ ..] = &CONECT_FIELDS;
        if !source_field.present(line) {
            return;
        }
        let Some(source) = self.resolve(source_field, line, diagnostics) else {
            return;
        };

        for target_field in targets.iter().take_while(|f| f.present(line)) {
            let Some(target) = self.resolve(target_field, line, diagnostics) else {
                continue;
            };
            if let Err(err) = self.frame.add_bond(source, target) {
                diagnostics.warn(
                    WarningKind::InvalidBond,
                    format!("Ignoring CONECT bond: {}", err),
                );
            }
        }
    }

    fn resolve(&self, field: &Field, line: &str, diagnostics: &mut Diagnostics) -> Option<usize> {
        let serial = match field.parse_int(line) {
            Ok(serial) => serial,
            Err(err) => {
                diagnostics.warn(WarningKind::FieldParse, format!("Ignoring CONECT reference: {}", err));
                return None;
            }
        };
        match self.offsets.translate(serial) {
            Some(index) if index < self.frame.size() => Some(index),
            _ => {
                diagnostics.warn(
                    WarningKind::OutOfRangeReference,
                    format!(
                        "CONECT references atom serial {} which is not part of this frame ({} atoms)",
                        serial,
                        self.frame.size()
                    ),
                );
                None
            }
        }
    }

    fn stage(&mut self, span: Option<super::secondary::SecondarySpan>) {
        if let Some(span) = span {
            self.secondary.stage(span);
        }
    }

    fn finish(
        mut self,
        registry: Option<&ConnectivityRegistry>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Frame> {
        self.secondary.apply(&mut self.residues);
        for residue in self.residues.into_values() {
            self.frame.add_residue(residue)?;
        }
        if let Some(registry) = registry {
            link_standard_residue_bonds(&mut self.frame, registry, diagnostics)?;
        }
        Ok(self.frame)
    }
}
