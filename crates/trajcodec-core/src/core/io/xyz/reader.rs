use super::extended::apply_comment;
use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::io::index::StepIndex;
use crate::core::io::stream::LineStream;
use crate::core::io::traits::FrameReader;
use crate::core::models::atom::Atom;
use crate::core::models::frame::Frame;
use crate::error::{Result, TrajectoryError};
use nalgebra::Point3;
use std::io::{BufRead, Seek};
use tracing::{debug, instrument};

/// Shape of an XYZ line, judged from its whitespace-separated tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyzLine {
    Blank,
    /// A single non-negative integer.
    Count(usize),
    /// At least four tokens: a name and three coordinates, possibly followed
    /// by extra columns.
    Atom,
    Other,
}

pub fn classify(line: &str) -> XyzLine {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (None, _) => XyzLine::Blank,
        (Some(token), None) => token.parse().map_or(XyzLine::Other, XyzLine::Count),
        _ if tokens.count() >= 2 => XyzLine::Atom,
        _ => XyzLine::Other,
    }
}

/// Reads the atom count line of the next frame, skipping blank lines.
/// Returns `None` when only blank lines remain.
fn read_count_line<R: BufRead + Seek>(stream: &mut LineStream<R>) -> Result<Option<String>> {
    while !stream.eof()? {
        let line = stream.read_line()?;
        if classify(&line) != XyzLine::Blank {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

fn parse_count(line: &str) -> Result<usize> {
    match classify(line) {
        XyzLine::Count(count) => Ok(count),
        _ => Err(TrajectoryError::format(format!(
            "Invalid XYZ atom count: '{}'",
            line.trim()
        ))),
    }
}

/// Skips one XYZ frame.
///
/// Returns `false` at the end of the stream, on a count line that is not an
/// integer, and on a frame with fewer lines than announced. The last two
/// cases are recorded as warnings.
pub(crate) fn forward<R: BufRead + Seek>(
    stream: &mut LineStream<R>,
    diagnostics: &mut Diagnostics,
) -> Result<bool> {
    let Some(line) = read_count_line(stream)? else {
        return Ok(false);
    };
    let count = match parse_count(&line) {
        Ok(count) => count,
        Err(err) => {
            diagnostics.warn(
                WarningKind::IncompleteFrame,
                format!("Stopping the step index: {}", err),
            );
            return Ok(false);
        }
    };
    for read in 0..=count {
        if stream.eof()? {
            diagnostics.warn(
                WarningKind::IncompleteFrame,
                format!(
                    "Last XYZ frame is truncated: expected {} atom lines, found {}",
                    count,
                    read.saturating_sub(1)
                ),
            );
            return Ok(false);
        }
        stream.read_line()?;
    }
    Ok(true)
}

fn parse_atom_line(line: &str) -> Result<(Atom, Point3<f64>)> {
    if classify(line) != XyzLine::Atom {
        return Err(TrajectoryError::format(format!(
            "XYZ atom line needs a name and three coordinates: '{}'",
            line
        )));
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut coordinates = [0.0; 3];
    for (value, token) in coordinates.iter_mut().zip(&tokens[1..4]) {
        *value = token
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| {
                TrajectoryError::format(format!("Invalid XYZ coordinate '{}' in '{}'", token, line))
            })?;
    }
    let [x, y, z] = coordinates;
    Ok((Atom::new(tokens[0]), Point3::new(x, y, z)))
}

/// Random-access reader for plain and extended XYZ files.
#[derive(Debug)]
pub struct XyzReader<R> {
    stream: LineStream<R>,
    index: StepIndex,
    next_step: usize,
    diagnostics: Diagnostics,
}

impl<R: BufRead + Seek> XyzReader<R> {
    pub fn new(inner: R) -> Result<Self> {
        Self::from_stream(LineStream::new(inner)?)
    }

    pub fn from_stream(mut stream: LineStream<R>) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let index = StepIndex::scan(&mut stream, |stream| forward(stream, &mut diagnostics))?;
        Ok(Self {
            stream,
            index,
            next_step: 0,
            diagnostics,
        })
    }

    pub fn index(&self) -> &StepIndex {
        &self.index
    }

    fn read_frame(&mut self) -> Result<Frame> {
        let line = read_count_line(&mut self.stream)?
            .ok_or_else(|| TrajectoryError::format("Missing XYZ atom count line"))?;
        let count = parse_count(&line)?;
        if self.stream.eof()? {
            return Err(TrajectoryError::format("Missing XYZ comment line"));
        }
        let comment = self.stream.read_line()?;

        let mut frame = Frame::new();
        for read in 0..count {
            if self.stream.eof()? {
                return Err(TrajectoryError::format(format!(
                    "Expected {} atoms in XYZ frame, found {}",
                    count, read
                )));
            }
            let (atom, position) = parse_atom_line(&self.stream.read_line()?)?;
            frame.add_atom(atom, position);
        }
        apply_comment(&comment, &mut frame, &mut self.diagnostics)?;
        Ok(frame)
    }
}

impl<R: BufRead + Seek> FrameReader for XyzReader<R> {
    fn nsteps(&self) -> usize {
        self.index.len()
    }

    #[instrument(level = "debug", skip_all, name = "xyz_read_step", fields(step = step))]
    fn read_step(&mut self, step: usize) -> Result<Frame> {
        let offset = self.index.get(step).ok_or(TrajectoryError::StepOutOfRange {
            step,
            nsteps: self.index.len(),
        })?;
        self.next_step = step + 1;
        self.stream.seek(offset)?;
        let mut frame = self.read_frame()?;
        frame.step = step;
        debug!(atoms = frame.size(), "Read XYZ frame");
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn open(text: &str) -> XyzReader<Cursor<Vec<u8>>> {
        XyzReader::new(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    const WATER: &str = "3\nwater\nO 0.0 0.0 0.117\nH 0.0 0.757 -0.467\nH 0.0 -0.757 -0.467\n";

    #[test]
    fn lines_are_classified_by_their_tokens() {
        assert_eq!(classify("  \t"), XyzLine::Blank);
        assert_eq!(classify(" 12 "), XyzLine::Count(12));
        assert_eq!(classify("-1"), XyzLine::Other);
        assert_eq!(classify("C 0 0 0"), XyzLine::Atom);
        assert_eq!(classify("C 0 0 0 1.5 extra"), XyzLine::Atom);
        assert_eq!(classify("C 0 0"), XyzLine::Other);
        assert_eq!(classify("water"), XyzLine::Other);
    }

    #[test]
    fn reads_a_plain_frame() {
        let mut reader = open(WATER);
        assert_eq!(reader.nsteps(), 1);
        let frame = reader.read().unwrap();
        assert_eq!(frame.size(), 3);
        assert_eq!(frame.atom(0).unwrap().name, "O");
        assert_eq!(frame.atom(1).unwrap().element, "H");
        assert_eq!(frame.positions()[1], Point3::new(0.0, 0.757, -0.467));
        assert_eq!(frame.properties.get_str("name"), Some("water"));
        assert!(frame.cell.is_infinite());
    }

    #[test]
    fn indexes_every_frame_and_reads_them_out_of_order() {
        let text = format!("{}\n{}", WATER, WATER.replace("water", "second"));
        let mut reader = open(&text);
        assert_eq!(reader.nsteps(), 2);

        let second = reader.read_step(1).unwrap();
        assert_eq!(second.properties.get_str("name"), Some("second"));
        assert_eq!(second.step, 1);
        let first = reader.read_step(0).unwrap();
        assert_eq!(first.properties.get_str("name"), Some("water"));
        assert_eq!(reader.read_step(1).unwrap(), second);
        assert!(matches!(
            reader.read_step(2),
            Err(TrajectoryError::StepOutOfRange { step: 2, nsteps: 2 })
        ));
    }

    #[test]
    fn sequential_reads_follow_the_last_step() {
        let text = format!("{}{}", WATER, WATER);
        let mut reader = open(&text);
        reader.read_step(0).unwrap();
        assert_eq!(reader.read().unwrap().step, 1);
        assert!(reader.read().is_err());
    }

    #[test]
    fn truncated_last_frame_is_not_indexed() {
        let text = format!("{}3\ncut\nO 0 0 0\n", WATER);
        let reader = open(&text);
        assert_eq!(reader.nsteps(), 1);
        assert_eq!(reader.diagnostics().count(WarningKind::IncompleteFrame), 1);
    }

    #[test]
    fn trailing_blank_lines_are_not_a_frame() {
        let text = format!("{}\n\n", WATER);
        let reader = open(&text);
        assert_eq!(reader.nsteps(), 1);
        assert!(reader.diagnostics().is_empty());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let mut reader = open("1\n\nC 1 2 3 0.5 extra\n");
        let frame = reader.read().unwrap();
        assert_eq!(frame.positions()[0], Point3::new(1.0, 2.0, 3.0));
        assert!(frame.properties.is_empty());
    }

    #[test]
    fn short_atom_line_is_fatal() {
        let mut reader = open("1\n\nC 1 2\n");
        assert!(matches!(reader.read(), Err(TrajectoryError::Format { .. })));
    }

    #[test]
    fn bad_coordinate_is_fatal() {
        let mut reader = open("1\n\nC 1 two 3\n");
        assert!(matches!(reader.read(), Err(TrajectoryError::Format { .. })));
    }

    #[test]
    fn bad_count_line_is_fatal_when_read() {
        let mut diagnostics = Diagnostics::new();
        let mut stream = LineStream::new(Cursor::new(b"three\n\n".to_vec())).unwrap();
        assert!(!forward(&mut stream, &mut diagnostics).unwrap());
        assert_eq!(diagnostics.count(WarningKind::IncompleteFrame), 1);
        assert!(parse_count("three").is_err());
    }

    #[test]
    fn extended_comment_sets_the_cell() {
        let mut reader = open(
            "1\nLattice=\"5 0 0 0 5 0 0 0 5\" Properties=species:S:1:pos:R:3 temperature=300\nAr 0 0 0\n",
        );
        let frame = reader.read().unwrap();
        assert_eq!(frame.cell.lengths(), [5.0, 5.0, 5.0]);
        assert_eq!(frame.properties.get_double("temperature"), Some(300.0));
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let mut reader = open(&WATER.replace('\n', "\r\n"));
        assert_eq!(reader.nsteps(), 1);
        assert_eq!(reader.read().unwrap().size(), 3);
    }
}
