//! File-level entry points: open a path and read or write whole frames.

use crate::config::{FormatKind, Mode, TrajectoryConfig, TrajectoryConfigBuilder};
use crate::core::io::diagnostics::{Diagnostics, Warning};
use crate::core::io::index::StepIndex;
use crate::core::io::pdb::{self, PdbReader, PdbWriter};
use crate::core::io::stream::{Compression, LineStream, Sink, Source};
use crate::core::io::traits::{FrameReader, FrameWriter};
use crate::core::io::xyz::{self, XyzReader, XyzWriter};
use crate::core::models::frame::Frame;
use crate::error::{Result, TrajectoryError};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Opens `path` for reading, writing or appending.
///
/// The format is inferred from the extension (`.pdb`, `.ent`, `.xyz`, each
/// optionally followed by `.gz`).
///
/// # Errors
///
/// Returns `Config` if the format cannot be inferred, `Io` if the file cannot
/// be opened, and `Format` if an existing file cannot be indexed.
pub fn open(path: impl AsRef<Path>, mode: Mode, compression: Compression) -> Result<Trajectory> {
    let config = TrajectoryConfigBuilder::new()
        .path(path.as_ref())
        .mode(mode)
        .compression(compression)
        .build()?;
    Trajectory::open_with(config)
}

/// An open trajectory file, either side.
#[derive(Debug)]
pub enum Trajectory {
    Reader(Reader),
    Writer(Writer),
}

impl Trajectory {
    pub fn open_with(config: TrajectoryConfig) -> Result<Self> {
        match config.mode {
            Mode::Read => Ok(Trajectory::Reader(Reader::open_with(config)?)),
            Mode::Write | Mode::Append => Ok(Trajectory::Writer(Writer::open_with(config)?)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Trajectory::Reader(_) => Mode::Read,
            Trajectory::Writer(writer) => writer.mode,
        }
    }

    pub fn nsteps(&self) -> usize {
        match self {
            Trajectory::Reader(reader) => reader.nsteps(),
            Trajectory::Writer(writer) => writer.nsteps(),
        }
    }

    pub fn read(&mut self) -> Result<Frame> {
        match self {
            Trajectory::Reader(reader) => reader.read(),
            Trajectory::Writer(writer) => Err(TrajectoryError::Mode {
                operation: "read from",
                mode: writer.mode,
            }),
        }
    }

    pub fn read_step(&mut self, step: usize) -> Result<Frame> {
        match self {
            Trajectory::Reader(reader) => reader.read_step(step),
            Trajectory::Writer(writer) => Err(TrajectoryError::Mode {
                operation: "read from",
                mode: writer.mode,
            }),
        }
    }

    pub fn write(&mut self, frame: &Frame) -> Result<()> {
        match self {
            Trajectory::Reader(_) => Err(TrajectoryError::Mode {
                operation: "write to",
                mode: Mode::Read,
            }),
            Trajectory::Writer(writer) => writer.write(frame),
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Trajectory::Reader(reader) => reader.warnings(),
            Trajectory::Writer(writer) => writer.warnings(),
        }
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        match self {
            Trajectory::Reader(reader) => reader.take_warnings(),
            Trajectory::Writer(writer) => writer.take_warnings(),
        }
    }

    /// Closes the file, reporting any error met while finishing a writer.
    pub fn close(self) -> Result<()> {
        match self {
            Trajectory::Reader(_) => Ok(()),
            Trajectory::Writer(writer) => writer.close(),
        }
    }
}

/// Random-access reader over a trajectory file.
pub struct Reader {
    path: PathBuf,
    format: FormatKind,
    inner: Box<dyn FrameReader>,
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("nsteps", &self.inner.nsteps())
            .finish()
    }
}

impl Reader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(TrajectoryConfigBuilder::new().path(path.as_ref()).build()?)
    }

    /// Opens the file described by `config` and indexes its frames.
    ///
    /// # Errors
    ///
    /// Returns `Mode` unless `config.mode` is [`Mode::Read`], `Io` if the file
    /// cannot be opened or decompressed, and any error met while indexing.
    #[instrument(skip_all, name = "open_trajectory_reader", fields(path = %config.path.display()))]
    pub fn open_with(config: TrajectoryConfig) -> Result<Self> {
        if config.mode != Mode::Read {
            return Err(TrajectoryError::Mode {
                operation: "open a reader for",
                mode: config.mode,
            });
        }
        let source = Source::open(&config.path, config.compression)?;
        let stream = LineStream::new(source)?.strict(config.strict_lines);
        let inner: Box<dyn FrameReader> = match config.format {
            FormatKind::Pdb => Box::new(
                PdbReader::from_stream(stream, config.templates)?.infer_bonds(config.infer_bonds),
            ),
            FormatKind::Xyz => Box::new(XyzReader::from_stream(stream)?),
        };
        info!(format = ?config.format, steps = inner.nsteps(), "Opened trajectory for reading");
        Ok(Self {
            path: config.path,
            format: config.format,
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn nsteps(&self) -> usize {
        self.inner.nsteps()
    }

    pub fn read(&mut self) -> Result<Frame> {
        self.inner.read()
    }

    pub fn read_step(&mut self, step: usize) -> Result<Frame> {
        self.inner.read_step(step)
    }

    /// Warnings recorded since the reader was opened or last drained.
    ///
    /// The log is not cleared between frames. Long reads should drain it
    /// with [`take_warnings`](Self::take_warnings). Past
    /// [`MAX_RETAINED_WARNINGS`](crate::core::io::diagnostics::MAX_RETAINED_WARNINGS)
    /// entries further warnings are only logged through `tracing` and
    /// counted by [`dropped_warnings`](Self::dropped_warnings).
    pub fn warnings(&self) -> &[Warning] {
        self.inner.diagnostics().warnings()
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        self.inner.diagnostics_mut().take()
    }

    pub fn dropped_warnings(&self) -> usize {
        self.inner.diagnostics().dropped()
    }
}

#[derive(Debug)]
enum FormatWriter {
    Pdb(PdbWriter<Sink>),
    Xyz(XyzWriter<Sink>),
}

impl FormatWriter {
    fn frame_writer(&self) -> &dyn FrameWriter {
        match self {
            FormatWriter::Pdb(writer) => writer,
            FormatWriter::Xyz(writer) => writer,
        }
    }

    fn frame_writer_mut(&mut self) -> &mut dyn FrameWriter {
        match self {
            FormatWriter::Pdb(writer) => writer,
            FormatWriter::Xyz(writer) => writer,
        }
    }

    /// Writes trailing records, then the gzip trailer if any.
    fn close(self) -> Result<()> {
        let sink = match self {
            FormatWriter::Pdb(writer) => writer.into_inner()?,
            FormatWriter::Xyz(writer) => writer.into_inner()?,
        };
        sink.finish()?;
        Ok(())
    }
}

/// Sequential writer over a trajectory file.
///
/// Dropping the writer finishes the file on a best-effort basis; call
/// [`close`](Self::close) to observe errors.
#[derive(Debug)]
pub struct Writer {
    path: PathBuf,
    format: FormatKind,
    mode: Mode,
    inner: Option<FormatWriter>,
}

impl Writer {
    /// Creates (truncating) a trajectory file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            TrajectoryConfigBuilder::new()
                .path(path.as_ref())
                .mode(Mode::Write)
                .build()?,
        )
    }

    /// Opens the file described by `config` for writing or appending.
    ///
    /// In append mode the existing frames are indexed first, so that
    /// [`nsteps`](Self::nsteps) and PDB model numbers continue from them.
    ///
    /// # Errors
    ///
    /// Returns `Mode` if `config.mode` is [`Mode::Read`], and `Io` if the
    /// file cannot be opened or the existing content cannot be read.
    #[instrument(skip_all, name = "open_trajectory_writer", fields(path = %config.path.display(), mode = %config.mode))]
    pub fn open_with(config: TrajectoryConfig) -> Result<Self> {
        let append = match config.mode {
            Mode::Read => {
                return Err(TrajectoryError::Mode {
                    operation: "open a writer for",
                    mode: config.mode,
                });
            }
            Mode::Write => false,
            Mode::Append => true,
        };

        let existing = if append && config.path.exists() {
            existing_frames(&config)?
        } else {
            ExistingFrames::default()
        };
        let ExistingFrames { index, mut offset, terminated } = existing;
        debug!(steps = index.len(), offset, terminated, "Existing frames before writing");

        let mut sink = Sink::create(&config.path, config.compression, append)?;
        if !terminated {
            sink.write_all(b"\n")?;
            offset += 1;
        }
        let inner = match config.format {
            FormatKind::Pdb => FormatWriter::Pdb(PdbWriter::appending(sink, index, offset)),
            FormatKind::Xyz => FormatWriter::Xyz(XyzWriter::appending(sink, index, offset)),
        };
        info!(format = ?config.format, "Opened trajectory for writing");
        Ok(Self {
            path: config.path,
            format: config.format,
            mode: config.mode,
            inner: Some(inner),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn nsteps(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.frame_writer().nsteps())
    }

    pub fn write(&mut self, frame: &Frame) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.frame_writer_mut().write(frame),
            None => Err(TrajectoryError::format("Trajectory writer is already closed")),
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self.inner.as_ref() {
            Some(inner) => inner.frame_writer().diagnostics().warnings(),
            None => &[],
        }
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        self.inner
            .as_mut()
            .map(|inner| inner.frame_writer_mut().diagnostics_mut().take())
            .unwrap_or_default()
    }

    /// Finishes and closes the file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the trailing records or the gzip trailer cannot be
    /// written.
    pub fn close(mut self) -> Result<()> {
        match self.inner.take() {
            Some(inner) => inner.close(),
            None => Ok(()),
        }
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            if let Err(e) = inner.close() {
                error!(path = %self.path.display(), "Failed to finish trajectory: {}", e);
            }
        }
    }
}

/// What an appending writer continues from.
struct ExistingFrames {
    index: StepIndex,
    /// Decompressed length of the file.
    offset: u64,
    /// Whether the file is empty or ends with a line terminator.
    terminated: bool,
}

impl Default for ExistingFrames {
    fn default() -> Self {
        Self {
            index: StepIndex::new(),
            offset: 0,
            terminated: true,
        }
    }
}

/// Indexes the frames already present in the file to append to.
fn existing_frames(config: &TrajectoryConfig) -> Result<ExistingFrames> {
    let mut source = Source::open(&config.path, config.compression)?;
    let offset = source.seek(SeekFrom::End(0))?;
    let terminated = if offset == 0 {
        true
    } else {
        let mut last = [0u8; 1];
        source.seek(SeekFrom::End(-1))?;
        source.read_exact(&mut last)?;
        matches!(last[0], b'\n' | b'\r')
    };
    source.rewind()?;
    let mut stream = LineStream::new(source)?;
    let index = match config.format {
        FormatKind::Pdb => StepIndex::scan(&mut stream, pdb::reader::forward)?,
        FormatKind::Xyz => {
            let mut diagnostics = Diagnostics::new();
            StepIndex::scan(&mut stream, |stream| {
                xyz::reader::forward(stream, &mut diagnostics)
            })?
        }
    };
    Ok(ExistingFrames {
        index,
        offset,
        terminated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::diagnostics::MAX_RETAINED_WARNINGS;
    use crate::core::models::atom::Atom;
    use crate::core::models::cell::UnitCell;
    use nalgebra::Point3;
    use std::fs;
    use tempfile::tempdir;

    fn dimer(shift: f64) -> Frame {
        let mut frame = Frame::new();
        frame.add_atom(Atom::new("H"), Point3::new(shift, 0.0, 0.0));
        frame.add_atom(Atom::new("H"), Point3::new(shift + 0.741, -1.25, 3.5));
        frame.add_bond(0, 1).unwrap();
        frame.cell = UnitCell::orthorhombic(1.0, 1.0, 1.0).unwrap();
        frame
    }

    fn write_all(path: &Path, frames: &[Frame]) {
        let mut writer = Writer::create(path).unwrap();
        for frame in frames {
            writer.write(frame).unwrap();
        }
        assert_eq!(writer.nsteps(), frames.len());
        writer.close().unwrap();
    }

    #[test]
    fn pdb_round_trip_through_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dimer.pdb");
        write_all(&path, &[dimer(0.0), dimer(10.0)]);

        let mut reader = Reader::open(&path).unwrap();
        assert_eq!(reader.format(), FormatKind::Pdb);
        assert_eq!(reader.nsteps(), 2);
        let frame = reader.read_step(1).unwrap();
        assert_eq!(frame.size(), 2);
        let position = frame.positions()[1];
        assert!((position.x - 10.741).abs() < 1e-9);
        assert_eq!((position.y, position.z), (-1.25, 3.5));
        let bonds: Vec<(usize, usize)> = frame.bonds().map(|b| (b.first(), b.second())).collect();
        assert_eq!(bonds, vec![(0, 1)]);
        assert_eq!(frame.cell.angles(), [90.0, 90.0, 90.0]);
    }

    #[test]
    fn gzip_xyz_round_trip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frames.xyz.gz");
        let mut frame = dimer(1.0 / 3.0);
        frame.properties.set("name", "hydrogen");
        write_all(&path, &[frame.clone()]);

        let raw = fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let mut trajectory = open(&path, Mode::Read, Compression::Auto).unwrap();
        assert_eq!(trajectory.nsteps(), 1);
        let back = trajectory.read().unwrap();
        assert_eq!(back.positions(), frame.positions());
        assert_eq!(back.cell, frame.cell);
        assert_eq!(back.properties.get_str("name"), Some("hydrogen"));
        assert_eq!(back.bonds().count(), 0);
    }

    #[test]
    fn append_continues_the_existing_frames() {
        let dir = tempdir().unwrap();
        for name in ["append.pdb", "append.xyz", "append.pdb.gz"] {
            let path = dir.path().join(name);
            write_all(&path, &[dimer(0.0)]);

            let mut trajectory = open(&path, Mode::Append, Compression::Auto).unwrap();
            assert_eq!(trajectory.nsteps(), 1);
            trajectory.write(&dimer(5.0)).unwrap();
            assert_eq!(trajectory.nsteps(), 2);
            trajectory.close().unwrap();

            let mut reader = Reader::open(&path).unwrap();
            assert_eq!(reader.nsteps(), 2, "{}", name);
            assert_eq!(reader.read_step(1).unwrap().positions()[0], Point3::new(5.0, 0.0, 0.0));
        }

        let text = fs::read_to_string(dir.path().join("append.pdb")).unwrap();
        assert!(text.contains("MODEL    2\n"));
    }

    #[test]
    fn append_after_an_unterminated_last_line_starts_a_new_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unterminated.xyz");
        fs::write(&path, "1\ncomment\nH 0 0 0").unwrap();

        let mut frame = Frame::new();
        frame.add_atom(Atom::new("O"), Point3::new(1.0, 2.0, 3.0));
        let mut writer = open(&path, Mode::Append, Compression::None).unwrap();
        writer.write(&frame).unwrap();
        assert_eq!(writer.nsteps(), 2);
        writer.close().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1\ncomment\nH 0 0 0\n1\n\nO 1 2 3\n"
        );
        let mut reader = Reader::open(&path).unwrap();
        assert_eq!(reader.nsteps(), 2);
        assert_eq!(reader.read_step(0).unwrap().positions()[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(reader.read_step(1).unwrap().positions()[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn append_after_an_unterminated_pdb_end_keeps_both_models() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unterminated.pdb");
        write_all(&path, &[dimer(0.0)]);
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.trim_end()).unwrap();

        let mut writer = open(&path, Mode::Append, Compression::Auto).unwrap();
        writer.write(&dimer(5.0)).unwrap();
        writer.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("END\nMODEL    2\n"));
        let mut reader = Reader::open(&path).unwrap();
        assert_eq!(reader.nsteps(), 2);
        assert_eq!(reader.read_step(1).unwrap().positions()[0], Point3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn append_to_a_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.xyz");
        let trajectory = open(&path, Mode::Append, Compression::None).unwrap();
        assert_eq!(trajectory.nsteps(), 0);
        trajectory.close().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn dropping_a_writer_finishes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dropped.pdb");
        {
            let mut writer = Writer::create(&path).unwrap();
            writer.write(&dimer(0.0)).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("ENDMDL\nEND\n"));
    }

    #[test]
    fn operations_on_the_wrong_side_are_mode_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modes.xyz");

        let mut writer = open(&path, Mode::Write, Compression::None).unwrap();
        assert!(matches!(
            writer.read(),
            Err(TrajectoryError::Mode { mode: Mode::Write, .. })
        ));
        writer.write(&dimer(0.0)).unwrap();
        writer.close().unwrap();

        let mut reader = open(&path, Mode::Read, Compression::None).unwrap();
        assert_eq!(reader.mode(), Mode::Read);
        assert!(matches!(
            reader.write(&dimer(0.0)),
            Err(TrajectoryError::Mode { mode: Mode::Read, .. })
        ));

        let config = TrajectoryConfigBuilder::new()
            .path(&path)
            .mode(Mode::Write)
            .build()
            .unwrap();
        assert!(matches!(Reader::open_with(config), Err(TrajectoryError::Mode { .. })));
    }

    #[test]
    fn open_reports_config_and_io_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            open(dir.path().join("frames.dcd"), Mode::Read, Compression::Auto),
            Err(TrajectoryError::Config(_))
        ));
        assert!(matches!(
            open(dir.path().join("missing.pdb"), Mode::Read, Compression::Auto),
            Err(TrajectoryError::Io(_))
        ));
    }

    #[test]
    fn reader_exposes_and_drains_warnings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warn.pdb");
        fs::write(
            &path,
            "HETATM    1  CA  UNK A   1       0.000   0.000   0.000  1.00  0.00           C\n\
             CONECT    1    7\n\
             END\n",
        )
        .unwrap();

        let mut reader = Reader::open(&path).unwrap();
        let frame = reader.read().unwrap();
        assert_eq!(frame.bonds().count(), 0);
        assert_eq!(reader.warnings().len(), 1);
        assert_eq!(reader.take_warnings().len(), 1);
        assert!(reader.warnings().is_empty());
        assert_eq!(reader.dropped_warnings(), 0);
    }

    #[test]
    fn reader_warning_log_is_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noisy.pdb");
        let extra = 5;
        let mut text = "FOOBAR unknown\n".repeat(MAX_RETAINED_WARNINGS + extra);
        text += "END\n";
        fs::write(&path, text).unwrap();

        let mut reader = Reader::open(&path).unwrap();
        reader.read().unwrap();
        assert_eq!(reader.warnings().len(), MAX_RETAINED_WARNINGS);
        assert_eq!(reader.dropped_warnings(), extra);
        reader.take_warnings();
        assert_eq!(reader.dropped_warnings(), 0);
    }

    #[test]
    fn reads_and_writes_run_inside_named_spans() {
        use crate::core::io::diagnostics::tests::Captured;
        use tracing_subscriber::layer::SubscriberExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("spans.pdb");
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(captured.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            write_all(&path, &[dimer(0.0)]);
            let mut reader = Reader::open(&path).unwrap();
            reader.read_step(0).unwrap();
        });

        let output = captured.text();
        assert!(output.contains("open_trajectory_writer{"));
        assert!(output.contains("pdb_write_frame{atoms=2}"));
        assert!(output.contains("open_trajectory_reader{"));
        assert!(output.contains("pdb_read_step{step=0}"));
    }

    #[test]
    fn custom_templates_are_used_for_bond_inference() {
        let dir = tempdir().unwrap();
        let templates = dir.path().join("lig.toml");
        fs::write(&templates, "[LIG]\nbonds = [[\"C1\", \"O1\"]]\n").unwrap();
        let path = dir.path().join("lig.pdb");
        fs::write(
            &path,
            "HETATM    1  C1  LIG A   1       0.000   0.000   0.000  1.00  0.00           C\n\
             HETATM    2  O1  LIG A   1       1.200   0.000   0.000  1.00  0.00           O\n\
             END\n",
        )
        .unwrap();

        let config = TrajectoryConfigBuilder::new()
            .path(&path)
            .templates_path(&templates)
            .build()
            .unwrap();
        let mut reader = Reader::open_with(config).unwrap();
        assert_eq!(reader.read().unwrap().bonds().count(), 1);

        let mut plain = Reader::open(&path).unwrap();
        assert_eq!(plain.read().unwrap().bonds().count(), 0);
    }
}
