use super::extended::format_comment;
use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::io::index::StepIndex;
use crate::core::io::traits::FrameWriter;
use crate::core::models::frame::Frame;
use crate::error::{Result, TrajectoryError};
use std::io::Write;
use tracing::{debug, instrument};

/// Writes frames as consecutive XYZ blocks.
///
/// Coordinates use the shortest representation that parses back to the same
/// `f64`, so a written frame reads back exactly.
#[derive(Debug)]
pub struct XyzWriter<W: Write> {
    inner: W,
    index: StepIndex,
    offset: u64,
    finished: bool,
    diagnostics: Diagnostics,
}

impl<W: Write> XyzWriter<W> {
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
            finished: false,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn index(&self) -> &StepIndex {
        &self.index
    }

    /// Flushes the output and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        Ok(self.inner)
    }

    fn format_frame(&mut self, frame: &Frame) -> Result<String> {
        let mut out = format!("{}\n{}\n", frame.size(), format_comment(frame));
        for (atom, position) in frame.atoms().iter().zip(frame.positions()) {
            if let Some(bad) = position.iter().find(|value| !value.is_finite()) {
                return Err(TrajectoryError::ValueTooLarge {
                    context: "atomic positions",
                    value: bad.to_string(),
                    format: "{}",
                });
            }
            let name = if atom.name.is_empty() {
                "X".to_string()
            } else if atom.name.contains(char::is_whitespace) {
                self.diagnostics.warn(
                    WarningKind::Truncated,
                    format!("Atom name '{}' contains whitespace, replacing it with '_'", atom.name),
                );
                atom.name.replace(char::is_whitespace, "_")
            } else {
                atom.name.clone()
            };
            out += &format!("{} {} {} {}\n", name, position.x, position.y, position.z);
        }
        Ok(out)
    }
}

impl<W: Write> FrameWriter for XyzWriter<W> {
    fn nsteps(&self) -> usize {
        self.index.len()
    }

    #[instrument(level = "debug", skip_all, name = "xyz_write_frame", fields(atoms = frame.size()))]
    fn write(&mut self, frame: &Frame) -> Result<()> {
        let text = self.format_frame(frame)?;
        self.inner.write_all(text.as_bytes())?;
        self.index.push(self.offset);
        self.offset += text.len() as u64;
        debug!(step = self.index.len() - 1, "Wrote XYZ frame");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.finished {
            self.finished = true;
            self.inner.flush()?;
        }
        Ok(())
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}
