use super::diagnostics::Diagnostics;
use crate::core::models::frame::Frame;
use crate::error::Result;

/// Random-access reading of the frames of one trajectory file.
///
/// Implementors build their step index once at construction and then seek
/// directly to any frame.
pub trait FrameReader {
    /// Returns the number of frames found when the file was opened.
    fn nsteps(&self) -> usize;

    /// Reads the frame at index `step`.
    ///
    /// # Arguments
    ///
    /// * `step` - The zero-based frame index.
    ///
    /// # Return
    ///
    /// Returns the parsed frame, with `Frame::step` set to `step`.
    ///
    /// # Errors
    ///
    /// Returns `StepOutOfRange` if `step >= nsteps()`, `Format` if the frame
    /// is malformed, and `Io` if the underlying stream fails.
    fn read_step(&mut self, step: usize) -> Result<Frame>;

    /// Reads the frame following the last one read.
    ///
    /// # Errors
    ///
    /// Returns `StepOutOfRange` once every frame has been read, and the same
    /// errors as [`read_step`](Self::read_step) otherwise.
    fn read(&mut self) -> Result<Frame>;

    /// Returns the warnings recorded so far.
    fn diagnostics(&self) -> &Diagnostics;

    /// Returns the warning log for draining.
    fn diagnostics_mut(&mut self) -> &mut Diagnostics;

    /// Reads every frame in order.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first error met.
    fn read_all(&mut self) -> Result<Vec<Frame>> {
        (0..self.nsteps()).map(|step| self.read_step(step)).collect()
    }
}

/// Sequential writing of frames to one trajectory file.
pub trait FrameWriter {
    /// Returns the number of frames in the file, including frames that were
    /// already present when it was opened for appending.
    fn nsteps(&self) -> usize;

    /// Serializes and writes one frame.
    ///
    /// # Errors
    ///
    /// Returns `ValueTooLarge` if a value cannot be represented in its
    /// column, and `Io` if writing fails. Nothing is written on error.
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Writes any trailing records and flushes the output. Calling it more
    /// than once has no further effect.
    ///
    /// # Errors
    ///
    /// Returns `Io` if writing or flushing fails.
    fn finish(&mut self) -> Result<()>;

    fn diagnostics(&self) -> &Diagnostics;

    fn diagnostics_mut(&mut self) -> &mut Diagnostics;
}
