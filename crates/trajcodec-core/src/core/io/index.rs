use super::stream::LineStream;
use crate::error::Result;
use std::io::{BufRead, Seek};
use tracing::debug;

/// Byte offsets of the frames of a trajectory, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepIndex {
    offsets: Vec<u64>,
}

impl StepIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the whole stream once, recording the offset at which every
    /// complete frame starts, then rewinds the stream.
    ///
    /// # Arguments
    ///
    /// * `stream` - The stream to scan, positioned at its start.
    /// * `forward` - Skips one frame and returns `true`, or returns `false`
    ///   when no further complete frame could be found.
    ///
    /// # Errors
    ///
    /// Propagates any error from `forward` or from rewinding the stream.
    pub fn scan<R, F>(stream: &mut LineStream<R>, mut forward: F) -> Result<Self>
    where
        R: BufRead + Seek,
        F: FnMut(&mut LineStream<R>) -> Result<bool>,
    {
        let mut index = Self::new();
        loop {
            let offset = stream.tell();
            if !forward(stream)? {
                break;
            }
            index.push(offset);
        }
        stream.rewind()?;
        debug!(steps = index.len(), "Built trajectory step index");
        Ok(index)
    }

    /// Like [`scan`](Self::scan), but an index with no frame is replaced by a
    /// single frame at offset 0, so files without terminators still expose
    /// one step.
    pub fn build<R, F>(stream: &mut LineStream<R>, forward: F) -> Result<Self>
    where
        R: BufRead + Seek,
        F: FnMut(&mut LineStream<R>) -> Result<bool>,
    {
        let mut index = Self::scan(stream, forward)?;
        if index.is_empty() {
            index.push(0);
        }
        Ok(index)
    }

    pub fn push(&mut self, offset: u64) {
        self.offsets.push(offset);
    }

    pub fn get(&self, step: usize) -> Option<u64> {
        self.offsets.get(step).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}
