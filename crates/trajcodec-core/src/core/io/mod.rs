//! Reading and writing of trajectory file formats.
//!
//! Every format is a pair of types implementing [`traits::FrameReader`] and
//! [`traits::FrameWriter`]. The format-independent pieces live alongside
//! them: the line stream and its compression layer, the step index that maps
//! frame numbers to byte offsets, fixed-column field parsing, and the
//! warning log shared by all readers and writers.

pub mod diagnostics;
pub mod fields;
pub mod index;
pub mod pdb;
pub mod stream;
pub mod traits;
pub mod xyz;
