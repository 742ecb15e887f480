//! Protein Data Bank format.
//!
//! Records are fixed-width lines identified by their first six characters.
//! Only the records needed to rebuild a frame are interpreted; every other
//! record is either explicitly ignored or reported as unknown.

pub mod offsets;
pub mod reader;
pub mod record;
pub mod secondary;
pub mod writer;

pub use reader::PdbReader;
pub use writer::PdbWriter;
