//! XYZ format, including the extended XYZ comment line.
//!
//! A frame is an atom count line, a comment line, and one `name x y z` line
//! per atom.

pub mod extended;
pub mod reader;
pub mod writer;

pub use reader::XyzReader;
pub use writer::XyzWriter;
