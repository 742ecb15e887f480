//! # trajcodec
//!
//! Random-access reading and column-exact writing of molecular trajectories in the
//! PDB and XYZ formats.
//!
//! ## Layout
//!
//! - **[`core`]: The Foundation.** The in-memory frame model, the format readers and
//!   writers, and the residue connectivity templates used to infer bonds.
//!
//! - **[`trajectory`]: The Public API.** Opens a path in read, write or append mode,
//!   picks the format from the extension, and handles gzip compression transparently.
//!
//! - **[`config`]** and **[`error`]** hold the builder for opening trajectories and the
//!   crate-wide error type.
//!
//! ## Example
//!
//! ```no_run
//! use trajcodec::{Compression, Mode, open};
//!
//! # fn main() -> trajcodec::Result<()> {
//! let mut input = open("input.pdb", Mode::Read, Compression::Auto)?;
//! let mut output = open("output.xyz.gz", Mode::Write, Compression::Auto)?;
//! for _ in 0..input.nsteps() {
//!     let frame = input.read()?;
//!     output.write(&frame)?;
//! }
//! output.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! Recoverable problems in the input never abort a read. They are recorded as
//! [`Warning`]s on the reader or writer and emitted through `tracing`.

pub mod config;
pub mod core;
pub mod error;
pub mod trajectory;

pub use config::{ConfigError, FormatKind, Mode, TrajectoryConfig, TrajectoryConfigBuilder};
pub use crate::core::io::diagnostics::{Warning, WarningKind};
pub use crate::core::io::stream::Compression;
pub use crate::core::models::frame::Frame;
pub use error::{Result, TrajectoryError};
pub use trajectory::{Reader, Trajectory, Writer, open};
