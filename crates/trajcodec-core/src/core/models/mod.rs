//! # Core Models Module
//!
//! In-memory representation of one trajectory frame.
//!
//! ## Key Components
//!
//! - [`frame`] - A snapshot: atoms, positions, topology, unit cell and properties
//! - [`atom`] - Atom name, element and free-form properties
//! - [`residue`] - Residue name, id and member atom indices
//! - [`topology`] - Bonds and residue membership, plus the model error type
//! - [`cell`] - Periodic unit cell and its lattice matrix
//! - [`property`] - Typed string/bool/double values keyed by name
//!
//! ## Usage
//!
//! ```ignore
//! use trajcodec::core::models::{atom::Atom, frame::Frame};
//! use nalgebra::Point3;
//!
//! let mut frame = Frame::new();
//! let o = frame.add_atom(Atom::new("O"), Point3::origin());
//! let h = frame.add_atom(Atom::new("H"), Point3::new(0.96, 0.0, 0.0));
//! frame.add_bond(o, h)?;
//! ```

pub mod atom;
pub mod cell;
pub mod frame;
pub mod property;
pub mod residue;
pub mod topology;
