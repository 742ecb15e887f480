//! # Core Module
//!
//! The building blocks of the crate.
//!
//! - **Frame model** ([`models`]) - Atoms, positions, residues, bonds, unit cell and
//!   free-form properties of a single trajectory step.
//! - **File I/O** ([`io`]) - Line streaming, step indexing, and the PDB and XYZ
//!   readers and writers.
//! - **Connectivity** ([`topology`]) - Residue bond templates and the inference of
//!   intra- and inter-residue bonds from them.

pub mod io;
pub mod models;
pub mod topology;
