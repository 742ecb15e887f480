//! # Topology Module
//!
//! Reconstruction of chemical bonds that trajectory files leave implicit.
//!
//! ## Key Components
//!
//! - [`templates`] - Residue connectivity registry, built-in or loaded from TOML
//! - [`standard`] - Built-in bond tables for amino acids and nucleotides
//! - [`connectivity`] - Applies templates and polymer links to a frame
//!
//! ## Usage
//!
//! ```ignore
//! use trajcodec::core::topology::connectivity::link_standard_residue_bonds;
//! use trajcodec::core::topology::templates::ConnectivityRegistry;
//!
//! let registry = ConnectivityRegistry::standard();
//! link_standard_residue_bonds(&mut frame, &registry, &mut diagnostics)?;
//! ```

pub mod connectivity;
pub(crate) mod standard;
pub mod templates;
