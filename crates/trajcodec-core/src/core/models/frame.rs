use super::atom::Atom;
use super::cell::UnitCell;
use super::property::Properties;
use super::residue::Residue;
use super::topology::{Bond, ModelError, Topology};
use nalgebra::Point3;

/// A single molecular snapshot: atoms with their positions, connectivity,
/// residues, the periodic cell and free-form frame properties.
///
/// Atoms and positions are parallel vectors and always have the same length.
/// Every atom index held by the topology is smaller than [`size`](Self::size).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    atoms: Vec<Atom>,
    positions: Vec<Point3<f64>>,
    topology: Topology,
    pub cell: UnitCell,
    pub properties: Properties,
    pub step: usize,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom at the given position.
    ///
    /// # Return
    ///
    /// Returns the index of the new atom.
    pub fn add_atom(&mut self, atom: Atom, position: Point3<f64>) -> usize {
        self.atoms.push(atom);
        self.positions.push(position);
        self.atoms.len() - 1
    }

    /// Adds a bond between atoms `a` and `b`.
    ///
    /// Adding a bond that already exists is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfRangeReference`] if either index is not a
    /// valid atom index and [`ModelError::SelfBond`] if `a == b`.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Result<(), ModelError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(ModelError::SelfBond(a));
        }
        self.topology.insert_bond(Bond::new(a, b));
        Ok(())
    }

    pub fn remove_bond(&mut self, a: usize, b: usize) -> bool {
        self.topology.remove_bond(a, b)
    }

    /// Attaches a residue to the topology after checking its atom indices.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfRangeReference`] for an unknown atom index
    /// and [`ModelError::AtomInMultipleResidues`] if an atom already belongs
    /// to another residue.
    pub fn add_residue(&mut self, residue: Residue) -> Result<usize, ModelError> {
        for atom in residue.atoms() {
            self.check_index(atom)?;
        }
        self.topology.add_residue(residue)
    }

    fn check_index(&self, index: usize) -> Result<(), ModelError> {
        if index < self.atoms.len() {
            Ok(())
        } else {
            Err(ModelError::OutOfRangeReference {
                index,
                atom_count: self.atoms.len(),
            })
        }
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.topology.bonds()
    }

    pub fn residues(&self) -> &[Residue] {
        self.topology.residues()
    }

    /// Empties the frame, keeping allocated capacity for the next read.
    pub fn clear(&mut self) {
        self.atoms.clear();
        self.positions.clear();
        self.topology.clear();
        self.cell = UnitCell::infinite();
        self.properties.clear();
        self.step = 0;
    }
}
