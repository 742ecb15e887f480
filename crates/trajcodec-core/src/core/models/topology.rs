use super::residue::Residue;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Atom index {index} is out of range for a frame with {atom_count} atoms")]
    OutOfRangeReference { index: usize, atom_count: usize },
    #[error("Cannot bond atom {0} to itself")]
    SelfBond(usize),
    #[error("Atom {atom} already belongs to residue {residue}")]
    AtomInMultipleResidues { atom: usize, residue: usize },
    #[error("Invalid unit cell: {0}")]
    InvalidCell(String),
}

/// An unordered pair of atom indices, stored with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bond {
    i: usize,
    j: usize,
}

impl Bond {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { i: a, j: b }
        } else {
            Self { i: b, j: a }
        }
    }

    pub fn first(&self) -> usize {
        self.i
    }

    pub fn second(&self) -> usize {
        self.j
    }

    pub fn contains(&self, index: usize) -> bool {
        self.i == index || self.j == index
    }
}

/// Connectivity and residue membership for the atoms of a frame.
///
/// The topology never stores atoms itself. Every index refers to the parent
/// frame, which is responsible for range checks against its atom count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    bonds: BTreeSet<Bond>,
    residues: Vec<Residue>,
    atom_residue: HashMap<usize, usize>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bond. Returns `false` when the bond was already present.
    pub(crate) fn insert_bond(&mut self, bond: Bond) -> bool {
        self.bonds.insert(bond)
    }

    pub fn remove_bond(&mut self, a: usize, b: usize) -> bool {
        self.bonds.remove(&Bond::new(a, b))
    }

    pub fn contains_bond(&self, a: usize, b: usize) -> bool {
        self.bonds.contains(&Bond::new(a, b))
    }

    /// Bonds in increasing `(first, second)` order.
    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.iter()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Indices bonded to `index`, in increasing order.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.bonds
            .iter()
            .filter(|bond| bond.contains(index))
            .map(|bond| if bond.i == index { bond.j } else { bond.i })
            .collect()
    }

    /// Appends a residue to the topology.
    ///
    /// # Arguments
    ///
    /// * `residue` - The residue to add. Its atom indices must not already
    ///   belong to another residue of this topology.
    ///
    /// # Return
    ///
    /// Returns the position of the new residue in [`residues`](Self::residues).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AtomInMultipleResidues`] if one of the atoms is
    /// already a member of another residue. The topology is left unchanged.
    pub fn add_residue(&mut self, residue: Residue) -> Result<usize, ModelError> {
        if let Some((atom, existing)) = residue
            .atoms()
            .find_map(|atom| self.atom_residue.get(&atom).map(|r| (atom, *r)))
        {
            return Err(ModelError::AtomInMultipleResidues {
                atom,
                residue: existing,
            });
        }
        let position = self.residues.len();
        for atom in residue.atoms() {
            self.atom_residue.insert(atom, position);
        }
        self.residues.push(residue);
        Ok(position)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, position: usize) -> Option<&Residue> {
        self.residues.get(position)
    }

    pub fn residue_for_atom(&self, index: usize) -> Option<&Residue> {
        self.atom_residue
            .get(&index)
            .and_then(|position| self.residues.get(*position))
    }

    pub fn clear(&mut self) {
        self.bonds.clear();
        self.residues.clear();
        self.atom_residue.clear();
    }
}
