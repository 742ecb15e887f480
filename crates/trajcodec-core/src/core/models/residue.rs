use super::property::Properties;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,              // Name of the residue (e.g., "ALA", "DG")
    pub id: Option<i64>,           // Residue sequence number from source file
    atoms: BTreeSet<usize>,        // Indices of the atoms in the parent frame
    pub properties: Properties,    // chainid, insertion_code, is_standard_pdb, ...
}

impl Residue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            atoms: BTreeSet::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_id(name: &str, id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name)
        }
    }

    pub fn add_atom(&mut self, index: usize) {
        self.atoms.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.atoms.contains(&index)
    }

    /// Atom indices in increasing order.
    pub fn atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.iter().copied()
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.properties.get_str("chainid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::with_id("GLY", 10);
        assert_eq!(residue.id, Some(10));
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.size(), 0);
        assert!(residue.chain_id().is_none());
    }

    #[test]
    fn add_atom_keeps_indices_sorted_and_unique() {
        let mut residue = Residue::new("ALA");
        residue.add_atom(7);
        residue.add_atom(3);
        residue.add_atom(7);
        assert_eq!(residue.atoms().collect::<Vec<_>>(), vec![3, 7]);
        assert!(residue.contains(3));
        assert!(!residue.contains(4));
    }

    #[test]
    fn chain_id_reads_the_chainid_property() {
        let mut residue = Residue::with_id("SER", 1);
        residue.properties.set("chainid", "B");
        assert_eq!(residue.chain_id(), Some("B"));
    }
}
