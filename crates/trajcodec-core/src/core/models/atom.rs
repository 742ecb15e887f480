use super::property::Properties;

/// Represents a single atom of a [`Frame`](super::frame::Frame).
///
/// The position is not stored here: frames keep positions in a parallel
/// vector so that geometry can be processed without touching the atom
/// metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "O5'").
    pub name: String,
    /// The element symbol or atom type. Defaults to the atom name.
    pub element: String,
    /// Free-form properties such as the PDB alternate location (`altloc`).
    pub properties: Properties,
}

impl Atom {
    /// Creates a new atom whose element is initialised from its name.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            element: name.to_string(),
            properties: Properties::new(),
        }
    }

    /// Creates a new atom with an explicit element symbol.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The element symbol or atom type.
    pub fn with_element(name: &str, element: &str) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            properties: Properties::new(),
        }
    }
}
