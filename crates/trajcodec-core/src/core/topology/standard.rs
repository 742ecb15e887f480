//! Built-in connectivity tables for the standard PDB residues.
//!
//! Atom names follow the wwPDB chemical component dictionary. Terminal atoms
//! (`H1`-`H3`, `OXT`, `OP3`, `HO5'`, ...) are listed so that they are bonded
//! when present; their absence is expected and not reported.

use phf::{Map, phf_map};

pub type BondTable = &'static [(&'static str, &'static str)];

#[rustfmt::skip]
pub(crate) static STANDARD_TEMPLATES: Map<&'static str, BondTable> = phf_map! {
    "ALA" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "HB1"), ("CB", "HB2"),
        ("CB", "HB3"),
    ],
    "ARG" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD"),
        ("CD", "NE"), ("NE", "CZ"), ("CZ", "NH1"), ("CZ", "NH2"), ("CB", "HB2"), ("CB", "HB3"),
        ("CG", "HG2"), ("CG", "HG3"), ("CD", "HD2"), ("CD", "HD3"), ("NE", "HE"), ("NH1", "HH11"),
        ("NH1", "HH12"), ("NH2", "HH21"), ("NH2", "HH22"),
    ],
    "ASN" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "OD1"),
        ("CG", "ND2"), ("CB", "HB2"), ("CB", "HB3"), ("ND2", "HD21"), ("ND2", "HD22"),
    ],
    "ASP" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "OD1"),
        ("CG", "OD2"), ("CB", "HB2"), ("CB", "HB3"), ("OD2", "HD2"),
    ],
    "CYS" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "SG"), ("CB", "HB2"),
        ("CB", "HB3"), ("SG", "HG"),
    ],
    "CYX" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "SG"), ("CB", "HB2"),
        ("CB", "HB3"),
    ],
    "GLN" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD"),
        ("CD", "OE1"), ("CD", "NE2"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG2"), ("CG", "HG3"),
        ("NE2", "HE21"), ("NE2", "HE22"),
    ],
    "GLU" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD"),
        ("CD", "OE1"), ("CD", "OE2"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG2"), ("CG", "HG3"),
        ("OE2", "HE2"),
    ],
    "GLY" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA2"),
        ("CA", "HA3"), ("CA", "C"), ("C", "O"), ("C", "OXT"), ("OXT", "HXT"),
    ],
    "HID" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HIE" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HIP" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HIS" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HSD" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HSE" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "HSP" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "ND1"),
        ("CG", "CD2"), ("ND1", "CE1"), ("CD2", "NE2"), ("CE1", "NE2"), ("CB", "HB2"),
        ("CB", "HB3"), ("ND1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("NE2", "HE2"),
    ],
    "ILE" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG1"), ("CB", "CG2"),
        ("CG1", "CD1"), ("CB", "HB"), ("CG1", "HG12"), ("CG1", "HG13"), ("CG2", "HG21"),
        ("CG2", "HG22"), ("CG2", "HG23"), ("CD1", "HD11"), ("CD1", "HD12"), ("CD1", "HD13"),
    ],
    "LEU" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD1"),
        ("CG", "CD2"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG"), ("CD1", "HD11"),
        ("CD1", "HD12"), ("CD1", "HD13"), ("CD2", "HD21"), ("CD2", "HD22"), ("CD2", "HD23"),
    ],
    "LYS" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD"),
        ("CD", "CE"), ("CE", "NZ"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG2"), ("CG", "HG3"),
        ("CD", "HD2"), ("CD", "HD3"), ("CE", "HE2"), ("CE", "HE3"), ("NZ", "HZ1"), ("NZ", "HZ2"),
        ("NZ", "HZ3"),
    ],
    "MET" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "SD"),
        ("SD", "CE"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG2"), ("CG", "HG3"), ("CE", "HE1"),
        ("CE", "HE2"), ("CE", "HE3"),
    ],
    "PHE" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD1"),
        ("CG", "CD2"), ("CD1", "CE1"), ("CD2", "CE2"), ("CE1", "CZ"), ("CE2", "CZ"), ("CB", "HB2"),
        ("CB", "HB3"), ("CD1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"), ("CE2", "HE2"),
        ("CZ", "HZ"),
    ],
    "PRO" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD"),
        ("CD", "N"), ("CB", "HB2"), ("CB", "HB3"), ("CG", "HG2"), ("CG", "HG3"), ("CD", "HD2"),
        ("CD", "HD3"),
    ],
    "SER" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "OG"), ("CB", "HB2"),
        ("CB", "HB3"), ("OG", "HG"),
    ],
    "THR" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "OG1"), ("CB", "CG2"),
        ("CB", "HB"), ("OG1", "HG1"), ("CG2", "HG21"), ("CG2", "HG22"), ("CG2", "HG23"),
    ],
    "TRP" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD1"),
        ("CG", "CD2"), ("CD1", "NE1"), ("NE1", "CE2"), ("CD2", "CE2"), ("CD2", "CE3"),
        ("CE2", "CZ2"), ("CE3", "CZ3"), ("CZ2", "CH2"), ("CZ3", "CH2"), ("CB", "HB2"),
        ("CB", "HB3"), ("CD1", "HD1"), ("NE1", "HE1"), ("CE3", "HE3"), ("CZ2", "HZ2"),
        ("CZ3", "HZ3"), ("CH2", "HH2"),
    ],
    "TYR" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG"), ("CG", "CD1"),
        ("CG", "CD2"), ("CD1", "CE1"), ("CD2", "CE2"), ("CE1", "CZ"), ("CE2", "CZ"), ("CZ", "OH"),
        ("CB", "HB2"), ("CB", "HB3"), ("CD1", "HD1"), ("CD2", "HD2"), ("CE1", "HE1"),
        ("CE2", "HE2"), ("OH", "HH"),
    ],
    "VAL" => &[
        ("N", "H"), ("N", "H1"), ("N", "H2"), ("N", "H3"), ("N", "CA"), ("CA", "HA"), ("CA", "C"),
        ("C", "O"), ("C", "OXT"), ("OXT", "HXT"), ("CA", "CB"), ("CB", "CG1"), ("CB", "CG2"),
        ("CB", "HB"), ("CG1", "HG11"), ("CG1", "HG12"), ("CG1", "HG13"), ("CG2", "HG21"),
        ("CG2", "HG22"), ("CG2", "HG23"),
    ],
    "DA" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "C1'"),
        ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"), ("C5'", "H5''"),
        ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("C2'", "H2''"), ("C1'", "H1'"),
        ("O3'", "HO3'"), ("C1'", "N9"), ("N9", "C8"), ("C8", "N7"), ("N7", "C5"), ("C5", "C6"),
        ("C6", "N6"), ("C6", "N1"), ("N1", "C2"), ("C2", "N3"), ("N3", "C4"), ("C4", "C5"),
        ("C4", "N9"), ("C8", "H8"), ("N6", "H61"), ("N6", "H62"), ("C2", "H2"),
    ],
    "DG" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "C1'"),
        ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"), ("C5'", "H5''"),
        ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("C2'", "H2''"), ("C1'", "H1'"),
        ("O3'", "HO3'"), ("C1'", "N9"), ("N9", "C8"), ("C8", "N7"), ("N7", "C5"), ("C5", "C6"),
        ("C6", "O6"), ("C6", "N1"), ("N1", "C2"), ("C2", "N2"), ("C2", "N3"), ("N3", "C4"),
        ("C4", "C5"), ("C4", "N9"), ("C8", "H8"), ("N1", "H1"), ("N2", "H21"), ("N2", "H22"),
    ],
    "DC" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "C1'"),
        ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"), ("C5'", "H5''"),
        ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("C2'", "H2''"), ("C1'", "H1'"),
        ("O3'", "HO3'"), ("C1'", "N1"), ("N1", "C2"), ("C2", "O2"), ("C2", "N3"), ("N3", "C4"),
        ("C4", "N4"), ("C4", "C5"), ("C5", "C6"), ("C6", "N1"), ("N4", "H41"), ("N4", "H42"),
        ("C5", "H5"), ("C6", "H6"),
    ],
    "DT" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "C1'"),
        ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"), ("C5'", "H5''"),
        ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("C2'", "H2''"), ("C1'", "H1'"),
        ("O3'", "HO3'"), ("C1'", "N1"), ("N1", "C2"), ("C2", "O2"), ("C2", "N3"), ("N3", "C4"),
        ("C4", "O4"), ("C4", "C5"), ("C5", "C7"), ("C5", "C6"), ("C6", "N1"), ("N3", "H3"),
        ("C7", "H71"), ("C7", "H72"), ("C7", "H73"), ("C6", "H6"),
    ],
    "A" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "O2'"),
        ("C2'", "C1'"), ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"),
        ("C5'", "H5''"), ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("O2'", "HO2'"),
        ("C1'", "H1'"), ("O3'", "HO3'"), ("C1'", "N9"), ("N9", "C8"), ("C8", "N7"), ("N7", "C5"),
        ("C5", "C6"), ("C6", "N6"), ("C6", "N1"), ("N1", "C2"), ("C2", "N3"), ("N3", "C4"),
        ("C4", "C5"), ("C4", "N9"), ("C8", "H8"), ("N6", "H61"), ("N6", "H62"), ("C2", "H2"),
    ],
    "G" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "O2'"),
        ("C2'", "C1'"), ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"),
        ("C5'", "H5''"), ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("O2'", "HO2'"),
        ("C1'", "H1'"), ("O3'", "HO3'"), ("C1'", "N9"), ("N9", "C8"), ("C8", "N7"), ("N7", "C5"),
        ("C5", "C6"), ("C6", "O6"), ("C6", "N1"), ("N1", "C2"), ("C2", "N2"), ("C2", "N3"),
        ("N3", "C4"), ("C4", "C5"), ("C4", "N9"), ("C8", "H8"), ("N1", "H1"), ("N2", "H21"),
        ("N2", "H22"),
    ],
    "C" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "O2'"),
        ("C2'", "C1'"), ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"),
        ("C5'", "H5''"), ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("O2'", "HO2'"),
        ("C1'", "H1'"), ("O3'", "HO3'"), ("C1'", "N1"), ("N1", "C2"), ("C2", "O2"), ("C2", "N3"),
        ("N3", "C4"), ("C4", "N4"), ("C4", "C5"), ("C5", "C6"), ("C6", "N1"), ("N4", "H41"),
        ("N4", "H42"), ("C5", "H5"), ("C6", "H6"),
    ],
    "U" => &[
        ("OP3", "P"), ("P", "OP1"), ("P", "OP2"), ("P", "O5'"), ("O5'", "C5'"), ("C5'", "C4'"),
        ("C4'", "O4'"), ("C4'", "C3'"), ("C3'", "O3'"), ("C3'", "C2'"), ("C2'", "O2'"),
        ("C2'", "C1'"), ("O4'", "C1'"), ("HO5'", "O5'"), ("OP3", "HOP3"), ("C5'", "H5'"),
        ("C5'", "H5''"), ("C4'", "H4'"), ("C3'", "H3'"), ("C2'", "H2'"), ("O2'", "HO2'"),
        ("C1'", "H1'"), ("O3'", "HO3'"), ("C1'", "N1"), ("N1", "C2"), ("C2", "O2"), ("C2", "N3"),
        ("N3", "C4"), ("C4", "O4"), ("C4", "C5"), ("C5", "C6"), ("C6", "N1"), ("N3", "H3"),
        ("C5", "H5"), ("C6", "H6"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_amino_acids_variants_and_nucleotides() {
        for name in [
            "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS",
            "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", "HID", "HIE", "HIP", "CYX",
            "DA", "DC", "DG", "DT", "A", "C", "G", "U",
        ] {
            assert!(STANDARD_TEMPLATES.contains_key(name), "missing template for {}", name);
        }
    }

    #[test]
    fn no_table_lists_a_bond_twice_or_a_self_bond() {
        for (name, bonds) in STANDARD_TEMPLATES.entries() {
            let mut seen = HashSet::new();
            for (a, b) in bonds.iter() {
                assert_ne!(a, b, "self bond in {}", name);
                let key = if a < b { (*a, *b) } else { (*b, *a) };
                assert!(seen.insert(key), "duplicate bond {}-{} in {}", a, b, name);
            }
        }
    }

    #[test]
    fn proline_closes_its_ring_on_the_backbone_nitrogen() {
        let bonds = STANDARD_TEMPLATES.get("PRO").unwrap();
        assert!(bonds.contains(&("CD", "N")));
    }

    #[test]
    fn nucleotides_include_the_phosphate_and_5_prime_hydroxyl() {
        for name in ["DA", "U"] {
            let bonds = STANDARD_TEMPLATES.get(name).unwrap();
            assert!(bonds.contains(&("P", "O5'")));
            assert!(bonds.contains(&("HO5'", "O5'")));
        }
        assert!(STANDARD_TEMPLATES.get("A").unwrap().contains(&("C2'", "O2'")));
        assert!(!STANDARD_TEMPLATES.get("DA").unwrap().contains(&("C2'", "O2'")));
    }
}
