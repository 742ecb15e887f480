use super::templates::ConnectivityRegistry;
use crate::core::io::diagnostics::{Diagnostics, WarningKind};
use crate::core::models::frame::Frame;
use crate::core::models::topology::ModelError;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// End of the previous residue that a polymer link may continue from.
struct LinkAnchor<'a> {
    chain: &'a str,
    id: i64,
    atom: usize,
}

impl LinkAnchor<'_> {
    fn continues_into(&self, chain: &str, id: i64) -> bool {
        self.chain == chain && self.id.checked_add(1) == Some(id)
    }
}

/// Atoms whose absence from a residue is normal: hydrogens, the terminal
/// carboxyl oxygen and the 5' phosphate group.
fn is_expected_missing(name: &str) -> bool {
    name.starts_with('H') || name == "OXT" || name.starts_with('P') || name.starts_with("OP")
}

/// Adds the bonds implied by residue templates to `frame`.
///
/// Residues are visited in topology order. For every residue with a known
/// template the listed intra-residue bonds are added between the atoms that
/// are present. Two polymer links are tracked independently: the peptide
/// bond `C(i)`-`N(i+1)` and the phosphodiester bond `O3'(i)`-`P(i+1)`, both
/// requiring the same chain and consecutive residue ids.
///
/// # Arguments
///
/// * `frame` - The frame whose residues are already attached.
/// * `registry` - The templates to apply.
/// * `diagnostics` - Receives one warning per unexpected missing atom and
///   per templated residue without an id.
///
/// # Errors
///
/// Returns a [`ModelError`] only if a residue references an atom outside the
/// frame, which a frame built through its public API cannot do.
pub fn link_standard_residue_bonds(
    frame: &mut Frame,
    registry: &ConnectivityRegistry,
    diagnostics: &mut Diagnostics,
) -> Result<(), ModelError> {
    let mut bonds = Vec::new();
    {
        let atoms = frame.atoms();
        let mut peptide: Option<LinkAnchor> = None;
        let mut nucleic: Option<LinkAnchor> = None;

        for residue in frame.residues() {
            let Some(template) = registry.get(&residue.name) else {
                continue;
            };
            let Some(id) = residue.id else {
                diagnostics.warn(
                    WarningKind::InvalidBond,
                    format!("Residue '{}' has no id, skipping its connectivity", residue.name),
                );
                continue;
            };
            let chain = residue.chain_id().unwrap_or("");

            let mut by_name = HashMap::new();
            for index in residue.atoms() {
                let atom = atoms.get(index).ok_or(ModelError::OutOfRangeReference {
                    index,
                    atom_count: atoms.len(),
                })?;
                by_name.entry(atom.name.as_str()).or_insert(index);
            }

            if let (Some(previous), Some(&n)) = (&peptide, by_name.get("N")) {
                if previous.continues_into(chain, id) {
                    bonds.push((previous.atom, n));
                }
            }
            peptide = by_name.get("C").map(|&atom| LinkAnchor { chain, id, atom });

            if let (Some(previous), Some(&p)) = (&nucleic, by_name.get("P")) {
                if previous.continues_into(chain, id) {
                    bonds.push((previous.atom, p));
                }
            }
            nucleic = by_name.get("O3'").map(|&atom| LinkAnchor { chain, id, atom });

            let mut reported = BTreeSet::new();
            for [a, b] in &template.bonds {
                match (by_name.get(a.as_str()), by_name.get(b.as_str())) {
                    (Some(&i), Some(&j)) if i != j => bonds.push((i, j)),
                    (Some(_), Some(_)) => {}
                    (first, second) => {
                        for (name, found) in [(a, first), (b, second)] {
                            if found.is_none()
                                && !is_expected_missing(name)
                                && reported.insert(name.as_str())
                            {
                                diagnostics.warn(
                                    WarningKind::MissingTemplateAtom,
                                    format!(
                                        "Atom '{}' is missing from residue {} {} (chain '{}')",
                                        name, residue.name, id, chain
                                    ),
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    debug!(count = bonds.len(), "Inferred template bonds");
    for (a, b) in bonds {
        frame.add_bond(a, b)?;
    }
    Ok(())
}
