use phf::{Set, phf_set};

/// The record types the PDB reader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Title,
    Cryst1,
    Atom,
    Hetatm,
    Conect,
    Model,
    Endmdl,
    End,
    Ter,
    Helix,
    Sheet,
    Turn,
    /// A known record the reader deliberately skips.
    Ignored,
    /// Anything else. Reported by the reader, never fatal.
    Unknown,
}

#[rustfmt::skip]
static IGNORED_RECORDS: Set<&'static str> = phf_set! {
    "REMARK", "MASTER", "AUTHOR", "CAVEAT", "COMPND", "EXPDTA", "KEYWDS",
    "OBSLTE", "SOURCE", "SPLIT ", "SPRSDE", "JRNL  ", "SEQRES", "HET   ",
    "REVDAT", "SCALE1", "SCALE2", "SCALE3", "ORIGX1", "ORIGX2", "ORIGX3",
    "ANISOU", "SITE  ", "FORMUL", "DBREF ", "HETNAM", "HETSYN", "SEQADV",
    "MODRES", "LINK  ", "SSBOND", "CISPEP", "SIGATM", "SIGUIJ", "DBREF1",
    "DBREF2", "NUMMDL", "MDLTYP",
};

/// Classifies a line by its six-character record name.
///
/// Lines shorter than six characters are padded with spaces first, so a bare
/// `TER` or `END` is still recognised. Whitespace-only lines are ignored.
pub fn classify(line: &str) -> RecordKind {
    let mut prefix = [b' '; 6];
    for (slot, byte) in prefix.iter_mut().zip(line.bytes()) {
        *slot = byte;
    }

    match &prefix {
        b"ENDMDL" => return RecordKind::Endmdl,
        [b'E', b'N', b'D', ..] => return RecordKind::End,
        _ => {}
    }

    match &prefix {
        b"ATOM  " => RecordKind::Atom,
        b"HETATM" => RecordKind::Hetatm,
        b"CONECT" => RecordKind::Conect,
        b"CRYST1" => RecordKind::Cryst1,
        b"MODEL " => RecordKind::Model,
        b"TER   " => RecordKind::Ter,
        b"HEADER" => RecordKind::Header,
        b"TITLE " => RecordKind::Title,
        b"HELIX " => RecordKind::Helix,
        b"SHEET " => RecordKind::Sheet,
        b"TURN  " => RecordKind::Turn,
        b"      " if line.trim().is_empty() => RecordKind::Ignored,
        _ => match std::str::from_utf8(&prefix) {
            Ok(name) if IGNORED_RECORDS.contains(name) => RecordKind::Ignored,
            _ => RecordKind::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_records_are_recognised() {
        assert_eq!(classify("ATOM      1  N   MET A   1"), RecordKind::Atom);
        assert_eq!(classify("HETATM    2  O   HOH A   2"), RecordKind::Hetatm);
        assert_eq!(classify("CONECT    1    2"), RecordKind::Conect);
        assert_eq!(classify("CRYST1   10.000   10.000   10.000"), RecordKind::Cryst1);
        assert_eq!(classify("HEADER    HYDROLASE"), RecordKind::Header);
        assert_eq!(classify("TITLE     LYSOZYME"), RecordKind::Title);
        assert_eq!(classify("HELIX    1   1 GLY A    1"), RecordKind::Helix);
        assert_eq!(classify("SHEET    1   A 2 THR A   2"), RecordKind::Sheet);
        assert_eq!(classify("TURN     1 T1 GLY A   1"), RecordKind::Turn);
    }

    #[test]
    fn endmdl_wins_over_the_end_prefix() {
        assert_eq!(classify("ENDMDL"), RecordKind::Endmdl);
        assert_eq!(classify("END"), RecordKind::End);
        assert_eq!(classify("END   "), RecordKind::End);
        assert_eq!(classify("ENDXYZ"), RecordKind::End);
    }

    #[test]
    fn short_boundary_records_are_padded() {
        assert_eq!(classify("TER"), RecordKind::Ter);
        assert_eq!(classify("MODEL"), RecordKind::Model);
        assert_eq!(classify("MODEL        1"), RecordKind::Model);
    }

    #[test]
    fn classification_is_case_and_width_sensitive() {
        assert_eq!(classify("atom      1"), RecordKind::Unknown);
        assert_eq!(classify("ATOM1     1"), RecordKind::Unknown);
        assert_eq!(classify(" ATOM     1"), RecordKind::Unknown);
    }

    #[test]
    fn ignored_and_unknown_records_are_distinguished() {
        assert_eq!(classify("REMARK   2 RESOLUTION."), RecordKind::Ignored);
        assert_eq!(classify("SEQRES   1 A  129  LYS"), RecordKind::Ignored);
        assert_eq!(classify("JRNL        AUTH"), RecordKind::Ignored);
        assert_eq!(classify("ANISOU    1  N"), RecordKind::Ignored);
        assert_eq!(classify(""), RecordKind::Ignored);
        assert_eq!(classify("   "), RecordKind::Ignored);
        assert_eq!(classify("FOOBAR"), RecordKind::Unknown);
        assert_eq!(classify("USER  MOD"), RecordKind::Unknown);
    }
}
