use super::curve::CurveKind;
use super::spin::SpinPair;
use std::collections::BTreeMap;

/// One bond of an ICOHPLIST/ICOBILIST/ICOOPLIST file: the pair of sites, the
/// bond length and the integrated value at the Fermi level.
#[derive(Debug, Clone, PartialEq)]
pub struct IcohpEntry {
    /// The bond label shared with the curve file. Readers strip the `No.`
    /// prefix, so bond 1 is labelled `1` in both files.
    pub label: String,
    pub atom1: String,
    pub atom2: String,
    /// Interatomic distance in Angstroms.
    pub length: f64,
    /// Lattice translation of `atom2`, if the file lists one.
    pub translation: Option<[i32; 3]>,
    pub values: SpinPair,
    /// Orbital-resolved integrated values keyed by orbital-pair tag
    /// (e.g., `3s-3p`).
    pub orbitals: BTreeMap<String, SpinPair>,
}

/// All bonds of an integrated-value list, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct BondList {
    pub kind: CurveKind,
    pub entries: Vec<IcohpEntry>,
}

impl BondList {
    pub fn new(kind: CurveKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&IcohpEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn is_polarized(&self) -> bool {
        self.entries.iter().any(|e| e.values.down.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
