//! SMILES → bond list.
//!
//! Parsing is delegated to an external toolkit behind the [`SmilesParser`]
//! trait, so the rest of the crate only ever sees an atom count and a list of
//! atom-index pairs. [`PurrParser`] is the default implementation, built on the
//! [`purr`](https://github.com/rapodaca/purr) graph model.
//!
//! ```
//! use drug_indices::smiles::{PurrParser, SmilesParser};
//!
//! let mol = PurrParser.parse("CC(=O)O").unwrap(); // acetic acid
//! assert_eq!(mol.atom_count, 4);
//! assert_eq!(mol.bonds, vec![(0, 1), (1, 2), (1, 3)]);
//! ```
use purr::feature::{AtomKind, BracketSymbol, Element};
use purr::graph::Atom;
use thiserror::Error;

/// The SMILES string was rejected by the parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid SMILES '{smiles}': {reason}")]
pub struct ParseError {
    pub smiles: String,
    pub reason: String,
}

impl ParseError {
    fn new(smiles: &str, reason: impl Into<String>) -> Self {
        Self {
            smiles: smiles.to_string(),
            reason: reason.into(),
        }
    }
}

/// Heavy-atom connectivity of one molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMolecule {
    pub atom_count: usize,
    /// Each bond once, as `(i, j)` with `i < j`, ordered by `i` then by
    /// position in the atom's bond list.
    pub bonds: Vec<(usize, usize)>,
}

/// Anything that can turn a SMILES string into a bond list.
pub trait SmilesParser {
    fn parse(&self, smiles: &str) -> Result<ParsedMolecule, ParseError>;
}

/// [`SmilesParser`] backed by `purr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurrParser;

impl SmilesParser for PurrParser {
    fn parse(&self, smiles: &str) -> Result<ParsedMolecule, ParseError> {
        let smiles = smiles.trim();
        if smiles.is_empty() {
            return Err(ParseError::new(smiles, "empty string"));
        }

        let mut builder = purr::graph::Builder::new();
        purr::read::read(smiles, &mut builder, None)
            .map_err(|e| ParseError::new(smiles, format!("{:?}", e)))?;
        let atoms = builder
            .build()
            .map_err(|e| ParseError::new(smiles, format!("{:?}", e)))?;

        // explicit hydrogens on heavy atoms are folded away, like implicit ones
        let mut index = Vec::with_capacity(atoms.len());
        let mut atom_count = 0;
        for (idx, atom) in atoms.iter().enumerate() {
            if is_suppressible_hydrogen(&atoms, idx) {
                index.push(None);
            } else {
                index.push(Some(atom_count));
                atom_count += 1;
            }
        }

        // purr lists every bond on both atoms
        let mut bonds = Vec::new();
        for (idx, atom) in atoms.iter().enumerate() {
            for bond in &atom.bonds {
                if idx < bond.tid {
                    if let (Some(i), Some(j)) = (index[idx], index[bond.tid]) {
                        bonds.push((i, j));
                    }
                }
            }
        }

        Ok(ParsedMolecule { atom_count, bonds })
    }
}

fn is_hydrogen(atom: &Atom) -> bool {
    matches!(
        atom.kind,
        AtomKind::Bracket {
            symbol: BracketSymbol::Element(Element::H),
            ..
        }
    )
}

/// Plain `[H]` with a single bond to a non-hydrogen atom.
///
/// Isotopes (`[2H]`), charged or mapped hydrogens, `[HH]` and `[H][H]` are
/// kept as real vertices.
fn is_suppressible_hydrogen(atoms: &[Atom], idx: usize) -> bool {
    let atom = &atoms[idx];
    let plain = match &atom.kind {
        AtomKind::Bracket {
            isotope: None,
            symbol: BracketSymbol::Element(Element::H),
            hcount,
            charge: None,
            map: None,
            ..
        } => hcount.as_ref().map_or(true, |h| h.is_zero()),
        _ => false,
    };
    plain
        && matches!(atom.bonds.as_slice(), [bond] if !is_hydrogen(&atoms[bond.tid]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethanol() {
        let mol = PurrParser.parse("CCO").unwrap();
        assert_eq!(mol.atom_count, 3);
        assert_eq!(mol.bonds, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn benzene_ring_closure() {
        let mol = PurrParser.parse("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count, 6);
        assert_eq!(mol.bonds.len(), 6);
        assert!(mol.bonds.contains(&(0, 5)));
    }

    #[test]
    fn bracket_hydrogens_are_not_atoms() {
        let mol = PurrParser.parse("[NH4+]").unwrap();
        assert_eq!(mol.atom_count, 1);
        assert!(mol.bonds.is_empty());
    }

    #[test]
    fn explicit_hydrogens_are_suppressed() {
        // methane written with all four hydrogens
        let mol = PurrParser.parse("[H]C([H])([H])[H]").unwrap();
        assert_eq!(mol.atom_count, 1);
        assert!(mol.bonds.is_empty());

        // stereo hydrogen on a ring fusion atom of decalin
        let mut explicit = PurrParser.parse("[H][C@@]12CCCC[C@@H]1CCCC2").unwrap();
        let mut implicit = PurrParser.parse("C12CCCCC1CCCC2").unwrap();
        assert_eq!(explicit.atom_count, 10);
        explicit.bonds.sort_unstable();
        implicit.bonds.sort_unstable();
        assert_eq!(explicit, implicit);
    }

    #[test]
    fn special_hydrogens_stay_vertices() {
        assert_eq!(PurrParser.parse("[H][H]").unwrap().bonds, vec![(0, 1)]);
        assert_eq!(PurrParser.parse("[2H]C").unwrap().atom_count, 2);
        assert_eq!(PurrParser.parse("[H+]").unwrap().atom_count, 1);
    }

    #[test]
    fn dot_separated_fragments() {
        let mol = PurrParser.parse("CC.O").unwrap();
        assert_eq!(mol.atom_count, 3);
        assert_eq!(mol.bonds, vec![(0, 1)]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(PurrParser.parse("C1CC(").is_err());
        assert!(PurrParser.parse("   ").is_err());
    }
}
