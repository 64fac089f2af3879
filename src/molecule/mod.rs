//! Molecule representation and related functionality

use crate::atom::{Atom, Element, ResidueId};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors that can occur when working with molecules
#[derive(Error, Debug)]
pub enum MoleculeError {
    #[error("Invalid coordinates for atom {index} ({atom}) in {molecule}")]
    InvalidCoordinates {
        molecule: String,
        index: usize,
        atom: String,
    },

    #[error("No atoms in molecule {0}")]
    EmptyMolecule(String),
}

/// A named structure (receptor, ligand or docked pose)
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Name of the molecule, used to address its atoms
    pub name: String,

    /// List of atoms in the molecule, in file order
    pub atoms: Vec<Atom>,
}

impl Molecule {
    /// Create a new empty molecule
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    /// Add an atom to the molecule
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        idx
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Reject empty molecules and atoms with non-finite coordinates
    pub fn validate(&self) -> Result<(), MoleculeError> {
        if self.atoms.is_empty() {
            return Err(MoleculeError::EmptyMolecule(self.name.clone()));
        }

        if let Some((index, atom)) = self
            .atoms
            .iter()
            .enumerate()
            .find(|(_, atom)| !atom.has_valid_coordinates())
        {
            return Err(MoleculeError::InvalidCoordinates {
                molecule: self.name.clone(),
                index,
                atom: atom.to_string(),
            });
        }

        Ok(())
    }

    /// Whether the structure contains at least one hydrogen
    pub fn has_hydrogens(&self) -> bool {
        self.atoms.iter().any(Atom::is_hydrogen)
    }

    /// Distinct residues of the given atoms, sorted by chain and number
    pub fn residues_of(&self, indices: &[usize]) -> Vec<ResidueId> {
        indices
            .iter()
            .filter_map(|&idx| self.atoms.get(idx))
            .map(Atom::residue_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Count atoms by element
    pub fn count_elements(&self) -> HashMap<Element, usize> {
        let mut counts = HashMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element).or_insert(0) += 1;
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn atom(element: Element, name: &str, resi: i32, pos: [f64; 3]) -> Atom {
        Atom::new(
            element,
            Vector3::new(pos[0], pos[1], pos[2]),
            name.to_string(),
            0,
            "GLY".to_string(),
            resi,
            'A',
        )
    }

    #[test]
    fn test_validate_empty() {
        let mol = Molecule::new("lig");
        assert!(matches!(mol.validate(), Err(MoleculeError::EmptyMolecule(_))));
    }

    #[test]
    fn test_validate_non_finite() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Carbon, "CA", 1, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Oxygen, "O", 1, [f64::INFINITY, 0.0, 0.0]));

        match mol.validate() {
            Err(MoleculeError::InvalidCoordinates { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_hydrogens_and_counts() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Nitrogen, "N", 1, [0.0, 0.0, 0.0]));
        assert!(!mol.has_hydrogens());
        mol.add_atom(atom(Element::Hydrogen, "H", 1, [1.0, 0.0, 0.0]));
        assert!(mol.has_hydrogens());

        let counts = mol.count_elements();
        assert_eq!(counts[&Element::Nitrogen], 1);
        assert_eq!(counts[&Element::Hydrogen], 1);
    }

    #[test]
    fn test_residues_of_is_sorted_and_distinct() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Carbon, "CA", 7, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Carbon, "CB", 7, [1.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Carbon, "CA", 3, [2.0, 0.0, 0.0]));

        let residues = mol.residues_of(&[0, 1, 2]);
        let numbers: Vec<i32> = residues.iter().map(|r| r.residue_num).collect();
        assert_eq!(numbers, vec![3, 7]);
    }
}
