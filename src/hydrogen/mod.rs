//! Hydrogen lookup and placement
//!
//! Hydrogen bond classification needs the hydrogen bonded to a donor. The
//! [`HydrogenLocator`] answers that question with a search restricted to the
//! donor's own residue; [`add_polar_hydrogens`] fills in hydrogens for
//! structures that were loaded without any.

use crate::atom::{Atom, Element};
use crate::grid::{GridError, NeighborGrid};
use crate::molecule::Molecule;
use log::debug;
use nalgebra::Vector3;
use std::collections::HashMap;

/// Default maximum heavy atom to hydrogen distance (Angstroms)
pub const DEFAULT_BOND_LENGTH: f64 = 1.2;

/// Heavy atoms closer than this are considered bonded when placing hydrogens
const HEAVY_BOND_CUTOFF: f64 = 1.9;

/// Residue-scoped nearest hydrogen search over one structure.
///
/// Hydrogens are grouped by (chain, residue number, insertion code) once at construction so
/// each lookup only scans the hydrogens of the queried atom's residue.
#[derive(Debug, Clone)]
pub struct HydrogenLocator<'a> {
    molecule: &'a Molecule,
    by_residue: HashMap<(char, i32, char), Vec<usize>>,
    max_distance: f64,
}

impl<'a> HydrogenLocator<'a> {
    pub fn new(molecule: &'a Molecule, max_distance: f64) -> Self {
        let mut by_residue: HashMap<(char, i32, char), Vec<usize>> = HashMap::new();
        for (idx, atom) in molecule.atoms.iter().enumerate() {
            if atom.is_hydrogen() {
                by_residue
                    .entry((atom.chain_id, atom.residue_num, atom.insertion_code))
                    .or_default()
                    .push(idx);
            }
        }

        Self {
            molecule,
            by_residue,
            max_distance,
        }
    }

    /// Closest hydrogen of the same residue strictly within the bond length.
    ///
    /// `atom_idx` indexes into the locator's molecule; the atom itself is never
    /// returned. On equal distances the hydrogen that appears first in the
    /// file wins.
    pub fn nearest_hydrogen(&self, atom_idx: usize) -> Option<&'a Atom> {
        let atom = self.molecule.atoms.get(atom_idx)?;
        let candidates = self
            .by_residue
            .get(&(atom.chain_id, atom.residue_num, atom.insertion_code))?;

        let mut closest: Option<(&'a Atom, f64)> = None;
        for &h_idx in candidates {
            if h_idx == atom_idx {
                continue;
            }
            let hydrogen = &self.molecule.atoms[h_idx];
            let dist = atom.distance(hydrogen);
            if dist < self.max_distance && closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((hydrogen, dist));
            }
        }

        closest.map(|(hydrogen, _)| hydrogen)
    }
}

/// Bond length and valence used when placing a hydrogen on a heavy atom
fn polar_geometry(element: Element) -> Option<(f64, usize)> {
    match element {
        Element::Nitrogen => Some((1.01, 3)),
        Element::Oxygen => Some((0.96, 2)),
        _ => None,
    }
}

/// Hydrogen name derived from the heavy atom name ("NZ" -> "HZ", "OD1" -> "HD1")
fn hydrogen_name(heavy_name: &str) -> String {
    let mut name = String::from("H");
    name.extend(heavy_name.chars().skip(1).take(3));
    name
}

/// Add one hydrogen to every N and O with free valence.
///
/// Heavy neighbours are atoms within 1.9 Å. The hydrogen is placed opposite
/// the mean direction of those neighbours; atoms without any heavy neighbour
/// are skipped because their geometry is undefined. New atoms are appended
/// after the existing ones, so existing indices stay valid. Returns the
/// number of hydrogens added.
pub fn add_polar_hydrogens(molecule: &mut Molecule) -> Result<usize, GridError> {
    let grid = NeighborGrid::from_atoms(&molecule.atoms, HEAVY_BOND_CUTOFF)?;
    let mut serial = molecule.atoms.iter().map(|a| a.serial).max().unwrap_or(0);
    let mut added = Vec::new();

    for (idx, atom) in molecule.atoms.iter().enumerate() {
        let Some((bond_length, valence)) = polar_geometry(atom.element) else {
            continue;
        };

        let neighbors: Vec<&Atom> = grid
            .neighbors_within(&molecule.atoms, &atom.coordinates, HEAVY_BOND_CUTOFF)
            .into_iter()
            .filter(|&n| n != idx)
            .map(|n| &molecule.atoms[n])
            .filter(|n| !n.is_hydrogen())
            .collect();

        if neighbors.is_empty() || neighbors.len() >= valence {
            continue;
        }

        let pull = neighbors
            .iter()
            .map(|n| n.coordinates - atom.coordinates)
            .filter(|v| v.norm() > 0.0)
            .fold(Vector3::zeros(), |acc, v| acc + v.normalize());
        if pull.norm() < 1e-6 {
            debug!("No defined hydrogen direction for {}", atom);
            continue;
        }

        serial += 1;
        let position = atom.coordinates - pull.normalize() * bond_length;
        added.push(
            Atom::new(
                Element::Hydrogen,
                position,
                hydrogen_name(&atom.name),
                serial,
                atom.residue_name.clone(),
                atom.residue_num,
                atom.chain_id,
            )
            .with_insertion_code(atom.insertion_code)
            .with_segment(&atom.segment),
        );
    }

    let count = added.len();
    molecule.atoms.extend(added);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn atom(element: Element, name: &str, chain: char, resi: i32, pos: [f64; 3]) -> Atom {
        Atom::new(
            element,
            Vector3::new(pos[0], pos[1], pos[2]),
            name.to_string(),
            0,
            "SER".to_string(),
            resi,
            chain,
        )
    }

    #[test]
    fn test_nearest_hydrogen_picks_closest() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Oxygen, "OG", 'A', 5, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H1", 'A', 5, [1.1, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "HG", 'A', 5, [0.0, 0.96, 0.0]));

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert_eq!(locator.nearest_hydrogen(0).map(|h| h.name.as_str()), Some("HG"));
    }

    #[test]
    fn test_tie_keeps_first_in_file_order() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Nitrogen, "N", 'A', 1, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H1", 'A', 1, [1.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H2", 'A', 1, [-1.0, 0.0, 0.0]));

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert_eq!(locator.nearest_hydrogen(0).map(|h| h.name.as_str()), Some("H1"));
    }

    #[test]
    fn test_search_is_residue_scoped() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Nitrogen, "N", 'A', 1, [0.0, 0.0, 0.0]));
        // Close, but in the next residue and in another chain
        mol.add_atom(atom(Element::Hydrogen, "H", 'A', 2, [0.5, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H", 'B', 1, [0.0, 0.5, 0.0]));

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert!(locator.nearest_hydrogen(0).is_none());
    }

    #[test]
    fn test_inserted_residue_is_a_separate_scope() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Nitrogen, "N", 'A', 52, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H", 'A', 52, [0.5, 0.0, 0.0]).with_insertion_code('A'));
        mol.add_atom(atom(Element::Nitrogen, "N", 'A', 52, [0.0, 1.0, 0.0]).with_insertion_code('A'));

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert!(locator.nearest_hydrogen(0).is_none());
        assert_eq!(
            locator.nearest_hydrogen(2).map(|h| h.insertion_code),
            Some('A')
        );
    }

    #[test]
    fn test_bond_length_is_strict() {
        let mut mol = Molecule::new("rec");
        mol.add_atom(atom(Element::Nitrogen, "N", 'A', 1, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Hydrogen, "H", 'A', 1, [1.2, 0.0, 0.0]));

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert!(locator.nearest_hydrogen(0).is_none());
        assert!(locator.nearest_hydrogen(99).is_none());
    }

    #[test]
    fn test_hydrogen_name() {
        assert_eq!(hydrogen_name("N"), "H");
        assert_eq!(hydrogen_name("NZ"), "HZ");
        assert_eq!(hydrogen_name("OD1"), "HD1");
    }

    #[test]
    fn test_add_polar_hydrogens() {
        let mut mol = Molecule::new("rec");
        // Serine side chain: CB-OG
        mol.add_atom(atom(Element::Carbon, "CB", 'A', 1, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Oxygen, "OG", 'A', 1, [1.43, 0.0, 0.0]));
        // Isolated water oxygen: no heavy neighbour
        mol.add_atom(atom(Element::Oxygen, "O", 'W', 9, [20.0, 0.0, 0.0]));

        let added = add_polar_hydrogens(&mut mol).unwrap();
        assert_eq!(added, 1);
        assert_eq!(mol.atoms.len(), 4);

        let hydrogen = &mol.atoms[3];
        assert!(hydrogen.is_hydrogen());
        assert_eq!(hydrogen.name, "HG");
        assert_eq!(hydrogen.residue_num, 1);
        assert_approx_eq!(hydrogen.coordinates.x, 1.43 + 0.96, 1e-9);

        let locator = HydrogenLocator::new(&mol, DEFAULT_BOND_LENGTH);
        assert_eq!(locator.nearest_hydrogen(1).map(|h| h.serial), Some(hydrogen.serial));
    }

    #[test]
    fn test_saturated_atoms_get_no_hydrogen() {
        let mut mol = Molecule::new("lig");
        // Ether oxygen bonded to two carbons
        mol.add_atom(atom(Element::Carbon, "C1", 'L', 1, [-1.4, 0.0, 0.0]));
        mol.add_atom(atom(Element::Oxygen, "O1", 'L', 1, [0.0, 0.0, 0.0]));
        mol.add_atom(atom(Element::Carbon, "C2", 'L', 1, [0.5, 1.3, 0.0]));

        assert_eq!(add_polar_hydrogens(&mut mol).unwrap(), 0);
    }
}
