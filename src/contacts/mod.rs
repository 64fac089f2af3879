//! Proximity search between a receptor and a ligand

use crate::atom::{Atom, ResidueId};
use crate::grid::{GridError, NeighborGrid};
use crate::molecule::Molecule;
use log::debug;
use serde::Serialize;

/// Atoms of each side within the cutoff of the other side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloseContacts {
    /// Receptor atom indices, ascending
    pub receptor_atoms: Vec<usize>,

    /// Ligand atom indices, ascending
    pub ligand_atoms: Vec<usize>,

    /// Whole receptor residues touched by an admitted atom
    pub receptor_residues: Vec<ResidueId>,

    /// Whole ligand residues touched by an admitted atom
    pub ligand_residues: Vec<ResidueId>,
}

impl CloseContacts {
    /// Number of candidate pairs the admitted subsets produce
    pub fn pair_count(&self) -> usize {
        self.receptor_atoms.len() * self.ligand_atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receptor_atoms.is_empty() || self.ligand_atoms.is_empty()
    }
}

/// Indices of `targets` with at least one atom of `queries` within `cutoff`
fn admitted_brute_force(targets: &[Atom], queries: &[Atom], cutoff: f64) -> Vec<usize> {
    targets
        .iter()
        .enumerate()
        .filter(|(_, target)| queries.iter().any(|q| target.distance(q) <= cutoff))
        .map(|(idx, _)| idx)
        .collect()
}

/// Same as [`admitted_brute_force`], with `queries` indexed in a cell grid
fn admitted_with_grid(targets: &[Atom], queries: &[Atom], cutoff: f64) -> Result<Vec<usize>, GridError> {
    let grid = NeighborGrid::from_atoms(queries, cutoff)?;
    Ok(targets
        .iter()
        .enumerate()
        .filter(|(_, target)| grid.any_within(queries, &target.coordinates, cutoff))
        .map(|(idx, _)| idx)
        .collect())
}

/// Find the receptor and ligand atoms within `cutoff` of each other.
///
/// Brute force is used for small systems; once `|R|·|L|` exceeds
/// `grid_threshold` the search goes through a [`NeighborGrid`]. Both paths
/// return the same atoms.
pub fn find_close_contacts(
    receptor: &Molecule,
    ligand: &Molecule,
    cutoff: f64,
    grid_threshold: usize,
) -> Result<CloseContacts, GridError> {
    let use_grid = receptor.len().saturating_mul(ligand.len()) > grid_threshold;

    let (receptor_atoms, ligand_atoms) = if use_grid {
        debug!(
            "Grid proximity search over {} x {} atoms",
            receptor.len(),
            ligand.len()
        );
        (
            admitted_with_grid(&receptor.atoms, &ligand.atoms, cutoff)?,
            admitted_with_grid(&ligand.atoms, &receptor.atoms, cutoff)?,
        )
    } else {
        (
            admitted_brute_force(&receptor.atoms, &ligand.atoms, cutoff),
            admitted_brute_force(&ligand.atoms, &receptor.atoms, cutoff),
        )
    };

    Ok(CloseContacts {
        receptor_residues: receptor.residues_of(&receptor_atoms),
        ligand_residues: ligand.residues_of(&ligand_atoms),
        receptor_atoms,
        ligand_atoms,
    })
}
