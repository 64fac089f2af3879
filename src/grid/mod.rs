//! Sparse cell grid for radius queries over atom coordinates

use crate::atom::Atom;
use nalgebra::Vector3;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when working with grids
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid spacing: {0}")]
    InvalidSpacing(f64),

    #[error("Point {0:?} has non-finite coordinates")]
    InvalidPosition(Vector3<f64>),
}

type CellKey = (i64, i64, i64);

/// Cell list over a fixed set of atoms.
///
/// Only occupied cells are stored, keyed by their integer coordinates, so
/// memory follows the atom count rather than the coordinate extent. A radius
/// query visits the cells overlapping the query sphere's bounding cube and
/// then tests exact distances, so results are identical to a brute-force
/// scan.
#[derive(Debug, Clone)]
pub struct NeighborGrid {
    /// Cell edge length in Angstroms
    pub spacing: f64,

    cells: HashMap<CellKey, Vec<usize>>,
}

impl NeighborGrid {
    /// Create an empty grid with the given cell size
    pub fn new(spacing: f64) -> Result<Self, GridError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(GridError::InvalidSpacing(spacing));
        }

        Ok(Self {
            spacing,
            cells: HashMap::new(),
        })
    }

    /// Build a grid holding every atom of `atoms`, indexed by position
    pub fn from_atoms(atoms: &[Atom], spacing: f64) -> Result<Self, GridError> {
        let mut grid = Self::new(spacing)?;
        for (idx, atom) in atoms.iter().enumerate() {
            grid.insert(idx, &atom.coordinates)?;
        }
        Ok(grid)
    }

    /// Number of cells holding at least one atom
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    fn cell_of(&self, position: &Vector3<f64>) -> CellKey {
        let cell = (*position / self.spacing).map(|c| c.floor() as i64);
        (cell.x, cell.y, cell.z)
    }

    /// Store an atom index in the cell containing `position`
    pub fn insert(&mut self, idx: usize, position: &Vector3<f64>) -> Result<(), GridError> {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(GridError::InvalidPosition(*position));
        }
        let key = self.cell_of(position);
        self.cells.entry(key).or_default().push(idx);
        Ok(())
    }

    /// Indices of `atoms` within `radius` of `point`, sorted ascending.
    ///
    /// `atoms` must be the slice the grid was built from.
    pub fn neighbors_within(&self, atoms: &[Atom], point: &Vector3<f64>, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit_within(atoms, point, radius, |idx| {
            found.push(idx);
            true
        });
        found.sort_unstable();
        found
    }

    /// Whether any atom lies within `radius` of `point`
    pub fn any_within(&self, atoms: &[Atom], point: &Vector3<f64>, radius: f64) -> bool {
        let mut hit = false;
        self.visit_within(atoms, point, radius, |_| {
            hit = true;
            false
        });
        hit
    }

    /// Calls `visit` for every atom within `radius` until it returns false
    fn visit_within<F>(&self, atoms: &[Atom], point: &Vector3<f64>, radius: f64, mut visit: F)
    where
        F: FnMut(usize) -> bool,
    {
        if !(radius >= 0.0) || !point.iter().all(|c| c.is_finite()) {
            return;
        }

        let reach = Vector3::repeat(radius);
        let lo = self.cell_of(&(point - reach));
        let hi = self.cell_of(&(point + reach));

        let span = |a: i64, b: i64| (b.saturating_sub(a) as u128) + 1;
        let box_cells = span(lo.0, hi.0)
            .saturating_mul(span(lo.1, hi.1))
            .saturating_mul(span(lo.2, hi.2));

        let mut check = |indices: &[usize]| {
            for &idx in indices {
                if crate::math::distance(&atoms[idx].coordinates, point) <= radius && !visit(idx) {
                    return false;
                }
            }
            true
        };

        // Large radii relative to the spacing: scanning occupied cells is cheaper
        if box_cells > self.cells.len() as u128 {
            let in_box = |k: &CellKey| {
                (lo.0..=hi.0).contains(&k.0) && (lo.1..=hi.1).contains(&k.1) && (lo.2..=hi.2).contains(&k.2)
            };
            for (_, indices) in self.cells.iter().filter(|(k, _)| in_box(*k)) {
                if !check(indices.as_slice()) {
                    return;
                }
            }
            return;
        }

        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                for z in lo.2..=hi.2 {
                    if let Some(indices) = self.cells.get(&(x, y, z)) {
                        if !check(indices.as_slice()) {
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Element;

    fn atoms_at(positions: &[[f64; 3]]) -> Vec<Atom> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Atom::new(
                    Element::Carbon,
                    Vector3::new(p[0], p[1], p[2]),
                    "C".to_string(),
                    i as u32 + 1,
                    "UNK".to_string(),
                    1,
                    'A',
                )
            })
            .collect()
    }

    #[test]
    fn test_invalid_grid() {
        assert!(matches!(NeighborGrid::new(0.0), Err(GridError::InvalidSpacing(_))));
        assert!(NeighborGrid::from_atoms(&[], f64::NAN).is_err());

        let atoms = atoms_at(&[[0.0, f64::NAN, 0.0]]);
        assert!(matches!(
            NeighborGrid::from_atoms(&atoms, 2.0),
            Err(GridError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_widely_separated_atoms_stay_sparse() {
        let atoms = atoms_at(&[
            [-999.0, -999.0, -999.0],
            [-998.0, -999.0, -999.0],
            [9990.0, 999.0, 9990.0],
        ]);
        let grid = NeighborGrid::from_atoms(&atoms, 1.9).unwrap();

        assert_eq!(grid.occupied_cells(), 2);
        assert_eq!(
            grid.neighbors_within(&atoms, &Vector3::new(-999.0, -999.0, -999.0), 1.9),
            vec![0, 1]
        );
        assert_eq!(
            grid.neighbors_within(&atoms, &Vector3::new(9990.0, 999.0, 9991.0), 1.9),
            vec![2]
        );
    }

    #[test]
    fn test_huge_radius_scans_occupied_cells() {
        let atoms = atoms_at(&[[0.0, 0.0, 0.0], [500.0, 0.0, 0.0], [5000.0, 0.0, 0.0]]);
        let grid = NeighborGrid::from_atoms(&atoms, 1.0).unwrap();

        assert_eq!(grid.neighbors_within(&atoms, &Vector3::zeros(), 1000.0), vec![0, 1]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = NeighborGrid::from_atoms(&[], 2.0).unwrap();
        assert!(grid.neighbors_within(&[], &Vector3::zeros(), 2.0).is_empty());
    }

    #[test]
    fn test_neighbors_within_mixed() {
        let atoms = atoms_at(&[
            [1.0, 0.0, 0.0],
            [0.0, 1.5, 0.0],
            [5.0, 0.0, 0.0],
            [0.0, 0.0, 1.9],
            [0.0, 0.0, 2.1],
        ]);
        let grid = NeighborGrid::from_atoms(&atoms, 2.0).unwrap();

        let found = grid.neighbors_within(&atoms, &Vector3::zeros(), 2.0);
        assert_eq!(found, vec![0, 1, 3]);
    }

    #[test]
    fn test_radius_larger_than_spacing() {
        let atoms = atoms_at(&[[0.0, 0.0, 0.0], [3.9, 0.0, 0.0], [4.1, 0.0, 0.0]]);
        let grid = NeighborGrid::from_atoms(&atoms, 1.0).unwrap();

        assert_eq!(grid.neighbors_within(&atoms, &Vector3::zeros(), 4.0), vec![0, 1]);
    }

    #[test]
    fn test_query_outside_grid() {
        let atoms = atoms_at(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let grid = NeighborGrid::from_atoms(&atoms, 2.0).unwrap();

        assert!(!grid.any_within(&atoms, &Vector3::new(50.0, 0.0, 0.0), 4.0));
        assert!(grid.any_within(&atoms, &Vector3::new(-3.0, 0.0, 0.0), 4.0));
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let atoms = atoms_at(&[[4.0, 0.0, 0.0]]);
        let grid = NeighborGrid::from_atoms(&atoms, 4.0).unwrap();

        assert_eq!(grid.neighbors_within(&atoms, &Vector3::zeros(), 4.0), vec![0]);
    }
}
