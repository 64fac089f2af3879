//! Registry of loaded structures, addressed by object name

use log::{debug, info};
use std::path::Path;
use thiserror::Error;

use crate::io::{load_structures, IoError};
use crate::molecule::Molecule;

/// Errors that can occur when loading or looking up objects
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("No ligand object found (expected a name containing 'lig')")]
    LigandNotFound,

    #[error("No receptor object found (expected a name containing 'rec')")]
    ReceptorNotFound,

    #[error("No object named '{0}'")]
    ObjectNotFound(String),
}

/// Loaded structures in load order
#[derive(Debug, Clone, Default)]
pub struct Session {
    objects: Vec<Molecule>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structure; an object with the same name is replaced in place
    pub fn add(&mut self, molecule: Molecule) {
        match self.objects.iter_mut().find(|m| m.name == molecule.name) {
            Some(existing) => {
                debug!("Replacing object {}", molecule.name);
                *existing = molecule;
            }
            None => self.objects.push(molecule),
        }
    }

    /// Load a structure file, returning the names of the objects it created.
    ///
    /// A docking log adds one object per pose.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<String>, SessionError> {
        let molecules = load_structures(&path)?;
        let names: Vec<String> = molecules.iter().map(|m| m.name.clone()).collect();
        info!(
            "Loaded {} object(s) from {}",
            names.len(),
            path.as_ref().display()
        );
        for molecule in molecules {
            let mut composition: Vec<_> = molecule
                .count_elements()
                .into_iter()
                .map(|(element, count)| format!("{}{}", element.symbol(), count))
                .collect();
            composition.sort();
            debug!("{}: {} atoms ({})", molecule.name, molecule.len(), composition.join(" "));
            self.add(molecule);
        }
        Ok(names)
    }

    pub fn get(&self, name: &str) -> Result<&Molecule, SessionError> {
        self.objects
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| SessionError::ObjectNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Molecule, SessionError> {
        self.objects
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| SessionError::ObjectNotFound(name.to_string()))
    }

    /// Object names in load order
    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// First object whose lower-cased name contains `pattern`, skipping `exclude`
    fn find_by_pattern(&self, pattern: &str, exclude: Option<&str>) -> Option<&str> {
        self.objects
            .iter()
            .map(|m| m.name.as_str())
            .filter(|name| Some(*name) != exclude)
            .find(|name| name.to_lowercase().contains(pattern))
    }

    /// Name of the ligand object
    pub fn find_ligand(&self) -> Result<&str, SessionError> {
        self.find_by_pattern("lig", None)
            .ok_or(SessionError::LigandNotFound)
    }

    /// Name of the receptor object, never `ligand`
    pub fn find_receptor(&self, ligand: &str) -> Result<&str, SessionError> {
        self.find_by_pattern("rec", Some(ligand))
            .ok_or(SessionError::ReceptorNotFound)
    }

    /// Resolve receptor and ligand names, discovering whichever is not given.
    ///
    /// Explicit names must refer to loaded objects.
    pub fn resolve(
        &self,
        receptor: Option<&str>,
        ligand: Option<&str>,
    ) -> Result<(String, String), SessionError> {
        let ligand = match ligand {
            Some(name) => self.get(name)?.name.clone(),
            None => self.find_ligand()?.to_string(),
        };
        let receptor = match receptor {
            Some(name) => self.get(name)?.name.clone(),
            None => self.find_receptor(&ligand)?.to_string(),
        };
        Ok((receptor, ligand))
    }
}
