//! Atom representation and related functionality

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chemical elements recognised by the contact rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Hydrogen,   // H
    Carbon,     // C
    Nitrogen,   // N
    Oxygen,     // O
    Fluorine,   // F
    Sulfur,     // S
    Phosphorus, // P
    Chlorine,   // Cl
    Bromine,    // Br
    Iodine,     // I

    // Metals
    Zinc,      // Zn
    Calcium,   // Ca
    Manganese, // Mn
    Magnesium, // Mg
    Iron,      // Fe

    // For atoms that don't match any of the above
    Unknown,
}

impl Element {
    /// Parse an element symbol as written in PDB columns 77-78
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "H" | "D" => Element::Hydrogen,
            "C" => Element::Carbon,
            "N" => Element::Nitrogen,
            "O" => Element::Oxygen,
            "F" => Element::Fluorine,
            "S" => Element::Sulfur,
            "P" => Element::Phosphorus,
            "CL" => Element::Chlorine,
            "BR" => Element::Bromine,
            "I" => Element::Iodine,
            "ZN" => Element::Zinc,
            "CA" => Element::Calcium,
            "MN" => Element::Manganese,
            "MG" => Element::Magnesium,
            "FE" => Element::Iron,
            _ => Element::Unknown,
        }
    }

    /// Parse an AutoDock atom type from a PDBQT file (e.g. "OA", "HD", "A")
    pub fn from_autodock_type(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "A" => Element::Carbon,
            "NA" | "NS" => Element::Nitrogen,
            "OA" | "OS" => Element::Oxygen,
            "SA" => Element::Sulfur,
            "HD" | "HS" => Element::Hydrogen,
            other => Element::from_symbol(other),
        }
    }

    /// Infer the element from an atom name when no element column is present.
    ///
    /// Uses the first alphabetic character of the name, so "1HB" is hydrogen
    /// and "CA" is carbon.
    pub fn from_atom_name(name: &str) -> Self {
        name.chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| Element::from_symbol(&c.to_string()))
            .unwrap_or(Element::Unknown)
    }

    /// Element symbol in PDB capitalisation
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Sulfur => "S",
            Element::Phosphorus => "P",
            Element::Chlorine => "Cl",
            Element::Bromine => "Br",
            Element::Iodine => "I",
            Element::Zinc => "Zn",
            Element::Calcium => "Ca",
            Element::Manganese => "Mn",
            Element::Magnesium => "Mg",
            Element::Iron => "Fe",
            Element::Unknown => "X",
        }
    }

    /// AutoDock type used when writing PDBQT
    pub fn to_autodock_type(&self) -> &'static str {
        match self {
            Element::Hydrogen => "HD",
            Element::Nitrogen => "NA",
            Element::Oxygen => "OA",
            Element::Sulfur => "SA",
            other => other.symbol(),
        }
    }
}

/// Chain identifier as written in addresses and selections; a blank chain is empty
pub fn chain_label(chain_id: char) -> String {
    if chain_id.is_whitespace() {
        String::new()
    } else {
        chain_id.to_string()
    }
}

/// Residue number followed by its insertion code, e.g. `52` or `52A`
pub fn residue_label(residue_num: i32, insertion_code: char) -> String {
    if insertion_code.is_whitespace() {
        residue_num.to_string()
    } else {
        format!("{}{}", residue_num, insertion_code)
    }
}

/// Identifies a residue within a structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidueId {
    pub chain_id: char,
    pub residue_num: i32,
    pub insertion_code: char,
    pub residue_name: String,
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}`{}",
            chain_label(self.chain_id),
            self.residue_name,
            residue_label(self.residue_num, self.insertion_code)
        )
    }
}

/// Represents an atom in 3D space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Chemical element
    pub element: Element,

    /// 3D coordinates (in Angstroms)
    pub coordinates: Vector3<f64>,

    /// Atom name from PDB format (e.g., "NZ", "OD1")
    pub name: String,

    /// Atom serial number from PDB
    pub serial: u32,

    /// Residue name this atom belongs to
    pub residue_name: String,

    /// Residue number this atom belongs to
    pub residue_num: i32,

    /// Chain identifier, blank when absent
    pub chain_id: char,

    /// Residue insertion code (PDB column 27), blank when absent
    #[serde(default = "blank")]
    pub insertion_code: char,

    /// Segment identifier (PDB columns 73-76), empty when absent
    pub segment: String,
}

impl Atom {
    /// Create a new atom
    pub fn new(
        element: Element,
        coordinates: Vector3<f64>,
        name: String,
        serial: u32,
        residue_name: String,
        residue_num: i32,
        chain_id: char,
    ) -> Self {
        Self {
            element,
            coordinates,
            name,
            serial,
            residue_name,
            residue_num,
            chain_id,
            insertion_code: ' ',
            segment: String::new(),
        }
    }

    /// Set the residue insertion code
    pub fn with_insertion_code(mut self, insertion_code: char) -> Self {
        self.insertion_code = insertion_code;
        self
    }

    /// Set the segment identifier
    pub fn with_segment(mut self, segment: &str) -> Self {
        self.segment = segment.to_string();
        self
    }

    /// Calculate distance to another atom
    pub fn distance(&self, other: &Atom) -> f64 {
        crate::math::distance(&self.coordinates, &other.coordinates)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::Hydrogen
    }

    /// N, O or F: may act as hydrogen bond donor or acceptor
    pub fn is_polar(&self) -> bool {
        matches!(
            self.element,
            Element::Nitrogen | Element::Oxygen | Element::Fluorine
        )
    }

    /// C or S
    pub fn is_hydrophobic(&self) -> bool {
        matches!(self.element, Element::Carbon | Element::Sulfur)
    }

    /// Whether every coordinate component is finite
    pub fn has_valid_coordinates(&self) -> bool {
        self.coordinates.iter().all(|c| c.is_finite())
    }

    /// Residue this atom belongs to
    pub fn residue_id(&self) -> ResidueId {
        ResidueId {
            chain_id: self.chain_id,
            residue_num: self.residue_num,
            insertion_code: self.insertion_code,
            residue_name: self.residue_name.clone(),
        }
    }
}

/// Formats as `chain/resn`resi/name`
impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}`{}/{}",
            chain_label(self.chain_id),
            self.residue_name,
            residue_label(self.residue_num, self.insertion_code),
            self.name
        )
    }
}

fn blank() -> char {
    ' '
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn lysine_nz() -> Atom {
        Atom::new(
            Element::Nitrogen,
            Vector3::new(1.0, 2.0, 3.0),
            "NZ".to_string(),
            1,
            "LYS".to_string(),
            12,
            'A',
        )
    }

    #[test]
    fn test_element_from_symbol() {
        assert_eq!(Element::from_symbol("C"), Element::Carbon);
        assert_eq!(Element::from_symbol(" N"), Element::Nitrogen);
        assert_eq!(Element::from_symbol("cl"), Element::Chlorine);
        assert_eq!(Element::from_symbol("D"), Element::Hydrogen);
        assert_eq!(Element::from_symbol("XX"), Element::Unknown);
    }

    #[test]
    fn test_element_from_autodock_type() {
        assert_eq!(Element::from_autodock_type("A"), Element::Carbon);
        assert_eq!(Element::from_autodock_type("OA"), Element::Oxygen);
        assert_eq!(Element::from_autodock_type("NA"), Element::Nitrogen);
        assert_eq!(Element::from_autodock_type("HD"), Element::Hydrogen);
        assert_eq!(Element::from_autodock_type("Zn"), Element::Zinc);
    }

    #[test]
    fn test_element_from_atom_name() {
        assert_eq!(Element::from_atom_name("OD1"), Element::Oxygen);
        assert_eq!(Element::from_atom_name("1HB"), Element::Hydrogen);
        assert_eq!(Element::from_atom_name("CA"), Element::Carbon);
        assert_eq!(Element::from_atom_name("12"), Element::Unknown);
    }

    #[test]
    fn test_atom_creation() {
        let atom = lysine_nz().with_segment("REC");

        assert_eq!(atom.element, Element::Nitrogen);
        assert_eq!(atom.coordinates, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.name, "NZ");
        assert_eq!(atom.residue_name, "LYS");
        assert_eq!(atom.residue_num, 12);
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.segment, "REC");
        assert!(atom.is_polar());
        assert!(!atom.is_hydrophobic());
        assert!(!atom.is_hydrogen());
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut atom = lysine_nz();
        assert!(atom.has_valid_coordinates());
        atom.coordinates.y = f64::NAN;
        assert!(!atom.has_valid_coordinates());
    }

    #[test]
    fn test_atom_display() {
        assert_eq!(format!("{}", lysine_nz()), "A/LYS`12/NZ");
        assert_eq!(format!("{}", lysine_nz().residue_id()), "A/LYS`12");
    }

    #[test]
    fn test_blank_chain_display() {
        let mut atom = lysine_nz();
        atom.chain_id = ' ';
        assert_eq!(atom.to_string(), "/LYS`12/NZ");
        assert_eq!(atom.residue_id().to_string(), "/LYS`12");
    }

    #[test]
    fn test_insertion_code_separates_residues() {
        let plain = lysine_nz();
        let inserted = lysine_nz().with_insertion_code('A');
        assert_eq!(inserted.to_string(), "A/LYS`12A/NZ");
        assert_ne!(plain.residue_id(), inserted.residue_id());
        assert!(plain.residue_id() < inserted.residue_id());
    }
}
