//! Receptor-ligand interaction categories and classification results

pub mod classifier;
pub mod rules;

use crate::atom::Atom;
use crate::config::ConfigError;
use crate::grid::GridError;
use crate::molecule::MoleculeError;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use classifier::{Analysis, InteractionClassifier};

/// Errors that can occur while classifying contacts
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Molecule error: {0}")]
    Molecule(#[from] MoleculeError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pair budget exceeded: {pairs} candidate pairs, budget {budget}")]
    PairBudgetExceeded { pairs: usize, budget: usize },
}

/// The mutually exclusive interaction categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Hydrophobic,
    Hbond,
    SaltBridge,
    Covalent,
    Vdw,
    Aromatic,
    CationPi,
    Other,
}

impl InteractionType {
    /// Every category, in report order
    pub const ALL: [InteractionType; 8] = [
        InteractionType::Hydrophobic,
        InteractionType::Hbond,
        InteractionType::SaltBridge,
        InteractionType::Covalent,
        InteractionType::Vdw,
        InteractionType::Aromatic,
        InteractionType::CationPi,
        InteractionType::Other,
    ];

    /// Position in [`InteractionType::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Lower-case key, e.g. "salt_bridge"
    pub fn key(&self) -> &'static str {
        match self {
            InteractionType::Hydrophobic => "hydrophobic",
            InteractionType::Hbond => "hbond",
            InteractionType::SaltBridge => "salt_bridge",
            InteractionType::Covalent => "covalent",
            InteractionType::Vdw => "vdw",
            InteractionType::Aromatic => "aromatic",
            InteractionType::CationPi => "cation_pi",
            InteractionType::Other => "other",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One classified receptor-ligand atom pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRecord<'a> {
    pub category: InteractionType,
    pub receptor: &'a Atom,
    pub ligand: &'a Atom,
    /// Index of `receptor` in the receptor molecule
    pub receptor_index: usize,
    /// Index of `ligand` in the ligand molecule
    pub ligand_index: usize,
    /// Receptor-ligand distance in Angstroms
    pub distance: f64,
    /// Donor-H-acceptor angle in degrees, hydrogen bonds only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

/// Classified pairs grouped by category.
///
/// Every category is always present. Within a category, records keep pair
/// enumeration order: receptor atom index first, then ligand atom index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult<'a> {
    records: [Vec<InteractionRecord<'a>>; 8],
}

impl<'a> ClassificationResult<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: InteractionRecord<'a>) {
        self.records[record.category.index()].push(record);
    }

    /// Append every record of `other` after the records already held
    pub(crate) fn append(&mut self, other: ClassificationResult<'a>) {
        for (mine, theirs) in self.records.iter_mut().zip(other.records) {
            mine.extend(theirs);
        }
    }

    /// Records of one category
    pub fn get(&self, category: InteractionType) -> &[InteractionRecord<'a>] {
        &self.records[category.index()]
    }

    /// All categories with their records, in report order
    pub fn iter(&self) -> impl Iterator<Item = (InteractionType, &[InteractionRecord<'a>])> + '_ {
        InteractionType::ALL
            .iter()
            .map(move |&category| (category, self.get(category)))
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record count per category, in report order
    pub fn counts(&self) -> Vec<(InteractionType, usize)> {
        self.iter().map(|(category, records)| (category, records.len())).collect()
    }
}

/// Serialises as a map from category key to records, in report order
impl Serialize for ClassificationResult<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(InteractionType::ALL.len()))?;
        for (category, records) in self.iter() {
            map.serialize_entry(category.key(), records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Element;
    use nalgebra::Vector3;

    fn carbon(name: &str) -> Atom {
        Atom::new(
            Element::Carbon,
            Vector3::zeros(),
            name.to_string(),
            1,
            "ALA".to_string(),
            1,
            'A',
        )
    }

    #[test]
    fn test_category_order_and_keys() {
        let keys: Vec<&str> = InteractionType::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec!["hydrophobic", "hbond", "salt_bridge", "covalent", "vdw", "aromatic", "cation_pi", "other"]
        );
        for (i, category) in InteractionType::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_empty_result_has_every_category() {
        let result = ClassificationResult::new();
        assert_eq!(result.iter().count(), 8);
        assert!(result.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 8);
        assert!(map["cation_pi"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let a = carbon("C1");
        let b = carbon("C2");
        let record = |receptor_index: usize| InteractionRecord {
            category: InteractionType::Hydrophobic,
            receptor: &a,
            ligand: &b,
            receptor_index,
            ligand_index: 0,
            distance: 3.0,
            angle: None,
        };

        let mut first = ClassificationResult::new();
        first.push(record(0));
        let mut second = ClassificationResult::new();
        second.push(record(1));
        second.push(record(2));

        first.append(second);
        let order: Vec<usize> = first
            .get(InteractionType::Hydrophobic)
            .iter()
            .map(|r| r.receptor_index)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(first.len(), 3);
        assert_eq!(first.counts()[0], (InteractionType::Hydrophobic, 3));
    }
}
