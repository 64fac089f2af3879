//! Receptor-ligand contact classification

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::contacts::{find_close_contacts, CloseContacts};
use crate::hydrogen::add_polar_hydrogens;
use crate::interaction::rules::{self, Candidate, RuleContext};
use crate::interaction::{ClassificationResult, ClassifyError, InteractionRecord};
use crate::molecule::Molecule;

/// Outcome of one receptor-ligand analysis
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    /// Admitted atoms and interacting residues
    pub contacts: CloseContacts,

    /// Classified pairs by category
    pub interactions: ClassificationResult<'a>,
}

/// Classifies every close receptor-ligand atom pair into one category
#[derive(Debug, Clone, Default)]
pub struct InteractionClassifier {
    pub config: AnalysisConfig,
}

impl InteractionClassifier {
    /// Create a classifier with the given configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Validate a structure and add polar hydrogens if it has none.
    ///
    /// Returns the number of hydrogens added.
    pub fn prepare(&self, molecule: &mut Molecule) -> Result<usize, ClassifyError> {
        molecule.validate()?;
        if !self.config.add_hydrogens || molecule.has_hydrogens() {
            return Ok(0);
        }

        let added = add_polar_hydrogens(molecule)?;
        info!("Added {} polar hydrogens to {}", added, molecule.name);
        Ok(added)
    }

    /// Classify one pair, or `None` if it lies beyond the cutoff
    pub fn classify_pair<'a>(
        &self,
        ctx: &RuleContext<'a>,
        receptor: &'a Molecule,
        receptor_index: usize,
        ligand: &'a Molecule,
        ligand_index: usize,
    ) -> Option<InteractionRecord<'a>> {
        let candidate = Candidate {
            receptor: receptor.atoms.get(receptor_index)?,
            receptor_index,
            ligand: ligand.atoms.get(ligand_index)?,
            ligand_index,
            distance: receptor.atoms[receptor_index].distance(&ligand.atoms[ligand_index]),
        };
        if candidate.distance > self.config.cutoff {
            return None;
        }

        let (category, evidence) = rules::evaluate(ctx, &candidate);
        Some(InteractionRecord {
            category,
            receptor: candidate.receptor,
            ligand: candidate.ligand,
            receptor_index,
            ligand_index,
            distance: candidate.distance,
            angle: evidence.angle,
        })
    }

    /// Classify all close pairs between `receptor` and `ligand`.
    ///
    /// Both structures are validated first. With `parallel` set, receptor
    /// atoms are distributed over the rayon pool and the partial results are
    /// concatenated in receptor order, giving the same output as the serial
    /// path.
    pub fn classify<'a>(
        &self,
        receptor: &'a Molecule,
        ligand: &'a Molecule,
    ) -> Result<Analysis<'a>, ClassifyError> {
        self.config.validate()?;
        receptor.validate()?;
        ligand.validate()?;

        if !receptor.has_hydrogens() && !ligand.has_hydrogens() {
            warn!(
                "Neither {} nor {} contains hydrogens; no hydrogen bonds can be detected",
                receptor.name, ligand.name
            );
        }

        let contacts = find_close_contacts(
            receptor,
            ligand,
            self.config.cutoff,
            self.config.grid_threshold,
        )?;
        debug!(
            "{} receptor and {} ligand atoms within {:.2} Å",
            contacts.receptor_atoms.len(),
            contacts.ligand_atoms.len(),
            self.config.cutoff
        );

        let pairs = contacts.pair_count();
        if let Some(budget) = self.config.max_pairs {
            if pairs > budget {
                return Err(ClassifyError::PairBudgetExceeded { pairs, budget });
            }
        }

        let ctx = RuleContext::new(
            receptor,
            ligand,
            self.config.thresholds,
            self.config.hydrogen_search,
        );
        let ligand_atoms = &contacts.ligand_atoms;
        let classify_receptor_atom = |&r_idx: &usize| {
            let mut partial = ClassificationResult::new();
            for &l_idx in ligand_atoms {
                if let Some(record) = self.classify_pair(&ctx, receptor, r_idx, ligand, l_idx) {
                    partial.push(record);
                }
            }
            partial
        };

        let interactions = if self.config.parallel {
            contacts
                .receptor_atoms
                .par_iter()
                .map(classify_receptor_atom)
                .collect::<Vec<_>>()
                .into_iter()
                .fold(ClassificationResult::new(), |mut merged, partial| {
                    merged.append(partial);
                    merged
                })
        } else {
            let mut merged = ClassificationResult::new();
            for r_idx in &contacts.receptor_atoms {
                merged.append(classify_receptor_atom(r_idx));
            }
            merged
        };

        for (category, count) in interactions.counts() {
            debug!("{}: {}", category, count);
        }
        info!(
            "Classified {} contacts between {} and {} ({} candidate pairs)",
            interactions.len(),
            receptor.name,
            ligand.name,
            pairs
        );

        Ok(Analysis {
            contacts,
            interactions,
        })
    }
}
