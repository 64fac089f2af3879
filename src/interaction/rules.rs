//! The ordered rule table of the contact classifier
//!
//! Each rule pairs a category with a predicate over one candidate pair. The
//! classifier walks [`CASCADE`] from the top and the first matching rule
//! decides the category, so a pair that qualifies as a salt bridge is never
//! reported as hydrophobic. Charge and aromaticity are approximated by the
//! standard PDB atom names of the charged and ring side-chain atoms.

use crate::atom::Atom;
use crate::config::{HydrogenSearch, RuleThresholds};
use crate::hydrogen::HydrogenLocator;
use crate::interaction::InteractionType;
use crate::math;
use crate::molecule::Molecule;

/// Terminal atoms of Lys, Arg, His, Asn side chains
pub const POSITIVE_ATOM_NAMES: [&str; 6] = ["NZ", "NH1", "NH2", "NE", "ND1", "ND2"];

/// Carboxylate oxygens of Asp and Glu
pub const NEGATIVE_ATOM_NAMES: [&str; 4] = ["OD1", "OD2", "OE1", "OE2"];

/// Cationic nitrogens of Lys and Arg
pub const CATION_ATOM_NAMES: [&str; 4] = ["NZ", "NH1", "NH2", "NE"];

/// Ring atoms of Phe, Tyr, Trp, His
pub const AROMATIC_ATOM_NAMES: [&str; 7] = ["CG", "CD1", "CD2", "CE1", "CE2", "CZ", "CH"];

fn named(atom: &Atom, names: &[&str]) -> bool {
    names.contains(&atom.name.as_str())
}

/// One receptor atom, one ligand atom and their distance
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub receptor: &'a Atom,
    pub receptor_index: usize,
    pub ligand: &'a Atom,
    pub ligand_index: usize,
    pub distance: f64,
}

/// Evidence returned by a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleMatch {
    /// Donor-H-acceptor angle, set by the hydrogen bond rule
    pub angle: Option<f64>,
}

/// Everything the predicates read besides the pair itself
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub thresholds: RuleThresholds,
    pub hydrogen_search: HydrogenSearch,
    receptor_hydrogens: HydrogenLocator<'a>,
    ligand_hydrogens: HydrogenLocator<'a>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        receptor: &'a Molecule,
        ligand: &'a Molecule,
        thresholds: RuleThresholds,
        hydrogen_search: HydrogenSearch,
    ) -> Self {
        Self {
            thresholds,
            hydrogen_search,
            receptor_hydrogens: HydrogenLocator::new(receptor, thresholds.hydrogen_bond_length),
            ligand_hydrogens: HydrogenLocator::new(ligand, thresholds.hydrogen_bond_length),
        }
    }

    /// Donor-H-acceptor angle of the pair, if a bonded hydrogen exists.
    ///
    /// The receptor atom is tried as donor first. Only when it carries no
    /// hydrogen, and the search mode allows it, is the ligand atom tried.
    /// The first hydrogen found decides; its angle is not retried on the
    /// other side.
    pub fn donor_angle(&self, candidate: &Candidate<'_>) -> Option<f64> {
        if let Some(h) = self.receptor_hydrogens.nearest_hydrogen(candidate.receptor_index) {
            return Some(math::angle(
                &candidate.receptor.coordinates,
                &h.coordinates,
                &candidate.ligand.coordinates,
            ));
        }

        if self.hydrogen_search == HydrogenSearch::DonorThenAcceptor {
            if let Some(h) = self.ligand_hydrogens.nearest_hydrogen(candidate.ligand_index) {
                return Some(math::angle(
                    &candidate.ligand.coordinates,
                    &h.coordinates,
                    &candidate.receptor.coordinates,
                ));
            }
        }

        None
    }
}

/// A predicate over one candidate pair
pub type Predicate = fn(&RuleContext<'_>, &Candidate<'_>) -> Option<RuleMatch>;

/// A category and the predicate that assigns it
#[derive(Clone, Copy)]
pub struct Rule {
    pub category: InteractionType,
    pub predicate: Predicate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("category", &self.category).finish()
    }
}

/// Rules in priority order; the first match wins
pub const CASCADE: [Rule; 8] = [
    Rule { category: InteractionType::Hbond, predicate: is_hbond },
    Rule { category: InteractionType::SaltBridge, predicate: is_salt_bridge },
    Rule { category: InteractionType::Hydrophobic, predicate: is_hydrophobic },
    Rule { category: InteractionType::Aromatic, predicate: is_aromatic },
    Rule { category: InteractionType::CationPi, predicate: is_cation_pi },
    Rule { category: InteractionType::Covalent, predicate: is_covalent },
    Rule { category: InteractionType::Vdw, predicate: is_vdw },
    Rule { category: InteractionType::Other, predicate: is_other },
];

fn accept(condition: bool) -> Option<RuleMatch> {
    condition.then(RuleMatch::default)
}

/// Polar pair within 3.5 Å whose donor-H-acceptor angle exceeds 120°
pub fn is_hbond(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    if c.distance > ctx.thresholds.hbond_distance || !(c.receptor.is_polar() && c.ligand.is_polar()) {
        return None;
    }

    let angle = ctx.donor_angle(c)?;
    (angle > ctx.thresholds.hbond_min_angle).then_some(RuleMatch { angle: Some(angle) })
}

/// Positive and negative side-chain atoms, in either order
pub fn is_salt_bridge(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    let opposite_charges = (named(c.receptor, &POSITIVE_ATOM_NAMES) && named(c.ligand, &NEGATIVE_ATOM_NAMES))
        || (named(c.receptor, &NEGATIVE_ATOM_NAMES) && named(c.ligand, &POSITIVE_ATOM_NAMES));
    accept(c.distance <= ctx.thresholds.salt_bridge_distance && opposite_charges)
}

/// Both atoms carbon or sulfur
pub fn is_hydrophobic(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    accept(
        c.distance <= ctx.thresholds.hydrophobic_distance
            && c.receptor.is_hydrophobic()
            && c.ligand.is_hydrophobic(),
    )
}

/// Both atoms named as aromatic ring atoms
pub fn is_aromatic(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    accept(
        c.distance <= ctx.thresholds.aromatic_distance
            && named(c.receptor, &AROMATIC_ATOM_NAMES)
            && named(c.ligand, &AROMATIC_ATOM_NAMES),
    )
}

/// A cationic nitrogen facing an aromatic ring atom, in either order
pub fn is_cation_pi(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    let cation_facing_ring = (named(c.receptor, &CATION_ATOM_NAMES) && named(c.ligand, &AROMATIC_ATOM_NAMES))
        || (named(c.ligand, &CATION_ATOM_NAMES) && named(c.receptor, &AROMATIC_ATOM_NAMES));
    accept(c.distance <= ctx.thresholds.cation_pi_distance && cation_facing_ring)
}

/// Strictly closer than the covalent limit
pub fn is_covalent(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    accept(c.distance < ctx.thresholds.covalent_distance)
}

/// Between the covalent and contact limits, and neither a hydrogen bond nor
/// hydrophobic when tested on its own
pub fn is_vdw(ctx: &RuleContext<'_>, c: &Candidate<'_>) -> Option<RuleMatch> {
    let in_range = c.distance > ctx.thresholds.covalent_distance && c.distance <= ctx.thresholds.vdw_distance;
    accept(in_range && is_hbond(ctx, c).is_none() && is_hydrophobic(ctx, c).is_none())
}

pub fn is_other(_ctx: &RuleContext<'_>, _c: &Candidate<'_>) -> Option<RuleMatch> {
    Some(RuleMatch::default())
}

/// Category of a pair already known to be within the cutoff
pub fn evaluate(ctx: &RuleContext<'_>, candidate: &Candidate<'_>) -> (InteractionType, RuleMatch) {
    CASCADE
        .iter()
        .find_map(|rule| (rule.predicate)(ctx, candidate).map(|m| (rule.category, m)))
        .unwrap_or((InteractionType::Other, RuleMatch::default()))
}
