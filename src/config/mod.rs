//! Analysis configuration and config file parsing

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {key} at line {line}: {value}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },

    #[error("Cutoff must be a positive finite distance, got {0}")]
    InvalidCutoff(f64),
}

/// Which side of a polar pair is searched for a bonded hydrogen.
///
/// Two variants of the hydrogen bond test exist in practice: one only looks
/// at the receptor (donor) atom, the other falls back to the ligand
/// (acceptor) atom when the donor carries no hydrogen. Both are exposed so
/// results can be compared; `DonorThenAcceptor` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HydrogenSearch {
    DonorOnly,
    DonorThenAcceptor,
}

impl FromStr for HydrogenSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "donor-only" | "donor" => Ok(HydrogenSearch::DonorOnly),
            "donor-then-acceptor" | "both" => Ok(HydrogenSearch::DonorThenAcceptor),
            other => Err(format!("unknown hydrogen search mode: {}", other)),
        }
    }
}

/// Distance and angle limits of the classification rules (Angstroms, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Maximum donor-acceptor distance for a hydrogen bond
    pub hbond_distance: f64,
    /// Donor-H-acceptor angle must exceed this
    pub hbond_min_angle: f64,
    /// Maximum heavy atom to hydrogen distance (exclusive)
    pub hydrogen_bond_length: f64,
    pub salt_bridge_distance: f64,
    pub hydrophobic_distance: f64,
    pub aromatic_distance: f64,
    pub cation_pi_distance: f64,
    /// Pairs closer than this (exclusive) are covalent
    pub covalent_distance: f64,
    /// Upper bound of a van der Waals contact; the lower bound is `covalent_distance`
    pub vdw_distance: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            hbond_distance: 3.5,
            hbond_min_angle: 120.0,
            hydrogen_bond_length: crate::hydrogen::DEFAULT_BOND_LENGTH,
            salt_bridge_distance: 4.0,
            hydrophobic_distance: 4.0,
            aromatic_distance: 5.0,
            cation_pi_distance: 6.0,
            covalent_distance: 1.6,
            vdw_distance: 4.0,
        }
    }
}

/// Parameters of one receptor-ligand analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Pairs farther apart than this are never classified
    pub cutoff: f64,

    pub thresholds: RuleThresholds,

    pub hydrogen_search: HydrogenSearch,

    /// Add polar hydrogens to structures that contain none
    pub add_hydrogens: bool,

    /// Use the cell grid for proximity search once |R|·|L| exceeds this
    pub grid_threshold: usize,

    /// Classify receptor atoms in parallel
    pub parallel: bool,

    /// Refuse to classify when the admitted receptor and ligand subsets would
    /// form more candidate pairs than this; checked once before any pair is examined
    pub max_pairs: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cutoff: 4.0,
            thresholds: RuleThresholds::default(),
            hydrogen_search: HydrogenSearch::DonorThenAcceptor,
            add_hydrogens: true,
            grid_threshold: 250_000,
            parallel: false,
            max_pairs: None,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, line: usize) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        line,
    })
}

impl AnalysisConfig {
    /// Read a `key = value` configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_config_str(&content)
    }

    /// Parse `key = value` lines on top of the defaults.
    ///
    /// Blank lines and `#` comments are skipped, unknown keys are ignored
    /// with a warning.
    pub fn from_config_str(config_str: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (idx, line) in config_str.lines().enumerate() {
            let line_number = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("Ignoring config line {}: {}", line_number, line);
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let t = &mut config.thresholds;

            match key {
                "cutoff" => config.cutoff = parse_value(key, value, line_number)?,
                "hbond_distance" => t.hbond_distance = parse_value(key, value, line_number)?,
                "hbond_angle" | "hbond_min_angle" => {
                    t.hbond_min_angle = parse_value(key, value, line_number)?
                }
                "hydrogen_bond_length" => {
                    t.hydrogen_bond_length = parse_value(key, value, line_number)?
                }
                "salt_bridge_distance" => {
                    t.salt_bridge_distance = parse_value(key, value, line_number)?
                }
                "hydrophobic_distance" => {
                    t.hydrophobic_distance = parse_value(key, value, line_number)?
                }
                "aromatic_distance" => t.aromatic_distance = parse_value(key, value, line_number)?,
                "cation_pi_distance" => t.cation_pi_distance = parse_value(key, value, line_number)?,
                "covalent_distance" => t.covalent_distance = parse_value(key, value, line_number)?,
                "vdw_distance" => t.vdw_distance = parse_value(key, value, line_number)?,
                "hydrogen_search" => {
                    config.hydrogen_search = parse_value(key, value, line_number)?
                }
                "add_hydrogens" => config.add_hydrogens = parse_value(key, value, line_number)?,
                "grid_threshold" => config.grid_threshold = parse_value(key, value, line_number)?,
                "parallel" => config.parallel = parse_value(key, value, line_number)?,
                "max_pairs" => config.max_pairs = Some(parse_value(key, value, line_number)?),
                _ => warn!("Unknown config key at line {}: {}", line_number, key),
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(ConfigError::InvalidCutoff(self.cutoff));
        }
        Ok(())
    }
}
