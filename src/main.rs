//! Main executable for rustpisa

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};

use rustpisa::config::{AnalysisConfig, HydrogenSearch};
use rustpisa::interaction::InteractionClassifier;
use rustpisa::io::{object_name, parse_dlg, write_pdbqt};
use rustpisa::report::{
    default_report_name, visualize, write_json_report, write_text_report, PymolScript,
};
use rustpisa::session::Session;

/// Command-line arguments for the application
#[derive(Parser, Debug)]
#[clap(
    name = "pisa",
    version = rustpisa::VERSION,
    about = "Classify receptor-ligand atom contacts into interaction categories"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find and classify the interactions between a receptor and a ligand
    Analyze {
        /// Structure files to load (PDB, PDBQT or AutoDock DLG)
        #[clap(value_parser, required = true)]
        inputs: Vec<PathBuf>,

        /// Receptor object name (default: first object whose name contains "rec")
        #[clap(long)]
        receptor: Option<String>,

        /// Ligand object name (default: first object whose name contains "lig")
        #[clap(long)]
        ligand: Option<String>,

        /// Configuration file with `key = value` settings
        #[clap(long, short, value_parser)]
        config: Option<PathBuf>,

        /// Distance cutoff for candidate pairs (Angstroms)
        #[clap(long)]
        cutoff: Option<f64>,

        /// Directory for the report (must exist)
        #[clap(long, value_parser, default_value = ".")]
        out_dir: PathBuf,

        /// Report file, overriding the default <receptor>_<ligand>_interactions.txt
        #[clap(long, short, value_parser)]
        out: Option<PathBuf>,

        /// Also write a JSON report to this file
        #[clap(long, value_parser)]
        json: Option<PathBuf>,

        /// Also write a PyMOL script drawing the interactions
        #[clap(long, value_parser)]
        pymol: Option<PathBuf>,

        /// Classify receptor atoms in parallel
        #[clap(long)]
        parallel: bool,

        /// Do not add polar hydrogens to structures without hydrogens
        #[clap(long)]
        no_hydrogens: bool,

        /// Hydrogen bond test: donor-only or donor-then-acceptor
        #[clap(long)]
        hydrogen_search: Option<HydrogenSearch>,

        /// Fail when more candidate pairs than this would be classified
        #[clap(long)]
        max_pairs: Option<usize>,
    },

    /// Split the docked poses of an AutoDock DLG file into PDBQT files
    Poses {
        /// AutoDock docking log
        #[clap(value_parser)]
        dlg: PathBuf,

        /// Output directory (default: the directory of the DLG file)
        #[clap(long, value_parser)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Parse command-line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            inputs,
            receptor,
            ligand,
            config,
            cutoff,
            out_dir,
            out,
            json,
            pymol,
            parallel,
            no_hydrogens,
            hydrogen_search,
            max_pairs,
        } => {
            let mut config = match config {
                Some(path) => AnalysisConfig::from_file(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?,
                None => AnalysisConfig::default(),
            };

            // Command-line flags override the config file
            if let Some(cutoff) = cutoff {
                config.cutoff = cutoff;
            }
            if let Some(mode) = hydrogen_search {
                config.hydrogen_search = mode;
            }
            if max_pairs.is_some() {
                config.max_pairs = max_pairs;
            }
            config.parallel |= parallel;
            config.add_hydrogens &= !no_hydrogens;
            config.validate().context("Invalid configuration")?;
            debug!("Configuration: {:?}", config);

            let mut session = Session::new();
            for path in &inputs {
                session
                    .load(path)
                    .with_context(|| format!("Failed to load structure file: {}", path.display()))?;
            }

            let (receptor_name, ligand_name) = session
                .resolve(receptor.as_deref(), ligand.as_deref())
                .context("Cannot determine receptor and ligand")?;
            info!("Receptor: {}, ligand: {}", receptor_name, ligand_name);

            let output_path = match out {
                Some(path) => path,
                None => {
                    if !out_dir.is_dir() {
                        anyhow::bail!("Output directory does not exist: {}", out_dir.display());
                    }
                    out_dir.join(default_report_name(&receptor_name, &ligand_name))
                }
            };

            let classifier = InteractionClassifier::new(config);
            for name in [&receptor_name, &ligand_name] {
                classifier
                    .prepare(session.get_mut(name)?)
                    .with_context(|| format!("Invalid structure: {}", name))?;
            }

            let receptor_molecule = session.get(&receptor_name)?;
            let ligand_molecule = session.get(&ligand_name)?;
            let analysis = classifier
                .classify(receptor_molecule, ligand_molecule)
                .context("Classification failed")?;

            write_text_report(&analysis.interactions, &output_path).with_context(|| {
                format!("Failed to write report to {}", output_path.display())
            })?;

            if let Some(json_path) = json {
                write_json_report(&analysis, &json_path).with_context(|| {
                    format!("Failed to write JSON report to {}", json_path.display())
                })?;
            }

            if let Some(script_path) = pymol {
                let mut script = PymolScript::create(&script_path).with_context(|| {
                    format!("Failed to create PyMOL script: {}", script_path.display())
                })?;
                visualize(&analysis, &receptor_name, &ligand_name, &mut script)?;
                script.finish().with_context(|| {
                    format!("Failed to write PyMOL script: {}", script_path.display())
                })?;
                info!("PyMOL script saved to file: {}", script_path.display());
            }

            for (category, count) in analysis.interactions.counts() {
                info!("{:>12}: {}", category.key(), count);
            }
            info!("Analysis completed successfully");
        }

        Commands::Poses { dlg, dir } => {
            let out_dir = match dir {
                Some(dir) => dir,
                None => dlg
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            };

            let poses = parse_dlg(&dlg)
                .with_context(|| format!("Failed to read docking log: {}", dlg.display()))?;
            info!("Found {} poses in {}", poses.len(), object_name(&dlg));

            for pose in &poses {
                let path = out_dir.join(format!("{}.pdbqt", pose.name));
                write_pdbqt(pose, &path)
                    .with_context(|| format!("Failed to write pose to {}", path.display()))?;
                info!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
