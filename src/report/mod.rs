//! Consumers of a finished analysis: text and JSON reports, visualization

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::atom::{chain_label, residue_label, Atom, ResidueId};
use crate::interaction::{Analysis, ClassificationResult, InteractionType};

/// Errors that can occur while writing results
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Categories drawn by [`visualize`], with their colors
pub const VISUALIZED: [(InteractionType, &str); 4] = [
    (InteractionType::Hbond, "cyan"),
    (InteractionType::SaltBridge, "magenta"),
    (InteractionType::Covalent, "yellow"),
    (InteractionType::Hydrophobic, "orange"),
];

/// Default report file name for a receptor/ligand pair
pub fn default_report_name(receptor: &str, ligand: &str) -> String {
    format!("{}_{}_interactions.txt", receptor, ligand)
}

/// Write the plain-text report: one block per category, in report order.
///
/// Each block is a `<CATEGORY> INTERACTIONS:` header, one line per record
/// and a blank line. Empty categories still get their header.
pub fn format_text_report<W: Write>(result: &ClassificationResult<'_>, out: &mut W) -> Result<(), ReportError> {
    for (category, records) in result.iter() {
        writeln!(out, "{} INTERACTIONS:", category.key().to_uppercase())?;
        for record in records {
            writeln!(
                out,
                "{} -- {} : {:.2} Å",
                record.receptor, record.ligand, record.distance
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write the plain-text report to `path`, replacing any existing file
pub fn write_text_report<P: AsRef<Path>>(result: &ClassificationResult<'_>, path: P) -> Result<(), ReportError> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    format_text_report(result, &mut file)?;
    file.flush()?;

    info!("Results saved to file: {}", path.as_ref().display());
    Ok(())
}

/// Write the full analysis (contacts and interactions) as pretty JSON
pub fn write_json_report<P: AsRef<Path>>(analysis: &Analysis<'_>, path: P) -> Result<(), ReportError> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    let value = serde_json::json!({
        "contacts": analysis.contacts,
        "interactions": analysis.interactions,
        "counts": analysis
            .interactions
            .iter()
            .map(|(category, records)| (category.key().to_string(), serde_json::Value::from(records.len())))
            .collect::<serde_json::Map<String, serde_json::Value>>(),
    });
    serde_json::to_writer_pretty(&mut file, &value)?;
    writeln!(file)?;
    file.flush()?;

    info!("JSON report saved to file: {}", path.as_ref().display());
    Ok(())
}

/// Receives drawing requests for a finished analysis
pub trait VisualizationSink {
    /// Show whole residues of one object
    fn show_residues(&mut self, object: &str, residues: &[ResidueId]) -> Result<(), ReportError>;

    /// Draw a dashed marker between two atoms, collected under `group`
    fn draw_dashed(
        &mut self,
        group: &str,
        receptor_object: &str,
        receptor: &Atom,
        ligand_object: &str,
        ligand: &Atom,
    ) -> Result<(), ReportError>;

    /// Show the markers of `group` as dashes in `color`
    fn color_group(&mut self, group: &str, color: &str) -> Result<(), ReportError>;
}

/// Feed the interacting residues and the visualized categories to `sink`
pub fn visualize<S: VisualizationSink + ?Sized>(
    analysis: &Analysis<'_>,
    receptor_object: &str,
    ligand_object: &str,
    sink: &mut S,
) -> Result<(), ReportError> {
    sink.show_residues(receptor_object, &analysis.contacts.receptor_residues)?;
    sink.show_residues(ligand_object, &analysis.contacts.ligand_residues)?;

    for (category, color) in VISUALIZED {
        let records = analysis.interactions.get(category);
        if records.is_empty() {
            continue;
        }

        let group = format!("{}_bonds", category.key());
        for record in records {
            sink.draw_dashed(&group, receptor_object, record.receptor, ligand_object, record.ligand)?;
        }
        sink.color_group(&group, color)?;
    }
    Ok(())
}

/// Writes PyMOL commands (a `.pml` script) for the requests it receives
pub struct PymolScript<W: Write> {
    out: W,
}

impl<W: Write> PymolScript<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Flush buffered commands and hand back the writer
    pub fn finish(mut self) -> Result<W, ReportError> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn atom_selection(object: &str, atom: &Atom) -> String {
        format!(
            "{}//{}/{}/{}",
            object,
            chain_label(atom.chain_id),
            residue_label(atom.residue_num, atom.insertion_code),
            atom.name
        )
    }
}

impl PymolScript<BufWriter<File>> {
    /// Create a script file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> VisualizationSink for PymolScript<W> {
    fn show_residues(&mut self, object: &str, residues: &[ResidueId]) -> Result<(), ReportError> {
        for residue in residues {
            writeln!(
                self.out,
                "show sticks, {}//{}/{}/",
                object,
                chain_label(residue.chain_id),
                residue_label(residue.residue_num, residue.insertion_code)
            )?;
        }
        Ok(())
    }

    fn draw_dashed(
        &mut self,
        group: &str,
        receptor_object: &str,
        receptor: &Atom,
        ligand_object: &str,
        ligand: &Atom,
    ) -> Result<(), ReportError> {
        writeln!(
            self.out,
            "distance {}, {}, {}",
            group,
            Self::atom_selection(receptor_object, receptor),
            Self::atom_selection(ligand_object, ligand)
        )?;
        Ok(())
    }

    fn color_group(&mut self, group: &str, color: &str) -> Result<(), ReportError> {
        writeln!(self.out, "show dashes, {}", group)?;
        writeln!(self.out, "color {}, {}", color, group)?;
        Ok(())
    }
}
