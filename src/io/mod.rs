//! Input/output for receptor and ligand structures

use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::atom::{Atom, Element};
use crate::molecule::Molecule;

/// Errors that can occur during file I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Structure file formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    /// PDB, element symbol in columns 77-78
    Pdb,
    /// AutoDock PDBQT, AutoDock atom type in columns 78-79
    Pdbqt,
    /// AutoDock docking log with `DOCKED:` poses in PDBQT format
    Dlg,
}

impl StructureFormat {
    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, IoError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdb" | "ent" => Ok(StructureFormat::Pdb),
            "pdbqt" => Ok(StructureFormat::Pdbqt),
            "dlg" => Ok(StructureFormat::Dlg),
            other => Err(IoError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Name used for a structure loaded from `path`
pub fn object_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Fixed-column field, empty when the line is too short
fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_column<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    what: &str,
    line_number: usize,
) -> Result<T, IoError> {
    let field = column(line, start, end);
    field.parse::<T>().map_err(|_| IoError::Parse {
        line: line_number,
        message: format!("Invalid {}: '{}'", what, field),
    })
}

/// Parse an ATOM/HETATM record
fn parse_atom_record(line: &str, line_number: usize, format: StructureFormat) -> Result<Atom, IoError> {
    if line.len() < 54 {
        return Err(IoError::Parse {
            line: line_number,
            message: format!("Line too short for atom record: {}", line),
        });
    }

    let serial = parse_column::<u32>(line, 6, 11, "atom serial number", line_number).unwrap_or(0);
    let name = column(line, 12, 16).to_string();
    let residue_name = column(line, 17, 20).to_string();
    let chain_id = column(line, 21, 22).chars().next().unwrap_or(' ');
    let residue_num = parse_column::<i32>(line, 22, 26, "residue number", line_number)?;
    let insertion_code = column(line, 26, 27).chars().next().unwrap_or(' ');

    let x = parse_column::<f64>(line, 30, 38, "x coordinate", line_number)?;
    let y = parse_column::<f64>(line, 38, 46, "y coordinate", line_number)?;
    let z = parse_column::<f64>(line, 46, 54, "z coordinate", line_number)?;

    let (element, segment) = match format {
        StructureFormat::Pdb => {
            let symbol = column(line, 76, 78);
            let element = if symbol.is_empty() {
                Element::from_atom_name(&name)
            } else {
                Element::from_symbol(symbol)
            };
            (element, column(line, 72, 76))
        }
        StructureFormat::Pdbqt | StructureFormat::Dlg => {
            let ad_type = column(line, 77, 79);
            let element = if ad_type.is_empty() {
                Element::from_atom_name(&name)
            } else {
                Element::from_autodock_type(ad_type)
            };
            // Columns 71-76 hold the partial charge in PDBQT
            (element, "")
        }
    };

    Ok(Atom::new(
        element,
        Vector3::new(x, y, z),
        name,
        serial,
        residue_name,
        residue_num,
        chain_id,
    )
    .with_insertion_code(insertion_code)
    .with_segment(segment))
}

/// Parse numbered lines of a PDB or PDBQT file; only the first model is read
fn parse_lines<'l, I>(lines: I, name: &str, format: StructureFormat) -> Result<Molecule, IoError>
where
    I: IntoIterator<Item = (usize, &'l str)>,
{
    let mut molecule = Molecule::new(name);
    let mut seen_model = false;

    for (line_number, line) in lines {
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let atom = parse_atom_record(line, line_number, format)?;
            molecule.add_atom(atom);
        } else if line.starts_with("MODEL") {
            if seen_model {
                break;
            }
            seen_model = true;
        } else if line.starts_with("ENDMDL") {
            break;
        }
    }

    Ok(molecule)
}

/// Parse PDB or PDBQT text into a molecule named `name`
pub fn parse_structure_str(content: &str, name: &str, format: StructureFormat) -> Result<Molecule, IoError> {
    if format == StructureFormat::Dlg {
        return Err(IoError::InvalidFormat(
            "docking logs hold several poses; use parse_dlg_str".to_string(),
        ));
    }
    parse_lines(content.lines().enumerate().map(|(i, l)| (i + 1, l)), name, format)
}

/// Parse a PDB or PDBQT file, named after its file stem
pub fn parse_structure<P: AsRef<Path>>(path: P) -> Result<Molecule, IoError> {
    let format = StructureFormat::from_path(&path)?;
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_structure_str(&content, &object_name(&path), format)
}

/// Extract docked poses from the `DOCKED:` lines of an AutoDock log.
///
/// Poses are delimited by `MODEL`/`ENDMDL` and named `<stem>_pose<N>`,
/// counting from 1.
pub fn parse_dlg_str(content: &str, stem: &str) -> Result<Vec<Molecule>, IoError> {
    let mut models: Vec<Vec<(usize, &str)>> = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();

    let docked = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with("DOCKED:"))
        .map(|(i, line)| (i + 1, line.get(8..).unwrap_or("")));

    for (line_number, line) in docked {
        if line.starts_with("MODEL") {
            if !current.is_empty() {
                models.push(std::mem::take(&mut current));
            }
        } else if line.starts_with("ENDMDL") {
            models.push(std::mem::take(&mut current));
        } else {
            current.push((line_number, line));
        }
    }
    if !current.is_empty() {
        models.push(current);
    }

    let poses = models
        .into_iter()
        .enumerate()
        .map(|(idx, lines)| {
            parse_lines(lines, &format!("{}_pose{}", stem, idx + 1), StructureFormat::Dlg)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if poses.iter().all(Molecule::is_empty) {
        return Err(IoError::InvalidFormat(format!("no docked poses found in {}", stem)));
    }

    Ok(poses)
}

/// Extract docked poses from an AutoDock `.dlg` file
pub fn parse_dlg<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>, IoError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_dlg_str(&content, &object_name(&path))
}

/// Load every structure held by a file: one for PDB/PDBQT, one per pose for DLG
pub fn load_structures<P: AsRef<Path>>(path: P) -> Result<Vec<Molecule>, IoError> {
    match StructureFormat::from_path(&path)? {
        StructureFormat::Dlg => parse_dlg(path),
        _ => Ok(vec![parse_structure(path)?]),
    }
}

/// PDB-style atom name: names shorter than four characters start in column 14
fn padded_name(name: &str) -> String {
    if name.len() >= 4 {
        name.chars().take(4).collect()
    } else {
        format!(" {:<3}", name)
    }
}

/// Write a molecule to a PDBQT file
pub fn write_pdbqt<P: AsRef<Path>>(molecule: &Molecule, path: P) -> Result<(), IoError> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "REMARK {} written by rustpisa", molecule.name)?;

    for (i, atom) in molecule.atoms.iter().enumerate() {
        writeln!(
            file,
            "ATOM  {:5} {:4} {:>3} {:1}{:4}{:1}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}    {:6.3} {:<2}",
            i + 1, // 1-based index
            padded_name(&atom.name),
            atom.residue_name,
            atom.chain_id,
            atom.residue_num,
            atom.insertion_code,
            atom.coordinates.x,
            atom.coordinates.y,
            atom.coordinates.z,
            1.0, // Occupancy
            0.0, // Temperature factor
            0.0, // Partial charge
            atom.element.to_autodock_type()
        )?;
    }

    writeln!(file, "END")?;
    file.flush()?;

    Ok(())
}
