//! RustPISA: receptor-ligand interaction analysis
//!
//! This library finds the atom pairs of a receptor and a ligand that lie
//! within a distance cutoff and classifies each pair into exactly one
//! interaction category (hydrogen bond, salt bridge, hydrophobic, ...) by an
//! ordered rule cascade. Results can be written as a text or JSON report and
//! drawn through a visualization sink.

pub mod atom;
pub mod config;
pub mod contacts;
pub mod grid;
pub mod hydrogen;
pub mod interaction;
pub mod io;
pub mod math;
pub mod molecule;
pub mod report;
pub mod session;

// Re-export commonly used types and functions
pub use atom::Atom;
pub use config::AnalysisConfig;
pub use interaction::{Analysis, ClassificationResult, InteractionClassifier, InteractionType};
pub use molecule::Molecule;
pub use session::Session;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
