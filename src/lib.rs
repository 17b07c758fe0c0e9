// lib.rs - andist library root

//! # andist - alignment-free pairwise whole-genome distance estimator
//!
//! Estimates pairwise evolutionary distances between unaligned whole-genome
//! DNA sequences. For each subject an enhanced suffix array (ESA) is built;
//! every other sequence is then swept as a query to find maximal unique
//! matches (anchors), which bracket conserved regions whose nucleotide
//! substitutions are tallied into a 4x4 mutation matrix and converted to a
//! distance under a chosen evolutionary model. Bootstrap resampling of the
//! per-pair tallies yields confidence matrices.

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod fasta;
pub mod output;

/// Convenience re-exports for the common entry points.
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Config, ValidationResult};
    pub use crate::core::{run_bootstrap, run_pairwise, DiagnosticFlags, Esa, Model, MutationMatrix, PairwiseTable, Scheduling};
    pub use crate::data::{normalize, Sequence, Subject};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::fasta::load_sequences;
    pub use crate::output::write_report;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
