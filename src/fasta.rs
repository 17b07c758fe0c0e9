// fasta.rs - FASTA input collaborator (spec §6 "Input sequences";
// SPEC_FULL.md §11 "--join contig gluing")

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;

use crate::core::driver::DiagnosticFlags;
use crate::data::{normalize, Sequence, GENOME_SEP};
use crate::error::CoreError;

/// Reads `paths` into normalized sequences, setting the non-ACGT /
/// short-sequence [`DiagnosticFlags`] as normalization observes them.
///
/// In `join` mode every record within one file is glued with `!` into a
/// single genome named after the file stem, mirroring `andi -j`; otherwise
/// every FASTA record becomes its own sequence, named by its id.
pub fn load_sequences(paths: &[String], join: bool, flags: &DiagnosticFlags) -> Result<Vec<Sequence>, CoreError> {
    let mut sequences = Vec::new();
    for path in paths {
        if join {
            sequences.push(load_joined(path, flags)?);
        } else {
            load_records(path, flags, &mut sequences)?;
        }
    }
    Ok(sequences)
}

fn open_reader(path: &str) -> Result<fasta::Reader<BufReader<File>>, CoreError> {
    let file = File::open(path)?;
    Ok(fasta::Reader::new(BufReader::new(file)))
}

fn load_records(path: &str, flags: &DiagnosticFlags, out: &mut Vec<Sequence>) -> Result<(), CoreError> {
    let reader = open_reader(path)?;
    for record_result in reader.records() {
        let record = record_result.map_err(|e| CoreError::InvalidInput {
            reason: format!("invalid FASTA record in '{}': {}", path, e),
        })?;
        out.push(normalize_record(record.id(), record.seq(), flags)?);
    }
    Ok(())
}

fn load_joined(path: &str, flags: &DiagnosticFlags) -> Result<Sequence, CoreError> {
    let reader = open_reader(path)?;
    let mut glued = Vec::new();
    let mut first = true;
    for record_result in reader.records() {
        let record = record_result.map_err(|e| CoreError::InvalidInput {
            reason: format!("invalid FASTA record in '{}': {}", path, e),
        })?;
        if !first {
            glued.push(GENOME_SEP);
        }
        glued.extend_from_slice(record.seq());
        first = false;
    }
    normalize_record(&stem_name(path), &glued, flags)
}

fn normalize_record(name: &str, raw: &[u8], flags: &DiagnosticFlags) -> Result<Sequence, CoreError> {
    let normalized = normalize(name, raw)?;
    if normalized.had_non_acgt {
        flags.set_non_acgt();
    }
    if normalized.short_sequence {
        flags.set_short_sequence();
    }
    Ok(normalized.sequence)
}

fn stem_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
