// driver.rs - Pairwise driver: scheduling, ESA lifecycle, diagnostics
// (spec §4.7, §5, §9 "Global option state")

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::esa::Esa;
use crate::core::estimator;
use crate::core::mutation::MutationMatrix;
use crate::data::{Sequence, Subject};
use crate::error::CoreError;

/// Outer-parallel (fast, one ESA per worker) or inner-parallel (low-memory,
/// one ESA shared by all workers at a time) scheduling, spec §4.7/§5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    OuterParallel,
    InnerParallel,
}

/// Cross-thread monotonic diagnostics, updated with atomic-or semantics
/// (spec §5, §9). `warnings` collects human-readable lines printed once,
/// after the matrix, by the caller.
#[derive(Default)]
pub struct DiagnosticFlags {
    non_acgt: AtomicBool,
    short_sequence: AtomicBool,
    soft_error: AtomicBool,
    warnings: Mutex<Vec<String>>,
}

impl DiagnosticFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_non_acgt(&self) {
        self.non_acgt.store(true, Ordering::Relaxed);
    }
    pub fn set_short_sequence(&self) {
        self.short_sequence.store(true, Ordering::Relaxed);
    }
    pub fn set_soft_error(&self) {
        self.soft_error.store(true, Ordering::Relaxed);
    }

    pub fn any_non_acgt(&self) -> bool {
        self.non_acgt.load(Ordering::Relaxed)
    }
    pub fn any_short_sequence(&self) -> bool {
        self.short_sequence.load(Ordering::Relaxed)
    }
    pub fn any_soft_error(&self) -> bool {
        self.soft_error.load(Ordering::Relaxed)
    }

    pub fn push_warning(&self, message: String) {
        self.warnings.lock().unwrap().push(message);
    }
    pub fn drain_warnings(&self) -> Vec<String> {
        std::mem::take(&mut self.warnings.lock().unwrap())
    }

    /// Exit code per spec §6: non-zero if any sequence was rejected or any
    /// pair surfaced a warning.
    pub fn exit_code(&self) -> i32 {
        if self.any_soft_error() {
            1
        } else {
            0
        }
    }
}

/// `M[0..N)[0..N)`: one mutation matrix per ordered pair, row-major by
/// subject index.
pub struct PairwiseTable {
    pub n: usize,
    pub matrices: Vec<Vec<MutationMatrix>>,
}

impl PairwiseTable {
    pub fn get(&self, i: usize, j: usize) -> &MutationMatrix {
        &self.matrices[i][j]
    }
}

/// Runs the full O(N²) pairwise comparison, filling `M` under the chosen
/// scheduling mode (spec §4.7 steps 1-2).
pub fn run_pairwise(
    sequences: &[Sequence],
    anchor_p_value: f64,
    scheduling: Scheduling,
    flags: &DiagnosticFlags,
) -> Result<PairwiseTable, CoreError> {
    let n = sequences.len();
    if n < 2 {
        return Err(CoreError::InvalidInput {
            reason: "at least two sequences are required".to_string(),
        });
    }
    n.checked_mul(n).ok_or_else(|| {
        CoreError::AllocationFailed(format!("{n} x {n} mutation matrix table would overflow"))
    })?;

    println!(
        "🧬 building pairwise table for {} sequences ({} ordered comparisons)",
        n,
        n * (n - 1)
    );
    let start = Instant::now();

    let pb = ProgressBar::new((n * n) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let matrices = match scheduling {
        Scheduling::OuterParallel => run_outer_parallel(sequences, anchor_p_value, &pb, flags),
        Scheduling::InnerParallel => run_inner_parallel(sequences, anchor_p_value, &pb, flags),
    };

    pb.finish_with_message("✅ pairwise table complete");
    println!(
        "✅ pairwise table computed in {:.2}s",
        start.elapsed().as_secs_f64()
    );

    Ok(PairwiseTable { n, matrices })
}

/// Outer-parallel: one worker per subject `i`, each owning its own ESA for
/// the duration of that subject's row. Workers never hold references into
/// each other's ESAs (spec §9 "Parallelism mapping").
fn run_outer_parallel(
    sequences: &[Sequence],
    anchor_p_value: f64,
    pb: &ProgressBar,
    flags: &DiagnosticFlags,
) -> Vec<Vec<MutationMatrix>> {
    (0..sequences.len())
        .into_par_iter()
        .map(|i| compute_row(sequences, i, anchor_p_value, pb, flags))
        .collect()
}

/// Inner-parallel (low-memory): the subject loop is sequential, so only one
/// ESA is ever live; the query loop is parallelized across workers that
/// share that ESA read-only.
fn run_inner_parallel(
    sequences: &[Sequence],
    anchor_p_value: f64,
    pb: &ProgressBar,
    flags: &DiagnosticFlags,
) -> Vec<Vec<MutationMatrix>> {
    let n = sequences.len();
    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let subj = Subject::derive(&sequences[i], anchor_p_value);
        let row = match Esa::build(&sequences[i].name, &subj.rs) {
            Ok(esa) => (0..n)
                .into_par_iter()
                .map(|j| {
                    let m = row_cell(&esa, &subj, sequences, i, j);
                    pb.inc(1);
                    m
                })
                .collect(),
            Err(_) => {
                flags.set_soft_error();
                pb.inc(n as u64);
                vec![nan_matrix(); n]
            }
        };
        rows.push(row);
    }
    rows
}

fn compute_row(
    sequences: &[Sequence],
    i: usize,
    anchor_p_value: f64,
    pb: &ProgressBar,
    flags: &DiagnosticFlags,
) -> Vec<MutationMatrix> {
    let n = sequences.len();
    let subj = Subject::derive(&sequences[i], anchor_p_value);

    let esa = match Esa::build(&sequences[i].name, &subj.rs) {
        Ok(esa) => esa,
        Err(_) => {
            flags.set_soft_error();
            pb.inc(n as u64);
            return vec![nan_matrix(); n];
        }
    };

    let mut row = Vec::with_capacity(n);
    for j in 0..n {
        row.push(row_cell(&esa, &subj, sequences, i, j));
        pb.inc(1);
    }
    row
}

fn row_cell(esa: &Esa, subj: &Subject, sequences: &[Sequence], i: usize, j: usize) -> MutationMatrix {
    if i == j {
        MutationMatrix::identity()
    } else {
        estimator::estimate(esa, subj.threshold, &sequences[j].bytes)
    }
}

fn nan_matrix() -> MutationMatrix {
    // A row fallback for a subject whose ESA failed to build: zero counts
    // against a zero seq_len so coverage is 0 and every estimator yields
    // NaN (N <= 3 short-circuits RAW/JC/KIMURA/LOGDET alike).
    MutationMatrix::zero(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sequence;

    fn seq(name: &str, bytes: &[u8]) -> Sequence {
        Sequence {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn diagonal_is_the_identity_convention() {
        let sequences = vec![
            seq("a", b"ACGTACGTACGTACGTACGTACGTACGTACGT"),
            seq("b", b"ACGTACGTACGTACGTACGTACGTACGTACGT"),
        ];
        let flags = DiagnosticFlags::new();
        let table = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap();
        for i in 0..2 {
            assert_eq!(table.get(i, i), &MutationMatrix::identity());
        }
    }

    #[test]
    fn outer_and_inner_parallel_agree() {
        let sequences = vec![
            seq("a", b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT"),
            seq("b", b"ACGTACGTACGTACGTACGTACGTACGTAAGTACGTACGT"),
            seq("c", b"TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT"),
        ];
        let flags_a = DiagnosticFlags::new();
        let flags_b = DiagnosticFlags::new();
        let outer = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags_a).unwrap();
        let inner = run_pairwise(&sequences, 0.025, Scheduling::InnerParallel, &flags_b).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(outer.get(i, j), inner.get(i, j));
            }
        }
    }
}
