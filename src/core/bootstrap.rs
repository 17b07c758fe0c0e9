// bootstrap.rs - Bootstrap resampling of pairwise mutation counts (spec
// §4.8)

use rand::Rng;
use rand_distr::{Binomial, Distribution};

use crate::core::driver::PairwiseTable;
use crate::core::mutation::MutationMatrix;

/// One resampled N×N table; symmetric by construction (`matrices[i][j] ==
/// matrices[j][i]`), diagonal is the canonical identity.
pub struct BootstrapReplicate {
    pub matrices: Vec<Vec<MutationMatrix>>,
}

impl BootstrapReplicate {
    pub fn get(&self, i: usize, j: usize) -> &MutationMatrix {
        &self.matrices[i][j]
    }
}

/// Draws `n[0..16) ~ Multinomial(N, p)` via the sequential-conditional-
/// binomial method: peel off cells one at a time, each as a binomial draw
/// conditioned on what's left of the probability mass and the count budget,
/// and hand the last cell whatever remains exactly (so counts always sum
/// to `N`).
fn resample<R: Rng>(base: &MutationMatrix, rng: &mut R) -> MutationMatrix {
    let total = base.total();
    let mut out = MutationMatrix::zero(base.seq_len);
    if total == 0 {
        return out;
    }

    let flat: Vec<u64> = base.counts.iter().flatten().copied().collect();
    let mut remaining_n = total;
    let mut remaining_p = 1.0f64;
    let mut draws = [0u64; 16];

    for (k, &count) in flat.iter().enumerate().take(15) {
        let p = count as f64 / total as f64;
        let draw = if remaining_n == 0 || remaining_p <= 0.0 {
            0
        } else {
            let cond_p = (p / remaining_p).clamp(0.0, 1.0);
            let binom = Binomial::new(remaining_n, cond_p).expect("valid binomial parameters");
            binom.sample(rng)
        };
        draws[k] = draw;
        remaining_n -= draw;
        remaining_p -= p;
    }
    draws[15] = remaining_n;

    for (k, &n) in draws.iter().enumerate() {
        out.counts[k / 4][k % 4] = n;
    }
    out
}

/// Produces `k` bootstrap replicates of `table` (spec §4.8). The RNG is
/// single-threaded and driven sequentially across replicates and pairs
/// (spec §5 "the RNG used for bootstrap").
pub fn run_bootstrap<R: Rng>(table: &PairwiseTable, k: usize, rng: &mut R) -> Vec<BootstrapReplicate> {
    let n = table.n;
    let mut bases: Vec<Vec<Option<MutationMatrix>>> = vec![vec![None; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            bases[i][j] = Some(table.get(i, j).combined_with(table.get(j, i)));
        }
    }

    let mut replicates = Vec::with_capacity(k);
    for _ in 0..k {
        let mut matrices = vec![vec![MutationMatrix::identity(); n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let base = bases[i][j].as_ref().expect("computed above");
                let resampled = resample(base, rng);
                matrices[i][j] = resampled;
                matrices[j][i] = resampled;
            }
        }
        replicates.push(BootstrapReplicate { matrices });
    }
    replicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::driver::{DiagnosticFlags, Scheduling};
    use crate::data::Sequence;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table_of(sequences: &[Sequence]) -> PairwiseTable {
        let flags = DiagnosticFlags::new();
        crate::core::driver::run_pairwise(sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap()
    }

    #[test]
    fn idempotent_on_degenerate_singleton_pairs() {
        // Identical sequences produce a singleton (all-equal) base matrix;
        // every replicate must reproduce it exactly.
        let sequences = vec![
            Sequence {
                name: "a".into(),
                bytes: b"ACGTACGTACGTACGTACGTACGTACGTACGT".to_vec(),
            },
            Sequence {
                name: "b".into(),
                bytes: b"ACGTACGTACGTACGTACGTACGTACGTACGT".to_vec(),
            },
        ];
        let table = table_of(&sequences);
        let mut rng = StdRng::seed_from_u64(7);
        let replicates = run_bootstrap(&table, 5, &mut rng);
        let base = table.get(0, 1).combined_with(table.get(1, 0));
        for r in &replicates {
            assert_eq!(r.get(0, 1), &base);
        }
    }

    #[test]
    fn replicate_counts_conserve_the_total() {
        let sequences = vec![
            Sequence {
                name: "a".into(),
                bytes: b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT".to_vec(),
            },
            Sequence {
                name: "b".into(),
                bytes: b"ACGTACGTACGTACGTACGTACGTACGTAAGTACGTACGTACGT".to_vec(),
            },
        ];
        let table = table_of(&sequences);
        let base = table.get(0, 1).combined_with(table.get(1, 0));
        let mut rng = StdRng::seed_from_u64(11);
        let replicates = run_bootstrap(&table, 3, &mut rng);
        for r in &replicates {
            assert_eq!(r.get(0, 1).total(), base.total());
        }
    }
}
