// estimator.rs - Anchor/divergence state machine (spec §4.5)

use crate::core::esa::Esa;
use crate::core::mutation::{nucleotide_index, MutationMatrix};

#[derive(Clone, Copy, Debug)]
struct Anchor {
    pos_s: i64,
    pos_q: i64,
    length: i64,
}

impl Anchor {
    const EMPTY: Anchor = Anchor {
        pos_s: -1,
        pos_q: -1,
        length: 0,
    };

    fn is_empty(&self) -> bool {
        self.pos_q < 0
    }

    fn end_s(&self) -> i64 {
        self.pos_s + self.length
    }

    fn end_q(&self) -> i64 {
        self.pos_q + self.length
    }
}

/// Common prefix length of two byte slices, ACGT-only: a separator byte on
/// either side terminates the run (spec §4.2, §4.4 "dollar/separator byte
/// ... terminates the extension").
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    let mut l = 0;
    while l < a.len() && l < b.len() {
        if nucleotide_index(a[l]).is_none() || nucleotide_index(b[l]).is_none() {
            break;
        }
        if a[l] != b[l] {
            break;
        }
        l += 1;
    }
    l
}

fn tally_equal_run(ret: &mut MutationMatrix, q: &[u8], pos_q: i64, length: i64) {
    if length <= 0 || pos_q < 0 {
        return;
    }
    let start = pos_q as usize;
    let end = ((pos_q + length) as usize).min(q.len());
    for &c in &q[start..end] {
        ret.add_equal(c);
    }
}

fn tally_bridge(ret: &mut MutationMatrix, esa: &Esa, q: &[u8], end_s: i64, end_q: i64, pos_s: i64, pos_q: i64) {
    let len = (pos_s - end_s).max(0) as usize;
    for k in 0..len {
        let s_idx = (end_s as usize) + k;
        let q_idx = (end_q as usize) + k;
        if s_idx >= esa.text.len() || q_idx >= q.len() {
            break;
        }
        ret.add_pair(esa.text[s_idx], q[q_idx]);
    }
}

/// Drives the match engine over `q` against the subject ESA `esa` (whose
/// anchor-length threshold is `threshold`), accumulating a mutation matrix
/// over every homologous region found (spec §4.5).
pub fn estimate(esa: &Esa, threshold: usize, q: &[u8]) -> MutationMatrix {
    let t = threshold as i64;
    let qlen = q.len() as i64;
    let mut ret = MutationMatrix::zero(q.len() as u64);

    if qlen == 0 {
        return ret;
    }

    let mut last = Anchor::EMPTY;
    let mut last_was_right = false;
    let mut pos_q: i64 = 0;

    while pos_q < qlen {
        let mut this = Anchor {
            pos_s: 0,
            pos_q,
            length: 0,
        };
        let mut accepted = false;

        // 1. Lucky-anchor shortcut.
        if !last.is_empty() && pos_q - last.end_q() <= t {
            let try_pos_s = last.pos_s + (pos_q - last.pos_q);
            if try_pos_s >= 0 && (try_pos_s as usize) < esa.text.len() {
                let l = common_prefix_len(&esa.text[try_pos_s as usize..], &q[pos_q as usize..]);
                if l as i64 >= t {
                    this.pos_s = try_pos_s;
                    this.length = l as i64;
                    accepted = true;
                }
            }
        }

        // 2. Suffix-array lookup.
        if !accepted {
            let m = esa.longest_match(&q[pos_q as usize..]);
            this.length = m.l.max(0);
            if m.is_singleton() && m.l >= t {
                this.pos_s = esa.sa[m.i as usize] as i64;
                accepted = true;
            }
        }

        // 3. Pairing / tallying.
        if accepted {
            let end_s = last.end_s();
            let end_q = last.end_q();
            if !last.is_empty() && this.pos_s > end_s && (this.pos_q - end_q) == (this.pos_s - end_s) {
                tally_equal_run(&mut ret, q, last.pos_q, last.length);
                tally_bridge(&mut ret, esa, q, end_s, end_q, this.pos_s, this.pos_q);
                last_was_right = true;
            } else {
                if last_was_right {
                    tally_equal_run(&mut ret, q, last.pos_q, last.length);
                } else if last.length >= 2 * t {
                    tally_equal_run(&mut ret, q, last.pos_q, last.length);
                }
                last_was_right = false;
            }
            last = this;
        }

        // 4. Advance past the current non-extendable mismatch.
        pos_q = this.pos_q + this.length + 1;
    }

    if last.length >= qlen {
        let mut whole = MutationMatrix::zero(q.len() as u64);
        for &c in q {
            whole.add_equal(c);
        }
        return whole;
    }

    if last_was_right || last.length >= 2 * t {
        tally_equal_run(&mut ret, q, last.pos_q, last.length);
    }

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::esa::Esa;
    use crate::data::Subject;

    fn subject_esa(s: &crate::data::Sequence) -> (Subject<'_>, Esa) {
        let subj = Subject::derive(s, 0.025);
        let esa = Esa::build(&s.name, &subj.rs).unwrap();
        (subj, esa)
    }

    #[test]
    fn identical_sequences_tally_as_fully_equal() {
        let s = crate::data::Sequence {
            name: "s0".into(),
            bytes: b"ACGTACGTACGTACGTACGTACGTACGTACGT".to_vec(),
        };
        let (subj, esa) = subject_esa(&s);
        let m = estimate(&esa, subj.threshold, &s.bytes);
        assert_eq!(m.total(), s.bytes.len() as u64);
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    assert_eq!(m.counts[i][j], 0);
                }
            }
        }
    }

    #[test]
    fn unrelated_sequences_tally_little_or_nothing() {
        let s = crate::data::Sequence {
            name: "s0".into(),
            bytes: b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_vec(),
        };
        let q = b"TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT".to_vec();
        let (subj, esa) = subject_esa(&s);
        let m = estimate(&esa, subj.threshold, &q);
        assert_eq!(m.counts[0][0], 0);
    }
}
