// match_engine.rs - descend / longest_match_from / longest_match (spec §4.4)

use crate::core::esa::cache::{nucleotide_code, CACHE_DEPTH};
use crate::core::esa::{child_table, Esa, LcpInterval};

impl Esa {
    /// Extends a non-empty lcp-interval by one character `a`, returning the
    /// sub-interval whose common prefix is `a` at offset `ij.l`, or
    /// [`LcpInterval::EMPTY`] if `a` does not occur there.
    pub fn descend(&self, ij: LcpInterval, a: u8) -> LcpInterval {
        if ij.is_empty() {
            return LcpInterval::EMPTY;
        }
        let l = ij.l;

        if ij.is_singleton() {
            let pos = self.sa[ij.i as usize] as i64 + l;
            if pos >= 0 && (pos as usize) < self.text.len() && self.text[pos as usize] == a {
                return LcpInterval {
                    l: l + 1,
                    i: ij.i,
                    j: ij.i,
                    m: -1,
                };
            }
            return LcpInterval::EMPTY;
        }

        // Non-singleton: scan the children of `ij` in ascending order of
        // their branching character. The chain of l-indices rooted at
        // `ij.m` partitions [ij.i, ij.j] into consecutive child segments;
        // the first segment's character is read directly from the text
        // (there is no FVC entry pointing into it from outside), every
        // later segment's character is its starting l-index's FVC.
        let mut i = ij.i;
        let mut m = ij.m;
        loop {
            let is_boundary = m >= 0 && (m as usize) < self.lcp.len() && self.lcp[m as usize] == l;
            let c = if i == ij.i {
                let pos = self.sa[i as usize] as i64 + l;
                if pos >= 0 && (pos as usize) < self.text.len() {
                    self.text[pos as usize]
                } else {
                    0
                }
            } else {
                self.fvc[i as usize]
            };

            let seg_end = if is_boundary { m - 1 } else { ij.j };

            if c == a {
                let boundary = if is_boundary { m } else { ij.j + 1 };
                let new_m = child_table::l(&self.cld, boundary);
                return LcpInterval {
                    l: l + 1,
                    i,
                    j: seg_end,
                    m: new_m,
                };
            } else if c > a {
                return LcpInterval::EMPTY;
            }

            if !is_boundary {
                return LcpInterval::EMPTY;
            }
            i = m;
            m = child_table::r(&self.cld, m);
        }
    }

    /// Extends a match already known to cover `q[0..k)` at `ij`, against
    /// the rest of `q`. Switches to byte-level comparison against
    /// `RS[SA[ij.i]..]` the moment the interval becomes a singleton, and
    /// stops at the first mismatch, end of `q`, or a non-ACGT byte on
    /// either side (spec §4.4).
    pub fn longest_match_from(&self, q: &[u8], k: usize, ij: LcpInterval) -> LcpInterval {
        let mut cur = ij;
        let mut pos = k;

        loop {
            if cur.is_empty() {
                return LcpInterval {
                    l: pos as i64,
                    ..LcpInterval::EMPTY
                };
            }

            if cur.is_singleton() {
                let base = self.sa[cur.i as usize];
                pos = pos.max(cur.l as usize);
                while pos < q.len() && base + pos < self.text.len() {
                    let c = q[pos];
                    if nucleotide_code(c).is_none() || self.text[base + pos] != c {
                        break;
                    }
                    pos += 1;
                }
                return LcpInterval {
                    l: pos as i64,
                    i: cur.i,
                    j: cur.i,
                    m: -1,
                };
            }

            // A long implicit edge already covers past `pos`; those
            // characters are fixed by the subject text, not re-queried via
            // `descend` — copy them directly and stop at the first
            // mismatch.
            if (cur.l as usize) > pos {
                let extend_to = cur.l as usize;
                let base = self.sa[cur.i as usize];
                while pos < extend_to {
                    if pos >= q.len() || nucleotide_code(q[pos]).is_none() || self.text[base + pos] != q[pos] {
                        return LcpInterval {
                            l: pos as i64,
                            i: cur.i,
                            j: cur.j,
                            m: cur.m,
                        };
                    }
                    pos += 1;
                }
                continue;
            }

            if pos >= q.len() {
                return LcpInterval {
                    l: pos as i64,
                    i: cur.i,
                    j: cur.j,
                    m: cur.m,
                };
            }
            let c = q[pos];
            if nucleotide_code(c).is_none() {
                return LcpInterval {
                    l: pos as i64,
                    i: cur.i,
                    j: cur.j,
                    m: cur.m,
                };
            }
            let next = self.descend(cur, c);
            if next.is_empty() {
                return LcpInterval {
                    l: pos as i64,
                    i: cur.i,
                    j: cur.j,
                    m: cur.m,
                };
            }
            cur = next;
            pos += 1;
        }
    }

    /// Cache-accelerated entry point: packs the first `CACHE_DEPTH`
    /// characters of `q` into a 2-bit index and resumes from the cached
    /// interval. Falls back to a naive search from the root when `q` is
    /// shorter than `CACHE_DEPTH` or contains a non-ACGT byte in its
    /// prefix.
    pub fn longest_match(&self, q: &[u8]) -> LcpInterval {
        if q.len() >= CACHE_DEPTH {
            let mut code = 0usize;
            let mut prefix_ok = true;
            for &c in &q[..CACHE_DEPTH] {
                match nucleotide_code(c) {
                    Some(idx) => code = (code << 2) | idx,
                    None => {
                        prefix_ok = false;
                        break;
                    }
                }
            }
            if prefix_ok {
                let cached = self.cache[code];
                let k = cached.l.max(0) as usize;
                return self.longest_match_from(q, k.min(q.len()), cached);
            }
        }

        self.longest_match_from(q, 0, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_best_match(esa: &Esa, q: &[u8]) -> usize {
        let mut best = 0usize;
        for &start in &esa.sa {
            let mut l = 0usize;
            while l < q.len()
                && start + l < esa.text.len()
                && nucleotide_code(q[l]).is_some()
                && esa.text[start + l] == q[l]
            {
                l += 1;
            }
            best = best.max(l);
        }
        best
    }

    #[test]
    fn longest_match_finds_the_full_overlap() {
        let rs = b"ACGTACGTACGT#ACGTACGTACGT".to_vec();
        let esa = Esa::build("s0", &rs).unwrap();
        let q = b"ACGTACGTACGTAAAA".to_vec();
        let m = esa.longest_match(&q);
        let expected = naive_best_match(&esa, &q);
        assert_eq!(m.l as usize, expected);
    }

    #[test]
    fn longest_match_on_total_mismatch_is_zero_or_small() {
        let rs = b"AAAAAAAAAAAA#AAAAAAAAAAAA".to_vec();
        let esa = Esa::build("s0", &rs).unwrap();
        let q = b"TTTTTTTTTTTT".to_vec();
        let m = esa.longest_match(&q);
        assert_eq!(m.l, 0);
    }

    #[test]
    fn descend_matches_direct_substring_search() {
        let rs = b"GATTACA#GATTACA".to_vec();
        let esa = Esa::build("s0", &rs).unwrap();
        let substr = b"ATT";
        let mut ij = esa.root;
        for &c in substr {
            ij = esa.descend(ij, c);
            assert!(!ij.is_empty());
        }
        for k in ij.i..=ij.j {
            let start = esa.sa[k as usize];
            assert_eq!(&esa.text[start..start + substr.len()], substr);
        }
    }
}
