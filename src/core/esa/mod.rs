// mod.rs - Enhanced suffix array: SA + LCP + CLD + FVC + lcp-interval cache
// (spec §4.3)

pub mod cache;
pub mod child_table;
pub mod interval;
pub mod lcp;
pub mod sa;

pub use interval::LcpInterval;

use crate::error::CoreError;

/// An enhanced suffix array over one subject's `RS` text (the subject's
/// reverse-complement-concatenated form, with one trailing oracle sentinel
/// appended by [`sa::build_suffix_array`]). Owns four dense positional
/// arrays plus the lcp-interval cache; there are no back-references
/// between them (spec §9 "Pointer-rich ESA").
pub struct Esa {
    pub text: Vec<u8>,
    pub sa: Vec<usize>,
    pub lcp: Vec<i64>,
    pub cld: Vec<i64>,
    pub fvc: Vec<u8>,
    pub cache: Vec<LcpInterval>,
    pub root: LcpInterval,
}

impl Esa {
    /// Builds the full ESA over `rs`. `subject_name` is only used to label
    /// a [`CoreError::SubjectIndexFailed`] if construction cannot proceed.
    pub fn build(subject_name: &str, rs: &[u8]) -> Result<Esa, CoreError> {
        if rs.is_empty() {
            return Err(CoreError::SubjectIndexFailed {
                subject: subject_name.to_string(),
                reason: "RS is empty".to_string(),
            });
        }

        let sa = sa::build_suffix_array(rs);
        let mut text = Vec::with_capacity(rs.len() + 1);
        text.extend_from_slice(rs);
        text.push(sa::SENTINEL);

        let lcp = lcp::build_lcp(&text, &sa);
        let cld = child_table::build_child_table(&lcp);
        let fvc = cache::build_fvc(&text, &sa, &lcp);

        let n = text.len() as i64;
        let root_m = child_table::l(&cld, n);
        if root_m < 0 || (root_m as usize) >= lcp.len() {
            return Err(CoreError::SubjectIndexFailed {
                subject: subject_name.to_string(),
                reason: "degenerate child table: no root l-index".to_string(),
            });
        }
        let root = LcpInterval {
            l: lcp[root_m as usize],
            i: 0,
            j: n - 1,
            m: root_m,
        };

        let cache = cache::build_cache(&text, &sa, &lcp, &cld, &fvc, root);

        Ok(Esa {
            text,
            sa,
            lcp,
            cld,
            fvc,
            cache,
            root,
        })
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_succeeds_on_a_small_rs() {
        let rs = b"ACGT#ACGT".to_vec();
        let esa = Esa::build("s0", &rs).unwrap();
        assert_eq!(esa.sa.len(), rs.len() + 1);
        assert_eq!(esa.lcp.len(), rs.len() + 2);
        assert!(!esa.root.is_empty());
    }

    #[test]
    fn lcp_fvc_consistency_holds(
    ) {
        // Invariant 1 (spec §8): RS[SA[i-1]..SA[i-1]+LCP[i]) ==
        // RS[SA[i]..SA[i]+LCP[i]), and FVC[i] is the first differing byte.
        let rs = b"BANANABANDANA#BANANABANDANA".to_vec();
        let esa = Esa::build("s0", &rs).unwrap();
        for i in 1..esa.sa.len() {
            let l = esa.lcp[i];
            if l < 0 {
                continue;
            }
            let l = l as usize;
            let a = esa.sa[i - 1];
            let b = esa.sa[i];
            assert_eq!(&esa.text[a..a + l], &esa.text[b..b + l]);
            let pos_b = b + l;
            if pos_b < esa.text.len() {
                assert_eq!(esa.fvc[i], esa.text[pos_b]);
            }
        }
    }
}
