// child_table.rs - CLD (child table) construction (spec §4.3 step 3)
//
// A single array packs the enhanced suffix array's up/down/next-l-index
// fields, per Abouelhoda/Ohlebusch: `R(i) = cld[i]`, `L(i) = cld[i - 1]`.
// `UNDEFINED` marks a slot the match engine never needs to read.

pub const UNDEFINED: i64 = -1;

/// Builds the child table from `lcp` (length `n + 1`, `lcp[0] = lcp[n] =
/// -1`) by one stack-based pass. Runs of equal LCP values are linked
/// together through `R`, so the match engine can walk all l-indices that
/// share a common-prefix depth without revisiting the stack.
pub fn build_child_table(lcp: &[i64]) -> Vec<i64> {
    let n = lcp.len() - 1;
    let mut cld = vec![UNDEFINED; n + 1];
    cld[0] = (n + 1) as i64;

    let mut stack: Vec<(i64, i64)> = vec![(0, -1)];
    for k in 1..=n as i64 {
        let lcp_k = lcp[k as usize];

        while stack.last().unwrap().1 > lcp_k {
            // top is a leaf; pop it.
            let mut last = stack.pop().unwrap();

            // link every element sharing last's lcp value into one chain.
            while stack.last().unwrap().1 == last.1 {
                let (top_idx, _) = *stack.last().unwrap();
                cld[top_idx as usize] = last.0;
                last = stack.pop().unwrap();
            }

            // store the l-index of last.
            let (top_idx, top_lcp) = *stack.last().unwrap();
            if lcp_k < top_lcp {
                cld[top_idx as usize] = last.0;
            } else {
                cld[(k - 1) as usize] = last.0;
            }
        }

        stack.push((k, lcp_k));
    }

    cld
}

/// `R(i)`, the down/next-l-index field.
pub fn r(cld: &[i64], i: i64) -> i64 {
    cld[i as usize]
}

/// `L(i)`, the up field.
pub fn l(cld: &[i64], i: i64) -> i64 {
    cld[(i - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::esa::lcp::build_lcp;
    use crate::core::esa::sa::{build_suffix_array, SENTINEL};

    #[test]
    fn root_r_points_past_the_first_branch() {
        let rs = b"BANANA#BANANA".to_vec();
        let sa = build_suffix_array(&rs);
        let mut text = rs.clone();
        text.push(SENTINEL);
        let lcp = build_lcp(&text, &sa);
        let cld = build_child_table(&lcp);
        // The root's R-value must be a valid l-index within [1, n].
        let root_r = r(&cld, 0);
        assert!(root_r >= 1 && (root_r as usize) < lcp.len());
    }
}
