// lcp.rs - LCP array construction via the PHI/PLCP method (spec §4.3 step 2)

/// Builds `LCP[0..=n]` from `text` (length `n`) and its suffix array `sa`.
/// `LCP[0] = LCP[n] = -1`; for `0 < i < n`, `LCP[i]` is the length of the
/// common prefix of `text[sa[i-1]..]` and `text[sa[i]..]`.
///
/// Uses the PHI array: `PHI[sa[i]] = sa[i-1]` (undefined for `i == 0`), then
/// sweeps `k` over `0..n` computing `PLCP[k]` by extending the previous
/// match length by at most one step per position (Kasai's trick applied to
/// the permuted array), and finally permutes `PLCP` through `sa` to get
/// `LCP`.
pub fn build_lcp(text: &[u8], sa: &[usize]) -> Vec<i64> {
    let n = sa.len();
    if n == 0 {
        return vec![-1];
    }

    const NO_PRED: usize = usize::MAX;
    let mut phi = vec![NO_PRED; n];
    for i in 1..n {
        phi[sa[i]] = sa[i - 1];
    }

    let mut plcp = vec![0i64; n];
    let mut l: usize = 0;
    for k in 0..n {
        if phi[k] == NO_PRED {
            plcp[k] = 0;
            l = 0;
            continue;
        }
        let j = phi[k];
        while k + l < n && j + l < n && text[k + l] == text[j + l] {
            l += 1;
        }
        plcp[k] = l as i64;
        l = l.saturating_sub(1);
    }

    let mut lcp = vec![0i64; n + 1];
    lcp[0] = -1;
    lcp[n] = -1;
    for i in 1..n {
        lcp[i] = plcp[sa[i]];
    }
    lcp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::esa::sa::build_suffix_array;

    fn naive_lcp(text: &[u8], sa: &[usize]) -> Vec<i64> {
        let n = sa.len();
        let mut lcp = vec![0i64; n + 1];
        lcp[0] = -1;
        lcp[n] = -1;
        for i in 1..n {
            let a = &text[sa[i - 1]..];
            let b = &text[sa[i]..];
            let l = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
            lcp[i] = l as i64;
        }
        lcp
    }

    #[test]
    fn matches_naive_lcp_on_a_small_text() {
        let rs = b"BANANA#BANANA".to_vec();
        let sa = build_suffix_array(&rs);
        let mut text = rs.clone();
        text.push(crate::core::esa::sa::SENTINEL);

        let lcp = build_lcp(&text, &sa);
        let expected = naive_lcp(&text, &sa);
        assert_eq!(lcp, expected);
    }
}
