// shustring.rs - Shustring cumulative probability and anchor-length threshold (spec §4.9)

/// `P{shustring_len <= x}` under a Bernoulli(p) model over a string of
/// length `l`, with `p` the per-symbol match probability (`gc/2` at the
/// call site). Binomial coefficients are accumulated iteratively (`C(x,k)`
/// from `C(x,k-1)`) to avoid the overflow a direct factorial would hit for
/// realistic `x`. The running sum is clamped to `1.0` the first time it
/// would exceed it, per spec.
pub fn shuprop(x: usize, p: f64, l: usize) -> f64 {
    let q = 0.5 - p;
    let two_x = 2f64.powi(x as i32);

    let mut sum = 0.0_f64;
    let mut binom = 1.0_f64; // C(x, 0)
    for k in 0..=x {
        if k > 0 {
            binom *= (x - k + 1) as f64 / k as f64;
        }
        let base = p.powi(k as i32) * q.powi((x - k) as i32);
        let summand = binom * two_x * base * (1.0 - base).powi(l as i32);

        sum += summand;
        if sum > 1.0 {
            return 1.0;
        }
    }
    sum
}

/// Smallest `x` such that `shuprop(x, g/2, l) >= 1 - p_value` (spec §4.9,
/// §3 "threshold"). Used to derive the per-subject anchor-length cutoff
/// from the subject's GC content and `RS` length.
pub fn min_anchor_length(p_value: f64, gc: f64, l: usize) -> usize {
    let p = gc / 2.0;
    let target = 1.0 - p_value;

    let mut x = 0usize;
    // Anchor lengths beyond a few hundred bases would imply a pathologically
    // repetitive genome; cap the search so malformed input can't loop forever.
    while x < 100_000 {
        if shuprop(x, p, l) >= target {
            return x;
        }
        x += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuprop_is_monotonic_in_x() {
        let mut prev = 0.0;
        for x in 0..40 {
            let cur = shuprop(x, 0.25, 10_000);
            assert!(cur + 1e-12 >= prev, "shuprop should be non-decreasing in x");
            prev = cur;
        }
    }

    #[test]
    fn min_anchor_length_straddles_threshold() {
        let p_value = 0.025;
        let gc = 0.5;
        let l = 20_001;
        let threshold = min_anchor_length(p_value, gc, l);
        let p = gc / 2.0;
        assert!(shuprop(threshold, p, l) >= 1.0 - p_value);
        if threshold > 0 {
            assert!(shuprop(threshold - 1, p, l) < 1.0 - p_value);
        }
    }

    #[test]
    fn min_anchor_length_grows_with_sequence_length() {
        let short = min_anchor_length(0.025, 0.5, 2_001);
        let long = min_anchor_length(0.025, 0.5, 2_000_001);
        assert!(long >= short);
    }
}
