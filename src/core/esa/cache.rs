// cache.rs - FVC side array and the depth-10 lcp-interval cache (spec §4.3
// steps 4-5)

use super::child_table;
use super::interval::LcpInterval;

/// Depth of the precomputed lcp-interval cache: 4^10 entries, indexed by
/// the 2-bit packing of a 10-character ACGT prefix.
pub const CACHE_DEPTH: usize = 10;
pub const CACHE_SIZE: usize = 1 << (2 * CACHE_DEPTH);

pub fn nucleotide_code(c: u8) -> Option<usize> {
    match c {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// `FVC[i] = RS[SA[i] + LCP[i]]`, the first byte at which suffix `i`
/// differs from its left LCP neighbour. Left undefined (0) at `i == 0`
/// (no left neighbour) and where `SA[i] + LCP[i]` runs off the end of the
/// text (a leaf that terminates matching, per spec §4.3 step 4).
pub fn build_fvc(text: &[u8], sa: &[usize], lcp: &[i64]) -> Vec<u8> {
    let n = sa.len();
    let mut fvc = vec![0u8; n];
    for i in 0..n {
        let l = lcp[i];
        if l < 0 {
            continue;
        }
        let pos = sa[i] as i64 + l;
        if pos >= 0 && (pos as usize) < text.len() {
            fvc[i] = text[pos as usize];
        }
    }
    fvc
}

struct CacheBuilder<'a> {
    text: &'a [u8],
    sa: &'a [usize],
    lcp: &'a [i64],
    cld: &'a [i64],
    fvc: &'a [u8],
}

/// Builds the lcp-interval cache by DFS from `root`, descending through
/// {A,C,G,T} at each level. Implicit edges longer than one character are
/// fast-forwarded by reading `text` directly rather than calling `descend`
/// again. Dead paths (an empty interval, or a non-ACGT byte hit during
/// fast-forward) fill their entire cache subtree with the last interval
/// actually reached, so every lookup returns something safe to resume
/// `longest_match_from` at.
pub fn build_cache(
    text: &[u8],
    sa: &[usize],
    lcp: &[i64],
    cld: &[i64],
    fvc: &[u8],
    root: LcpInterval,
) -> Vec<LcpInterval> {
    let ctx = CacheBuilder {
        text,
        sa,
        lcp,
        cld,
        fvc,
    };
    let mut cache = vec![LcpInterval::EMPTY; CACHE_SIZE];
    fill(&ctx, root, 0, 0, &mut cache);
    cache
}

fn fill(ctx: &CacheBuilder, interval: LcpInterval, mut depth: usize, mut code: usize, cache: &mut [LcpInterval]) {
    let mut cur = interval;

    // Fast-forward through any implicit characters already covered by
    // `cur.l` beyond the current depth; they are forced, not a branch.
    while !cur.is_empty() && depth < CACHE_DEPTH && (cur.l as usize) > depth {
        let pos = ctx.sa[cur.i as usize] + depth;
        let ch = ctx.text[pos];
        match nucleotide_code(ch) {
            Some(idx) => {
                code = (code << 2) | idx;
                depth += 1;
            }
            None => {
                let truncated = LcpInterval {
                    l: depth as i64,
                    ..cur
                };
                fill_subtree(cache, code, depth, truncated);
                return;
            }
        }
    }

    if depth == CACHE_DEPTH {
        cache[code] = cur;
        return;
    }

    for &c in &[b'A', b'C', b'G', b'T'] {
        let idx = nucleotide_code(c).unwrap();
        let next_code = (code << 2) | idx;
        if cur.is_empty() {
            fill_subtree(cache, next_code, depth + 1, cur);
            continue;
        }
        let descended = descend_raw(ctx, cur, c);
        if descended.is_empty() {
            fill_subtree(cache, next_code, depth + 1, cur);
        } else {
            fill(ctx, descended, depth + 1, next_code, cache);
        }
    }
}

fn fill_subtree(cache: &mut [LcpInterval], code_prefix: usize, depth: usize, interval: LcpInterval) {
    if depth == CACHE_DEPTH {
        cache[code_prefix] = interval;
        return;
    }
    for idx in 0..4 {
        fill_subtree(cache, (code_prefix << 2) | idx, depth + 1, interval);
    }
}

/// Standalone copy of `descend` used only while building the cache, so
/// `cache.rs` has no dependency on `match_engine.rs` (which depends on the
/// finished `Esa`, including this cache).
fn descend_raw(ctx: &CacheBuilder, ij: LcpInterval, a: u8) -> LcpInterval {
    let l = ij.l;
    if ij.is_singleton() {
        let pos = ctx.sa[ij.i as usize] as i64 + l;
        if pos >= 0 && (pos as usize) < ctx.text.len() && ctx.text[pos as usize] == a {
            return LcpInterval {
                l: l + 1,
                i: ij.i,
                j: ij.i,
                m: -1,
            };
        }
        return LcpInterval::EMPTY;
    }

    let mut i = ij.i;
    let mut m = ij.m;
    loop {
        let is_boundary = m >= 0 && (m as usize) < ctx.lcp.len() && ctx.lcp[m as usize] == l;
        let c = if i == ij.i {
            let pos = ctx.sa[i as usize] as i64 + l;
            if pos >= 0 && (pos as usize) < ctx.text.len() {
                ctx.text[pos as usize]
            } else {
                0
            }
        } else {
            ctx.fvc[i as usize]
        };

        let seg_end = if is_boundary { m - 1 } else { ij.j };

        if c == a {
            let boundary = if is_boundary { m } else { ij.j + 1 };
            let new_m = child_table::l(ctx.cld, boundary);
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
        m = child_table::r(ctx.cld, m);
    }
}
