// interval.rs - lcp-interval type (spec §3 "lcp-interval")

/// An lcp-interval `{l, i, j, m}`: `[i, j]` is the inclusive SA range of all
/// suffixes sharing a common prefix of length `l`; `m` is the l-index used
/// to descend further (the first index in `(i, j]` whose own LCP equals
/// `l`). The empty interval is the sentinel `i = j = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcpInterval {
    pub l: i64,
    pub i: i64,
    pub j: i64,
    pub m: i64,
}

impl LcpInterval {
    pub const EMPTY: LcpInterval = LcpInterval {
        l: 0,
        i: -1,
        j: -1,
        m: -1,
    };

    pub fn is_empty(&self) -> bool {
        self.i < 0 || self.j < 0
    }

    pub fn is_singleton(&self) -> bool {
        !self.is_empty() && self.i == self.j
    }
}

impl Default for LcpInterval {
    fn default() -> Self {
        LcpInterval::EMPTY
    }
}
