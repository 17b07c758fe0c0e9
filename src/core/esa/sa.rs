// sa.rs - Suffix array oracle (spec §2 item 2, §4.3 step 1)
//
// The core treats suffix-array construction as an external collaborator; it
// never reimplements SA-IS/DC3 itself. `bio`'s `suffix_array` needs its
// input to end in a byte that is strictly smaller than every other byte and
// occurs nowhere else in the text (see the FM-index construction in
// `bio::data_structures::suffix_array`, which appends `b'$'` for the same
// reason). `RS` already contains `#` (35) as its smallest separator, so a
// literal `$` (36) would not be safe; `0u8` is.

use bio::data_structures::suffix_array::{suffix_array, RawSuffixArray};

pub const SENTINEL: u8 = 0;

/// Builds the suffix array of `rs` extended with one trailing [`SENTINEL`]
/// byte. The returned array therefore has `rs.len() + 1` entries; the last
/// logical suffix (the sentinel alone) never participates in a match since
/// `SENTINEL` is not ACGT.
pub fn build_suffix_array(rs: &[u8]) -> RawSuffixArray {
    let mut text = Vec::with_capacity(rs.len() + 1);
    text.extend_from_slice(rs);
    text.push(SENTINEL);
    suffix_array(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_array_is_a_permutation() {
        let rs = b"ACGT#ACGT".to_vec();
        let sa = build_suffix_array(&rs);
        assert_eq!(sa.len(), rs.len() + 1);
        let mut sorted = sa.clone();
        sorted.sort_unstable();
        let expected: Vec<usize> = (0..sa.len()).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn suffix_array_orders_suffixes_lexicographically() {
        let rs = b"BANANA".to_vec();
        let sa = build_suffix_array(&rs);
        let mut text = rs.clone();
        text.push(SENTINEL);
        for w in sa.windows(2) {
            assert!(text[w[0]..] <= text[w[1]..]);
        }
    }
}
