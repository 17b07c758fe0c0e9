// sequence.rs - Sequence model, normalization, and subject derivation (spec §3, §4.1, §4.2)

use crate::core::shustring::min_anchor_length;
use crate::error::CoreError;

/// Separator byte joining contigs within one "join"-mode genome.
pub const GENOME_SEP: u8 = b'!';
/// Reverse-complement image of [`GENOME_SEP`]; keeps the joined form out of
/// the ACGT alphabet on the reverse strand too.
pub const GENOME_SEP_RC: u8 = b';';
/// Separator between the reverse complement and the forward strand inside
/// `RS`. Strictly smaller than every nucleotide and distinct from `!`/`;`.
pub const RS_SEP: u8 = b'#';

/// A normalized forward-strand sequence, as handed to the core by the FASTA
/// collaborator (spec §3 "Sequence (forward-only)").
#[derive(Debug, Clone)]
pub struct Sequence {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Recommended implementation limit so `2|S|+1` fits a `usize` comfortably
/// on 32-bit targets too (spec §4.1).
pub const MAX_SEQUENCE_LEN: usize = (i32::MAX as usize - 1) / 2;

/// Outcome of normalizing one raw buffer into a [`Sequence`].
pub struct NormalizedSequence {
    pub sequence: Sequence,
    pub had_non_acgt: bool,
    pub short_sequence: bool,
}

/// Uppercase acgt, keep `!` verbatim, drop everything else (spec §4.1).
///
/// Returns `InvalidInput` for an empty result; callers decide whether that
/// aborts the whole run (it does, per §7 "Fatal input").
pub fn normalize(name: &str, raw: &[u8]) -> Result<NormalizedSequence, CoreError> {
    if name.is_empty() {
        return Err(CoreError::InvalidInput {
            reason: "sequence name must be non-empty".into(),
        });
    }

    let mut bytes = Vec::with_capacity(raw.len());
    let mut had_non_acgt = false;
    for &b in raw {
        match b {
            b'a' => bytes.push(b'A'),
            b'c' => bytes.push(b'C'),
            b'g' => bytes.push(b'G'),
            b't' => bytes.push(b'T'),
            b'A' | b'C' | b'G' | b'T' => bytes.push(b),
            GENOME_SEP => bytes.push(b),
            _ => had_non_acgt = true,
        }
    }

    if bytes.is_empty() {
        return Err(CoreError::InvalidInput {
            reason: format!("sequence '{}' has zero length after normalization", name),
        });
    }
    if bytes.len() > MAX_SEQUENCE_LEN {
        return Err(CoreError::InvalidInput {
            reason: format!(
                "sequence '{}' exceeds the implementation limit of {} bytes",
                name, MAX_SEQUENCE_LEN
            ),
        });
    }

    let short_sequence = bytes.len() < 1000;

    Ok(NormalizedSequence {
        sequence: Sequence {
            name: name.to_string(),
            bytes,
        },
        had_non_acgt,
        short_sequence,
    })
}

/// Reverse-complement a normalized buffer, mapping A<->T, C<->G, `!`<->`;`
/// (spec §4.2). Any other byte is not expected post-normalization and is
/// passed through unchanged (defensive, never hit in practice).
pub fn reverse_complement(s: &[u8]) -> Vec<u8> {
    s.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            GENOME_SEP => GENOME_SEP_RC,
            other => other,
        })
        .collect()
}

/// The derived form of a sequence once it is chosen as a subject (spec §3
/// "Subject derivation"): `RS = rc(S) # S`, GC content, and the per-subject
/// anchor-length threshold.
pub struct Subject<'s> {
    pub source: &'s Sequence,
    pub rs: Vec<u8>,
    pub gc: f64,
    pub threshold: usize,
}

impl<'s> Subject<'s> {
    /// Build the RS string and derived statistics for `seq` as a subject.
    pub fn derive(seq: &'s Sequence, anchor_p_value: f64) -> Subject<'s> {
        let rc = reverse_complement(&seq.bytes);
        let mut rs = Vec::with_capacity(rc.len() + 1 + seq.bytes.len());
        rs.extend_from_slice(&rc);
        rs.push(RS_SEP);
        rs.extend_from_slice(&seq.bytes);

        let gc_count = seq
            .bytes
            .iter()
            .filter(|&&b| b == b'G' || b == b'C')
            .count();
        let gc = gc_count as f64 / seq.bytes.len() as f64;

        let threshold = min_anchor_length(anchor_p_value, gc, rs.len());

        Subject {
            source: seq,
            rs,
            gc,
            threshold,
        }
    }

    pub fn rs_len(&self) -> usize {
        self.rs.len()
    }
}
