// mod.rs - Data model module (sequences and their subject-derived form)

pub mod sequence;

pub use sequence::{
    normalize, reverse_complement, NormalizedSequence, Sequence, Subject, GENOME_SEP,
    GENOME_SEP_RC, MAX_SEQUENCE_LEN, RS_SEP,
};
