//! Standard genetic code translation over DNA.
//!
//! Codons are indexed as `(b1 << 4) | (b2 << 2) | b3` with A=0, C=1, G=2, T=3.

use crate::error::{CheckError, CheckResult};
use std::sync::LazyLock;

const CODON_TABLE: [u8; 64] = *b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

pub const STOP: u8 = b'*';
pub const UNKNOWN: u8 = b'X';

static BASE_INDEX: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut map = [255u8; 256];
    for (i, (&upper, &lower)) in b"ACGT".iter().zip(b"acgt".iter()).enumerate() {
        map[upper as usize] = i as u8;
        map[lower as usize] = i as u8;
    }
    map
});

/// Residue for one codon, or `None` when a base is not A/C/G/T.
#[inline]
pub fn translate_codon(codon: &[u8]) -> Option<u8> {
    if codon.len() != 3 {
        return None;
    }
    let i1 = BASE_INDEX[codon[0] as usize];
    let i2 = BASE_INDEX[codon[1] as usize];
    let i3 = BASE_INDEX[codon[2] as usize];
    if i1 < 4 && i2 < 4 && i3 < 4 {
        let idx = ((i1 as usize) << 4) | ((i2 as usize) << 2) | (i3 as usize);
        Some(CODON_TABLE[idx])
    } else {
        None
    }
}

fn translate_to_vec(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(3)
        .map(|codon| translate_codon(codon).unwrap_or(UNKNOWN))
        .collect()
}

/// Translate from `frame` (0, 1 or 2) to the last full codon. Unresolvable
/// codons become `X`; a trailing partial codon is dropped.
pub fn translate(seq: &[u8], frame: usize) -> CheckResult<Vec<u8>> {
    if frame > 2 {
        return Err(CheckError::InvalidFrame { frame });
    }
    if seq.len() <= frame {
        return Ok(Vec::new());
    }
    Ok(translate_to_vec(&seq[frame..]))
}

/// Translate a complete coding sequence. Returns `None` when the length is not
/// a multiple of three or any codon is unresolvable. Internal stops are kept.
pub fn translate_strict(seq: &[u8]) -> Option<Vec<u8>> {
    if seq.len() % 3 != 0 {
        return None;
    }
    seq.chunks_exact(3).map(translate_codon).collect()
}

pub fn start_codons(allow_alt: bool) -> &'static [&'static [u8; 3]] {
    if allow_alt {
        &[b"ATG", b"GTG", b"TTG"]
    } else {
        &[b"ATG"]
    }
}

#[inline]
pub fn is_start_codon(codon: &[u8], allow_alt: bool) -> bool {
    start_codons(allow_alt).iter().any(|s| s.as_slice() == codon)
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodonUsage {
    pub codon: String,
    pub residue: char,
}

/// Codon-by-codon breakdown of a coding sequence; empty when its length is not
/// a multiple of three.
pub fn build_codon_table(coding: &[u8]) -> Vec<CodonUsage> {
    if coding.len() % 3 != 0 {
        return Vec::new();
    }
    coding
        .chunks_exact(3)
        .filter_map(|codon| {
            translate_codon(codon).map(|aa| CodonUsage {
                codon: String::from_utf8_lossy(codon).into_owned(),
                residue: aa as char,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::protein;
    use proptest::prelude::*;

    #[test]
    fn translate_basic() {
        assert_eq!(translate(b"ATGGCC", 0).unwrap(), b"MA");
    }

    #[test]
    fn translate_drops_trailing() {
        assert_eq!(translate(b"ATGGCCA", 0).unwrap(), b"MA");
        assert_eq!(translate(b"AATGGCC", 1).unwrap(), b"MA");
        assert_eq!(translate(b"CCATGGCCT", 2).unwrap(), b"MA");
    }

    #[test]
    fn translate_short_and_bad_frame() {
        assert!(translate(b"AT", 2).unwrap().is_empty());
        assert_eq!(
            translate(b"ATG", 3),
            Err(CheckError::InvalidFrame { frame: 3 })
        );
    }

    #[test]
    fn translate_unknown_codon() {
        assert_eq!(translate(b"ATGNNNTAA", 0).unwrap(), b"MX*");
    }

    #[test]
    fn translate_stops() {
        assert_eq!(translate(b"TAATAGTGA", 0).unwrap(), b"***");
    }

    #[test]
    fn strict_rejects_partial_and_ambiguous() {
        assert_eq!(translate_strict(b"ATGA"), None);
        assert_eq!(translate_strict(b"ATGNCC"), None);
        assert_eq!(translate_strict(b""), Some(Vec::new()));
    }

    #[test]
    fn strict_keeps_internal_stop() {
        assert_eq!(translate_strict(b"ATGTAAGCC").unwrap(), b"M*A");
    }

    #[test]
    fn start_codon_sets() {
        assert!(is_start_codon(b"ATG", false));
        assert!(!is_start_codon(b"GTG", false));
        assert!(is_start_codon(b"GTG", true));
        assert!(is_start_codon(b"TTG", true));
        assert!(!is_start_codon(b"CTG", true));
    }

    #[test]
    fn codon_table_rows() {
        let table = build_codon_table(b"ATGAAA");
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].codon, "ATG");
        assert_eq!(table[0].residue, 'M');
        assert_eq!(table[1].residue, 'K');
        assert!(build_codon_table(b"ATGA").is_empty());
    }

    proptest! {
        #[test]
        fn translation_length_law(
            seq in prop::collection::vec(prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')], 0..60),
            frame in 0usize..3,
        ) {
            let aa = translate(&seq, frame).unwrap();
            prop_assert_eq!(aa.len(), seq.len().saturating_sub(frame) / 3);
            prop_assert!(protein::translated_alphabet().is_word(&aa));
        }
    }
}
