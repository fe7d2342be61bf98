use crate::align::Mismatch;
use crate::alphabets::dna::reverse_complement;
use crate::seq::circular::wrap_position;
use crate::seq::feature::{cds_at, Feature, Strand};
use crate::seq::translate::{translate_codon, UNKNOWN};

/// 1-indexed reference positions of the codon covering `pos`, in ascending
/// plus-strand order. Codons are counted 5'->3' along the coding strand.
fn codon_positions(feature: &Feature, pos: usize, seq_len: usize) -> [usize; 3] {
    let loc = feature.location();
    let (start, end) = (loc.start(), loc.end());
    match feature.strand() {
        Strand::Plus => {
            let offset = if pos >= start {
                pos - start
            } else {
                seq_len - start + pos
            };
            let first = wrap_position(start, (offset / 3 * 3) as isize, seq_len);
            [
                first,
                wrap_position(first, 1, seq_len),
                wrap_position(first, 2, seq_len),
            ]
        }
        Strand::Minus => {
            let offset = if pos <= end {
                end - pos
            } else {
                end + seq_len - pos
            };
            let last = wrap_position(end, -((offset / 3 * 3) as isize), seq_len);
            [
                wrap_position(last, -2, seq_len),
                wrap_position(last, -1, seq_len),
                last,
            ]
        }
    }
}

/// Fill in `codon_change` (and `aa_change` when the residue differs) for a
/// point mismatch that falls in a CDS. Non-coding features listed first at
/// the same position are skipped.
///
/// `observed_by_position[p - 1]` is the observed base aligned to reference
/// position `p`, `None` where the read has a gap; codons touching a gap are
/// left unannotated.
pub fn annotate_mismatch_codon(
    mismatch: &mut Mismatch,
    features: &[Feature],
    reference: &[u8],
    observed_by_position: &[Option<u8>],
) {
    let seq_len = reference.len();
    if seq_len == 0 {
        return;
    }
    let Some(feature) = cds_at(features, mismatch.position) else {
        return;
    };

    let positions = codon_positions(feature, mismatch.position, seq_len);
    let mut expected = Vec::with_capacity(3);
    let mut observed = Vec::with_capacity(3);
    for p in positions {
        let Some(&Some(base)) = observed_by_position.get(p - 1) else {
            return;
        };
        expected.push(reference[p - 1]);
        observed.push(base);
    }
    if feature.strand() == Strand::Minus {
        expected = reverse_complement(&expected);
        observed = reverse_complement(&observed);
    }

    let expected_aa = translate_codon(&expected).unwrap_or(UNKNOWN) as char;
    let observed_aa = translate_codon(&observed).unwrap_or(UNKNOWN) as char;
    mismatch.codon_change = Some(format!(
        "{}->{}",
        String::from_utf8_lossy(&expected),
        String::from_utf8_lossy(&observed)
    ));
    if expected_aa != observed_aa {
        mismatch.aa_change = Some(format!("{expected_aa}->{observed_aa}"));
    }
}
