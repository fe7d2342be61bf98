pub mod gotoh;
mod summary;
pub mod types;

pub use types::{AlignmentResult, Indel, Mismatch, Scoring};

/// Gap marker in aligned strings.
pub(crate) const GAP: u8 = b'-';

/// Global alignment of `expected` vs `observed` with the default scoring
/// (match +2, mismatch -1, gap open -5, gap extend -1).
///
/// Pass `band` to restrict the DP to a diagonal band; see [`gotoh::align_global`].
pub fn align(expected: &[u8], observed: &[u8], band: Option<usize>) -> AlignmentResult {
    gotoh::align_global(expected, observed, &Scoring::default(), band)
}

pub fn align_with(
    expected: &[u8],
    observed: &[u8],
    scoring: &Scoring,
    band: Option<usize>,
) -> AlignmentResult {
    gotoh::align_global(expected, observed, scoring, band)
}
