use crate::align::AlignmentResult;
use crate::seq::feature::{extract_feature_sequence, extract_observed_feature, orient, Feature};
use crate::seq::translate::{translate_strict, STOP};

/// One residue that differs between the expected and observed translation.
/// Codons come from the strand-corrected feature DNA and may be shorter than
/// three bases at the tail.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AAChange {
    pub position: usize,
    pub expected: char,
    pub observed: char,
    pub codon_expected: String,
    pub codon_observed: String,
    pub is_synonymous: bool,
}

/// Effect of the observed read on one coding feature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrfImpact {
    pub name: String,
    pub expected_residues: String,
    pub observed_residues: String,
    pub identity: f64,
    pub changes: Vec<AAChange>,
    pub has_frameshift: bool,
    pub has_premature_stop: bool,
    pub is_intact: bool,
}

/// Residue identity over the shared prefix, normalised by the expected
/// length (1.0 when nothing is expected).
pub fn compute_aa_identity(expected: &[u8], observed: &[u8]) -> (f64, Vec<AAChange>) {
    let mut matches = 0usize;
    let mut changes = Vec::new();
    for (idx, (&e, &o)) in expected.iter().zip(observed).enumerate() {
        if e == o {
            matches += 1;
            continue;
        }
        changes.push(AAChange {
            position: idx + 1,
            expected: e as char,
            observed: o as char,
            codon_expected: String::new(),
            codon_observed: String::new(),
            is_synonymous: false,
        });
    }
    let identity = if expected.is_empty() {
        1.0
    } else {
        matches as f64 / expected.len() as f64
    };
    (identity, changes)
}

fn codon_at(dna: &[u8], residue_idx: usize) -> String {
    let start = (residue_idx * 3).min(dna.len());
    let end = (start + 3).min(dna.len());
    String::from_utf8_lossy(&dna[start..end]).into_owned()
}

/// A stop codon anywhere before the final residue.
pub fn has_premature_stop(residues: &[u8]) -> bool {
    match residues.split_last() {
        Some((_, body)) => memchr::memchr(STOP, body).is_some(),
        None => false,
    }
}

/// Compare the expected and observed translation of `feature`.
///
/// `reference` is the (rotated) reference the alignment was made against and
/// `feature` must be expressed in its coordinates. The observed DNA is
/// translated strictly: a length that is not a multiple of three marks a
/// frameshift and leaves the observed residues empty.
pub fn orf_impact(feature: &Feature, reference: &[u8], alignment: &AlignmentResult) -> OrfImpact {
    let location = feature.location();
    let expected_dna = orient(extract_feature_sequence(reference, location), feature.strand());
    let observed_dna = orient(
        extract_observed_feature(
            alignment.aligned_expected.as_bytes(),
            alignment.aligned_observed.as_bytes(),
            location,
        ),
        feature.strand(),
    );

    let expected_residues = match feature.translation() {
        Some(declared) => declared.as_bytes().to_vec(),
        None => translate_strict(&expected_dna).unwrap_or_default(),
    };
    let observed = translate_strict(&observed_dna);
    let has_frameshift = observed.is_none();
    let observed_residues = observed.unwrap_or_default();

    let (identity, mut changes) = compute_aa_identity(&expected_residues, &observed_residues);
    for change in &mut changes {
        let idx = change.position - 1;
        change.codon_expected = codon_at(&expected_dna, idx);
        change.codon_observed = codon_at(&observed_dna, idx);
        change.is_synonymous = change.expected == change.observed;
    }

    let has_premature_stop = has_premature_stop(&observed_residues);
    OrfImpact {
        name: feature.name().to_string(),
        expected_residues: String::from_utf8_lossy(&expected_residues).into_owned(),
        observed_residues: String::from_utf8_lossy(&observed_residues).into_owned(),
        identity,
        changes,
        has_frameshift,
        has_premature_stop,
        is_intact: identity == 1.0 && !has_frameshift && !has_premature_stop,
    }
}
