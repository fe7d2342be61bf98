//! Check that the protein a reference CDS encodes matches a known protein
//! sequence, such as a database entry the CDS label names.

use memchr::memmem;

use crate::alphabets::protein;
use crate::error::{CheckError, CheckResult};
use crate::orf::Discrepancy;
use crate::seq::feature::{extract_feature_sequence, orient, Feature, FeatureLocation};
use crate::seq::translate::{translate, STOP};
use crate::verify::ReferenceSequence;

/// Differences beyond this many are counted in the identity but not listed.
pub const MAX_LISTED_DIFFERENCES: usize = 10;

const FRAGMENT_MARKERS: [&str; 2] = ["(fragment)", "(partial)"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnnotationStatus {
    Pass,
    Fail,
    /// The CDS encodes no complete codon.
    Error,
}

impl AnnotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationStatus::Pass => "pass",
            AnnotationStatus::Fail => "fail",
            AnnotationStatus::Error => "error",
        }
    }
}

/// A known protein sequence a CDS is expected to encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceProtein {
    id: String,
    residues: Vec<u8>,
}

impl ReferenceProtein {
    /// `X` is accepted; a trailing `*` is dropped.
    pub fn new(id: impl Into<String>, residues: &str) -> CheckResult<Self> {
        let mut residues = protein::sanitize_translation(residues)?;
        if residues.last() == Some(&STOP) {
            residues.pop();
        }
        if residues.is_empty() {
            return Err(CheckError::EmptySequence {
                what: "reference protein",
            });
        }
        Ok(Self {
            id: id.into(),
            residues,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }
}

/// Outcome of [`verify_annotation`]. Difference positions are 1-indexed on
/// the reference protein; `expected` is the reference residue.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationResult {
    pub label: String,
    pub reference_id: String,
    pub location: FeatureLocation,
    pub observed_length: usize,
    pub reference_length: usize,
    pub identity: f64,
    pub status: AnnotationStatus,
    pub differences: Vec<Discrepancy>,
    pub error: Option<String>,
    pub is_fragment: bool,
    pub notes: Vec<String>,
}

impl AnnotationResult {
    pub fn is_pass(&self) -> bool {
        self.status == AnnotationStatus::Pass
    }
}

/// Label with `(fragment)` and `(partial)` markers removed, ignoring case,
/// and whether any marker was present.
pub fn clean_label(label: &str) -> (String, bool) {
    let mut out = label.to_string();
    let mut marked = false;
    for marker in FRAGMENT_MARKERS {
        while let Some(idx) = out.to_ascii_lowercase().find(marker) {
            out.replace_range(idx..idx + marker.len(), "");
            marked = true;
        }
    }
    (out.split_whitespace().collect::<Vec<_>>().join(" "), marked)
}

/// Residues `feature` encodes on `plasmid`: its declared translation if it
/// has one, else the span read along its strand and translated up to the
/// last full codon. One trailing stop is dropped.
pub fn encoded_protein(feature: &Feature, plasmid: &[u8]) -> CheckResult<Vec<u8>> {
    let location = feature.location();
    location.check_within(plasmid.len())?;
    let mut residues = match feature.translation() {
        Some(declared) => protein::sanitize_translation(declared)?,
        None => {
            let dna = orient(extract_feature_sequence(plasmid, location), feature.strand());
            translate(&dna, 0)?
        }
    };
    if residues.last() == Some(&STOP) {
        residues.pop();
    }
    Ok(residues)
}

/// Compare the protein `feature` encodes on `plasmid` with `reference`.
///
/// An exact match, or an encoded protein found whole inside the reference
/// (a truncated construct), passes with identity 1.0. Anything else is
/// compared residue by residue from the N-terminus and fails.
pub fn verify_annotation(
    feature: &Feature,
    plasmid: &[u8],
    reference: &ReferenceProtein,
) -> CheckResult<AnnotationResult> {
    let observed = encoded_protein(feature, plasmid)?;
    let expected = reference.residues();
    let (label, is_fragment) = clean_label(feature.name());
    let mut result = AnnotationResult {
        label,
        reference_id: reference.id().to_string(),
        location: *feature.location(),
        observed_length: observed.len(),
        reference_length: expected.len(),
        identity: 0.0,
        status: AnnotationStatus::Fail,
        differences: Vec::new(),
        error: None,
        is_fragment,
        notes: Vec::new(),
    };

    if observed.is_empty() {
        result.status = AnnotationStatus::Error;
        result.error = Some("could not translate CDS".to_string());
        return Ok(result);
    }

    if let Some(start) = memmem::find(expected, &observed) {
        let end = start + observed.len();
        if start > 0 {
            result.notes.push(format!(
                "N-term truncated: starts at reference position {}",
                start + 1
            ));
        }
        if end < expected.len() {
            result
                .notes
                .push(format!("C-term truncated: ends at reference position {end}"));
        }
        result.identity = 1.0;
        result.status = AnnotationStatus::Pass;
        return Ok(result);
    }

    let mut matches = 0usize;
    for (idx, (&e, &o)) in expected.iter().zip(&observed).enumerate() {
        if e == o {
            matches += 1;
        } else if result.differences.len() < MAX_LISTED_DIFFERENCES {
            result.differences.push(Discrepancy {
                position: idx + 1,
                expected: e as char,
                observed: o as char,
            });
        }
    }
    result.identity = matches as f64 / expected.len() as f64;
    log::debug!(
        "annotation: {} differs from {} (identity {:.3})",
        result.label,
        result.reference_id,
        result.identity
    );
    Ok(result)
}

/// Check every CDS of `reference` whose cleaned label equals the id of one
/// of `proteins`, ignoring case. CDSs with no matching protein are skipped.
pub fn verify_annotations(
    reference: &ReferenceSequence,
    proteins: &[ReferenceProtein],
) -> CheckResult<Vec<AnnotationResult>> {
    let jobs: Vec<(&Feature, &ReferenceProtein)> = reference
        .features()
        .iter()
        .filter(|f| f.is_cds())
        .filter_map(|f| {
            let (label, _) = clean_label(f.name());
            proteins
                .iter()
                .find(|p| p.id().eq_ignore_ascii_case(&label))
                .map(|p| (f, p))
        })
        .collect();
    log::debug!(
        "annotation: {} CDS of {} matched a reference protein",
        jobs.len(),
        reference.name()
    );
    par_map!(jobs, |&(feature, protein)| verify_annotation(
        feature,
        reference.sequence(),
        protein
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabets::dna::reverse_complement;
    use crate::seq::circular::rotate;
    use crate::seq::feature::Strand;

    // MAKELWRT* at 24..=50
    const PLASMID: &[u8] =
        b"TTGACAGCTAGCTCAGTCCTAGGATGGCCAAAGAACTGTGGCGCACCTAAGGATCCGAATTCCTCGAG";

    fn feature(name: &str, start: usize, end: usize, strand: Strand) -> Feature {
        Feature::new(name, "CDS", FeatureLocation::new(start, end, strand).unwrap())
    }

    fn protein(residues: &str) -> ReferenceProtein {
        ReferenceProtein::new("TEST_HUMAN", residues).unwrap()
    }

    #[test]
    fn exact_match_passes() {
        let res = verify_annotation(
            &feature("TEST_HUMAN", 24, 50, Strand::Plus),
            PLASMID,
            &protein("MAKELWRT"),
        )
        .unwrap();
        assert_eq!(res.status, AnnotationStatus::Pass);
        assert_eq!(res.identity, 1.0);
        assert_eq!((res.observed_length, res.reference_length), (8, 8));
        assert!(res.differences.is_empty() && res.notes.is_empty());
        assert!(!res.is_fragment);
    }

    #[test]
    fn truncated_construct_passes_with_notes() {
        let res = verify_annotation(
            &feature("TEST_HUMAN", 24, 50, Strand::Plus),
            PLASMID,
            &protein("MSMAKELWRTGG"),
        )
        .unwrap();
        assert!(res.is_pass());
        assert_eq!(res.identity, 1.0);
        assert_eq!(
            res.notes,
            vec![
                "N-term truncated: starts at reference position 3",
                "C-term truncated: ends at reference position 10",
            ]
        );
    }

    #[test]
    fn substitution_fails_with_difference() {
        let res = verify_annotation(
            &feature("TEST_HUMAN", 24, 50, Strand::Plus),
            PLASMID,
            &protein("MAKDLWRTQ"),
        )
        .unwrap();
        assert_eq!(res.status, AnnotationStatus::Fail);
        assert!((res.identity - 7.0 / 9.0).abs() < 1e-12);
        assert_eq!(
            res.differences,
            vec![Discrepancy {
                position: 4,
                expected: 'D',
                observed: 'E',
            }]
        );
    }

    #[test]
    fn listed_differences_are_capped() {
        let declared =
            feature("TEST_HUMAN", 24, 50, Strand::Plus).with_translation("ACDEFGHIKLMN*");
        let res = verify_annotation(&declared, PLASMID, &protein("WWWWWWWWWWWW")).unwrap();
        assert_eq!(res.observed_length, 12);
        assert_eq!(res.identity, 0.0);
        assert_eq!(res.differences.len(), MAX_LISTED_DIFFERENCES);
        assert_eq!(res.differences[9].position, 10);
    }

    #[test]
    fn minus_strand_and_wrapped_cds() {
        let rc = reverse_complement(PLASMID);
        let n = PLASMID.len();
        let minus = feature("TEST_HUMAN", n - 50 + 1, n - 24 + 1, Strand::Minus);
        assert_eq!(encoded_protein(&minus, &rc).unwrap(), b"MAKELWRT");

        let rotated = rotate(PLASMID, 30);
        let wrapped = feature("TEST_HUMAN", n - 6, 20, Strand::Plus);
        assert!(wrapped.location().wraps());
        assert_eq!(encoded_protein(&wrapped, &rotated).unwrap(), b"MAKELWRT");
    }

    #[test]
    fn untranslatable_cds_is_error() {
        let res = verify_annotation(
            &feature("TEST_HUMAN", 24, 25, Strand::Plus),
            PLASMID,
            &protein("MAKELWRT"),
        )
        .unwrap();
        assert_eq!(res.status, AnnotationStatus::Error);
        assert_eq!(res.error.as_deref(), Some("could not translate CDS"));
    }

    #[test]
    fn feature_off_plasmid_is_rejected() {
        let off = feature("TEST_HUMAN", 24, 500, Strand::Plus);
        assert!(matches!(
            verify_annotation(&off, PLASMID, &protein("MAKELWRT")),
            Err(CheckError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn labels_lose_fragment_markers() {
        assert_eq!(
            clean_label("INT3_HUMAN (Fragment)"),
            ("INT3_HUMAN".to_string(), true)
        );
        assert_eq!(clean_label("MED29_HUMAN"), ("MED29_HUMAN".to_string(), false));
        assert_eq!(clean_label("X (partial) (fragment)").0, "X");
    }

    #[test]
    fn reference_protein_validation() {
        assert_eq!(protein("MAKE*").residues(), b"MAKE");
        assert!(matches!(
            ReferenceProtein::new("p", "*"),
            Err(CheckError::EmptySequence { .. })
        ));
        assert!(ReferenceProtein::new("p", "MA1").is_err());
    }

    #[test]
    fn batch_matches_cds_by_label() {
        let plasmid = std::str::from_utf8(PLASMID).unwrap();
        let reference = ReferenceSequence::new("pTest", plasmid)
            .unwrap()
            .with_features([
                feature("test_human (partial)", 24, 50, Strand::Plus),
                feature("lacZ", 1, 21, Strand::Plus),
                Feature::new(
                    "TEST_HUMAN",
                    "gene",
                    FeatureLocation::new(24, 50, Strand::Plus).unwrap(),
                ),
            ]);
        let results = verify_annotations(&reference, &[protein("MAKELWRT")]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "test_human");
        assert!(results[0].is_fragment);
        assert!(results[0].is_pass());
        assert_eq!(AnnotationStatus::Pass.as_str(), "pass");
    }
}
