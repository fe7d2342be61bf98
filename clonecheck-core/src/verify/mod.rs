//! Verification of a sequenced clone against its expected plasmid.
//!
//! The reference is circular but the aligner is linear, so the reference is
//! rotated to a handful of candidate origins (0 and each feature start) and
//! the read is tried in both orientations against each. The best-scoring
//! combination by identity is then annotated against the features.

pub mod annotation;
pub mod codon;
pub mod impact;
pub mod status;

use crate::align::{align, AlignmentResult, Indel, Mismatch};
use crate::alphabets::{dna, protein};
use crate::error::{CheckError, CheckResult};
use crate::io::abif;
use crate::seq::circular::rotate;
use crate::seq::feature::{cds_at, feature_at, shift_features, Feature, FeatureLocation, Strand};

pub use annotation::{
    verify_annotation, verify_annotations, AnnotationResult, AnnotationStatus, ReferenceProtein,
};
pub use codon::annotate_mismatch_codon;
pub use impact::{compute_aa_identity, has_premature_stop, orf_impact, AAChange, OrfImpact};
pub use status::{is_conservative_change, CloneStatus};

/// Expected plasmid: sanitized sequence plus its annotated features.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceSequence {
    name: String,
    sequence: Vec<u8>,
    features: Vec<Feature>,
}

impl ReferenceSequence {
    /// Sanitize `sequence`; ambiguous bases are rejected.
    pub fn new(name: impl Into<String>, sequence: &str) -> CheckResult<Self> {
        Ok(Self {
            name: name.into(),
            sequence: dna::sanitize_reference(sequence)?,
            features: Vec::new(),
        })
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Append a `+` strand CDS spanning the whole reference whose expected
    /// translation is `residues`.
    pub fn with_declared_orf(mut self, name: &str, residues: &str) -> CheckResult<Self> {
        let residues = protein::sanitize_translation(residues)?;
        if residues.is_empty() {
            return Err(CheckError::EmptySequence { what: "declared ORF" });
        }
        if self.sequence.is_empty() {
            return Err(CheckError::EmptySequence { what: "reference" });
        }
        if self.sequence.len() % 3 != 0 {
            log::warn!(
                "declared ORF {name} spans {} bp, not a whole number of codons",
                self.sequence.len()
            );
        }
        let location = FeatureLocation::new(1, self.sequence.len(), Strand::Plus)?;
        let feature = Feature::new(name, "CDS", location)
            .with_translation(String::from_utf8_lossy(&residues).into_owned());
        self.features.push(feature);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Called bases of one sequencing run; `N` is allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencingRead {
    name: String,
    sequence: Vec<u8>,
}

impl SequencingRead {
    pub fn new(name: impl Into<String>, sequence: &str) -> CheckResult<Self> {
        Ok(Self {
            name: name.into(),
            sequence: dna::sanitize_read(sequence)?,
        })
    }

    /// Read the primary base calls out of an ABIF trace file.
    pub fn from_trace(name: impl Into<String>, data: &[u8]) -> CheckResult<Self> {
        let calls = abif::decode_base_calls(data)?;
        Self::new(name, &calls)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloneVerifyParams {
    /// Point mismatches tolerated before the clone is failed outright.
    pub max_mismatches: usize,
    /// Bases dropped from each end of the read before alignment.
    pub ignore_ends: usize,
    /// Above this many bases (either input) the alignment is banded.
    pub band_threshold: usize,
    pub band_width: usize,
    pub max_rotation_candidates: usize,
}

impl Default for CloneVerifyParams {
    fn default() -> Self {
        Self {
            max_mismatches: 0,
            ignore_ends: 0,
            band_threshold: 50_000,
            band_width: 1_000,
            max_rotation_candidates: 10,
        }
    }
}

impl CloneVerifyParams {
    pub fn with_max_mismatches(mut self, max_mismatches: usize) -> Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn with_ignore_ends(mut self, ignore_ends: usize) -> Self {
        self.ignore_ends = ignore_ends;
        self
    }

    pub fn with_banding(mut self, threshold: usize, width: usize) -> Self {
        self.band_threshold = threshold;
        self.band_width = width;
        self
    }

    pub fn with_max_rotation_candidates(mut self, n: usize) -> Self {
        self.max_rotation_candidates = n;
        self
    }

    pub fn validate(&self) -> CheckResult<()> {
        if self.max_rotation_candidates == 0 {
            return Err(CheckError::InvalidParameter {
                msg: "max_rotation_candidates must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReadOrientation {
    Forward,
    Reverse,
}

/// Outcome of [`verify_clone`]. Positions in mismatches and indels refer to
/// the reference rotated by `rotation_offset`, the frame the features in the
/// report were shifted to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CloneReport {
    pub status: CloneStatus,
    pub expected_name: String,
    pub expected_length: usize,
    pub read_name: String,
    pub read_length: usize,
    pub identity: f64,
    pub matches: usize,
    pub covered_bases: usize,
    pub coverage: f64,
    pub rotation_offset: usize,
    pub orientation: ReadOrientation,
    pub mismatches: Vec<Mismatch>,
    pub insertions: Vec<Indel>,
    pub deletions: Vec<Indel>,
    pub orf_impacts: Vec<OrfImpact>,
    pub notes: Vec<String>,
}

impl CloneReport {
    pub fn is_pass(&self) -> bool {
        self.status.is_pass()
    }
}

/// Drop `n` bases from both ends of a read, unless that would leave nothing.
pub fn trim_read_ends(seq: &[u8], n: usize) -> &[u8] {
    if n == 0 || seq.len() <= n * 2 {
        return seq;
    }
    &seq[n..seq.len() - n]
}

/// Origins tried for the circular reference: 0, then every feature start, in
/// encounter order without repeats.
pub fn rotation_candidates(features: &[Feature], limit: usize) -> Vec<usize> {
    let mut out = vec![0usize];
    for feat in features {
        let offset = feat.location().start().saturating_sub(1);
        if !out.contains(&offset) {
            out.push(offset);
        }
    }
    out.truncate(limit);
    out
}

/// Name the first feature under the indel; the frameshift flag looks at any
/// covering CDS, not just that feature.
fn attach_feature(indel: &mut Indel, features: &[Feature]) {
    indel.feature = feature_at(features, indel.position).map(|f| f.name().to_string());
    indel.causes_frameshift = indel.length % 3 != 0 && cds_at(features, indel.position).is_some();
}

/// Align `read` against the circular `reference` and classify the clone.
///
/// Fails only on structurally invalid input (empty sequences, features off
/// the reference, bad parameters). A poor clone is a report with a failing
/// [`CloneStatus`].
pub fn verify_clone(
    reference: &ReferenceSequence,
    read: &SequencingRead,
    params: &CloneVerifyParams,
) -> CheckResult<CloneReport> {
    params.validate()?;
    if reference.is_empty() {
        return Err(CheckError::EmptySequence { what: "reference" });
    }
    if read.is_empty() {
        return Err(CheckError::EmptySequence { what: "read" });
    }
    let seq_len = reference.len();
    for feat in reference.features() {
        feat.location().check_within(seq_len)?;
    }

    let read_seq = trim_read_ends(read.sequence(), params.ignore_ends);
    let reverse_read = dna::reverse_complement(read_seq);
    let band = (seq_len.max(read_seq.len()) > params.band_threshold).then_some(params.band_width);

    let offsets = rotation_candidates(reference.features(), params.max_rotation_candidates);
    let jobs: Vec<(usize, ReadOrientation)> = offsets
        .iter()
        .flat_map(|&o| [(o, ReadOrientation::Forward), (o, ReadOrientation::Reverse)])
        .collect();
    log::debug!(
        "verify: {} rotation(s) x 2 orientations, band {:?}",
        offsets.len(),
        band
    );

    let results: Vec<AlignmentResult> = par_map!(jobs, |&(offset, orientation)| {
        let rotated = rotate(reference.sequence(), offset);
        let observed = match orientation {
            ReadOrientation::Forward => read_seq,
            ReadOrientation::Reverse => reverse_read.as_slice(),
        };
        align(&rotated, observed, band)
    });

    // Strictly greater identity wins, so ties keep the earliest candidate.
    let mut best_idx = 0;
    for (idx, res) in results.iter().enumerate() {
        log::trace!(
            "verify: offset {} {:?} identity {:.4}",
            jobs[idx].0,
            jobs[idx].1,
            res.identity
        );
        if res.identity > results[best_idx].identity {
            best_idx = idx;
        }
    }
    let (rotation_offset, orientation) = jobs[best_idx];
    let mut results = results;
    let mut best = results.swap_remove(best_idx);
    log::debug!(
        "verify: best offset {rotation_offset} {orientation:?} identity {:.4}",
        best.identity
    );

    let rotated = rotate(reference.sequence(), rotation_offset);
    let features = shift_features(reference.features(), rotation_offset, seq_len);

    let observed_by_position = best.observed_by_expected_position();
    for mm in &mut best.mismatches {
        mm.feature = feature_at(&features, mm.position).map(|f| f.name().to_string());
        annotate_mismatch_codon(mm, &features, &rotated, &observed_by_position);
    }
    for indel in best.insertions.iter_mut().chain(best.deletions.iter_mut()) {
        attach_feature(indel, &features);
    }

    let orf_impacts: Vec<OrfImpact> = features
        .iter()
        .filter(|f| f.is_cds())
        .map(|f| orf_impact(f, &rotated, &best))
        .collect();

    let coverage = best.covered_bases as f64 / seq_len as f64;
    let mut notes = Vec::new();
    if orientation == ReadOrientation::Reverse {
        notes.push("Sequencing read aligned as reverse complement".to_string());
    }
    if coverage < 1.0 {
        notes.push(format!(
            "Coverage {:.1}% of expected plasmid",
            coverage * 100.0
        ));
    }
    let status = status::evaluate_status(&best, &orf_impacts, params.max_mismatches, &mut notes);

    Ok(CloneReport {
        status,
        expected_name: reference.name().to_string(),
        expected_length: seq_len,
        read_name: read.name().to_string(),
        read_length: read_seq.len(),
        identity: best.identity,
        matches: best.matches,
        covered_bases: best.covered_bases,
        coverage,
        rotation_offset,
        orientation,
        mismatches: best.mismatches,
        insertions: best.insertions,
        deletions: best.deletions,
        orf_impacts,
        notes,
    })
}
