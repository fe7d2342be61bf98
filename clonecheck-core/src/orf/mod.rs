//! Six-frame placement of an amino-acid query on a circular reference.
//!
//! Each strand is translated from a doubled copy (`seq + seq`) so that every
//! circular phase, including ORFs running through the origin, appears as a
//! contiguous window. This is equivalent to indexing the circle modulo its
//! length; every accepted window is re-extracted that way and re-translated
//! to make sure the doubled copy did not produce a spurious hit.

pub mod tags;

use std::collections::HashSet;
use std::ops::Range;

use crate::alphabets::{dna, protein};
use crate::error::{CheckError, CheckResult};
use crate::seq::circular::extract_circular;
use crate::seq::feature::Strand;
use crate::seq::translate::{
    build_codon_table, is_start_codon, translate, translate_strict, CodonUsage,
};

pub use tags::{tag_library, TagCandidate, TagDef, TagKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrfSearchParams {
    /// Accept GTG and TTG as start codons besides ATG.
    pub allow_alt_start: bool,
    pub min_identity: f64,
    pub max_mismatches: usize,
    /// Reject placements with an in-frame start codon after the first codon.
    pub disallow_internal_met: bool,
}

impl Default for OrfSearchParams {
    fn default() -> Self {
        Self {
            allow_alt_start: false,
            min_identity: 1.0,
            max_mismatches: 0,
            disallow_internal_met: false,
        }
    }
}

impl OrfSearchParams {
    pub fn with_alt_start(mut self, allow: bool) -> Self {
        self.allow_alt_start = allow;
        self
    }

    pub fn with_min_identity(mut self, min_identity: f64) -> Self {
        self.min_identity = min_identity;
        self
    }

    pub fn with_max_mismatches(mut self, max_mismatches: usize) -> Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn with_disallow_internal_met(mut self, disallow: bool) -> Self {
        self.disallow_internal_met = disallow;
        self
    }

    pub fn validate(&self) -> CheckResult<()> {
        if !(0.0..=1.0).contains(&self.min_identity) {
            return Err(CheckError::InvalidParameter {
                msg: format!("min_identity must be within [0, 1], got {}", self.min_identity),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OrfStatus {
    Verified,
    NotFound,
    Indeterminate,
}

impl OrfStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrfStatus::Verified => "verified",
            OrfStatus::NotFound => "not-found",
            OrfStatus::Indeterminate => "indeterminate",
        }
    }
}

/// A residue of the query that differs from the placed translation.
/// `position` is 1-indexed on the query.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discrepancy {
    pub position: usize,
    pub expected: char,
    pub observed: char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminus {
    #[cfg_attr(feature = "serde", serde(rename = "N-terminal"))]
    N,
    #[cfg_attr(feature = "serde", serde(rename = "C-terminal"))]
    C,
}

impl Terminus {
    pub fn label(self) -> &'static str {
        match self {
            Terminus::N => "N-terminal",
            Terminus::C => "C-terminal",
        }
    }
}

/// Library tag found in frame immediately before (N) or after (C) a placement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectedTag {
    pub terminus: Terminus,
    pub id: String,
    pub name: String,
    pub kind: TagKind,
    pub sequence: String,
}

impl DetectedTag {
    fn new(terminus: Terminus, cand: &TagCandidate) -> Self {
        Self {
            terminus,
            id: cand.id.clone(),
            name: cand.name.to_string(),
            kind: cand.kind,
            sequence: String::from_utf8_lossy(cand.sequence).into_owned(),
        }
    }
}

/// One accepted placement. `start`/`end` are 1-indexed plus-strand
/// coordinates of the first and last coding base, so on the minus strand
/// `start` is the higher coordinate unless the span wraps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateMatch {
    pub strand: Strand,
    pub frame: usize,
    pub start: usize,
    pub end: usize,
    pub wraps: bool,
    pub length: usize,
    pub identity: f64,
    pub discrepancies: Vec<Discrepancy>,
    pub coding_sequence: String,
    pub observed_residues: String,
    pub tags: Vec<DetectedTag>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ComponentKind {
    Core,
    Tag,
    Linker,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Core => "core",
            ComponentKind::Tag => "tag",
            ComponentKind::Linker => "linker",
        }
    }
}

impl From<TagKind> for ComponentKind {
    fn from(kind: TagKind) -> Self {
        match kind {
            TagKind::Tag => ComponentKind::Tag,
            TagKind::Linker => ComponentKind::Linker,
        }
    }
}

/// A named piece of the verified construct; ranges are relative to the
/// component itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub aa_range: Range<usize>,
    pub nt_range: Range<usize>,
    pub sequence: String,
}

impl Component {
    fn new(name: String, kind: ComponentKind, sequence: String) -> Self {
        let len = sequence.len();
        Self {
            name,
            kind,
            aa_range: 0..len,
            nt_range: 0..len * 3,
            sequence,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantReport {
    pub query: String,
    pub observed_residues: String,
    pub coding_sequence: String,
    pub codon_table: Vec<CodonUsage>,
    /// N-terminal tag first, then the query core, then any C-terminal tag.
    pub components: Vec<Component>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrfReport {
    pub name: String,
    pub status: OrfStatus,
    pub reason: Option<String>,
    pub candidates: Vec<CandidateMatch>,
    pub variant: Option<VariantReport>,
    pub amino_acid_identity: Option<f64>,
    pub nucleotide_identity: Option<f64>,
}

impl OrfReport {
    /// The unique placement of a verified query.
    pub fn placement(&self) -> Option<&CandidateMatch> {
        match self.status {
            OrfStatus::Verified => self.candidates.first(),
            _ => None,
        }
    }

    pub fn discrepancies(&self) -> &[Discrepancy] {
        self.placement()
            .map(|c| c.discrepancies.as_slice())
            .unwrap_or(&[])
    }
}

/// Identity of `observed` against `expected` over their shared length,
/// with 1-indexed discrepancies. An empty `expected` has identity 1.0.
pub fn compute_identity(expected: &[u8], observed: &[u8]) -> (f64, Vec<Discrepancy>) {
    let mut matches = 0usize;
    let mut discrepancies = Vec::new();
    for (idx, (&e, &o)) in expected.iter().zip(observed).enumerate() {
        if e == o {
            matches += 1;
        } else {
            discrepancies.push(Discrepancy {
                position: idx + 1,
                expected: e as char,
                observed: o as char,
            });
        }
    }
    let identity = if expected.is_empty() {
        1.0
    } else {
        matches as f64 / expected.len() as f64
    };
    (identity, discrepancies)
}

fn has_internal_start_codon(coding: &[u8], allow_alt: bool) -> bool {
    coding.len() >= 6
        && coding[3..]
            .chunks_exact(3)
            .any(|codon| is_start_codon(codon, allow_alt))
}

/// Template of one strand as read 5'->3', plus its doubled copy.
struct StrandTemplate {
    strand: Strand,
    single: Vec<u8>,
    doubled: Vec<u8>,
}

impl StrandTemplate {
    fn new(strand: Strand, single: Vec<u8>) -> Self {
        let mut doubled = Vec::with_capacity(single.len() * 2);
        doubled.extend_from_slice(&single);
        doubled.extend_from_slice(&single);
        Self {
            strand,
            single,
            doubled,
        }
    }

    /// 1-indexed plus-strand coordinate of template index `idx`.
    fn plus_coordinate(&self, idx: usize) -> usize {
        let len = self.single.len();
        match self.strand {
            Strand::Plus => idx % len + 1,
            Strand::Minus => len - idx % len,
        }
    }
}

fn search_strand(
    template: &StrandTemplate,
    query: &[u8],
    params: &OrfSearchParams,
    seen: &mut HashSet<(Strand, usize, usize, usize)>,
    out: &mut Vec<CandidateMatch>,
) -> CheckResult<()> {
    let seq_len = template.single.len();
    let aa_len = query.len();
    let length_nt = aa_len * 3;

    for frame in 0..3 {
        let translation = translate(&template.doubled, frame)?;
        if translation.len() < aa_len {
            continue;
        }
        for aa_idx in 0..=translation.len() - aa_len {
            let start_idx = frame + aa_idx * 3;
            if start_idx >= seq_len {
                break;
            }
            if start_idx + length_nt > template.doubled.len() {
                continue;
            }
            let window = &translation[aa_idx..aa_idx + aa_len];
            let (identity, discrepancies) = compute_identity(query, window);
            if identity < params.min_identity || discrepancies.len() > params.max_mismatches {
                continue;
            }

            let coding = extract_circular(&template.single, start_idx, length_nt);
            if translate_strict(&coding).as_deref() != Some(window) {
                log::trace!(
                    "orf: {:?} frame {frame} index {start_idx} rejected, circular re-translation differs",
                    template.strand
                );
                continue;
            }
            if params.disallow_internal_met
                && has_internal_start_codon(&coding, params.allow_alt_start)
            {
                log::trace!(
                    "orf: {:?} frame {frame} index {start_idx} rejected, internal start codon",
                    template.strand
                );
                continue;
            }
            if !is_start_codon(&coding[..3], params.allow_alt_start) {
                continue;
            }

            let start = template.plus_coordinate(start_idx);
            let end = template.plus_coordinate(start_idx + length_nt - 1);
            if !seen.insert((template.strand, frame, start, length_nt)) {
                continue;
            }

            let mut tags = Vec::new();
            if let Some(cand) = tags::find_prefix_tag(&translation, aa_idx) {
                tags.push(DetectedTag::new(Terminus::N, cand));
            }
            if let Some(cand) = tags::find_suffix_tag(&translation, aa_idx + aa_len) {
                tags.push(DetectedTag::new(Terminus::C, cand));
            }

            out.push(CandidateMatch {
                strand: template.strand,
                frame,
                start,
                end,
                wraps: start_idx + length_nt > seq_len,
                length: length_nt,
                identity,
                discrepancies,
                coding_sequence: String::from_utf8_lossy(&coding).into_owned(),
                observed_residues: String::from_utf8_lossy(window).into_owned(),
                tags,
            });
        }
    }
    Ok(())
}

/// Every placement of `query` on the circular `reference` that passes the
/// identity, start-codon and re-translation checks. Inputs must already be
/// sanitized.
pub fn search_placements(
    reference: &[u8],
    query: &[u8],
    params: &OrfSearchParams,
) -> CheckResult<Vec<CandidateMatch>> {
    let mut out = Vec::new();
    if query.is_empty() || query.len() * 3 > reference.len() {
        return Ok(out);
    }
    let mut seen = HashSet::new();
    let plus = StrandTemplate::new(Strand::Plus, reference.to_vec());
    search_strand(&plus, query, params, &mut seen, &mut out)?;
    let minus = StrandTemplate::new(Strand::Minus, dna::reverse_complement(reference));
    search_strand(&minus, query, params, &mut seen, &mut out)?;
    Ok(out)
}

fn build_variant(name: &str, query: &str, hit: &CandidateMatch) -> VariantReport {
    let mut components = vec![Component::new(
        format!("{name} core"),
        ComponentKind::Core,
        query.to_string(),
    )];
    for tag in &hit.tags {
        let component = Component::new(
            format!("Auto-detected {}: {}", tag.terminus.label(), tag.name),
            tag.kind.into(),
            tag.sequence.clone(),
        );
        match tag.terminus {
            Terminus::N => components.insert(0, component),
            Terminus::C => components.push(component),
        }
    }
    VariantReport {
        query: query.to_string(),
        observed_residues: hit.observed_residues.clone(),
        coding_sequence: hit.coding_sequence.clone(),
        codon_table: build_codon_table(hit.coding_sequence.as_bytes()),
        components,
    }
}

/// Decide whether `query` occurs exactly once, in frame and behind an allowed
/// start codon, on the circular `reference`.
///
/// Malformed input (non-ACGT reference, `N`, non-standard residues, empty
/// sequences, out-of-range parameters) is an error. Zero placements yield
/// [`OrfStatus::NotFound`], several yield [`OrfStatus::Indeterminate`].
pub fn verify_orf(
    name: &str,
    reference: &str,
    query: &str,
    params: &OrfSearchParams,
) -> CheckResult<OrfReport> {
    params.validate()?;
    let reference = dna::sanitize_reference(reference)?;
    let query = protein::sanitize_protein(query)?;
    if reference.is_empty() {
        return Err(CheckError::EmptySequence { what: "reference" });
    }
    if query.is_empty() {
        return Err(CheckError::EmptySequence { what: "query" });
    }

    let candidates = search_placements(&reference, &query, params)?;
    log::debug!(
        "orf: {} placement(s) of {} residues on {} bp",
        candidates.len(),
        query.len(),
        reference.len()
    );

    let query = String::from_utf8_lossy(&query).into_owned();
    let mut report = OrfReport {
        name: name.to_string(),
        status: OrfStatus::NotFound,
        reason: None,
        candidates,
        variant: None,
        amino_acid_identity: None,
        nucleotide_identity: None,
    };
    match report.candidates.as_slice() {
        [] => {
            report.reason = Some("no amino-acid matches found".to_string());
        }
        [hit] => {
            report.status = OrfStatus::Verified;
            report.variant = Some(build_variant(name, &query, hit));
            report.amino_acid_identity = Some(hit.identity);
            report.nucleotide_identity = Some(1.0);
        }
        many => {
            report.status = OrfStatus::Indeterminate;
            report.reason = Some(format!(
                "multiple placements detected ({} matches)",
                many.len()
            ));
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests;
