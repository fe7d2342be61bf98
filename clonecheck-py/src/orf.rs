use pyo3::prelude::*;
use pyo3::types::PyModule;

use clonecheck_core::alphabets::dna;
use clonecheck_core::orf as core_orf;
use clonecheck_core::seq::translate as core_translate;

use crate::align::convert_all;
use crate::utils::{bytes_to_string, to_py_err};

#[pyclass(frozen)]
#[derive(Clone)]
pub struct DetectedTag {
    #[pyo3(get)]
    terminus: &'static str,
    #[pyo3(get)]
    id: String,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    kind: &'static str,
    #[pyo3(get)]
    sequence: String,
}

#[pymethods]
impl DetectedTag {
    fn __repr__(&self) -> String {
        format!("DetectedTag(terminus={:?}, id={:?})", self.terminus, self.id)
    }
}

impl From<core_orf::DetectedTag> for DetectedTag {
    fn from(value: core_orf::DetectedTag) -> Self {
        Self {
            terminus: value.terminus.label(),
            id: value.id,
            name: value.name,
            kind: value.kind.as_str(),
            sequence: value.sequence,
        }
    }
}

#[pyclass(frozen)]
#[derive(Clone)]
pub struct OrfCandidate {
    #[pyo3(get)]
    strand: char,
    #[pyo3(get)]
    frame: usize,
    #[pyo3(get)]
    start: usize,
    #[pyo3(get)]
    end: usize,
    #[pyo3(get)]
    wraps: bool,
    #[pyo3(get)]
    length: usize,
    #[pyo3(get)]
    identity: f64,
    /// (position, expected, observed) per differing residue.
    #[pyo3(get)]
    discrepancies: Vec<(usize, char, char)>,
    #[pyo3(get)]
    coding_sequence: String,
    #[pyo3(get)]
    observed_residues: String,
    #[pyo3(get)]
    tags: Vec<DetectedTag>,
}

#[pymethods]
impl OrfCandidate {
    fn __repr__(&self) -> String {
        format!(
            "OrfCandidate(strand='{}', frame={}, start={}, end={}, identity={:.4})",
            self.strand, self.frame, self.start, self.end, self.identity
        )
    }
}

impl From<core_orf::CandidateMatch> for OrfCandidate {
    fn from(value: core_orf::CandidateMatch) -> Self {
        Self {
            strand: value.strand.symbol(),
            frame: value.frame,
            start: value.start,
            end: value.end,
            wraps: value.wraps,
            length: value.length,
            identity: value.identity,
            discrepancies: value
                .discrepancies
                .iter()
                .map(|d| (d.position, d.expected, d.observed))
                .collect(),
            coding_sequence: value.coding_sequence,
            observed_residues: value.observed_residues,
            tags: convert_all(value.tags),
        }
    }
}

#[pyclass(frozen)]
#[derive(Clone)]
pub struct Component {
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    kind: &'static str,
    #[pyo3(get)]
    aa_range: (usize, usize),
    #[pyo3(get)]
    nt_range: (usize, usize),
    #[pyo3(get)]
    sequence: String,
}

#[pymethods]
impl Component {
    fn __repr__(&self) -> String {
        format!("Component(name={:?}, kind={:?})", self.name, self.kind)
    }
}

impl From<core_orf::Component> for Component {
    fn from(value: core_orf::Component) -> Self {
        Self {
            name: value.name,
            kind: value.kind.as_str(),
            aa_range: (value.aa_range.start, value.aa_range.end),
            nt_range: (value.nt_range.start, value.nt_range.end),
            sequence: value.sequence,
        }
    }
}

#[pyclass(frozen)]
pub struct OrfReport {
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    status: &'static str,
    #[pyo3(get)]
    reason: Option<String>,
    #[pyo3(get)]
    candidates: Vec<OrfCandidate>,
    #[pyo3(get)]
    observed_residues: Option<String>,
    #[pyo3(get)]
    coding_sequence: Option<String>,
    #[pyo3(get)]
    codon_table: Vec<(String, char)>,
    #[pyo3(get)]
    components: Vec<Component>,
    #[pyo3(get)]
    amino_acid_identity: Option<f64>,
    #[pyo3(get)]
    nucleotide_identity: Option<f64>,
}

#[pymethods]
impl OrfReport {
    #[getter]
    fn placement(&self) -> Option<OrfCandidate> {
        match self.status {
            "verified" => self.candidates.first().cloned(),
            _ => None,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "OrfReport(name={:?}, status={:?}, candidates={})",
            self.name,
            self.status,
            self.candidates.len()
        )
    }
}

impl From<core_orf::OrfReport> for OrfReport {
    fn from(value: core_orf::OrfReport) -> Self {
        let (observed_residues, coding_sequence, codon_table, components) = match value.variant {
            Some(v) => (
                Some(v.observed_residues),
                Some(v.coding_sequence),
                v.codon_table.into_iter().map(|c| (c.codon, c.residue)).collect(),
                convert_all(v.components),
            ),
            None => (None, None, Vec::new(), Vec::new()),
        };
        Self {
            name: value.name,
            status: value.status.as_str(),
            reason: value.reason,
            candidates: convert_all(value.candidates),
            observed_residues,
            coding_sequence,
            codon_table,
            components,
            amino_acid_identity: value.amino_acid_identity,
            nucleotide_identity: value.nucleotide_identity,
        }
    }
}

#[pyfunction]
#[pyo3(signature = (seq, frame=0))]
fn translate(seq: &str, frame: usize) -> PyResult<String> {
    let seq = dna::sanitize_read(seq).map_err(to_py_err)?;
    let residues = core_translate::translate(&seq, frame).map_err(to_py_err)?;
    Ok(bytes_to_string(&residues))
}

#[pyfunction]
fn reverse_complement(seq: &str) -> PyResult<String> {
    let seq = dna::sanitize_read(seq).map_err(to_py_err)?;
    Ok(bytes_to_string(&dna::reverse_complement(&seq)))
}

#[pyfunction]
#[pyo3(signature = (name, reference, query, allow_alt_start=false, min_identity=1.0, max_mismatches=0, disallow_internal_met=false))]
fn verify_orf(
    name: &str,
    reference: &str,
    query: &str,
    allow_alt_start: bool,
    min_identity: f64,
    max_mismatches: usize,
    disallow_internal_met: bool,
) -> PyResult<OrfReport> {
    let params = core_orf::OrfSearchParams::default()
        .with_alt_start(allow_alt_start)
        .with_min_identity(min_identity)
        .with_max_mismatches(max_mismatches)
        .with_disallow_internal_met(disallow_internal_met);
    let report = core_orf::verify_orf(name, reference, query, &params).map_err(to_py_err)?;
    Ok(report.into())
}

/// `(id, name, kind, sequences, description)` for every built-in tag.
#[pyfunction]
fn tag_library() -> Vec<(&'static str, &'static str, &'static str, Vec<&'static str>, &'static str)> {
    core_orf::tag_library()
        .iter()
        .map(|t| (t.id, t.name, t.kind.as_str(), t.sequences.to_vec(), t.description))
        .collect()
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DetectedTag>()?;
    m.add_class::<OrfCandidate>()?;
    m.add_class::<Component>()?;
    m.add_class::<OrfReport>()?;
    m.add_function(wrap_pyfunction!(translate, m)?)?;
    m.add_function(wrap_pyfunction!(reverse_complement, m)?)?;
    m.add_function(wrap_pyfunction!(verify_orf, m)?)?;
    m.add_function(wrap_pyfunction!(tag_library, m)?)?;
    Ok(())
}
