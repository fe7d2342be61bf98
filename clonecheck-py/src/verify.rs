use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use clonecheck_core::io::abif;
use clonecheck_core::seq::feature as core_feature;
use clonecheck_core::verify as core_verify;
use clonecheck_core::verify::annotation as core_annotation;

use crate::align::{convert_all, Indel, Mismatch};
use crate::utils::to_py_err;

#[pyclass(frozen)]
#[derive(Clone)]
pub struct Feature {
    inner: core_feature::Feature,
}

#[pymethods]
impl Feature {
    #[new]
    #[pyo3(signature = (name, start, end, strand='+', feature_type="CDS", translation=None))]
    fn new(
        name: &str,
        start: usize,
        end: usize,
        strand: char,
        feature_type: &str,
        translation: Option<&str>,
    ) -> PyResult<Self> {
        let strand = core_feature::Strand::from_symbol(strand)
            .ok_or_else(|| PyValueError::new_err("strand must be '+' or '-'"))?;
        let location =
            core_feature::FeatureLocation::new(start, end, strand).map_err(to_py_err)?;
        let mut inner = core_feature::Feature::new(name, feature_type, location);
        if let Some(t) = translation {
            inner = inner.with_translation(t);
        }
        Ok(Self { inner })
    }

    #[getter]
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[getter]
    fn feature_type(&self) -> &str {
        self.inner.feature_type()
    }

    #[getter]
    fn start(&self) -> usize {
        self.inner.location().start()
    }

    #[getter]
    fn end(&self) -> usize {
        self.inner.location().end()
    }

    #[getter]
    fn strand(&self) -> char {
        self.inner.strand().symbol()
    }

    #[getter]
    fn translation(&self) -> Option<&str> {
        self.inner.translation()
    }

    fn __repr__(&self) -> String {
        format!(
            "Feature(name={:?}, start={}, end={}, strand='{}', feature_type={:?})",
            self.inner.name(),
            self.start(),
            self.end(),
            self.strand(),
            self.inner.feature_type()
        )
    }
}

#[pyclass(frozen)]
#[derive(Clone)]
pub struct AAChange {
    #[pyo3(get)]
    position: usize,
    #[pyo3(get)]
    expected: char,
    #[pyo3(get)]
    observed: char,
    #[pyo3(get)]
    codon_expected: String,
    #[pyo3(get)]
    codon_observed: String,
    #[pyo3(get)]
    is_synonymous: bool,
}

#[pymethods]
impl AAChange {
    fn __repr__(&self) -> String {
        format!(
            "AAChange(position={}, {}->{}, {}->{})",
            self.position, self.expected, self.observed, self.codon_expected, self.codon_observed
        )
    }
}

impl From<core_verify::AAChange> for AAChange {
    fn from(value: core_verify::AAChange) -> Self {
        Self {
            position: value.position,
            expected: value.expected,
            observed: value.observed,
            codon_expected: value.codon_expected,
            codon_observed: value.codon_observed,
            is_synonymous: value.is_synonymous,
        }
    }
}

#[pyclass(frozen)]
#[derive(Clone)]
pub struct OrfImpact {
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    expected_residues: String,
    #[pyo3(get)]
    observed_residues: String,
    #[pyo3(get)]
    identity: f64,
    #[pyo3(get)]
    changes: Vec<AAChange>,
    #[pyo3(get)]
    has_frameshift: bool,
    #[pyo3(get)]
    has_premature_stop: bool,
    #[pyo3(get)]
    is_intact: bool,
}

#[pymethods]
impl OrfImpact {
    fn __repr__(&self) -> String {
        format!(
            "OrfImpact(name={:?}, identity={:.4}, changes={})",
            self.name,
            self.identity,
            self.changes.len()
        )
    }
}

impl From<core_verify::OrfImpact> for OrfImpact {
    fn from(value: core_verify::OrfImpact) -> Self {
        Self {
            name: value.name,
            expected_residues: value.expected_residues,
            observed_residues: value.observed_residues,
            identity: value.identity,
            changes: convert_all(value.changes),
            has_frameshift: value.has_frameshift,
            has_premature_stop: value.has_premature_stop,
            is_intact: value.is_intact,
        }
    }
}

#[pyclass(frozen)]
pub struct CloneReport {
    #[pyo3(get)]
    status: &'static str,
    #[pyo3(get)]
    is_pass: bool,
    #[pyo3(get)]
    expected_name: String,
    #[pyo3(get)]
    expected_length: usize,
    #[pyo3(get)]
    read_name: String,
    #[pyo3(get)]
    read_length: usize,
    #[pyo3(get)]
    identity: f64,
    #[pyo3(get)]
    matches: usize,
    #[pyo3(get)]
    covered_bases: usize,
    #[pyo3(get)]
    coverage: f64,
    #[pyo3(get)]
    rotation_offset: usize,
    #[pyo3(get)]
    orientation: &'static str,
    #[pyo3(get)]
    mismatches: Vec<Mismatch>,
    #[pyo3(get)]
    insertions: Vec<Indel>,
    #[pyo3(get)]
    deletions: Vec<Indel>,
    #[pyo3(get)]
    orf_impacts: Vec<OrfImpact>,
    #[pyo3(get)]
    notes: Vec<String>,
}

#[pymethods]
impl CloneReport {
    fn __repr__(&self) -> String {
        format!(
            "CloneReport(status={:?}, identity={:.4}, coverage={:.4}, mismatches={})",
            self.status,
            self.identity,
            self.coverage,
            self.mismatches.len()
        )
    }
}

impl From<core_verify::CloneReport> for CloneReport {
    fn from(value: core_verify::CloneReport) -> Self {
        Self {
            status: value.status.as_str(),
            is_pass: value.is_pass(),
            expected_name: value.expected_name,
            expected_length: value.expected_length,
            read_name: value.read_name,
            read_length: value.read_length,
            identity: value.identity,
            matches: value.matches,
            covered_bases: value.covered_bases,
            coverage: value.coverage,
            rotation_offset: value.rotation_offset,
            orientation: match value.orientation {
                core_verify::ReadOrientation::Forward => "forward",
                core_verify::ReadOrientation::Reverse => "reverse",
            },
            mismatches: convert_all(value.mismatches),
            insertions: convert_all(value.insertions),
            deletions: convert_all(value.deletions),
            orf_impacts: convert_all(value.orf_impacts),
            notes: value.notes,
        }
    }
}

#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(signature = (reference, read, features=Vec::new(), reference_name="expected", read_name="read", declared_orf=None, max_mismatches=0, ignore_ends=0, band_threshold=50_000, band_width=1_000, max_rotation_candidates=10))]
fn verify_clone(
    py: Python<'_>,
    reference: &str,
    read: &str,
    features: Vec<PyRef<'_, Feature>>,
    reference_name: &str,
    read_name: &str,
    declared_orf: Option<&str>,
    max_mismatches: usize,
    ignore_ends: usize,
    band_threshold: usize,
    band_width: usize,
    max_rotation_candidates: usize,
) -> PyResult<CloneReport> {
    let mut expected = core_verify::ReferenceSequence::new(reference_name, reference)
        .map_err(to_py_err)?
        .with_features(features.iter().map(|f| f.inner.clone()));
    if let Some(residues) = declared_orf {
        expected = expected
            .with_declared_orf(reference_name, residues)
            .map_err(to_py_err)?;
    }
    let read = core_verify::SequencingRead::new(read_name, read).map_err(to_py_err)?;
    let params = core_verify::CloneVerifyParams::default()
        .with_max_mismatches(max_mismatches)
        .with_ignore_ends(ignore_ends)
        .with_banding(band_threshold, band_width)
        .with_max_rotation_candidates(max_rotation_candidates);
    let report = py
        .allow_threads(|| core_verify::verify_clone(&expected, &read, &params))
        .map_err(to_py_err)?;
    Ok(report.into())
}

#[pyclass(frozen)]
pub struct AnnotationResult {
    #[pyo3(get)]
    label: String,
    #[pyo3(get)]
    reference_id: String,
    #[pyo3(get)]
    start: usize,
    #[pyo3(get)]
    end: usize,
    #[pyo3(get)]
    observed_length: usize,
    #[pyo3(get)]
    reference_length: usize,
    #[pyo3(get)]
    identity: f64,
    #[pyo3(get)]
    status: &'static str,
    #[pyo3(get)]
    differences: Vec<(usize, char, char)>,
    #[pyo3(get)]
    error: Option<String>,
    #[pyo3(get)]
    is_fragment: bool,
    #[pyo3(get)]
    notes: Vec<String>,
}

#[pymethods]
impl AnnotationResult {
    fn __repr__(&self) -> String {
        format!(
            "AnnotationResult(label={:?}, status={:?}, identity={:.4})",
            self.label, self.status, self.identity
        )
    }
}

impl From<core_annotation::AnnotationResult> for AnnotationResult {
    fn from(value: core_annotation::AnnotationResult) -> Self {
        Self {
            label: value.label,
            reference_id: value.reference_id,
            start: value.location.start(),
            end: value.location.end(),
            observed_length: value.observed_length,
            reference_length: value.reference_length,
            identity: value.identity,
            status: value.status.as_str(),
            differences: value
                .differences
                .iter()
                .map(|d| (d.position, d.expected, d.observed))
                .collect(),
            error: value.error,
            is_fragment: value.is_fragment,
            notes: value.notes,
        }
    }
}

/// Compare the protein `feature` encodes on `plasmid` with a known sequence.
#[pyfunction]
fn verify_annotation(
    plasmid: &str,
    feature: PyRef<'_, Feature>,
    reference_id: &str,
    reference_protein: &str,
) -> PyResult<AnnotationResult> {
    let plasmid = core_verify::ReferenceSequence::new("plasmid", plasmid).map_err(to_py_err)?;
    let protein =
        core_annotation::ReferenceProtein::new(reference_id, reference_protein).map_err(to_py_err)?;
    let result = core_annotation::verify_annotation(&feature.inner, plasmid.sequence(), &protein)
        .map_err(to_py_err)?;
    Ok(result.into())
}

#[pyfunction]
fn decode_base_calls(data: &[u8]) -> PyResult<String> {
    abif::decode_base_calls(data).map_err(to_py_err)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Feature>()?;
    m.add_class::<AAChange>()?;
    m.add_class::<OrfImpact>()?;
    m.add_class::<CloneReport>()?;
    m.add_class::<AnnotationResult>()?;
    m.add_function(wrap_pyfunction!(verify_clone, m)?)?;
    m.add_function(wrap_pyfunction!(verify_annotation, m)?)?;
    m.add_function(wrap_pyfunction!(decode_base_calls, m)?)?;
    Ok(())
}
