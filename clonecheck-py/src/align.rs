use pyo3::prelude::*;
use pyo3::types::PyModule;

use clonecheck_core::align as core_align;
use clonecheck_core::alphabets::dna;

use crate::utils::to_py_err;

#[pyclass(frozen)]
#[derive(Clone)]
pub struct Mismatch {
    #[pyo3(get)]
    position: usize,
    #[pyo3(get)]
    expected: char,
    #[pyo3(get)]
    observed: char,
    #[pyo3(get)]
    feature: Option<String>,
    #[pyo3(get)]
    codon_change: Option<String>,
    #[pyo3(get)]
    aa_change: Option<String>,
}

#[pymethods]
impl Mismatch {
    fn __repr__(&self) -> String {
        format!(
            "Mismatch(position={}, expected={:?}, observed={:?}, feature={:?}, aa_change={:?})",
            self.position, self.expected, self.observed, self.feature, self.aa_change
        )
    }
}

impl From<core_align::Mismatch> for Mismatch {
    fn from(value: core_align::Mismatch) -> Self {
        Self {
            position: value.position,
            expected: value.expected,
            observed: value.observed,
            feature: value.feature,
            codon_change: value.codon_change,
            aa_change: value.aa_change,
        }
    }
}

#[pyclass(frozen)]
#[derive(Clone)]
pub struct Indel {
    #[pyo3(get)]
    position: usize,
    #[pyo3(get)]
    length: usize,
    #[pyo3(get)]
    sequence: String,
    #[pyo3(get)]
    feature: Option<String>,
    #[pyo3(get)]
    causes_frameshift: bool,
}

#[pymethods]
impl Indel {
    fn __repr__(&self) -> String {
        format!(
            "Indel(position={}, length={}, sequence={:?}, causes_frameshift={})",
            self.position,
            self.length,
            self.sequence,
            if self.causes_frameshift { "True" } else { "False" }
        )
    }
}

impl From<core_align::Indel> for Indel {
    fn from(value: core_align::Indel) -> Self {
        Self {
            position: value.position,
            length: value.length,
            sequence: value.sequence,
            feature: value.feature,
            causes_frameshift: value.causes_frameshift,
        }
    }
}

pub fn convert_all<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

#[pyclass(frozen)]
pub struct AlignmentResult {
    #[pyo3(get)]
    aligned_expected: String,
    #[pyo3(get)]
    aligned_observed: String,
    #[pyo3(get)]
    score: i32,
    #[pyo3(get)]
    identity: f64,
    #[pyo3(get)]
    matches: usize,
    #[pyo3(get)]
    covered_bases: usize,
    #[pyo3(get)]
    mismatches: Vec<Mismatch>,
    #[pyo3(get)]
    insertions: Vec<Indel>,
    #[pyo3(get)]
    deletions: Vec<Indel>,
}

#[pymethods]
impl AlignmentResult {
    fn alignment_diagram(&self) -> String {
        let mid: String = self
            .aligned_expected
            .chars()
            .zip(self.aligned_observed.chars())
            .map(|(e, o)| match (e, o) {
                ('-', _) | (_, '-') => ' ',
                _ if e == o => '|',
                _ => '*',
            })
            .collect();
        format!("{}\n{}\n{}", self.aligned_expected, mid, self.aligned_observed)
    }

    fn __repr__(&self) -> String {
        format!(
            "AlignmentResult(score={}, identity={:.4}, mismatches={}, insertions={}, deletions={})",
            self.score,
            self.identity,
            self.mismatches.len(),
            self.insertions.len(),
            self.deletions.len()
        )
    }
}

impl From<core_align::AlignmentResult> for AlignmentResult {
    fn from(value: core_align::AlignmentResult) -> Self {
        Self {
            aligned_expected: value.aligned_expected,
            aligned_observed: value.aligned_observed,
            score: value.score,
            identity: value.identity,
            matches: value.matches,
            covered_bases: value.covered_bases,
            mismatches: convert_all(value.mismatches),
            insertions: convert_all(value.insertions),
            deletions: convert_all(value.deletions),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (expected, observed, band=None, match_score=2, mismatch_score=-1, gap_open=-5, gap_extend=-1))]
fn align(
    expected: &str,
    observed: &str,
    band: Option<usize>,
    match_score: i32,
    mismatch_score: i32,
    gap_open: i32,
    gap_extend: i32,
) -> PyResult<AlignmentResult> {
    let expected = dna::sanitize_read(expected).map_err(to_py_err)?;
    let observed = dna::sanitize_read(observed).map_err(to_py_err)?;
    let scoring = core_align::Scoring::simple(match_score, mismatch_score, gap_open, gap_extend);
    Ok(core_align::align_with(&expected, &observed, &scoring, band).into())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Mismatch>()?;
    m.add_class::<Indel>()?;
    m.add_class::<AlignmentResult>()?;
    m.add_function(wrap_pyfunction!(align, m)?)?;
    Ok(())
}
