/// Affine-gap scoring. A gap of length `k` costs `gap_open + k * gap_extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scoring {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_score: 2,
            mismatch_score: -1,
            gap_open: -5,
            gap_extend: -1,
        }
    }
}

impl Scoring {
    pub fn simple(match_score: i32, mismatch_score: i32, gap_open: i32, gap_extend: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
            gap_open,
            gap_extend,
        }
    }

    pub fn with_gaps(mut self, gap_open: i32, gap_extend: i32) -> Self {
        self.gap_open = gap_open;
        self.gap_extend = gap_extend;
        self
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// A substituted base. `position` is 1-indexed on the ungapped expected sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mismatch {
    pub position: usize,
    pub expected: char,
    pub observed: char,
    pub feature: Option<String>,
    pub codon_change: Option<String>,
    pub aa_change: Option<String>,
}

impl Mismatch {
    pub fn new(position: usize, expected: char, observed: char) -> Self {
        Self {
            position,
            expected,
            observed,
            feature: None,
            codon_change: None,
            aa_change: None,
        }
    }
}

/// One run of consecutive gap columns. For insertions `sequence` holds the
/// inserted observed bases, for deletions the missing expected bases.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indel {
    pub position: usize,
    pub length: usize,
    pub sequence: String,
    pub feature: Option<String>,
    pub causes_frameshift: bool,
}

impl Indel {
    pub fn new(position: usize, sequence: Vec<u8>) -> Self {
        Self {
            position,
            length: sequence.len(),
            sequence: String::from_utf8_lossy(&sequence).into_owned(),
            feature: None,
            causes_frameshift: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentResult {
    pub aligned_expected: String,
    pub aligned_observed: String,
    pub score: i32,
    pub identity: f64,
    pub mismatches: Vec<Mismatch>,
    pub insertions: Vec<Indel>,
    pub deletions: Vec<Indel>,
    pub matches: usize,
    pub covered_bases: usize,
}

impl AlignmentResult {
    pub fn has_differences(&self) -> bool {
        !self.mismatches.is_empty() || !self.insertions.is_empty() || !self.deletions.is_empty()
    }

    /// Observed base aligned to each expected position (index `pos - 1`);
    /// `None` where the observed track has a gap.
    pub fn observed_by_expected_position(&self) -> Vec<Option<u8>> {
        let mut out = Vec::new();
        for (&e, &o) in self
            .aligned_expected
            .as_bytes()
            .iter()
            .zip(self.aligned_observed.as_bytes())
        {
            if e != super::GAP {
                out.push(if o == super::GAP { None } else { Some(o) });
            }
        }
        out
    }
}
