use crate::alphabets::dna;
use crate::error::{CheckError, CheckResult};
use crate::seq::circular::wrap_position;

const GAP: u8 = b'-';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// 1-indexed inclusive span on a circular sequence; `start > end` wraps
/// through the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureLocation {
    start: usize,
    end: usize,
    strand: Strand,
}

impl FeatureLocation {
    pub fn new(start: usize, end: usize, strand: Strand) -> CheckResult<Self> {
        if start == 0 || end == 0 {
            return Err(CheckError::InvalidLocation { start, end, len: 0 });
        }
        Ok(Self { start, end, strand })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Number of bases covered on a circle of `seq_len`.
    pub fn len(&self, seq_len: usize) -> usize {
        if self.wraps() {
            seq_len.saturating_sub(self.start) + 1 + self.end
        } else {
            self.end - self.start + 1
        }
    }

    pub fn contains(&self, pos: usize) -> bool {
        if self.wraps() {
            pos >= self.start || pos <= self.end
        } else {
            self.start <= pos && pos <= self.end
        }
    }

    /// Both ends must lie on the sequence, 1-based.
    pub fn check_within(&self, seq_len: usize) -> CheckResult<()> {
        let on_sequence = |p: usize| (1..=seq_len).contains(&p);
        if !on_sequence(self.start) || !on_sequence(self.end) {
            return Err(CheckError::InvalidLocation {
                start: self.start,
                end: self.end,
                len: seq_len,
            });
        }
        Ok(())
    }

    /// Coordinates after the sequence is rotated left by `offset` bases.
    pub fn rotated(&self, offset: usize, seq_len: usize) -> Self {
        if seq_len == 0 {
            return *self;
        }
        let shift = -((offset % seq_len) as isize);
        Self {
            start: wrap_position(self.start, shift, seq_len),
            end: wrap_position(self.end, shift, seq_len),
            strand: self.strand,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    name: Box<str>,
    feature_type: Box<str>,
    location: FeatureLocation,
    translation: Option<Box<str>>,
}

impl Feature {
    pub fn new(
        name: impl Into<Box<str>>,
        feature_type: impl Into<Box<str>>,
        location: FeatureLocation,
    ) -> Self {
        Self {
            name: name.into(),
            feature_type: feature_type.into(),
            location,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<Box<str>>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    pub fn location(&self) -> &FeatureLocation {
        &self.location
    }

    pub fn strand(&self) -> Strand {
        self.location.strand
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn is_cds(&self) -> bool {
        self.feature_type.eq_ignore_ascii_case("CDS")
    }
}

/// Re-express every feature under a left rotation of the sequence by `start`.
pub fn shift_features(features: &[Feature], start: usize, seq_len: usize) -> Vec<Feature> {
    if seq_len == 0 {
        return features.to_vec();
    }
    features
        .iter()
        .map(|feat| {
            let mut out = feat.clone();
            out.location = feat.location.rotated(start, seq_len);
            out
        })
        .collect()
}

/// First feature covering `pos`, in declaration order.
pub fn feature_at(features: &[Feature], pos: usize) -> Option<&Feature> {
    features.iter().find(|f| f.location.contains(pos))
}

/// First CDS covering `pos`, in declaration order.
pub fn cds_at(features: &[Feature], pos: usize) -> Option<&Feature> {
    features
        .iter()
        .find(|f| f.is_cds() && f.location.contains(pos))
}

/// Plus-strand bases of the feature's span.
pub fn extract_feature_sequence(seq: &[u8], location: &FeatureLocation) -> Vec<u8> {
    let n = seq.len();
    let start = location.start.min(n + 1);
    let end = location.end.min(n);
    if location.wraps() {
        let mut out = seq[start - 1..].to_vec();
        out.extend_from_slice(&seq[..end]);
        out
    } else if start <= end {
        seq[start - 1..end].to_vec()
    } else {
        Vec::new()
    }
}

/// Observed bases aligned inside the feature, including inserted bases that
/// follow an in-feature reference position. For a wrapping feature the part
/// before the origin comes first, matching [`extract_feature_sequence`].
pub fn extract_observed_feature(
    aligned_expected: &[u8],
    aligned_observed: &[u8],
    location: &FeatureLocation,
) -> Vec<u8> {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut expected_pos = 0usize;
    for (&e, &o) in aligned_expected.iter().zip(aligned_observed) {
        if e != GAP {
            expected_pos += 1;
        }
        if o == GAP || !location.contains(expected_pos) {
            continue;
        }
        if location.wraps() && expected_pos >= location.start {
            tail.push(o);
        } else {
            head.push(o);
        }
    }
    tail.extend_from_slice(&head);
    tail
}

/// Bases read 5'->3' along the feature's coding strand.
pub fn orient(seq: Vec<u8>, strand: Strand) -> Vec<u8> {
    match strand {
        Strand::Plus => seq,
        Strand::Minus => dna::reverse_complement(&seq),
    }
}
