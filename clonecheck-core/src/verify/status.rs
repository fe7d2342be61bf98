use std::fmt;

use crate::align::AlignmentResult;

use super::impact::OrfImpact;

/// Overall verdict on a clone. The first verdict that applies wins, checked
/// from `Failed` back up to `Perfect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CloneStatus {
    Perfect,
    #[cfg_attr(feature = "serde", serde(rename = "silent"))]
    SilentMutations,
    Conservative,
    Mutant,
    Frameshift,
    Truncated,
    Failed,
}

impl CloneStatus {
    /// Whether the clone is usable as is.
    pub fn is_pass(self) -> bool {
        matches!(
            self,
            CloneStatus::Perfect | CloneStatus::SilentMutations | CloneStatus::Conservative
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CloneStatus::Perfect => "perfect",
            CloneStatus::SilentMutations => "silent",
            CloneStatus::Conservative => "conservative",
            CloneStatus::Mutant => "mutant",
            CloneStatus::Frameshift => "frameshift",
            CloneStatus::Truncated => "truncated",
            CloneStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CloneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SIMILARITY_GROUPS: [&[u8]; 7] = [b"AVLIM", b"FYW", b"KRH", b"DE", b"STNQ", b"GP", b"C"];

/// Both residues fall in the same physico-chemical group.
pub fn is_conservative_change(expected: char, observed: char) -> bool {
    let (Ok(e), Ok(o)) = (u8::try_from(expected), u8::try_from(observed)) else {
        return false;
    };
    SIMILARITY_GROUPS
        .iter()
        .any(|group| group.contains(&e) && group.contains(&o))
}

pub(crate) fn evaluate_status(
    alignment: &AlignmentResult,
    impacts: &[OrfImpact],
    max_mismatches: usize,
    notes: &mut Vec<String>,
) -> CloneStatus {
    let mismatches = alignment.mismatches.len();
    if mismatches > max_mismatches {
        notes.push(format!(
            "Mismatch count {mismatches} exceeds max {max_mismatches}"
        ));
        return CloneStatus::Failed;
    }
    if impacts.iter().any(|i| i.has_frameshift) {
        return CloneStatus::Frameshift;
    }
    if impacts.iter().any(|i| i.has_premature_stop) {
        return CloneStatus::Truncated;
    }
    let mut changes = impacts.iter().flat_map(|i| i.changes.iter()).peekable();
    if changes.peek().is_some() {
        return if changes.all(|c| is_conservative_change(c.expected, c.observed)) {
            CloneStatus::Conservative
        } else {
            CloneStatus::Mutant
        };
    }
    if alignment.has_differences() {
        return CloneStatus::SilentMutations;
    }
    CloneStatus::Perfect
}
