use super::types::{Indel, Mismatch};
use super::GAP;

#[derive(Debug, Default)]
pub(crate) struct AlignmentSummary {
    pub mismatches: Vec<Mismatch>,
    pub insertions: Vec<Indel>,
    pub deletions: Vec<Indel>,
    pub matches: usize,
    pub covered_bases: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Insertion,
    Deletion,
}

struct OpenRun {
    kind: RunKind,
    position: usize,
    bases: Vec<u8>,
}

impl AlignmentSummary {
    fn close(&mut self, run: Option<OpenRun>) {
        if let Some(run) = run {
            let indel = Indel::new(run.position, run.bases);
            match run.kind {
                RunKind::Insertion => self.insertions.push(indel),
                RunKind::Deletion => self.deletions.push(indel),
            }
        }
    }
}

/// Walk an aligned pair and classify every column. Consecutive gap columns on
/// the same side collapse into one indel positioned at the expected coordinate
/// where the run starts (insertions before the first base report 1).
pub(crate) fn summarize(aligned_expected: &[u8], aligned_observed: &[u8]) -> AlignmentSummary {
    debug_assert_eq!(aligned_expected.len(), aligned_observed.len());
    let mut out = AlignmentSummary::default();
    let mut run: Option<OpenRun> = None;
    let mut expected_pos = 0usize;

    for (&e, &o) in aligned_expected.iter().zip(aligned_observed) {
        if e != GAP {
            expected_pos += 1;
        }
        match (e == GAP, o == GAP) {
            (false, false) => {
                out.close(run.take());
                out.covered_bases += 1;
                if e == o {
                    out.matches += 1;
                } else {
                    out.mismatches
                        .push(Mismatch::new(expected_pos, e as char, o as char));
                }
            }
            (true, false) => {
                if run.as_ref().map(|r| r.kind) != Some(RunKind::Insertion) {
                    out.close(run.take());
                    run = Some(OpenRun {
                        kind: RunKind::Insertion,
                        position: expected_pos.max(1),
                        bases: Vec::new(),
                    });
                }
                if let Some(r) = run.as_mut() {
                    r.bases.push(o);
                }
            }
            (false, true) => {
                if run.as_ref().map(|r| r.kind) != Some(RunKind::Deletion) {
                    out.close(run.take());
                    run = Some(OpenRun {
                        kind: RunKind::Deletion,
                        position: expected_pos,
                        bases: Vec::new(),
                    });
                }
                if let Some(r) = run.as_mut() {
                    r.bases.push(e);
                }
            }
            (true, true) => {}
        }
    }
    out.close(run);
    out
}
