//! Global alignment with affine gaps (Gotoh). Rows walk the expected sequence
//! (i), columns the observed sequence (j).
//!
//! Three states per cell: M pairs two bases, X is a gap in expected (an
//! observed base is inserted), Y is a gap in observed (an expected base is
//! deleted). The gap-open cost is paid only when X or Y is entered from M.

use super::summary::summarize;
use super::types::{AlignmentResult, Scoring};
use super::GAP;

const NEG_INF: i32 = i32::MIN / 4;

const STATE_M: u8 = 0;
const STATE_X: u8 = 1;
const STATE_Y: u8 = 2;

// Traceback byte per cell: bits 0-1 hold the state feeding M,
// bit 2 is set when X extended X, bit 3 when Y extended Y.
const TRACE_M_MASK: u8 = 0b0011;
const TRACE_X_EXT: u8 = 0b0100;
const TRACE_Y_EXT: u8 = 0b1000;

/// Traceback storage for rows `1..=n`. With a band only the columns
/// `[i - band, i + band]` of each row are kept.
struct TraceGrid {
    cells: Vec<u8>,
    width: usize,
    band: Option<usize>,
}

impl TraceGrid {
    fn new(rows: usize, cols: usize, band: Option<usize>) -> Self {
        let width = match band {
            Some(b) => (2 * b + 1).min(cols),
            None => cols,
        };
        Self {
            cells: vec![0; rows * width],
            width,
            band,
        }
    }

    #[inline]
    fn lo(&self, i: usize) -> usize {
        match self.band {
            Some(b) => i.saturating_sub(b).max(1),
            None => 1,
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> Option<usize> {
        let lo = self.lo(i);
        if i == 0 || j < lo || j - lo >= self.width {
            return None;
        }
        Some((i - 1) * self.width + (j - lo))
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, cell: u8) {
        if let Some(idx) = self.index(i, j) {
            self.cells[idx] = cell;
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> u8 {
        self.index(i, j).map(|idx| self.cells[idx]).unwrap_or(0)
    }
}

/// Align `expected` against `observed` end to end.
///
/// With `band = Some(b)` each row only evaluates columns within `b` of the
/// diagonal; cells outside are treated as unreachable. This trades global
/// optimality far from the diagonal for `O(n * b)` time and memory. The band
/// is widened to at least the length difference so the final cell stays
/// reachable.
pub fn align_global(
    expected: &[u8],
    observed: &[u8],
    scoring: &Scoring,
    band: Option<usize>,
) -> AlignmentResult {
    let n = expected.len();
    let m = observed.len();
    let band = band.map(|b| b.max(n.abs_diff(m)));
    let gap_open = scoring.gap_open;
    let gap_extend = scoring.gap_extend;

    log::trace!("gotoh: expected={n} observed={m} band={band:?}");

    let mut prev_m = vec![NEG_INF; m + 1];
    let mut prev_x = vec![NEG_INF; m + 1];
    let mut prev_y = vec![NEG_INF; m + 1];
    let mut curr_m = vec![NEG_INF; m + 1];
    let mut curr_x = vec![NEG_INF; m + 1];
    let mut curr_y = vec![NEG_INF; m + 1];

    prev_m[0] = 0;
    for (j, x) in prev_x.iter_mut().enumerate().skip(1) {
        *x = gap_open + gap_extend * j as i32;
    }

    let mut trace = TraceGrid::new(n, m, band);

    for i in 1..=n {
        let (lo, hi) = match band {
            Some(b) => (i.saturating_sub(b).max(1), (i + b).min(m)),
            None => (1, m),
        };

        curr_m[0] = NEG_INF;
        curr_x[0] = NEG_INF;
        curr_y[0] = gap_open + gap_extend * i as i32;
        // Fence the band so stale values from earlier rows are never read.
        if lo > 1 {
            curr_m[lo - 1] = NEG_INF;
            curr_x[lo - 1] = NEG_INF;
            curr_y[lo - 1] = NEG_INF;
        }
        if hi < m {
            curr_m[hi + 1] = NEG_INF;
            curr_x[hi + 1] = NEG_INF;
            curr_y[hi + 1] = NEG_INF;
        }

        let e = expected[i - 1];
        for j in lo..=hi {
            let s = scoring.score(e, observed[j - 1]);

            // Tie-breaking: M > X > Y for the substitution state.
            let mut best = prev_m[j - 1];
            let mut cell = STATE_M;
            if prev_x[j - 1] > best {
                best = prev_x[j - 1];
                cell = STATE_X;
            }
            if prev_y[j - 1] > best {
                best = prev_y[j - 1];
                cell = STATE_Y;
            }
            curr_m[j] = best + s;

            // Opening wins ties against extending.
            let x_open = curr_m[j - 1] + gap_open + gap_extend;
            let x_ext = curr_x[j - 1] + gap_extend;
            if x_open >= x_ext {
                curr_x[j] = x_open;
            } else {
                curr_x[j] = x_ext;
                cell |= TRACE_X_EXT;
            }

            let y_open = prev_m[j] + gap_open + gap_extend;
            let y_ext = prev_y[j] + gap_extend;
            if y_open >= y_ext {
                curr_y[j] = y_open;
            } else {
                curr_y[j] = y_ext;
                cell |= TRACE_Y_EXT;
            }

            trace.set(i, j, cell);
        }

        std::mem::swap(&mut prev_m, &mut curr_m);
        std::mem::swap(&mut prev_x, &mut curr_x);
        std::mem::swap(&mut prev_y, &mut curr_y);
    }

    let mut score = prev_m[m];
    let mut state = STATE_M;
    if prev_x[m] > score {
        score = prev_x[m];
        state = STATE_X;
    }
    if prev_y[m] > score {
        score = prev_y[m];
        state = STATE_Y;
    }

    let mut aligned_expected = Vec::with_capacity(n + m);
    let mut aligned_observed = Vec::with_capacity(n + m);
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        // The first row and column can only be reached through gaps.
        if i == 0 {
            state = STATE_X;
        } else if j == 0 {
            state = STATE_Y;
        }
        match state {
            STATE_M => {
                aligned_expected.push(expected[i - 1]);
                aligned_observed.push(observed[j - 1]);
                state = trace.get(i, j) & TRACE_M_MASK;
                i -= 1;
                j -= 1;
            }
            STATE_X => {
                aligned_expected.push(GAP);
                aligned_observed.push(observed[j - 1]);
                let extending = i == 0 || trace.get(i, j) & TRACE_X_EXT != 0;
                j -= 1;
                state = if extending { STATE_X } else { STATE_M };
            }
            _ => {
                aligned_expected.push(expected[i - 1]);
                aligned_observed.push(GAP);
                let extending = j == 0 || trace.get(i, j) & TRACE_Y_EXT != 0;
                i -= 1;
                state = if extending { STATE_Y } else { STATE_M };
            }
        }
    }
    aligned_expected.reverse();
    aligned_observed.reverse();

    let summary = summarize(&aligned_expected, &aligned_observed);
    let identity = if n == 0 {
        0.0
    } else {
        summary.matches as f64 / n as f64
    };

    AlignmentResult {
        aligned_expected: aligned_expected.iter().map(|&b| b as char).collect(),
        aligned_observed: aligned_observed.iter().map(|&b| b as char).collect(),
        score,
        identity,
        mismatches: summary.mismatches,
        insertions: summary.insertions,
        deletions: summary.deletions,
        matches: summary.matches,
        covered_bases: summary.covered_bases,
    }
}
