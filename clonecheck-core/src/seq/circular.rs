//! Index arithmetic on circular sequences.

/// Cyclic left rotation: `seq[start..] + seq[..start]`, with `start` taken
/// modulo the sequence length.
pub fn rotate(seq: &[u8], start: usize) -> Vec<u8> {
    if seq.is_empty() {
        return Vec::new();
    }
    let start = start % seq.len();
    let mut out = Vec::with_capacity(seq.len());
    out.extend_from_slice(&seq[start..]);
    out.extend_from_slice(&seq[..start]);
    out
}

/// `len` bases starting at 0-based `start`, reading through the origin as
/// often as needed.
pub fn extract_circular(seq: &[u8], start: usize, len: usize) -> Vec<u8> {
    if seq.is_empty() || len == 0 {
        return Vec::new();
    }
    let n = seq.len();
    (0..len).map(|k| seq[(start + k) % n]).collect()
}

/// 1-indexed position `pos` moved by a signed offset, wrapped into `1..=len`.
#[inline]
pub fn wrap_position(pos: usize, offset: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    let n = len as isize;
    ((pos as isize - 1 + offset).rem_euclid(n) + 1) as usize
}
