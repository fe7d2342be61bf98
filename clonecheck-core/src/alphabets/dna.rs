use crate::alphabets::Alphabet;
use crate::error::{CheckError, CheckResult};
use std::sync::LazyLock;

static BASES: LazyLock<Alphabet> = LazyLock::new(|| Alphabet::new(b"ACGT"));
static N_BASES: LazyLock<Alphabet> = LazyLock::new(|| Alphabet::new(b"ACGTN"));

/// Unambiguous bases accepted in a reference.
pub fn alphabet() -> &'static Alphabet {
    &BASES
}

/// Bases accepted in a read, where `N` marks an uncalled position.
pub fn n_alphabet() -> &'static Alphabet {
    &N_BASES
}

// Anything outside ACGT complements to N.
static COMPLEMENT: LazyLock<[u8; 256]> = LazyLock::new(|| {
    let mut comp = [b'N'; 256];
    b"ACGT"
        .iter()
        .zip(b"TGCA".iter())
        .for_each(|(&a, &b)| {
            comp[a as usize] = b;
        });
    comp
});

#[inline]
pub fn complement(a: u8) -> u8 {
    COMPLEMENT[a as usize]
}

pub fn reverse_complement(text: &[u8]) -> Vec<u8> {
    text.iter().rev().map(|&a| complement(a)).collect()
}

/// Clean a reference (plasmid) sequence: whitespace, digits and punctuation are
/// skipped, bases are upper-cased, and `N` is rejected.
pub fn sanitize_reference(input: &str) -> CheckResult<Vec<u8>> {
    sanitize(input, alphabet())
}

/// Clean a sequencing read; like [`sanitize_reference`] but `N` calls are kept.
pub fn sanitize_read(input: &str) -> CheckResult<Vec<u8>> {
    sanitize(input, n_alphabet())
}

fn sanitize(input: &str, accepted: &Alphabet) -> CheckResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    for (pos, ch) in input.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let upper = ch.to_ascii_uppercase();
        match upper {
            c if c.is_ascii() && accepted.contains(c as u8) => out.push(c as u8),
            'N' => return Err(CheckError::AmbiguousBase { pos }),
            // GenBank ORIGIN blocks carry line numbers.
            c if c.is_ascii_digit() => {}
            c if c.is_alphabetic() => return Err(CheckError::InvalidChar { ch, pos }),
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_word() {
        assert!(alphabet().is_word(b"GATTACA"));
        assert!(n_alphabet().is_word(b"GATNACA"));
    }

    #[test]
    fn is_no_word() {
        assert!(!alphabet().is_word(b"gaUUaca"));
        assert!(!alphabet().is_word(b"42"));
    }

    #[test]
    fn reverse_complement_unknown_to_n() {
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT");
        assert_eq!(reverse_complement(b"AACX"), b"NGTT");
        assert_eq!(reverse_complement(b"ATGN"), b"NCAT");
    }

    #[test]
    fn sanitize_reference_strips_numbers() {
        let seq = sanitize_reference("1 acgtac gtac\n61 ggcc").unwrap();
        assert_eq!(seq, b"ACGTACGTACGGCC");
    }

    #[test]
    fn sanitize_reference_rejects_n() {
        assert_eq!(
            sanitize_reference("ACGNT"),
            Err(CheckError::AmbiguousBase { pos: 3 })
        );
        assert_eq!(
            sanitize_reference("ACGXT"),
            Err(CheckError::InvalidChar { ch: 'X', pos: 3 })
        );
    }

    #[test]
    fn sanitize_read_keeps_n() {
        assert_eq!(sanitize_read("acgn tt").unwrap(), b"ACGNTT");
    }
}
