use std::sync::LazyLock;

use crate::alphabets::Alphabet;
use crate::error::{CheckError, CheckResult};

static RESIDUES: LazyLock<Alphabet> =
    LazyLock::new(|| Alphabet::new(&b"ARNDCEQGHILKMFPSTWYV"[..]));
static TRANSLATED: LazyLock<Alphabet> = LazyLock::new(|| RESIDUES.union(&Alphabet::new(b"*X")));

/// The 20 standard residues.
pub fn alphabet() -> &'static Alphabet {
    &RESIDUES
}

/// Translation output: standard residues plus stop (`*`) and unknown (`X`).
pub fn translated_alphabet() -> &'static Alphabet {
    &TRANSLATED
}

/// Clean an amino-acid query: whitespace skipped, upper-cased, and only the
/// 20 standard residues accepted.
pub fn sanitize_protein(input: &str) -> CheckResult<Vec<u8>> {
    sanitize(input, alphabet())
}

/// Like [`sanitize_protein`] but also accepts `*` and `X`, as found in
/// annotated translations.
pub fn sanitize_translation(input: &str) -> CheckResult<Vec<u8>> {
    sanitize(input, translated_alphabet())
}

fn sanitize(input: &str, allowed: &Alphabet) -> CheckResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    for (pos, ch) in input.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii() || !allowed.contains(upper as u8) {
            return Err(CheckError::InvalidChar { ch, pos });
        }
        out.push(upper as u8);
    }
    Ok(out)
}
