//! Random identifiers for generated symbols.
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Characters allowed at the start of an identifier.
const LEADING: &[u8] = b"aAbBcCdDeEfFgGhHiIjJkKlLmMnNoOpPqQrRsStTuUvVwWxXyYzZ_";
/// Characters allowed anywhere after the first position.
const TRAILING: &[u8] = b"aAbBcCdDeEfFgGhHiIjJkKlLmMnNoOpPqQrRsStTuUvVwWxXyYzZ_0123456789";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Generates a random identifier of `len` characters using the thread RNG.
#[must_use]
pub fn generate(len: usize) -> String {
    generate_with(&mut rand::rng(), len)
}

/// Generates a random identifier of `len` characters from `rng`.
///
/// The first character never is a digit, so the result is a valid identifier for
/// any `len >= 1` without resampling.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|i| {
            let alphabet = if i == 0 { LEADING } else { TRAILING };
            char::from(alphabet[rng.random_range(0..alphabet.len())])
        })
        .collect()
}

/// Returns `true` if `s` matches `^[A-Za-z_][A-Za-z0-9_]*$`.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}
