//! Referral-code generation.
//!
//! A code is the first three uppercased characters of the holder's first
//! name followed by a three-character random base-36 suffix, e.g. `ASH4K9`.
//! Uniqueness against existing codes is the caller's responsibility: the
//! registration flow regenerates the suffix until the code is unused.

use rand::Rng;

const SUFFIX_LEN: usize = 3;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Derives the fixed name prefix of a referral code from a full name.
///
/// Takes the first whitespace-separated token, uppercased and truncated to
/// three characters. Shorter first names yield a shorter prefix.
pub fn code_prefix(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase()
        .chars()
        .take(3)
        .collect()
}

/// Generates a random three-character base-36 suffix.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Generates a full referral code candidate for the given name.
pub fn generate_code<R: Rng + ?Sized>(full_name: &str, rng: &mut R) -> String {
    format!("{}{}", code_prefix(full_name), random_suffix(rng))
}
