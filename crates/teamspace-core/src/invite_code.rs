//! Invite code generation and comparison.

use rand::Rng;
use subtle::ConstantTimeEq;

/// Characters invite codes are drawn from.
pub const INVITE_CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcedfghijklmnopqrstuvwxyz0123456789-;:";

/// Length of workspace invite codes.
pub const INVITE_CODE_LENGTH: usize = 10;

/// Random string of exactly `len` characters, each sampled uniformly from
/// [`INVITE_CODE_ALPHABET`]. Not checked for collisions.
pub fn generate_invite_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..INVITE_CODE_ALPHABET.len());
            INVITE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Exact equality, compared in constant time.
pub fn invite_code_matches(stored: &str, supplied: &str) -> bool {
    stored.as_bytes().ct_eq(supplied.as_bytes()).into()
}
