//! DHIS2 uid helpers
//!
//! A uid is 11 characters: an ASCII letter followed by 10 ASCII alphanumerics.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERICS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const UID_LENGTH: usize = 11;

static UID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{10}$").unwrap());

/// Check whether a string is a well-formed DHIS2 uid
pub fn is_valid_uid(value: &str) -> bool {
    UID_RE.is_match(value)
}

/// Derive a uid from a prefix and a seed.
///
/// Equal inputs always produce the same uid, so callers wanting a fresh
/// identifier must vary the seed.
pub fn uid_from_seed(prefix: &str, seed: &str) -> String {
    let digest = Sha256::new()
        .chain_update(prefix.as_bytes())
        .chain_update(seed.as_bytes())
        .finalize();

    let mut uid = String::with_capacity(UID_LENGTH);
    uid.push(LETTERS[digest[0] as usize % LETTERS.len()] as char);
    for byte in digest.iter().skip(1).take(UID_LENGTH - 1) {
        uid.push(ALPHANUMERICS[*byte as usize % ALPHANUMERICS.len()] as char);
    }
    uid
}
