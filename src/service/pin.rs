//! PIN hashing and verification.
//!
//! PINs are stored as SHA-256 hex digests and compared constant-time.
//! There is deliberately no lockout, rate limiting or attempt counter on
//! PIN verification.

use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

pub fn verify_pin(submitted: &str, stored_hash: &str) -> bool {
    let digest = hash_pin(submitted);
    bool::from(digest.as_bytes().ct_eq(stored_hash.as_bytes()))
}

/// Derive the cookie signing key from the configured secret. SHA-512 yields
/// exactly the 64 bytes `Key::from` requires.
pub fn cookie_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}
