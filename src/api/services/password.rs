//! Salted SHA-256 password digests for the placeholder user store.
//!
//! Stored form: `<salt>$<hex digest>`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

fn digest(salt: &str, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Compare in time independent of where the first differing byte is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = hex::encode(digest(&salt, password));
    format!("{}${}", salt, hash)
}

/// Check a password against a stored `<salt>$<digest>` string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    match hex::decode(hash) {
        Ok(expected) => constant_time_eq(&digest(salt, password), &expected),
        Err(_) => false,
    }
}
