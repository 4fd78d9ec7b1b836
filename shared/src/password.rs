//! Salted one-way password hashing.

use crate::error::Result;

/// bcrypt cost factor used for every stored hash.
pub const HASH_COST: u32 = 12;

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plain: &str) -> Result<String> {
    Ok(bcrypt::hash(plain, HASH_COST)?)
}

/// Compare a candidate password against a stored hash.
///
/// Fails silently: any mismatch or malformed hash yields `false` without
/// revealing which check failed.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    bcrypt::verify(candidate, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("hunter2!").expect("hash");
        assert!(verify_password("hunter2!", &hash));
        assert!(!verify_password("hunter2", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
