//! Password hashing.
//!
//! New digests are Argon2id PHC strings with a random salt. Databases created
//! by older releases hold unsalted SHA-256 hex digests; those still verify and
//! are reported as [`Verification::Legacy`] so login can replace them.

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verification {
    Valid,
    Legacy,
    Invalid,
}

pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::PasswordHash(err.to_string()))
}

pub(crate) fn verify_password(password: &str, stored: &str) -> ResultEngine<Verification> {
    if is_legacy_digest(stored) {
        let digest = legacy_digest(password);
        return Ok(if constant_time_eq(digest.as_bytes(), stored.as_bytes()) {
            Verification::Legacy
        } else {
            Verification::Invalid
        });
    }

    let parsed =
        PasswordHash::new(stored).map_err(|err| EngineError::PasswordHash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(Verification::Valid),
        Err(password_hash::Error::Password) => Ok(Verification::Invalid),
        Err(err) => Err(EngineError::PasswordHash(err.to_string())),
    }
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

fn legacy_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_roundtrip_and_salting() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert_eq!(
            verify_password("hunter2", &first).unwrap(),
            Verification::Valid
        );
        assert_eq!(
            verify_password("hunter3", &first).unwrap(),
            Verification::Invalid
        );
    }

    #[test]
    fn legacy_sha256_digests_verify() {
        let stored = legacy_digest("secret");
        assert_eq!(stored.len(), 64);
        assert_eq!(
            verify_password("secret", &stored).unwrap(),
            Verification::Legacy
        );
        assert_eq!(
            verify_password("Secret", &stored).unwrap(),
            Verification::Invalid
        );
    }

    #[test]
    fn garbage_hash_is_a_storage_problem() {
        let err = verify_password("x", "not-a-hash").unwrap_err();
        assert!(matches!(err, EngineError::PasswordHash(_)));
    }
}
