//! Password Hashing
//!
//! Argon2id hashing in PHC string format. Verification goes through the
//! `argon2` crate, which compares digests in constant time.

use anyhow::{Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
};

/// Outcome of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    Mismatch,
    /// The stored value is not a PHC hash (e.g. a legacy plaintext column).
    Unparseable,
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl PasswordHasher {
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("failed to hash password: {}", e))
    }

    /// Parameters are taken from the stored hash, not from `self`.
    pub fn verify(&self, password: &str, stored: &str) -> PasswordCheck {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(_) => return PasswordCheck::Unparseable,
        };
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => PasswordCheck::Match,
            Err(_) => PasswordCheck::Mismatch,
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("s3cret!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(hasher.verify("s3cret!", &hash), PasswordCheck::Match);
        assert_eq!(hasher.verify("s3cret?", &hash), PasswordCheck::Mismatch);
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = fast_hasher();
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn test_plaintext_column_never_matches() {
        let hasher = fast_hasher();
        assert_eq!(hasher.verify("Password!@#", "Password!@#"), PasswordCheck::Unparseable);
    }
}
