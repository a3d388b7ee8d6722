//! Password hashing behind a narrow trait so services can be tested
//! without paying the Argon2 cost.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::error::{UserError, UserResult};

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> UserResult<String>;
    fn verify(&self, password: &str, hash: &str) -> UserResult<bool>;
}

/// Argon2id implementation used in production.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("Abc123def").unwrap();
        assert_ne!(hash, "Abc123def");
        assert!(hasher.verify("Abc123def", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("Abc123def").unwrap();
        let b = hasher.hash("Abc123def").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = Argon2Hasher;
        assert!(matches!(
            hasher.verify("Abc123def", "not-a-phc-string"),
            Err(UserError::PasswordHash(_))
        ));
    }
}
