//! Password hashing.
//!
//! The digest is deterministic for a given salt: the same plaintext always
//! hashes to the same string, which lets the user repository find a user
//! with a single `login = $1 AND password_hash = $2` lookup.

use sha2::{Digest, Sha256};

use super::AuthError;
use crate::config::AuthConfig;

/// One-way transform of a plaintext secret into a comparable digest.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;
}

/// Lowercase hex of `SHA-256(salt ‖ plaintext)` with one process-wide salt.
#[derive(Clone)]
pub struct SaltedSha256Hasher {
    salt: String,
}

impl SaltedSha256Hasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.password_salt.clone())
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(plaintext.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let hasher = SaltedSha256Hasher::new("pepper");
        assert_eq!(hasher.hash("p1").unwrap(), hasher.hash("p1").unwrap());
    }

    #[test]
    fn hash_is_hex_sha256() {
        let digest = SaltedSha256Hasher::new("pepper").hash("p1").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let digest = SaltedSha256Hasher::new("pepper").hash("hunter2").unwrap();
        assert!(!digest.contains("hunter2"));
    }

    #[test]
    fn different_passwords_differ() {
        let hasher = SaltedSha256Hasher::new("pepper");
        assert_ne!(hasher.hash("p1").unwrap(), hasher.hash("p2").unwrap());
    }

    #[test]
    fn salt_changes_digest() {
        let a = SaltedSha256Hasher::new("salt-a").hash("p1").unwrap();
        let b = SaltedSha256Hasher::new("salt-b").hash("p1").unwrap();
        assert_ne!(a, b);
    }
}
