//! Credential service - Argon2id password hashing
//!
//! Hashes are stored as PHC strings, so the parameters travel with each hash
//! and verification keeps working after the configured costs change.

use anyhow::{anyhow, Result};
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::PasswordHashing;
use crate::domain::result::Error;

/// Hashes and verifies customer and staff passwords
#[derive(Debug, Clone)]
pub struct CredentialService {
    params: PasswordHashing,
}

impl CredentialService {
    pub fn new(params: PasswordHashing) -> Self {
        Self { params }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| anyhow!("Invalid password hashing parameters: {}", e))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Reject empty passwords before they are hashed
    pub fn validate_password(password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::validation("Password cannot be empty").into());
        }
        Ok(())
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string
    ///
    /// A stored value that is not a valid PHC string never matches.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CredentialService {
        CredentialService::new(PasswordHashing {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_hash_verifies() {
        let creds = service();
        let hash = creds.hash("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(creds.verify("s3cret", &hash));
        assert!(!creds.verify("S3cret", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let creds = service();
        assert_ne!(creds.hash("pw").unwrap(), creds.hash("pw").unwrap());
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        let creds = service();
        // unsalted sha256 hex of "Admin123"
        assert!(!creds.verify(
            "Admin123",
            "3b612c75a7b5048a435fb6ec81e52ff92d6d795a8b5a9c17070f6a63c97a53b2"
        ));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = CredentialService::validate_password("").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
    }
}
