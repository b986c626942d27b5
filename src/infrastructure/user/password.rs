//! Password encoding with Argon2id

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::domain::DomainError;

/// Encodes plaintext passwords into storable hashes
pub trait PasswordEncoder: Send + Sync {
    /// Encode a plaintext password
    fn encode(&self, password: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against an encoded hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id encoder producing PHC-formatted hashes
#[derive(Debug, Clone)]
pub struct Argon2Encoder {
    params: Params,
}

impl Argon2Encoder {
    /// Create an encoder with the Argon2 default cost parameters
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create an encoder with explicit cost parameters
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, DomainError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            DomainError::configuration(format!("Invalid Argon2 parameters: {}", e))
        })?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for Argon2Encoder {
    fn encode(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        // Parameters are read back from the PHC string, so hashes made with
        // older cost settings still verify.
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_encoder() -> Argon2Encoder {
        Argon2Encoder::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_encode_and_verify() {
        let encoder = fast_encoder();

        let hash = encoder.encode("my_secure_password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(encoder.verify("my_secure_password", &hash));
        assert!(!encoder.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let encoder = fast_encoder();

        let hash1 = encoder.encode("password").unwrap();
        let hash2 = encoder.encode("password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(encoder.verify("password", &hash1));
        assert!(encoder.verify("password", &hash2));
    }

    #[test]
    fn test_verify_across_cost_settings() {
        let hash = fast_encoder().encode("password").unwrap();

        assert!(Argon2Encoder::new().verify("password", &hash));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let encoder = fast_encoder();

        assert!(!encoder.verify("password", "invalid_hash_format"));
        assert!(!encoder.verify("password", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2Encoder::with_params(1, 0, 0);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
