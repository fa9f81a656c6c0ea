//! Password hashing and verification
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so every stored hash carries the cost and salt needed to verify it later.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Number of random bytes in a freshly derived salt
pub const SALT_LEN: usize = 16;

/// Credential errors
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The random source or the hash function failed
    #[error("Cryptographic failure: {0}")]
    CryptoFailure(String),

    /// A stored hash could not be parsed
    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),
}

/// Work factor for password hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cost {
    /// Number of Argon2 passes over memory
    pub iterations: u32,
    /// Memory size in KiB
    pub memory_kib: u32,
}

impl Default for Cost {
    fn default() -> Self {
        Self {
            iterations: Params::DEFAULT_T_COST,
            memory_kib: Params::DEFAULT_M_COST,
        }
    }
}

/// A random salt bound to the cost it will be hashed with
#[derive(Debug, Clone)]
pub struct Salt {
    value: SaltString,
    params: Params,
}

impl Salt {
    /// The salt in its B64 (unpadded) encoding
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

/// Derive a fresh salt from the operating system's random source
pub fn derive_salt(cost: Cost) -> Result<Salt, CredentialError> {
    let params = Params::new(
        cost.memory_kib,
        cost.iterations,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|e| CredentialError::CryptoFailure(format!("Invalid cost parameters: {}", e)))?;

    let mut bytes = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CredentialError::CryptoFailure(format!("Random source unavailable: {}", e)))?;

    let value = SaltString::encode_b64(&bytes)
        .map_err(|e| CredentialError::CryptoFailure(format!("Failed to encode salt: {}", e)))?;

    Ok(Salt { value, params })
}

/// Hash a password with the given salt
pub fn hash(password: &str, salt: &Salt) -> Result<String, CredentialError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, salt.params.clone());

    argon2
        .hash_password(password.as_bytes(), &salt.value)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::CryptoFailure(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
///
/// A wrong password is `Ok(false)`. Only a stored hash that cannot be
/// parsed, or was produced by another algorithm, is an error.
pub fn verify(password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CredentialError::InvalidCredentialFormat(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(password_hash::Error::Crypto) => Err(CredentialError::CryptoFailure(
            "Argon2 computation failed".to_string(),
        )),
        // Unknown algorithm, bad parameters, undecodable salt or output
        Err(e) => Err(CredentialError::InvalidCredentialFormat(e.to_string())),
    }
}

/// Password hashing with a configured cost
///
/// Hashing is CPU bound, so the async methods run it on the blocking pool.
#[derive(Clone)]
pub struct CredentialService {
    cost: Cost,
    dummy_hash: Arc<str>,
}

impl CredentialService {
    /// Create a credential service for the given cost
    pub fn new(cost: Cost) -> Result<Self, CredentialError> {
        let salt = derive_salt(cost)?;
        let dummy_hash = hash("pinboard-dummy-password", &salt)?;

        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// The configured cost
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Derive a salt and hash the password with it
    pub async fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let cost = self.cost;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = derive_salt(cost)?;
            hash(&password, &salt)
        })
        .await
        .map_err(|e| CredentialError::CryptoFailure(format!("Hashing task failed: {}", e)))?
    }

    /// Verify a password against a stored hash
    pub async fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, CredentialError> {
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || verify(&password, &stored_hash))
            .await
            .map_err(|e| CredentialError::CryptoFailure(format!("Verify task failed: {}", e)))?
    }

    /// Spend the same work as a real verification and discard the result
    ///
    /// Used when the username does not exist so that a failed login takes
    /// about as long either way.
    pub async fn dummy_verify(&self, password: &str) {
        let dummy_hash = self.dummy_hash.clone();
        let _ = self.verify_password(password, &dummy_hash).await;
    }
}
