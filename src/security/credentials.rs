//! Credential Primitives
//!
//! Secure random token generation and adaptive password hashing.
//! Passwords are never stored in cleartext; only bcrypt digests with a
//! per-call random salt are persisted.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Random token length in bytes (256 bits of entropy before encoding)
pub const TOKEN_BYTES: usize = 32;

/// Server secret length in bytes when generated rather than configured
pub const SECRET_BYTES: usize = 64;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Generate an opaque session/reset token: 32 CSPRNG bytes, hex encoded.
///
/// OsRng failure means the platform entropy source is broken, which is
/// fatal and non-retryable for a security service.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a server-held signing secret (64 random bytes, hex encoded).
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash algorithm used for a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// bcrypt with an adaptive work factor
    Bcrypt,
}

/// A stored credential: digest only, never the plaintext
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// bcrypt digest (salt embedded in the digest string)
    pub hash: String,
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Record creation time
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Hash a plaintext password into a fresh record.
    pub fn from_password(plaintext: &str, cost: u32) -> Result<Self> {
        let hash = hash_password(plaintext, cost)?;
        Ok(Self {
            hash,
            algorithm: HashAlgorithm::Bcrypt,
            created_at: Utc::now(),
        })
    }

    /// Verify a plaintext password against this record.
    pub fn verify(&self, plaintext: &str) -> bool {
        verify_password(plaintext, &self.hash)
    }
}

/// Hash a password with bcrypt at the given work factor.
///
/// The salt is randomized per call, so hashing the same plaintext twice
/// yields two different digests that both verify.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    bcrypt::hash(plaintext, cost).map_err(|e| AppError::InternalFailure(e.to_string()))
}

/// Verify a plaintext password against a bcrypt digest.
///
/// bcrypt recomputes the full digest before comparing, so verification
/// time does not depend on where the first mismatching byte sits.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// In-memory credential store keyed by username.
///
/// Explicitly owned and injected through `AppState` so deployments and
/// tests can seed or swap it.
#[derive(Debug)]
pub struct CredentialStore {
    records: DashMap<String, CredentialRecord>,
    cost: u32,
}

impl CredentialStore {
    /// Create an empty store with the given bcrypt work factor.
    pub fn new(cost: u32) -> Self {
        Self {
            records: DashMap::new(),
            cost,
        }
    }

    /// Register a user, replacing any previous credential.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        let record = CredentialRecord::from_password(password, self.cost)?;
        self.records.insert(username.to_string(), record);
        Ok(())
    }

    /// Verify a username/password pair.
    ///
    /// Unknown users burn a verification against a throwaway digest so the
    /// response time does not reveal whether the username exists.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.records.get(username) {
            Some(record) => record.verify(password),
            None => {
                let _ = verify_password(password, DUMMY_DIGEST);
                false
            }
        }
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no users.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Syntactically valid bcrypt digest for the unknown-username verify path.
const DUMMY_DIGEST: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7Kne5Y1Zb7sWctO4Nw4Bxxhylsa0P2y";
