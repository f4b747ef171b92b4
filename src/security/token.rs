//! Token Verification Module
//!
//! Bearer token verification against a server-held secret with an explicit
//! algorithm allow-list. The algorithm named inside a token header is never
//! trusted on its own; decoding only succeeds under an algorithm the caller
//! allow-listed at construction time.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (usually user ID)
    pub sub: String,
    /// User role
    pub role: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token not before timestamp
    pub nbf: usize,
    /// Issued at timestamp
    pub iat: usize,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Create new claims expiring `expiry_seconds` from now
    pub fn new(sub: String, role: String, expiry_seconds: u64) -> Self {
        let now = Utc::now().timestamp() as usize;

        Self {
            sub,
            role,
            exp: now + expiry_seconds as usize,
            nbf: now,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() as usize > self.exp
    }
}

/// Bearer token verifier bound to a fixed algorithm allow-list.
///
/// Every failure collapses into the single opaque [`AppError::AuthRejected`]:
/// bad signature, expired, malformed and disallowed-algorithm tokens are
/// indistinguishable to the caller. The concrete reason goes to the server
/// log only.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    allowed_algorithms: Vec<Algorithm>,
}

impl JwtVerifier {
    /// Create a verifier for the given secret and algorithm allow-list.
    ///
    /// An empty allow-list is a configuration mistake, not a runtime
    /// condition, and is rejected up front.
    pub fn new(secret: &str, allowed_algorithms: &[Algorithm]) -> Result<Self> {
        if allowed_algorithms.is_empty() {
            return Err(AppError::Config(
                "token verifier requires at least one allowed algorithm".to_string(),
            ));
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            allowed_algorithms: allowed_algorithms.to_vec(),
        })
    }

    /// Verifier with the service default allow-list (HS256 only).
    pub fn hs256(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            allowed_algorithms: vec![Algorithm::HS256],
        }
    }

    /// Verify a bearer token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.allowed_algorithms[0]);
        validation.algorithms = self.allowed_algorithms.clone();
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "bearer token rejected");
                AppError::AuthRejected
            })
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("allowed_algorithms", &self.allowed_algorithms)
            .finish_non_exhaustive()
    }
}

/// JWT token issuance helper
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    expiry_seconds: u64,
}

impl TokenIssuer {
    /// Create new token issuer signing with HS256
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            expiry_seconds,
        }
    }

    /// Issue a signed token for a subject
    pub fn issue(&self, sub: String, role: String) -> Result<String> {
        let claims = Claims::new(sub, role, self.expiry_seconds);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalFailure(format!("failed to sign token: {}", e)))
    }
}
