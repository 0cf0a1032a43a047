//! Salted bcrypt hashing for account credentials.
//!
//! Every scheme on an account hashes with the same per-user salt, so the
//! salt lives on the user record and is handed to [`CredentialHasher::hash`]
//! for each new credential. Verification reads the salt back out of the
//! stored hash, which is how bcrypt embeds it.

use crate::error::{AuthError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bcrypt::Version;
use rand::Rng;

/// Result of hashing a secret: the bcrypt digest and the salt that produced
/// it (base64, 16 bytes decoded).
#[derive(Debug, Clone)]
pub struct SaltedDigest {
    pub hash: String,
    pub salt: String,
}

/// Wraps bcrypt with a configurable work factor.
///
/// The cost is deliberately expensive (default `bcrypt::DEFAULT_COST`) to
/// resist offline brute force; tests dial it down to the bcrypt minimum.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Generate a fresh 16-byte salt, base64 encoded for storage.
    pub fn generate_salt() -> String {
        let bytes: [u8; 16] = rand::thread_rng().gen();
        BASE64.encode(bytes)
    }

    /// Hash `secret`, reusing `salt` when given and generating a fresh one
    /// otherwise. Returns the digest together with the salt actually used.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidSalt` if the supplied salt is not base64 of 16
    /// bytes; `AuthError::Hashing` if bcrypt rejects the cost factor.
    pub fn hash(&self, secret: &str, salt: Option<&str>) -> Result<SaltedDigest> {
        let salt = match salt {
            Some(s) => s.to_string(),
            None => Self::generate_salt(),
        };
        let salt_bytes = decode_salt(&salt)?;

        let parts = bcrypt::hash_with_salt(secret, self.cost, salt_bytes)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(SaltedDigest {
            hash: parts.format_for_version(Version::TwoB),
            salt,
        })
    }

    /// Verify `secret` against a stored bcrypt digest.
    ///
    /// Mismatch is `Ok(false)`; only a malformed stored hash is an error.
    /// The comparison inside bcrypt is constant time.
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(secret, hash).map_err(|e| AuthError::Hashing(e.to_string()))
    }
}

fn decode_salt(salt: &str) -> Result<[u8; 16]> {
    let bytes = BASE64.decode(salt).map_err(|_| AuthError::InvalidSalt)?;
    bytes.try_into().map_err(|_| AuthError::InvalidSalt)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt minimum cost, keeps the suite fast
    fn hasher() -> CredentialHasher {
        CredentialHasher::new(4)
    }

    #[test]
    fn test_hash_round_trip() {
        let digest = hasher().hash("secret1", None).unwrap();

        assert!(digest.hash.starts_with("$2b$"));
        assert!(hasher().verify("secret1", &digest.hash).unwrap());
        assert!(!hasher().verify("secret2", &digest.hash).unwrap());
    }

    #[test]
    fn test_hash_generates_salt_when_absent() {
        let a = hasher().hash("secret1", None).unwrap();
        let b = hasher().hash("secret1", None).unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_hash_is_deterministic_with_same_salt() {
        let salt = CredentialHasher::generate_salt();
        let a = hasher().hash("secret1", Some(&salt)).unwrap();
        let b = hasher().hash("secret1", Some(&salt)).unwrap();

        assert_eq!(a.salt, salt);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_hash_rejects_malformed_salt() {
        let result = hasher().hash("secret1", Some("not base64!!"));
        assert!(matches!(result.unwrap_err(), AuthError::InvalidSalt));

        // valid base64 but wrong length
        let result = hasher().hash("secret1", Some("c2hvcnQ="));
        assert!(matches!(result.unwrap_err(), AuthError::InvalidSalt));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let result = hasher().verify("secret1", "not-a-bcrypt-hash");
        assert!(matches!(result.unwrap_err(), AuthError::Hashing(_)));
    }

    #[test]
    fn test_unicode_secret() {
        let digest = hasher().hash("pâté🎮", None).unwrap();

        assert!(hasher().verify("pâté🎮", &digest.hash).unwrap());
        assert!(!hasher().verify("pate", &digest.hash).unwrap());
    }
}
