//! Salted, iterated SHA-256 credential hashing adapter.
//!
//! Digests are stored as `v1$<iterations>$<salt-hex>$<digest-hex>` so the
//! cost factor can be raised later without invalidating existing rows: the
//! stored prefix tells [`verify`](ShaPasswordHasher::verify) how to recompute
//! the candidate digest.

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::user::PasswordHash;

/// Number of salt bytes drawn per hash.
const SALT_BYTES: usize = 16;

/// Default iteration count for newly hashed credentials.
const DEFAULT_ITERATIONS: u32 = 100_000;

/// Version tag carried in the encoded digest.
const VERSION_TAG: &str = "v1";

/// [`PasswordHasher`] adapter backed by iterated SHA-256.
pub struct ShaPasswordHasher {
    iterations: u32,
}

impl ShaPasswordHasher {
    /// Hasher with the production iteration count.
    #[must_use]
    pub fn new() -> Self {
        Self::with_iterations(DEFAULT_ITERATIONS)
    }

    /// Hasher with an explicit iteration count (clamped to at least one).
    #[must_use]
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    fn digest(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        let mut round: [u8; 32] = hasher.finalize().into();
        for _ in 1..iterations {
            round = Sha256::digest(round).into();
        }
        round
    }
}

impl Default for ShaPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for ShaPasswordHasher {
    fn hash(&self, password: &str) -> PasswordHash {
        let mut salt = [0u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        let mut digest = Self::digest(password, &salt, self.iterations);
        let encoded = format!(
            "{VERSION_TAG}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(digest),
        );
        digest.zeroize();
        PasswordHash::new(encoded)
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let malformed = |message: &str| PasswordHashError::MalformedDigest {
            message: message.to_owned(),
        };
        let mut parts = hash.expose().split('$');
        let (Some(version), Some(iterations), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(malformed("expected four '$'-separated fields"));
        };
        if version != VERSION_TAG {
            return Err(malformed("unknown version tag"));
        }
        let iterations: u32 = iterations
            .parse()
            .map_err(|_| malformed("iteration count is not a number"))?;
        if iterations == 0 {
            return Err(malformed("iteration count must be positive"));
        }
        let salt = hex::decode(salt).map_err(|_| malformed("salt is not valid hex"))?;
        let stored = hex::decode(digest).map_err(|_| malformed("digest is not valid hex"))?;
        if stored.len() != 32 {
            return Err(malformed("digest has the wrong length"));
        }
        let mut candidate = Self::digest(password, &salt, iterations);
        let matches = constant_time_eq(&candidate, &stored);
        candidate.zeroize();
        Ok(matches)
    }
}

/// Compare two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hasher() -> ShaPasswordHasher {
        // Low cost keeps the suite fast; correctness is iteration-independent.
        ShaPasswordHasher::with_iterations(4)
    }

    #[rstest]
    fn hash_then_verify_round_trips() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse battery staple");
        assert!(hasher.verify("correct horse battery staple", &hash).expect("verify"));
        assert!(!hasher.verify("Tr0ub4dor&3", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_are_unique_per_hash() {
        let hasher = hasher();
        let first = hasher.hash("secret1");
        let second = hasher.hash("secret1");
        assert_ne!(first.expose(), second.expose());
    }

    #[rstest]
    fn verify_honours_stored_iteration_count() {
        // A digest written at one cost must still verify after the default
        // cost changes.
        let writer = ShaPasswordHasher::with_iterations(2);
        let reader = ShaPasswordHasher::with_iterations(64);
        let hash = writer.hash("secret1");
        assert!(reader.verify("secret1", &hash).expect("verify"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_few_fields("v1$4$aabb")]
    #[case::bad_version("v2$4$aabb$ccdd")]
    #[case::bad_iterations("v1$lots$aabb$ccdd")]
    #[case::zero_iterations("v1$0$aabb$ccdd")]
    #[case::bad_salt("v1$4$zz$ccdd")]
    #[case::short_digest("v1$4$aabb$ccdd")]
    fn malformed_digests_are_rejected(#[case] encoded: &str) {
        let hasher = hasher();
        let result = hasher.verify("secret1", &PasswordHash::new(encoded));
        assert!(matches!(
            result,
            Err(PasswordHashError::MalformedDigest { .. })
        ));
    }
}
