//! Argon2id implementation of the [`CredentialHasher`] port.
//!
//! Hashes are PHC strings, so the algorithm, version, cost parameters and
//! salt travel with the hash and verification needs no configuration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::warn;

use crate::domain::ports::{CredentialHasher, HashingError};
use crate::domain::{Password, PasswordHash};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher with fixed cost parameters and a fresh salt per hash.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// # Errors
    ///
    /// Returns [`HashingError::Failed`] when the parameters are outside the
    /// ranges Argon2 accepts.
    pub fn new(settings: Argon2Settings) -> Result<Self, HashingError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| HashingError::failed(format!("invalid argon2 parameters: {err}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, HashingError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|phc| PasswordHash::from_phc(phc.to_string()))
            .map_err(|err| HashingError::failed(err.to_string()))
    }

    fn verify(&self, hash: &PasswordHash, password: &Password) -> bool {
        let parsed = match PhcString::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "stored password hash is malformed");
                return false;
            }
        };
        self.argon2()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(Argon2Settings {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("cheap parameters are valid")
    }

    #[rstest]
    fn hash_then_verify_round_trips(hasher: Argon2Hasher) {
        let hash = hasher.hash(&Password::new("correct horse")).expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, &Password::new("correct horse")));
    }

    #[rstest]
    fn mismatched_password_fails(hasher: Argon2Hasher) {
        let hash = hasher.hash(&Password::new("correct horse")).expect("hash");
        assert!(!hasher.verify(&hash, &Password::new("battery staple")));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2Hasher) {
        let first = hasher.hash(&Password::new("same")).expect("hash");
        let second = hasher.hash(&Password::new("same")).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn malformed_hash_never_matches(hasher: Argon2Hasher) {
        assert!(!hasher.verify(&PasswordHash::from_phc("not-a-phc"), &Password::new("x")));
    }

    #[rstest]
    fn hashes_embed_their_parameters(hasher: Argon2Hasher) {
        let hash = hasher.hash(&Password::new("pw")).expect("hash");
        let stronger = Argon2Hasher::new(Argon2Settings {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .expect("valid parameters");
        assert!(stronger.verify(&hash, &Password::new("pw")));
    }

    #[rstest]
    fn rejects_impossible_parameters() {
        let err = Argon2Hasher::new(Argon2Settings {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .expect_err("zero iterations are invalid");
        assert!(matches!(err, HashingError::Failed { .. }));
    }
}
