use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use argon2::{PasswordHasher as _, PasswordVerifier as _};
use rand_core::OsRng;

use chirpy_types::{Error, Result};

/// One-way, salted password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// `Ok(false)` on mismatch. Errors only when `hash` is not a valid
    /// encoded hash.
    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool>;
}

/// Argon2id with a fixed work factor.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// `work_factor` is the Argon2 iteration count (t-cost); memory and
    /// parallelism stay at the library defaults.
    pub fn new(work_factor: u32) -> Result<Self> {
        Self::with_params(Params::DEFAULT_M_COST, work_factor)
    }

    pub fn with_params(m_cost: u32, t_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| Error::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| Error::Hashing(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| Error::Hashing(e.to_string()))?;

        // Cost parameters are read back from the encoded hash, so hashes
        // made under an older work factor still verify.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Hashing(e.to_string())),
        }
    }
}
