use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::KEY_LEN;
use crate::error::ValidationError;

/// PBKDF2 iteration count used by the raw container format.
///
/// Raw containers do not record it, so changing this value makes every
/// existing raw container unreadable.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Upper bound on the iteration count.
///
/// v1 headers carry the count before anything is authenticated, so a
/// corrupted header must not be able to demand unbounded work.
pub const MAX_ITERATIONS: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32) -> Result<Self, ValidationError> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(ValidationError::InvalidIterations(self.iterations));
        }
        Ok(())
    }
}

/// Derives a 256-bit key with PBKDF2-HMAC-SHA256.
///
/// Pure and deterministic. Empty material is not special-cased: a wrong
/// input only shows up later as a failed decryption.
pub fn derive_key(material: &str, salt: &[u8], kdf: KdfParams) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(material.as_bytes(), salt, kdf.iterations, &mut key[..]);
    key
}
