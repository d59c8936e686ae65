//! Error types for locking and unlocking.
//!
//! Validation problems are reported before any cryptographic work happens.
//! A failed unlock never says which credential was wrong.

use thiserror::Error;

/// Input that was rejected before key derivation or decryption.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("PIN must be exactly 4 digits")]
    InvalidPin,

    #[error("date of birth must be a valid date in YYYY-MM-DD form")]
    InvalidDateOfBirth,

    #[error("KDF iteration count must be between 1 and {max}, got {0}", max = crate::crypto::MAX_ITERATIONS)]
    InvalidIterations(u32),

    #[error("container too short: {len} bytes, need at least {min}")]
    ContainerTooShort { len: usize, min: usize },

    #[error("invalid container magic")]
    InvalidMagic,

    #[error("unsupported container version: {0}")]
    UnsupportedVersion(u8),
}

/// Errors returned by [`crate::lock`] and [`crate::unlock`].
#[derive(Debug, Error)]
pub enum LockError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication failed: wrong credentials or a corrupted container.
    #[error("decryption failed: wrong credentials or corrupted container")]
    Decryption,

    #[error("OS random generator unavailable")]
    Randomness,

    #[error("encryption failed")]
    Encryption,
}

pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_lock_error() {
        let err: LockError = ValidationError::InvalidPin.into();
        assert!(matches!(err, LockError::Validation(ValidationError::InvalidPin)));
    }

    #[test]
    fn decryption_message_does_not_name_a_field() {
        let msg = LockError::Decryption.to_string();
        assert!(!msg.contains("PIN"));
        assert!(!msg.contains("name"));
        assert!(!msg.contains("birth"));
    }

    #[test]
    fn too_short_message_reports_lengths() {
        let err = ValidationError::ContainerTooShort { len: 10, min: 28 };
        assert_eq!(
            err.to_string(),
            "container too short: 10 bytes, need at least 28"
        );
    }
}
