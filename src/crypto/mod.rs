//! Cryptographic primitives for credential-locked containers.
//!
//! Provides key derivation, authenticated encryption and the random source
//! for salts and nonces.

pub mod aead;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_nonce, generate_salt};
pub use kdf::{DEFAULT_ITERATIONS, KdfParams, MAX_ITERATIONS, derive_key};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (12 bytes for AES-GCM).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
