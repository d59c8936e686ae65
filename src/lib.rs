//! Lock documents with a key derived from a person's name, date of birth and
//! a 4-digit PIN.
//!
//! ```text
//! lock:   salt, nonce <- OS RNG
//!         key = PBKDF2-HMAC-SHA256(normalize(name)|dob|pin, salt, 200_000)
//!         container = salt | nonce | AES-256-GCM(key, nonce, plaintext)
//! unlock: split container, re-derive key, decrypt and verify
//! ```
//!
//! Every call is independent: no key is cached and nothing is shared between
//! calls. Key material and decrypted plaintext are zeroized on drop.

mod credentials;
mod crypto;
mod error;
mod format;

pub use crate::credentials::{Credentials, normalize_name};
pub use crate::crypto::{DEFAULT_ITERATIONS, KdfParams, MAX_ITERATIONS};
pub use crate::error::{LockError, Result, ValidationError};
pub use crate::format::{ContainerInfo, Format};

use crate::format::Container;
use tracing::debug;
use zeroize::Zeroizing;

/// Container layout and KDF parameters for [`lock_with`] and [`unlock_with`].
///
/// For [`Format::V1`] containers `unlock_with` takes the iteration count from
/// the header and ignores `kdf`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub format: Format,
    pub kdf: KdfParams,
}

/// Encrypts `plaintext` into a raw container.
///
/// The output is `len(plaintext) + 44` bytes long and differs on every call.
///
/// # Errors
///
/// [`LockError::Validation`] for malformed credentials,
/// [`LockError::Randomness`] if the OS RNG is unavailable.
pub fn lock(plaintext: &[u8], full_name: &str, date_of_birth: &str, pin: &str) -> Result<Vec<u8>> {
    let credentials = Credentials::new(full_name, date_of_birth, pin)?;
    lock_with(plaintext, &credentials, &Options::default())
}

/// Decrypts a raw container produced by [`lock`].
///
/// # Errors
///
/// [`LockError::Validation`] for malformed credentials or a container shorter
/// than 28 bytes, [`LockError::Decryption`] if authentication fails.
pub fn unlock(
    container: &[u8],
    full_name: &str,
    date_of_birth: &str,
    pin: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let credentials = Credentials::new(full_name, date_of_birth, pin)?;
    unlock_with(container, &credentials, &Options::default())
}

/// Encrypts `plaintext` for already validated credentials.
///
/// `options` picks the layout and the iteration count. A `V1` container
/// records the count in its header and authenticates that header.
///
/// # Errors
///
/// [`LockError::Randomness`] if the OS RNG is unavailable,
/// [`LockError::Encryption`] if the cipher rejects the input.
pub fn lock_with(plaintext: &[u8], credentials: &Credentials, options: &Options) -> Result<Vec<u8>> {
    let salt = crypto::generate_salt()?;
    let nonce = crypto::generate_nonce()?;
    debug!(
        format = ?options.format,
        iterations = options.kdf.iterations(),
        plaintext_len = plaintext.len(),
        "locking document"
    );

    let key = crypto::derive_key(&credentials.key_material(), &salt, options.kdf);
    let aad = Container::new(options.format, options.kdf, salt, nonce, &[]).associated_data();
    let ciphertext = crypto::encrypt(&key, &nonce, plaintext, &aad)?;
    drop(key);

    let container = Container::new(options.format, options.kdf, salt, nonce, &ciphertext);
    Ok(format::serialize(&container))
}

/// Decrypts a container for already validated credentials.
///
/// `options.format` must name the layout the container was written with.
/// `options.kdf` is used only for `Raw`; `V1` reads it from the header.
///
/// # Errors
///
/// [`LockError::Validation`] if the container is too short or its `V1`
/// header is invalid, [`LockError::Decryption`] if authentication fails.
pub fn unlock_with(
    container: &[u8],
    credentials: &Credentials,
    options: &Options,
) -> Result<Zeroizing<Vec<u8>>> {
    let parsed = format::parse(container, options.format, options.kdf)?;
    debug!(
        format = ?parsed.format(),
        iterations = parsed.kdf().iterations(),
        container_len = container.len(),
        "unlocking document"
    );

    let key = crypto::derive_key(&credentials.key_material(), parsed.salt(), *parsed.kdf());
    let aad = parsed.associated_data();
    let plaintext = crypto::decrypt(&key, parsed.nonce(), parsed.ciphertext(), &aad)
        .inspect_err(|_| {
            debug!("container failed authentication");
        })?;

    Ok(plaintext)
}

/// Describes a container without decrypting it.
///
/// Raw containers do not record an iteration count, so
/// [`ContainerInfo::iterations`] is `None` for them.
///
/// # Errors
///
/// [`LockError::Validation`] if the container is too short or its `V1`
/// header is invalid.
pub fn inspect(container: &[u8], format: Format) -> Result<ContainerInfo> {
    let parsed = format::parse(container, format, KdfParams::default())?;
    Ok(parsed.info())
}
