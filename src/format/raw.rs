//! Raw container layout.
//!
//! ```text
//! SALT (16) | NONCE (12) | CIPHERTEXT | TAG (16)
//! ```
//!
//! No magic, no version. KDF parameters are implicit and must match between
//! lock and unlock.

use super::{Container, Format};
use crate::{
    KdfParams,
    crypto::{NONCE_LEN, SALT_LEN},
    error::ValidationError,
};

pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Splits a raw container into salt, nonce and ciphertext.
///
/// # Errors
///
/// Returns [`ValidationError::ContainerTooShort`] if there is no room for
/// salt and nonce. Anything longer parses; a missing tag surfaces later as a
/// decryption failure.
pub fn parse(data: &[u8], kdf: KdfParams) -> Result<Container<'_>, ValidationError> {
    if data.len() < HEADER_LEN {
        return Err(ValidationError::ContainerTooShort {
            len: data.len(),
            min: HEADER_LEN,
        });
    }

    let (salt, rest) = data.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let mut salt_buf = [0u8; SALT_LEN];
    salt_buf.copy_from_slice(salt);
    let mut nonce_buf = [0u8; NONCE_LEN];
    nonce_buf.copy_from_slice(nonce);

    Ok(Container::new(Format::Raw, kdf, salt_buf, nonce_buf, ciphertext))
}

pub fn serialize(container: &Container<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + container.ciphertext().len());

    buf.extend_from_slice(container.salt());
    buf.extend_from_slice(container.nonce());
    buf.extend_from_slice(container.ciphertext());

    buf
}
