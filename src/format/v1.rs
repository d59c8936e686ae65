//! Container format v1.
//!
//! V1 layout:
//! ```text
//! MAGIC "CLCK" (4) | VERSION (1) | ITERATIONS u32 LE (4) | SALT (16) | NONCE (12) | CIPHERTEXT+TAG
//! ```

use super::{Container, Format};
use crate::{
    KdfParams,
    crypto::{NONCE_LEN, SALT_LEN},
    error::ValidationError,
};

/// Magic bytes identifying a v1 container ("CLCK").
pub const MAGIC: &[u8; MAGIC_LEN] = b"CLCK";
pub const MAGIC_LEN: usize = 4;
pub const VERSION_V1: u8 = 1;

const VER_LEN: usize = 1;
const ITER_LEN: usize = 4;

/// Magic, version and iteration count: the bytes bound to the ciphertext as
/// associated data.
pub const PREFIX_LEN: usize = MAGIC_LEN + VER_LEN + ITER_LEN;

pub const HEADER_LEN: usize = PREFIX_LEN + SALT_LEN + NONCE_LEN;

/// Header prefix for the given KDF parameters.
pub fn prefix(kdf: &KdfParams) -> [u8; PREFIX_LEN] {
    let mut buf = [0u8; PREFIX_LEN];
    buf[..MAGIC_LEN].copy_from_slice(MAGIC);
    buf[MAGIC_LEN] = VERSION_V1;
    buf[MAGIC_LEN + VER_LEN..].copy_from_slice(&kdf.iterations().to_le_bytes());
    buf
}

/// Parses a v1 container.
///
/// # Errors
///
/// Returns an error if the data is too short, the magic or version is wrong,
/// or the stored iteration count is outside `1..=MAX_ITERATIONS`.
pub fn parse(data: &[u8]) -> Result<Container<'_>, ValidationError> {
    if data.len() < HEADER_LEN {
        return Err(ValidationError::ContainerTooShort {
            len: data.len(),
            min: HEADER_LEN,
        });
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(ValidationError::InvalidMagic);
    }

    let version = data[MAGIC_LEN];
    if version != VERSION_V1 {
        return Err(ValidationError::UnsupportedVersion(version));
    }

    let mut offset = MAGIC_LEN + VER_LEN;

    let mut iterations = [0u8; ITER_LEN];
    iterations.copy_from_slice(&data[offset..offset + ITER_LEN]);
    let kdf = KdfParams::new(u32::from_le_bytes(iterations))?;
    offset += ITER_LEN;

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
    offset += SALT_LEN;

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&data[offset..offset + NONCE_LEN]);
    offset += NONCE_LEN;

    Ok(Container::new(Format::V1, kdf, salt, nonce, &data[offset..]))
}

pub fn serialize(container: &Container<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + container.ciphertext().len());

    buf.extend_from_slice(&prefix(container.kdf()));
    buf.extend_from_slice(container.salt());
    buf.extend_from_slice(container.nonce());
    buf.extend_from_slice(container.ciphertext());

    buf
}
