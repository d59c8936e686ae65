//! Container layouts.
//!
//! Two layouts are supported. `Raw` is `salt | nonce | ciphertext+tag` with
//! implicit KDF parameters. `V1` puts a magic tag, a version byte and the
//! iteration count in front of the same fields. The caller always names the
//! layout; a raw salt may begin with the v1 magic by chance, so detection
//! would be a guess.

use serde::Serialize;

use crate::KdfParams;
use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::ValidationError;

pub mod raw;
pub mod v1;

/// Container layout selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `salt | nonce | ciphertext+tag`, compatible with existing `.locked` files.
    #[default]
    Raw,
    /// Tagged layout that records the KDF iteration count.
    V1,
}

impl Format {
    /// Number of bytes in front of the ciphertext.
    pub fn header_len(self) -> usize {
        match self {
            Format::Raw => raw::HEADER_LEN,
            Format::V1 => v1::HEADER_LEN,
        }
    }
}

/// A parsed or about-to-be-written container.
///
/// Borrows the ciphertext so large documents are not copied while parsing.
#[derive(Debug)]
pub struct Container<'a> {
    format: Format,
    kdf: KdfParams,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: &'a [u8],
}

impl<'a> Container<'a> {
    pub fn new(
        format: Format,
        kdf: KdfParams,
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        ciphertext: &'a [u8],
    ) -> Self {
        Self {
            format,
            kdf,
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// KDF parameters: read from the header for `V1`, supplied by the caller
    /// for `Raw`.
    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }

    /// Bytes authenticated alongside the ciphertext.
    ///
    /// Empty for `Raw`, which must stay readable by existing tools. For `V1`
    /// the magic, version and iteration count, so a rewritten header fails
    /// authentication.
    pub fn associated_data(&self) -> Vec<u8> {
        match self.format {
            Format::Raw => Vec::new(),
            Format::V1 => v1::prefix(&self.kdf).to_vec(),
        }
    }

    pub fn info(&self) -> ContainerInfo {
        ContainerInfo {
            format: self.format,
            version: match self.format {
                Format::Raw => None,
                Format::V1 => Some(v1::VERSION_V1),
            },
            iterations: match self.format {
                Format::Raw => None,
                Format::V1 => Some(self.kdf.iterations()),
            },
            salt: hex(&self.salt),
            nonce: hex(&self.nonce),
            ciphertext_len: self.ciphertext.len(),
            plaintext_len: self.ciphertext.len().checked_sub(TAG_LEN),
        }
    }
}

/// What can be learned about a container without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub format: Format,
    pub version: Option<u8>,
    /// Stored iteration count. `None` for raw containers, which do not
    /// record one.
    pub iterations: Option<u32>,
    pub salt: String,
    pub nonce: String,
    pub ciphertext_len: usize,
    /// `None` when the container is too short to hold a tag.
    pub plaintext_len: Option<usize>,
}

/// Parses `data` with the given layout.
///
/// `kdf` is used for raw containers, which do not record it.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the data is too short or, for `V1`, the
/// header is invalid.
pub fn parse(data: &[u8], format: Format, kdf: KdfParams) -> Result<Container<'_>, ValidationError> {
    match format {
        Format::Raw => raw::parse(data, kdf),
        Format::V1 => v1::parse(data),
    }
}

/// Serializes a container using its own layout.
pub fn serialize(container: &Container<'_>) -> Vec<u8> {
    match container.format() {
        Format::Raw => raw::serialize(container),
        Format::V1 => v1::serialize(container),
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
