//! Credential set and name normalization.
//!
//! The key is derived from `normalized_name|date_of_birth|pin`. That string
//! must come out byte-for-byte identical on lock and unlock, so everything
//! here is deterministic and the order of normalization steps is fixed.

use std::fmt;

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::ValidationError;

/// Separator between the credential fields in the key material.
pub const FIELD_SEPARATOR: char = '|';
/// Number of digits in a PIN.
pub const PIN_LEN: usize = 4;

const DOB_FORMAT: &str = "%Y-%m-%d";
const DOB_LEN: usize = 10;

/// The three secrets identifying a lock or unlock attempt.
///
/// Fields are wiped from memory when the value is dropped.
pub struct Credentials {
    full_name: Zeroizing<String>,
    date_of_birth: Zeroizing<String>,
    pin: Zeroizing<String>,
}

impl Credentials {
    /// Validates and captures a credential set.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, checking name, date of birth and
    /// PIN in that order.
    pub fn new(full_name: &str, date_of_birth: &str, pin: &str) -> Result<Self, ValidationError> {
        if normalize_name(full_name).is_empty() {
            return Err(ValidationError::EmptyField("full name"));
        }
        validate_date_of_birth(date_of_birth)?;
        validate_pin(pin)?;

        Ok(Self {
            full_name: Zeroizing::new(full_name.to_string()),
            date_of_birth: Zeroizing::new(date_of_birth.to_string()),
            pin: Zeroizing::new(pin.to_string()),
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// Builds the KDF input: `normalized_name|date_of_birth|pin`.
    pub fn key_material(&self) -> Zeroizing<String> {
        let name = Zeroizing::new(normalize_name(&self.full_name));
        let mut material = Zeroizing::new(String::with_capacity(
            name.len() + self.date_of_birth.len() + self.pin.len() + 2,
        ));
        material.push_str(&name);
        material.push(FIELD_SEPARATOR);
        material.push_str(&self.date_of_birth);
        material.push(FIELD_SEPARATOR);
        material.push_str(&self.pin);
        material
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("full_name", &"<redacted>")
            .field("date_of_birth", &"<redacted>")
            .field("pin", &"<redacted>")
            .finish()
    }
}

/// Canonicalizes a full name for key derivation.
///
/// Steps, in order:
/// 1. NFKD decomposition, dropping combining marks in U+0300..=U+036F
/// 2. whitespace around hyphens removed, hyphen runs collapsed to one
/// 3. trimmed, internal whitespace runs collapsed to a single space
/// 4. lowercased
///
/// Whitespace means the set in `is_name_space`, not `char::is_whitespace`.
pub fn normalize_name(raw: &str) -> String {
    let stripped: String = raw.nfkd().filter(|c| !is_combining_diacritic(*c)).collect();

    let mut hyphenated = String::with_capacity(stripped.len());
    let mut after_hyphen = false;
    for c in stripped.chars() {
        if c == '-' {
            let kept = hyphenated.trim_end_matches(is_name_space).len();
            hyphenated.truncate(kept);
            if !hyphenated.ends_with('-') {
                hyphenated.push('-');
            }
            after_hyphen = true;
        } else if after_hyphen && is_name_space(c) {
            continue;
        } else {
            hyphenated.push(c);
            after_hyphen = false;
        }
    }

    hyphenated
        .split(is_name_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Whitespace as existing `.locked` files were keyed with.
///
/// Differs from `char::is_whitespace`: U+FEFF counts, U+0085 does not.
fn is_name_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000b}'
            | '\u{000c}'
            | '\r'
            | ' '
            | '\u{00a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.is_empty() {
        return Err(ValidationError::EmptyField("PIN"));
    }
    if pin.len() != PIN_LEN || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPin);
    }
    Ok(())
}

fn validate_date_of_birth(dob: &str) -> Result<(), ValidationError> {
    if dob.is_empty() {
        return Err(ValidationError::EmptyField("date of birth"));
    }

    // chrono accepts single-digit months and days; those would change the
    // key material, so the shape is checked first.
    let bytes = dob.as_bytes();
    let shaped = bytes.len() == DOB_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped || NaiveDate::parse_from_str(dob, DOB_FORMAT).is_err() {
        return Err(ValidationError::InvalidDateOfBirth);
    }
    Ok(())
}
