//! Phone-number validation and the validated user type
//!
//! [`ValidatedUser`] can only be built by [`validate`]. Its fields are private
//! and it deliberately does not implement `Deserialize`, so every instance
//! in the process carries a normalized 10-digit phone number.
//!
//! # Rules
//! - Every character that is not an ASCII digit is stripped from `number`
//! - An absent or empty `number` is [`ValidationError::MissingPhoneNumber`]
//! - Anything other than exactly 10 digits after stripping is
//!   [`ValidationError::InvalidPhoneNumberLength`]
//!
//! No country-code handling: `+1 555 123 4567` has 11 digits and is rejected.
//!
//! ```rust,ignore
//! use userdeck_ingest::validator::normalize_phone;
//!
//! assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
//! ```

use serde::Serialize;
use thiserror::Error;
use userdeck_common::RawUserRecord;

/// Digits required in a phone number
pub const PHONE_DIGITS: usize = 10;

/// Reasons a raw record is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing phone number")]
    MissingPhoneNumber,

    #[error("Invalid phone length {digits:?}: expected 10 digits, got {}", .digits.len())]
    InvalidPhoneNumberLength { digits: String },
}

impl ValidationError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingPhoneNumber => "missing_phone_number",
            ValidationError::InvalidPhoneNumberLength { .. } => "invalid_phone_number_length",
        }
    }
}

/// Strip everything but ASCII digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Exactly [`PHONE_DIGITS`] ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ValidationError::MissingPhoneNumber),
        };

        let digits = normalize_phone(raw);
        if digits.len() != PHONE_DIGITS {
            return Err(ValidationError::InvalidPhoneNumberLength { digits });
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user whose phone number passed validation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedUser {
    id: i64,
    name: String,
    age: i64,
    number: PhoneNumber,
    photo: String,
    bio: String,
}

impl ValidatedUser {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    pub fn photo(&self) -> &str {
        &self.photo
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }
}

/// Validate a raw record, consuming it.
pub fn validate(raw: RawUserRecord) -> Result<ValidatedUser, ValidationError> {
    let number = PhoneNumber::parse(raw.number.as_deref())?;

    Ok(ValidatedUser {
        id: raw.id,
        name: raw.name,
        age: raw.age,
        number,
        photo: raw.photo,
        bio: raw.bio,
    })
}

impl TryFrom<RawUserRecord> for ValidatedUser {
    type Error = ValidationError;

    fn try_from(raw: RawUserRecord) -> Result<Self, Self::Error> {
        validate(raw)
    }
}
