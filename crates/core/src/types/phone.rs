//! Vietnamese phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The number starts with neither `0` nor `+84`.
    #[error("phone number must start with 0 or +84")]
    InvalidPrefix,
    /// The subscriber part is not exactly nine digits.
    #[error("phone number must have 9 digits after the prefix")]
    InvalidLength,
}

/// A Vietnamese phone number: `0` or `+84` followed by exactly nine digits.
///
/// ```
/// use mma_shop_core::Phone;
///
/// assert!(Phone::parse("0912345678").is_ok());
/// assert!(Phone::parse("+84912345678").is_ok());
/// assert!(Phone::parse("912345678").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::InvalidPrefix`] or [`PhoneError::InvalidLength`].
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let rest = s
            .strip_prefix("+84")
            .or_else(|| s.strip_prefix('0'))
            .ok_or(PhoneError::InvalidPrefix)?;

        if rest.len() != 9 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidLength);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
