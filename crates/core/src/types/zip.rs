//! ZIP / postal code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input is empty after trimming.
    #[error("zip code cannot be empty")]
    Empty,
    /// The input is shorter or longer than allowed.
    #[error("zip code must be between {min} and {max} characters")]
    InvalidLength {
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character other than letters, digits, spaces or dashes.
    #[error("zip code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A delivery ZIP / postal code.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 3-10 characters
/// - ASCII letters, digits, spaces and dashes only
///
/// ## Examples
///
/// ```
/// use quickbite_core::ZipCode;
///
/// assert!(ZipCode::parse("10001").is_ok());
/// assert!(ZipCode::parse(" 560 001 ").is_ok());
/// assert!(ZipCode::parse("").is_err());
/// assert!(ZipCode::parse("10001;").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Minimum length of a ZIP code.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum length of a ZIP code.
    pub const MAX_LENGTH: usize = 10;

    /// Parse a `ZipCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, has the wrong length,
    /// or contains characters other than ASCII alphanumerics, spaces or dashes.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&trimmed.len()) {
            return Err(ZipCodeError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == ' ' || *c == '-'))
        {
            return Err(ZipCodeError::InvalidCharacter(bad));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the ZIP code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ZipCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
