//! Contact email addresses.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// No whitespace, a single `@`, and a dot after it with text on both sides.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern, covered by tests
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Why an address was rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing but whitespace was entered.
    #[error("no email address given")]
    Empty,
    /// Not shaped like `name@domain.tld`.
    #[error("not a valid email address")]
    Invalid,
}

/// An address accepted by the contact form.
///
/// The value is checked exactly as typed: surrounding whitespace makes it
/// invalid instead of being stripped.
///
/// ```
/// use jardin_core::Email;
///
/// assert!(Email::parse("ana@jardin.example").is_ok());
/// assert!(Email::parse("a@b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate `input` as an address.
    ///
    /// # Errors
    ///
    /// [`EmailError::Empty`] for blank input and [`EmailError::Invalid`] for
    /// anything else the pattern refuses.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        if input.trim().is_empty() {
            Err(EmailError::Empty)
        } else if ADDRESS.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(EmailError::Invalid)
        }
    }

    /// The address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
