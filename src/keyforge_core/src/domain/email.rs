use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("must be a valid email address")]
    Invalid,
}

/// Lowercase-normalized email address.
///
/// Uniqueness in the directory is keyed on the normalized form, so
/// `A@x.com` and `a@x.com` refer to the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let normalized = raw.trim().to_ascii_lowercase();
        if EMAIL_REGEX.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(EmailError::Invalid)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use fake::Fake;
    use fake::faker::internet::en::SafeEmail;

    use super::*;

    #[test]
    fn valid_emails_are_accepted() {
        for _ in 0..10 {
            let raw: String = SafeEmail().fake();
            assert!(Email::parse(&raw).is_ok(), "rejected {raw}");
        }
    }

    #[test]
    fn email_is_lowercase_normalized() {
        let email = Email::parse("  Alice.Smith@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice.smith@example.com");
    }

    #[test]
    fn missing_at_symbol_is_rejected() {
        assert_eq!(Email::parse("alice.example.com"), Err(EmailError::Invalid));
    }

    #[test]
    fn missing_domain_is_rejected() {
        assert_eq!(Email::parse("alice@"), Err(EmailError::Invalid));
        assert_eq!(Email::parse("alice@localhost"), Err(EmailError::Invalid));
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!(Email::parse(""), Err(EmailError::Invalid));
    }

    #[test]
    fn serde_round_trip_preserves_normalization() {
        let email: Email = serde_json::from_str(r#""Bob@X.COM""#).unwrap();
        assert_eq!(email.as_str(), "bob@x.com");
        assert_eq!(serde_json::to_string(&email).unwrap(), r#""bob@x.com""#);
    }
}
