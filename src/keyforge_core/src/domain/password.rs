use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 128;
const SPECIAL_CHARS: &str = "@$!%*?&";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("must be at least {MIN_LEN} characters long")]
    TooShort,
    #[error("must be at most {MAX_LEN} characters long")]
    TooLong,
    #[error(
        "must contain an uppercase letter, a lowercase letter, a digit and one of {SPECIAL_CHARS}"
    )]
    MissingCharacterClass,
    #[error("may only contain letters, digits and {SPECIAL_CHARS}")]
    ForbiddenCharacter,
}

/// Plaintext password candidate that satisfied the account password policy.
///
/// The inner value stays wrapped in [`Secret`] so it never shows up in debug
/// or log output.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: Secret<String>) -> Result<Self, PasswordError> {
        let value = raw.expose_secret();
        if value.chars().count() < MIN_LEN {
            return Err(PasswordError::TooShort);
        }
        if value.chars().count() > MAX_LEN {
            return Err(PasswordError::TooLong);
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(c))
        {
            return Err(PasswordError::ForbiddenCharacter);
        }
        let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        let has_special = value.chars().any(|c| SPECIAL_CHARS.contains(c));
        if !(has_lower && has_upper && has_digit && has_special) {
            return Err(PasswordError::MissingCharacterClass);
        }
        Ok(Self(raw))
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Password::parse(value)
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Password, PasswordError> {
        Password::parse(Secret::from(raw.to_owned()))
    }

    #[test]
    fn policy_compliant_password_is_accepted() {
        assert!(parse("Abc12345!").is_ok());
        assert!(parse("m0ck!123POwed").is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        assert_eq!(parse("Ab1!"), Err(PasswordError::TooShort));
    }

    #[test]
    fn overlong_password_is_rejected() {
        let raw = format!("Aa1!{}", "x".repeat(MAX_LEN));
        assert_eq!(
            Password::parse(Secret::from(raw)),
            Err(PasswordError::TooLong)
        );
    }

    #[test]
    fn password_without_digit_is_rejected() {
        assert_eq!(
            parse("Abcdefgh!"),
            Err(PasswordError::MissingCharacterClass)
        );
    }

    #[test]
    fn password_without_uppercase_is_rejected() {
        assert_eq!(
            parse("abc12345!"),
            Err(PasswordError::MissingCharacterClass)
        );
    }

    #[test]
    fn password_without_special_character_is_rejected() {
        assert_eq!(parse("Abc123456"), Err(PasswordError::MissingCharacterClass));
    }

    #[test]
    fn password_with_forbidden_character_is_rejected() {
        assert_eq!(parse("Abc 1234!"), Err(PasswordError::ForbiddenCharacter));
    }

    #[test]
    fn debug_output_redacts_the_value() {
        let password = parse("Abc12345!").unwrap();
        assert!(!format!("{password:?}").contains("Abc12345"));
    }
}
