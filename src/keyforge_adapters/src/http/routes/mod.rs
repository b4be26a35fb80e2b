pub mod error;
pub mod forgot_password;
pub mod login;
pub mod me;
pub mod refresh;
pub mod register;
pub mod reset_password;

pub use error::{ApiError, ErrorResponse, Violation};
pub use forgot_password::forgot_password;
pub use login::login;
pub use me::me;
pub use refresh::refresh;
pub use register::register;
pub use reset_password::reset_password;

use keyforge_core::{Email, Password};
use secrecy::Secret;

/// Collects a field's parse failure instead of short-circuiting, so a
/// request with several bad fields reports every violation at once.
pub(crate) fn parse_email(raw: &str, violations: &mut Vec<Violation>) -> Option<Email> {
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(e) => {
            violations.push(Violation {
                field: "email".to_owned(),
                message: e.to_string(),
            });
            None
        }
    }
}

pub(crate) fn parse_password(
    raw: Secret<String>,
    field: &str,
    violations: &mut Vec<Violation>,
) -> Option<Password> {
    match Password::parse(raw) {
        Ok(password) => Some(password),
        Err(e) => {
            violations.push(Violation {
                field: field.to_owned(),
                message: e.to_string(),
            });
            None
        }
    }
}
