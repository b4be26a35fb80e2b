use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keyforge_application::{
    CurrentUserError, ForgotPasswordError, LoginError, RefreshError, RegisterError,
    ResetPasswordError,
};
use keyforge_core::Email;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-level validation failure, reported as a list distinct from the
/// domain-error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Wire shape of every error response: a stable (title, errorCode, status)
/// triple, a human-readable message for domain errors, and a violation
/// list for validation errors.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error_code: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Account already exists for email : {0}")]
    AccountAlreadyExists(Email),
    #[error("Account does not exists")]
    AccountDoesNotExist,
    #[error("Email/Password is invalid")]
    InvalidCredentials,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Refresh token has expired")]
    RefreshTokenExpired,
    #[error("Invalid password reset url")]
    InvalidPasswordResetUrl,
    #[error("User is not authenticated")]
    NotAuthenticated,
    #[error("unable to persist: {0}")]
    UnableToPersist(String),
    #[error("Email delivery failed: {0}")]
    EmailDeliveryFailed(String),
    #[error("Constraint violation")]
    Validation(Vec<Violation>),
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn validation(field: &str, message: impl ToString) -> Self {
        ApiError::Validation(vec![Violation {
            field: field.to_owned(),
            message: message.to_string(),
        }])
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::AccountAlreadyExists(_)
            | ApiError::AccountDoesNotExist
            | ApiError::InvalidCredentials
            | ApiError::UnableToPersist(_)
            | ApiError::EmailDeliveryFailed(_) => StatusCode::CONFLICT,
            ApiError::InvalidRefreshToken
            | ApiError::RefreshTokenExpired
            | ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPasswordResetUrl | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::AccountAlreadyExists(_) => "ACCOUNT_ALREADY_EXISTS",
            ApiError::AccountDoesNotExist => "ACCOUNT_NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidRefreshToken | ApiError::NotAuthenticated => "INVALID_TOKEN",
            ApiError::RefreshTokenExpired => "TOKEN_EXPIRED",
            ApiError::InvalidPasswordResetUrl => "INVALID_TOKEN",
            ApiError::UnableToPersist(_) => "PERSISTENCE_FAILED",
            ApiError::EmailDeliveryFailed(_) => "EMAIL_DELIVERY_FAILED",
            ApiError::Validation(_) => "CONSTRAINT_VIOLATION",
            ApiError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::AccountAlreadyExists(_) => "Registration failed",
            ApiError::AccountDoesNotExist => "Account not found",
            ApiError::InvalidCredentials => "Login failed",
            ApiError::InvalidRefreshToken | ApiError::RefreshTokenExpired => "Invalid token",
            ApiError::InvalidPasswordResetUrl => "Password reset failed",
            ApiError::NotAuthenticated => "Not authenticated",
            ApiError::UnableToPersist(_) => "Persistence failed",
            ApiError::EmailDeliveryFailed(_) => "Email delivery failed",
            ApiError::Validation(_) => "Constraint violation",
            ApiError::Unknown(_) => "Unknown error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(violations) => ErrorResponse {
                title: self.title().to_owned(),
                message: None,
                error_code: self.error_code().to_owned(),
                status: status.as_u16(),
                violations: Some(violations.clone()),
            },
            other => ErrorResponse {
                title: other.title().to_owned(),
                message: Some(other.to_string()),
                error_code: other.error_code().to_owned(),
                status: status.as_u16(),
                violations: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegisterError> for ApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::AccountAlreadyExists(email) => ApiError::AccountAlreadyExists(email),
            RegisterError::RegistrationFailed(e) => ApiError::Unknown(e),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::AccountDoesNotExist => ApiError::AccountDoesNotExist,
            LoginError::InvalidCredentials => ApiError::InvalidCredentials,
            LoginError::UnableToPersist(e) => ApiError::UnableToPersist(e),
            LoginError::Unexpected(e) => ApiError::Unknown(e),
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(error: RefreshError) -> Self {
        match error {
            RefreshError::InvalidRefreshToken => ApiError::InvalidRefreshToken,
            RefreshError::RefreshTokenExpired => ApiError::RefreshTokenExpired,
            RefreshError::UnableToPersist(e) => ApiError::UnableToPersist(e),
        }
    }
}

impl From<CurrentUserError> for ApiError {
    fn from(error: CurrentUserError) -> Self {
        match error {
            CurrentUserError::AccountDoesNotExist => ApiError::AccountDoesNotExist,
        }
    }
}

impl From<ForgotPasswordError> for ApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::AccountDoesNotExist => ApiError::AccountDoesNotExist,
            ForgotPasswordError::UnableToPersist(e) => ApiError::UnableToPersist(e),
            ForgotPasswordError::EmailDeliveryFailed(e) => ApiError::EmailDeliveryFailed(e),
            ForgotPasswordError::Unexpected(e) => ApiError::Unknown(e),
        }
    }
}

impl From<ResetPasswordError> for ApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::InvalidResetUrl => ApiError::InvalidPasswordResetUrl,
        }
    }
}
