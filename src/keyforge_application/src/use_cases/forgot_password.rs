use keyforge_core::{
    Email, EmailClient, PasswordResetRepository, UserDirectory, UserDirectoryError,
};

use crate::password_reset::{PasswordResetError, PasswordResetFlow};

#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("Account does not exists")]
    AccountDoesNotExist,
    #[error("Unable to persist password reset token: {0}")]
    UnableToPersist(String),
    #[error("Email delivery failed: {0}")]
    EmailDeliveryFailed(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<PasswordResetError> for ForgotPasswordError {
    fn from(error: PasswordResetError) -> Self {
        match error {
            PasswordResetError::UnableToPersist(e) => ForgotPasswordError::UnableToPersist(e),
            PasswordResetError::EmailDeliveryFailed(e) => {
                ForgotPasswordError::EmailDeliveryFailed(e)
            }
            other => ForgotPasswordError::Unexpected(other.to_string()),
        }
    }
}

/// Forgot-password use case - looks the account up by email and starts a
/// reset cycle for it.
pub struct ForgotPasswordUseCase<'a, D, P, E>
where
    D: UserDirectory,
    P: PasswordResetRepository,
    E: EmailClient,
{
    directory: &'a D,
    reset_flow: &'a PasswordResetFlow<P, E>,
}

impl<'a, D, P, E> ForgotPasswordUseCase<'a, D, P, E>
where
    D: UserDirectory,
    P: PasswordResetRepository,
    E: EmailClient,
{
    pub fn new(directory: &'a D, reset_flow: &'a PasswordResetFlow<P, E>) -> Self {
        Self {
            directory,
            reset_flow,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip_all, fields(email = %email))]
    pub async fn execute(&self, email: Email) -> Result<(), ForgotPasswordError> {
        let account = self
            .directory
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserDirectoryError::NotFound => ForgotPasswordError::AccountDoesNotExist,
                other => {
                    tracing::error!(%email, error = %other, "account lookup failed");
                    ForgotPasswordError::AccountDoesNotExist
                }
            })?;

        self.reset_flow.request_reset(&account).await?;
        Ok(())
    }
}
