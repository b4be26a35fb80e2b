use keyforge_core::{EmailClient, Password, PasswordResetRepository, UserDirectory};

use crate::password_hasher::PasswordHasher;
use crate::password_reset::PasswordResetFlow;
use crate::token_codec::{TokenCodec, TokenKind};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ResetPasswordError {
    #[error("Invalid password reset url")]
    InvalidResetUrl,
}

/// Reset-password use case - derives the account from the reset token, then
/// lets the flow validate it and apply the hashed replacement password.
/// Every failure collapses to an invalid-reset-url outcome so the response
/// never reveals which step rejected the request.
pub struct ResetPasswordUseCase<'a, D, P, E>
where
    D: UserDirectory,
    P: PasswordResetRepository,
    E: EmailClient,
{
    directory: &'a D,
    reset_flow: &'a PasswordResetFlow<P, E>,
    hasher: &'a PasswordHasher,
    codec: &'a TokenCodec,
}

impl<'a, D, P, E> ResetPasswordUseCase<'a, D, P, E>
where
    D: UserDirectory,
    P: PasswordResetRepository,
    E: EmailClient,
{
    pub fn new(
        directory: &'a D,
        reset_flow: &'a PasswordResetFlow<P, E>,
        hasher: &'a PasswordHasher,
        codec: &'a TokenCodec,
    ) -> Self {
        Self {
            directory,
            reset_flow,
            hasher,
            codec,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        presented_token: &str,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let account_id = self
            .codec
            .parse_subject(presented_token, TokenKind::PasswordReset)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to parse reset token");
                ResetPasswordError::InvalidResetUrl
            })?;

        let directory = self.directory;
        let hasher = self.hasher;
        self.reset_flow
            .validate_and_consume(
                account_id,
                presented_token,
                new_password,
                |id, password| async move {
                    let password_hash = hasher.hash(password).await.map_err(|e| e.to_string())?;
                    directory
                        .update_password(id, password_hash)
                        .await
                        .map_err(|e| e.to_string())
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(account_id, error = %e, "password reset rejected");
                ResetPasswordError::InvalidResetUrl
            })
    }
}
