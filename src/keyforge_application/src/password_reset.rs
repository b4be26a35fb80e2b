use std::future::Future;

use chrono::Utc;
use keyforge_core::{Account, EmailClient, Password, PasswordResetRecord, PasswordResetRepository};
use thiserror::Error;

use crate::token_codec::TokenCodec;

#[derive(Debug, Error, PartialEq)]
pub enum PasswordResetError {
    #[error("Invalid password reset url")]
    InvalidResetUrl,
    #[error("Unable to persist password reset token: {0}")]
    UnableToPersist(String),
    #[error("Email delivery failed: {0}")]
    EmailDeliveryFailed(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// One reset cycle: issue a signed reset token, persist it, dispatch the
/// email, and later validate a presented token before applying the new
/// password. Consumption is implicit; no consumed flag is stored, so an
/// unexpired token validates again until superseded by a newer request.
#[derive(Debug, Clone)]
pub struct PasswordResetFlow<P, E> {
    resets: P,
    email_client: E,
    codec: TokenCodec,
}

impl<P, E> PasswordResetFlow<P, E>
where
    P: PasswordResetRepository,
    E: EmailClient,
{
    pub fn new(resets: P, email_client: E, codec: TokenCodec) -> Self {
        Self {
            resets,
            email_client,
            codec,
        }
    }

    /// Issues and persists a reset token, then hands (email, token) to the
    /// email collaborator. A failed email send does not roll back the
    /// persisted record.
    #[tracing::instrument(name = "Requesting password reset", skip_all, fields(account_id = account.id))]
    pub async fn request_reset(&self, account: &Account) -> Result<(), PasswordResetError> {
        let token = self
            .codec
            .issue_reset(account.id)
            .map_err(|e| PasswordResetError::Unexpected(e.to_string()))?;
        let ttl = chrono::Duration::seconds(self.codec.config().reset_ttl_seconds);
        let now = Utc::now();

        self.resets
            .persist(PasswordResetRecord {
                account_id: account.id,
                reset_token: token.clone(),
                expires_at: now + ttl,
                created_at: now,
            })
            .await
            .map_err(|e| PasswordResetError::UnableToPersist(e.to_string()))?;
        tracing::info!(account_id = account.id, "persisted password reset token");

        self.email_client
            .send_password_reset(&account.email, &token)
            .await
            .map_err(PasswordResetError::EmailDeliveryFailed)
    }

    /// Validates `presented_token` against the most recent record for the
    /// account and, on an exact unexpired match, applies `update` to hash
    /// and persist the new password.
    #[tracing::instrument(name = "Validating password reset token", skip_all, fields(account_id))]
    pub async fn validate_and_consume<F, Fut>(
        &self,
        account_id: i64,
        presented_token: &str,
        new_password: Password,
        update: F,
    ) -> Result<(), PasswordResetError>
    where
        F: FnOnce(i64, Password) -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        let record = self
            .resets
            .latest_for_account(account_id)
            .await
            .map_err(|_| PasswordResetError::InvalidResetUrl)?
            .ok_or(PasswordResetError::InvalidResetUrl)?;

        if record.reset_token != presented_token {
            tracing::warn!(account_id, "reset token mismatch");
            return Err(PasswordResetError::InvalidResetUrl);
        }
        if Utc::now() > record.expires_at {
            tracing::warn!(account_id, "reset token record expired");
            return Err(PasswordResetError::InvalidResetUrl);
        }

        tracing::info!(account_id, "reset token matched, updating password");
        update(account_id, new_password)
            .await
            .map_err(PasswordResetError::UnableToPersist)
    }
}
