use chrono::{DateTime, Utc};
use keyforge_core::{RefreshTokenRecord, RefreshTokenRepository, StoreError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RefreshValidationError {
    #[error("No refresh token on record")]
    NotFound,
    #[error("Refresh token mismatch")]
    Mismatch,
    #[error("Refresh token has expired")]
    Expired,
    #[error("Database error: {0}")]
    Store(String),
}

/// Owns the single-most-recent-token invariant: only the latest persisted
/// record for an account is authoritative, and a presented token must match
/// it exactly. Older records stay in storage, superseded by recency.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore<R> {
    repository: R,
}

impl<R> RefreshTokenStore<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "Persisting refresh token", skip(self, token))]
    pub async fn persist(
        &self,
        account_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.repository
            .persist(RefreshTokenRecord {
                account_id,
                token: token.to_owned(),
                expires_at,
                created_at: Utc::now(),
            })
            .await
    }

    /// Validates `presented` against the most recent record. Mismatch is
    /// checked before store-level expiry, so a superseded-but-unexpired
    /// token reports as a mismatch, not as expired.
    #[tracing::instrument(name = "Validating refresh token", skip(self, presented))]
    pub async fn validate(
        &self,
        account_id: i64,
        presented: &str,
    ) -> Result<(), RefreshValidationError> {
        let record = self
            .repository
            .latest_for_account(account_id)
            .await
            .map_err(|StoreError::Database(e)| RefreshValidationError::Store(e))?
            .ok_or(RefreshValidationError::NotFound)?;

        if record.token != presented {
            tracing::warn!(account_id, "refresh token mismatch");
            return Err(RefreshValidationError::Mismatch);
        }
        if Utc::now() > record.expires_at {
            tracing::warn!(account_id, "refresh token expired");
            return Err(RefreshValidationError::Expired);
        }
        Ok(())
    }
}
