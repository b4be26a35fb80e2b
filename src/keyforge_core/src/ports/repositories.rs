use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    account::{Account, NewAccount},
    email::Email,
    records::{LoginAttemptRecord, PasswordResetRecord, RefreshTokenRecord},
};

// UserDirectory port trait and errors
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    #[error("Account already exists")]
    AlreadyExists,
    #[error("Account not found")]
    NotFound,
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PartialEq for UserDirectoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists, Self::AlreadyExists) => true,
            (Self::NotFound, Self::NotFound) => true,
            (Self::Unexpected(_), Self::Unexpected(_)) => true,
            _ => false,
        }
    }
}

/// Directory of accounts. Adapters translate unique-constraint violations
/// into [`UserDirectoryError::AlreadyExists`]; storage detail never leaks
/// past this boundary.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn insert(&self, account: NewAccount) -> Result<Account, UserDirectoryError>;
    async fn find_by_email(&self, email: &Email) -> Result<Account, UserDirectoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Account, UserDirectoryError>;
    async fn update_password(
        &self,
        id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), UserDirectoryError>;
    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<(), UserDirectoryError>;
}

// Record store error shared by the token and audit repositories
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Refresh-token rows. `latest_for_account` must honor recency ordering:
/// the most recently created row wins, older rows are superseded rather
/// than deleted.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn persist(&self, record: RefreshTokenRecord) -> Result<(), StoreError>;
    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;
}

/// Password-reset rows, same recency contract as refresh tokens.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn persist(&self, record: PasswordResetRecord) -> Result<(), StoreError>;
    async fn latest_for_account(
        &self,
        account_id: i64,
    ) -> Result<Option<PasswordResetRecord>, StoreError>;
}

/// Append-only audit log of authentication attempts.
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
    async fn append(&self, record: LoginAttemptRecord) -> Result<(), StoreError>;
}
