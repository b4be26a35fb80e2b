use chrono::Utc;
use keyforge_core::{
    Email, LoginAttemptRepository, Password, RefreshTokenRepository, UserDirectory,
    UserDirectoryError,
};

use crate::login_attempts::LoginAttemptRecorder;
use crate::password_hasher::PasswordHasher;
use crate::refresh_tokens::RefreshTokenStore;
use crate::token_codec::{TokenCodec, TokenPair};
use crate::use_cases::{IssueTokensError, issue_token_pair};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Account does not exists")]
    AccountDoesNotExist,
    #[error("Email/Password is invalid")]
    InvalidCredentials,
    #[error("unable to persist token details: {0}")]
    UnableToPersist(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<IssueTokensError> for LoginError {
    fn from(error: IssueTokensError) -> Self {
        match error {
            IssueTokensError::Codec(e) => LoginError::Unexpected(e.to_string()),
            IssueTokensError::Persist(e) => LoginError::UnableToPersist(e),
        }
    }
}

/// Login use case - authenticates credentials and issues a token pair.
///
/// One audit row is recorded per attempt, after password verification and
/// before the caller can observe the outcome. A failed audit write is
/// logged and tolerated; it never flips an otherwise valid login.
pub struct LoginUseCase<'a, D, R, L>
where
    D: UserDirectory,
    R: RefreshTokenRepository,
    L: LoginAttemptRepository,
{
    directory: &'a D,
    refresh_tokens: &'a RefreshTokenStore<R>,
    attempts: &'a LoginAttemptRecorder<L>,
    hasher: &'a PasswordHasher,
    codec: &'a TokenCodec,
}

impl<'a, D, R, L> LoginUseCase<'a, D, R, L>
where
    D: UserDirectory,
    R: RefreshTokenRepository,
    L: LoginAttemptRepository,
{
    pub fn new(
        directory: &'a D,
        refresh_tokens: &'a RefreshTokenStore<R>,
        attempts: &'a LoginAttemptRecorder<L>,
        hasher: &'a PasswordHasher,
        codec: &'a TokenCodec,
    ) -> Self {
        Self {
            directory,
            refresh_tokens,
            attempts,
            hasher,
            codec,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip_all, fields(email = %email))]
    pub async fn execute(&self, email: Email, password: Password) -> Result<TokenPair, LoginError> {
        let account = self
            .directory
            .find_by_email(&email)
            .await
            .map_err(|e| match e {
                UserDirectoryError::NotFound => LoginError::AccountDoesNotExist,
                other => LoginError::Unexpected(other.to_string()),
            })?;

        let valid = self
            .hasher
            .verify(password, account.password_hash.clone())
            .await;

        if let Err(e) = self.attempts.record(account.id, valid).await {
            tracing::warn!(account_id = account.id, error = %e, "unable to persist login attempt");
        }

        if !valid {
            return Err(LoginError::InvalidCredentials);
        }

        let pair = issue_token_pair(self.codec, self.refresh_tokens, &account).await?;

        if let Err(e) = self.directory.touch_last_login(account.id, Utc::now()).await {
            tracing::warn!(account_id = account.id, error = %e, "unable to update last login");
        }

        Ok(pair)
    }
}
