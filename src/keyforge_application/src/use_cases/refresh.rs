use keyforge_core::{RefreshTokenRepository, UserDirectory};

use crate::refresh_tokens::{RefreshTokenStore, RefreshValidationError};
use crate::token_codec::{TokenCodec, TokenKind, TokenPair};
use crate::use_cases::{IssueTokensError, issue_token_pair};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Refresh token has expired")]
    RefreshTokenExpired,
    #[error("unable to persist token details: {0}")]
    UnableToPersist(String),
}

impl From<IssueTokensError> for RefreshError {
    fn from(error: IssueTokensError) -> Self {
        match error {
            IssueTokensError::Codec(_) => RefreshError::InvalidRefreshToken,
            IssueTokensError::Persist(e) => RefreshError::UnableToPersist(e),
        }
    }
}

/// Refresh use case - exchanges a valid refresh token for a new pair.
///
/// The old record is not deleted; the newly persisted record supersedes it
/// by recency, so the old token stops validating from this point on.
pub struct RefreshUseCase<'a, D, R>
where
    D: UserDirectory,
    R: RefreshTokenRepository,
{
    directory: &'a D,
    refresh_tokens: &'a RefreshTokenStore<R>,
    codec: &'a TokenCodec,
}

impl<'a, D, R> RefreshUseCase<'a, D, R>
where
    D: UserDirectory,
    R: RefreshTokenRepository,
{
    pub fn new(
        directory: &'a D,
        refresh_tokens: &'a RefreshTokenStore<R>,
        codec: &'a TokenCodec,
    ) -> Self {
        Self {
            directory,
            refresh_tokens,
            codec,
        }
    }

    #[tracing::instrument(name = "RefreshUseCase::execute", skip_all)]
    pub async fn execute(&self, presented: &str) -> Result<TokenPair, RefreshError> {
        let account_id = self
            .codec
            .parse_subject(presented, TokenKind::Refresh)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to parse refresh token");
                RefreshError::InvalidRefreshToken
            })?;

        match self.refresh_tokens.validate(account_id, presented).await {
            Ok(()) => {}
            Err(RefreshValidationError::Expired) => return Err(RefreshError::RefreshTokenExpired),
            Err(RefreshValidationError::NotFound | RefreshValidationError::Mismatch) => {
                return Err(RefreshError::InvalidRefreshToken);
            }
            Err(RefreshValidationError::Store(e)) => {
                tracing::error!(account_id, error = %e, "refresh token lookup failed");
                return Err(RefreshError::InvalidRefreshToken);
            }
        }

        // an account that vanished after validation reads as an invalid token
        let account = self
            .directory
            .find_by_id(account_id)
            .await
            .map_err(|_| RefreshError::InvalidRefreshToken)?;

        Ok(issue_token_pair(self.codec, self.refresh_tokens, &account).await?)
    }
}

#[cfg(test)]
mod tests {
    use keyforge_core::{Email, Password};
    use secrecy::Secret;

    use crate::login_attempts::LoginAttemptRecorder;
    use crate::password_hasher::PasswordHasher;
    use crate::use_cases::login::LoginUseCase;
    use crate::use_cases::register::RegisterUseCase;
    use crate::use_cases::test_support::{MockAttemptLog, MockDirectory, MockRefreshRepo, codec};

    use super::*;

    struct Fixture {
        directory: MockDirectory,
        refresh_tokens: RefreshTokenStore<MockRefreshRepo>,
        codec: TokenCodec,
    }

    impl Fixture {
        fn new(codec: TokenCodec) -> Self {
            Self {
                directory: MockDirectory::default(),
                refresh_tokens: RefreshTokenStore::new(MockRefreshRepo::default()),
                codec,
            }
        }

        async fn login(&self) -> TokenPair {
            let hasher = PasswordHasher::new();
            RegisterUseCase::new(&self.directory, &hasher)
                .execute(
                    Email::parse("user@example.com").unwrap(),
                    Password::parse(Secret::from("Abc12345!".to_owned())).unwrap(),
                    "Ada".to_owned(),
                    "Lovelace".to_owned(),
                )
                .await
                .unwrap();
            let attempts = LoginAttemptRecorder::new(MockAttemptLog::default());
            LoginUseCase::new(
                &self.directory,
                &self.refresh_tokens,
                &attempts,
                &hasher,
                &self.codec,
            )
            .execute(
                Email::parse("user@example.com").unwrap(),
                Password::parse(Secret::from("Abc12345!".to_owned())).unwrap(),
            )
            .await
            .unwrap()
        }

        fn use_case(&self) -> RefreshUseCase<'_, MockDirectory, MockRefreshRepo> {
            RefreshUseCase::new(&self.directory, &self.refresh_tokens, &self.codec)
        }
    }

    #[tokio::test]
    async fn a_valid_refresh_token_yields_a_new_pair() {
        let fixture = Fixture::new(codec());
        let pair = fixture.login().await;

        let renewed = fixture.use_case().execute(&pair.refresh_token).await.unwrap();
        assert!(!renewed.access_token.is_empty());
        assert_ne!(renewed.refresh_token, pair.refresh_token);
    }

    #[tokio::test]
    async fn rotation_invalidates_the_previous_token() {
        let fixture = Fixture::new(codec());
        let pair = fixture.login().await;

        let renewed = fixture.use_case().execute(&pair.refresh_token).await.unwrap();
        // the superseded token no longer matches the latest record
        let result = fixture.use_case().execute(&pair.refresh_token).await;
        assert!(matches!(result, Err(RefreshError::InvalidRefreshToken)));
        // while the fresh one still does
        fixture.use_case().execute(&renewed.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn garbage_tokens_are_invalid() {
        let fixture = Fixture::new(codec());
        fixture.login().await;

        let result = fixture.use_case().execute("not-a-token").await;
        assert!(matches!(result, Err(RefreshError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn an_access_token_cannot_be_used_as_a_refresh_token() {
        let fixture = Fixture::new(codec());
        let pair = fixture.login().await;

        let result = fixture.use_case().execute(&pair.access_token).await;
        assert!(matches!(result, Err(RefreshError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn a_token_with_no_record_is_invalid() {
        let fixture = Fixture::new(codec());
        fixture.login().await;

        // properly signed for an account that never logged in
        let foreign = fixture
            .codec
            .issue_refresh(999, &std::collections::BTreeSet::from(["USER".to_owned()]))
            .unwrap();
        let result = fixture.use_case().execute(&foreign).await;
        assert!(matches!(result, Err(RefreshError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn an_expired_record_reports_token_expired() {
        // the signed claim outlives the stored record here, so it is the
        // store-level expiry check that trips
        let fixture = Fixture::new(codec());
        let pair = fixture.login().await;

        fixture
            .refresh_tokens
            .persist(
                1,
                &pair.refresh_token,
                chrono::Utc::now() - chrono::Duration::seconds(5),
            )
            .await
            .unwrap();

        let result = fixture.use_case().execute(&pair.refresh_token).await;
        assert!(matches!(result, Err(RefreshError::RefreshTokenExpired)));
    }
}
