pub mod current_user;
pub mod forgot_password;
pub mod login;
pub mod refresh;
pub mod register;
pub mod reset_password;

use chrono::Utc;
use keyforge_core::{Account, RefreshTokenRepository, StoreError};
use thiserror::Error;

use crate::refresh_tokens::RefreshTokenStore;
use crate::token_codec::{TokenCodec, TokenCodecError, TokenPair};

#[derive(Debug, Error)]
pub(crate) enum IssueTokensError {
    #[error("{0}")]
    Codec(#[from] TokenCodecError),
    #[error("unable to persist token details: {0}")]
    Persist(String),
}

/// Issues a fresh access/refresh pair and persists the refresh record.
/// Persist-then-respond: the record is durable before the caller ever sees
/// the pair, so a cancelled caller at worst leaves a valid unreturned token
/// that the next refresh supersedes.
pub(crate) async fn issue_token_pair<R>(
    codec: &TokenCodec,
    refresh_tokens: &RefreshTokenStore<R>,
    account: &Account,
) -> Result<TokenPair, IssueTokensError>
where
    R: RefreshTokenRepository,
{
    let roles = account.role_names();
    let access_token = codec.issue_access(account.id, &roles)?;
    let refresh_token = codec.issue_refresh(account.id, &roles)?;

    let expires_at = Utc::now()
        + chrono::Duration::try_seconds(codec.config().refresh_ttl_seconds)
            .ok_or_else(|| IssueTokensError::Persist("refresh lifetime out of range".to_owned()))?;
    refresh_tokens
        .persist(account.id, &refresh_token, expires_at)
        .await
        .map_err(|StoreError::Database(e)| IssueTokensError::Persist(e))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: codec.config().access_ttl_seconds,
    })
}
