use axum::{Json, extract::State, http::HeaderMap, http::header::AUTHORIZATION, response::IntoResponse};
use keyforge_application::{CurrentUserUseCase, TokenKind};
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};

use crate::http::AuthState;

use super::ApiError;

/// Returns the authenticated caller's public view. The bearer access token
/// is verified here at the HTTP boundary; the use case receives only the
/// already-verified subject.
#[tracing::instrument(name = "Fetch current user", skip_all)]
pub async fn me<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    D: UserDirectory + Clone + 'static,
    R: RefreshTokenRepository + Clone + 'static,
    P: PasswordResetRepository + Clone + 'static,
    L: LoginAttemptRepository + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let token = bearer_token(&headers).ok_or(ApiError::NotAuthenticated)?;
    let account_id = state
        .codec
        .parse_subject(token, TokenKind::Access)
        .map_err(|_| ApiError::NotAuthenticated)?;

    let view = CurrentUserUseCase::new(&state.directory)
        .execute(account_id)
        .await?;

    Ok(Json(view))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
