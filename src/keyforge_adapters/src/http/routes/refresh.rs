use axum::{Json, extract::State, response::IntoResponse};
use keyforge_application::RefreshUseCase;
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use serde::Deserialize;

use crate::http::AuthState;

use super::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    D: UserDirectory + Clone + 'static,
    R: RefreshTokenRepository + Clone + 'static,
    P: PasswordResetRepository + Clone + 'static,
    L: LoginAttemptRepository + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let pair = RefreshUseCase::new(&state.directory, &state.refresh_tokens, &state.codec)
        .execute(&request.refresh_token)
        .await?;

    Ok(Json(pair))
}
