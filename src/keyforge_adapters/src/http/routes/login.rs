use axum::{Json, extract::State, response::IntoResponse};
use keyforge_application::LoginUseCase;
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AuthState;

use super::{ApiError, parse_email, parse_password};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    D: UserDirectory + Clone + 'static,
    R: RefreshTokenRepository + Clone + 'static,
    P: PasswordResetRepository + Clone + 'static,
    L: LoginAttemptRepository + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let mut violations = Vec::new();
    let email = parse_email(&request.email, &mut violations);
    let password = parse_password(request.password, "password", &mut violations);
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::Validation(violations));
    };

    let pair = LoginUseCase::new(
        &state.directory,
        &state.refresh_tokens,
        &state.attempts,
        &state.hasher,
        &state.codec,
    )
    .execute(email, password)
    .await?;

    Ok(Json(pair))
}
