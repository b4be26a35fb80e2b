use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use keyforge_application::RegisterUseCase;
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AuthState;

use super::{ApiError, parse_email, parse_password};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: Secret<String>,
    pub first_name: String,
    pub last_name: String,
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    Json(request): Json<RegisterRequest>,
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

    let registered = RegisterUseCase::new(&state.directory, &state.hasher)
        .execute(email, password, request.first_name, request.last_name)
        .await?;

    Ok((StatusCode::CREATED, Json(registered)))
}
