use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use keyforge_application::ResetPasswordUseCase;
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use secrecy::Secret;
use serde::Deserialize;

use super::forgot_password::ConfirmationResponse;
use crate::http::AuthState;

use super::{ApiError, parse_password};

#[derive(Deserialize)]
pub struct ResetPasswordQuery {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: Secret<String>,
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    Query(query): Query<ResetPasswordQuery>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    D: UserDirectory + Clone + 'static,
    R: RefreshTokenRepository + Clone + 'static,
    P: PasswordResetRepository + Clone + 'static,
    L: LoginAttemptRepository + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let mut violations = Vec::new();
    let Some(new_password) = parse_password(request.new_password, "newPassword", &mut violations)
    else {
        return Err(ApiError::Validation(violations));
    };

    ResetPasswordUseCase::new(&state.directory, &state.reset_flow, &state.hasher, &state.codec)
        .execute(&query.token, new_password)
        .await?;

    Ok(Json(ConfirmationResponse {
        message: "Password has been reset successfully".to_owned(),
    }))
}
