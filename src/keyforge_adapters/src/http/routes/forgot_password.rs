use axum::{Json, extract::State, response::IntoResponse};
use keyforge_application::ForgotPasswordUseCase;
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use serde::{Deserialize, Serialize};

use crate::http::AuthState;

use super::{ApiError, parse_email};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub message: String,
}

#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password<D, R, P, L, E>(
    State(state): State<AuthState<D, R, P, L, E>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    D: UserDirectory + Clone + 'static,
    R: RefreshTokenRepository + Clone + 'static,
    P: PasswordResetRepository + Clone + 'static,
    L: LoginAttemptRepository + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let mut violations = Vec::new();
    let Some(email) = parse_email(&request.email, &mut violations) else {
        return Err(ApiError::Validation(violations));
    };

    ForgotPasswordUseCase::new(&state.directory, &state.reset_flow)
        .execute(email)
        .await?;

    Ok(Json(ConfirmationResponse {
        message: "Password reset email sent successfully".to_owned(),
    }))
}
