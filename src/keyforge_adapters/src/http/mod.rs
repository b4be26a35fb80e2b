pub mod routes;

use keyforge_application::{
    LoginAttemptRecorder, PasswordHasher, PasswordResetFlow, RefreshTokenStore, TokenCodec,
};
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};

/// Shared handler state: the engine components wired over concrete port
/// implementations. Everything inside is cheap to clone (adapters share
/// their connection pool or `Arc`-backed storage).
#[derive(Clone)]
pub struct AuthState<D, R, P, L, E> {
    pub directory: D,
    pub refresh_tokens: RefreshTokenStore<R>,
    pub reset_flow: PasswordResetFlow<P, E>,
    pub attempts: LoginAttemptRecorder<L>,
    pub hasher: PasswordHasher,
    pub codec: TokenCodec,
}

impl<D, R, P, L, E> AuthState<D, R, P, L, E>
where
    D: UserDirectory,
    R: RefreshTokenRepository,
    P: PasswordResetRepository,
    L: LoginAttemptRepository,
    E: EmailClient,
{
    pub fn new(
        directory: D,
        refresh_tokens: R,
        password_resets: P,
        login_attempts: L,
        email_client: E,
        codec: TokenCodec,
    ) -> Self {
        Self {
            directory,
            refresh_tokens: RefreshTokenStore::new(refresh_tokens),
            reset_flow: PasswordResetFlow::new(password_resets, email_client, codec.clone()),
            attempts: LoginAttemptRecorder::new(login_attempts),
            hasher: PasswordHasher::new(),
            codec,
        }
    }
}
