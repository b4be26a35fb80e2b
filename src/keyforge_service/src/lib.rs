pub mod telemetry;

use axum::{
    Router,
    routing::{get, post},
};
use keyforge_adapters::AuthState;
use keyforge_adapters::routes::{forgot_password, login, me, refresh, register, reset_password};
use keyforge_core::{
    EmailClient, LoginAttemptRepository, PasswordResetRepository, RefreshTokenRepository,
    UserDirectory,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// The identity service: every auth route wired over one [`AuthState`].
pub struct AuthService {
    router: Router,
}

impl AuthService {
    pub fn new<D, R, P, L, E>(state: AuthState<D, R, P, L, E>) -> Self
    where
        D: UserDirectory + Clone + 'static,
        R: RefreshTokenRepository + Clone + 'static,
        P: PasswordResetRepository + Clone + 'static,
        L: LoginAttemptRepository + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let router = Router::new()
            .route("/auth/register", post(register::<D, R, P, L, E>))
            .route("/auth/login", post(login::<D, R, P, L, E>))
            .route("/auth/refresh", post(refresh::<D, R, P, L, E>))
            .route("/auth/me", get(me::<D, R, P, L, E>))
            .route("/auth/forgot-password", post(forgot_password::<D, R, P, L, E>))
            .route("/auth/reset-password", post(reset_password::<D, R, P, L, E>))
            .with_state(state);

        Self { router }
    }

    pub fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// The composed router, for mounting into a larger application or for
    /// driving directly in tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        tracing::info!(address = %listener.local_addr()?, "starting auth service");
        axum::serve(listener, self.router).await
    }
}
